//! Repository for the `task_reviews` table.

use sqlx::PgPool;
use worklog_core::types::DbId;

use crate::models::review::{CreateReview, Review, ReviewWithReviewer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, task_id, reviewer_id, reviewer_type, rating, feedback, reply, \
     replied_at, created_at, updated_at";

/// Column list for queries joining the reviewer's display fields.
const COLUMNS_WITH_REVIEWER: &str = "r.id, r.task_id, r.reviewer_id, r.reviewer_type, r.rating, r.feedback, r.reply, \
     r.replied_at, r.created_at, r.updated_at, \
     u.name AS reviewer_name, u.email AS reviewer_email";

/// Provides CRUD operations for task reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a new review, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_reviews (task_id, reviewer_id, reviewer_type, rating, feedback)
             VALUES ($1, $2, 'admin', $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.task_id)
            .bind(input.reviewer_id)
            .bind(input.rating)
            .bind(&input.feedback)
            .fetch_one(pool)
            .await
    }

    /// Find a review by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a review by id, joined with reviewer info.
    pub async fn find_by_id_with_reviewer(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ReviewWithReviewer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS_WITH_REVIEWER}
             FROM task_reviews r
             JOIN users u ON u.id = r.reviewer_id
             WHERE r.id = $1"
        );
        sqlx::query_as::<_, ReviewWithReviewer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether the reviewer has already reviewed the task. Backstopped by
    /// the `uq_task_reviews_task_reviewer` constraint.
    pub async fn exists_for_task_and_reviewer(
        pool: &PgPool,
        task_id: DbId,
        reviewer_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM task_reviews WHERE task_id = $1 AND reviewer_id = $2
             )",
        )
        .bind(task_id)
        .bind(reviewer_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// List a task's reviews with reviewer info, newest first.
    pub async fn list_for_task(
        pool: &PgPool,
        task_id: DbId,
    ) -> Result<Vec<ReviewWithReviewer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS_WITH_REVIEWER}
             FROM task_reviews r
             JOIN users u ON u.id = r.reviewer_id
             WHERE r.task_id = $1
             ORDER BY r.created_at DESC"
        );
        sqlx::query_as::<_, ReviewWithReviewer>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }

    /// Update a review's rating and/or feedback. Only non-`None` fields are
    /// applied. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        rating: Option<i32>,
        feedback: Option<String>,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "UPDATE task_reviews SET
                rating = COALESCE($2, rating),
                feedback = COALESCE($3, feedback),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(rating)
            .bind(feedback)
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the employee's reply. `reply`/`replied_at` move
    /// together: `Some` stamps `replied_at = NOW()`, `None` clears both.
    pub async fn set_reply(
        pool: &PgPool,
        id: DbId,
        reply: Option<String>,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "UPDATE task_reviews SET
                reply = $2,
                replied_at = CASE WHEN $2 IS NULL THEN NULL ELSE NOW() END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(reply)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a review by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
