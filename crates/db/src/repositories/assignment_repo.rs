//! Repository for the `project_assignments` join table.

use sqlx::PgPool;
use worklog_core::types::DbId;

use crate::models::assignment::{Assignment, AssignmentWithUser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, user_id, assigned_by, assigned_at";

/// Column list for queries joining the assigned user's display fields.
const COLUMNS_WITH_USER: &str = "pa.id, pa.project_id, pa.user_id, pa.assigned_by, pa.assigned_at, \
     u.name AS user_name, u.email AS user_email, u.role AS user_role, \
     u.profile_pic AS user_profile_pic";

/// Provides operations for user-to-project assignment links.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// List assignments (with user info) for a set of projects.
    ///
    /// Fetching all listed projects' assignments in one query avoids an
    /// N+1 on the project listing endpoint; the handler groups by
    /// `project_id`.
    pub async fn list_with_users_for_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<AssignmentWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS_WITH_USER}
             FROM project_assignments pa
             JOIN users u ON u.id = pa.user_id
             WHERE pa.project_id = ANY($1)
             ORDER BY pa.assigned_at, pa.id"
        );
        sqlx::query_as::<_, AssignmentWithUser>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    /// Whether the user appears in the project's assignment list.
    pub async fn is_assigned(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM project_assignments WHERE project_id = $1 AND user_id = $2
             )",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Of the given user ids, return those already assigned to the project.
    pub async fn existing_user_ids(
        pool: &PgPool,
        project_id: DbId,
        user_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT user_id FROM project_assignments
             WHERE project_id = $1 AND user_id = ANY($2)",
        )
        .bind(project_id)
        .bind(user_ids)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Insert assignments for the given users, returning the created rows.
    pub async fn insert_many(
        pool: &PgPool,
        project_id: DbId,
        user_ids: &[DbId],
        assigned_by: DbId,
    ) -> Result<Vec<Assignment>, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_assignments (project_id, user_id, assigned_by)
             SELECT $1, unnest($2::bigint[]), $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(project_id)
            .bind(user_ids)
            .bind(assigned_by)
            .fetch_all(pool)
            .await
    }

    /// Remove the `(project_id, user_id)` pair. Returns `true` if a row was
    /// deleted; removing a pair that does not exist is not an error.
    pub async fn remove(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_assignments WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
