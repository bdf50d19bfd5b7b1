//! Handlers for the `/reviews` resource.
//!
//! Reviews are written by admins against tasks; the owning employee may
//! post (and remove) a single reply per review.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use worklog_core::error::CoreError;
use worklog_core::types::DbId;
use worklog_db::models::review::{CreateReview, Review, ReviewWithReviewer};
use worklog_db::repositories::{ReviewRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /reviews`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReviewsQuery {
    pub task_id: DbId,
}

/// Request body for `POST /reviews`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub task_id: DbId,
    pub rating: i32,
    pub feedback: Option<String>,
}

/// Request body for `PUT /reviews/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: Option<i32>,
    pub feedback: Option<String>,
}

/// Request body for `POST /reviews/{id}/reply`.
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub reply: String,
}

/// Aggregate figures for a task's review list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListSummary {
    pub total_reviews: i64,
    /// Mean rating as a fixed two-decimal string, `"0"` when there are
    /// no reviews.
    pub average_rating: String,
    pub admin_reviews: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/reviews?taskId={id}
///
/// All reviews for a task with reviewer info, newest first, plus summary
/// figures.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<ListReviewsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    TaskRepo::find_by_id(&state.pool, query.task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: query.task_id,
        }))?;

    let reviews = ReviewRepo::list_for_task(&state.pool, query.task_id).await?;
    let summary = summarize_reviews(&reviews);

    Ok(Json(json!({ "reviews": reviews, "summary": summary })))
}

/// POST /api/v1/reviews
///
/// Admin only. At most one review per (task, reviewer) pair; the unique
/// constraint backstops the pre-check.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    if !(1..=5).contains(&input.rating) {
        return Err(AppError::Core(CoreError::Validation(
            "Rating must be between 1 and 5".into(),
        )));
    }

    TaskRepo::find_by_id(&state.pool, input.task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: input.task_id,
        }))?;

    if ReviewRepo::exists_for_task_and_reviewer(&state.pool, input.task_id, admin.user_id).await? {
        return Err(AppError::Core(CoreError::Validation(
            "You have already reviewed this task".into(),
        )));
    }

    let create = CreateReview {
        task_id: input.task_id,
        reviewer_id: admin.user_id,
        rating: input.rating,
        feedback: input.feedback,
    };
    let review = ReviewRepo::create(&state.pool, &create).await?;

    Ok((StatusCode::CREATED, Json(json!({ "review": review }))))
}

/// GET /api/v1/reviews/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let review = ReviewRepo::find_by_id_with_reviewer(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id,
        }))?;

    Ok(Json(json!({ "review": review })))
}

/// PUT /api/v1/reviews/{id}
///
/// Admins may edit only their own reviews.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReviewRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let review = find_review(&state, id).await?;
    if review.reviewer_id != admin.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only edit your own reviews".into(),
        )));
    }

    if let Some(rating) = input.rating {
        if !(1..=5).contains(&rating) {
            return Err(AppError::Core(CoreError::Validation(
                "Rating must be between 1 and 5".into(),
            )));
        }
    }

    let review = ReviewRepo::update(&state.pool, id, input.rating, input.feedback)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id,
        }))?;

    Ok(Json(json!({ "review": review })))
}

/// DELETE /api/v1/reviews/{id}
///
/// Admins may delete only their own reviews.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let review = find_review(&state, id).await?;
    if review.reviewer_id != admin.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only delete your own reviews".into(),
        )));
    }

    ReviewRepo::delete(&state.pool, id).await?;

    Ok(Json(json!({ "message": "Review deleted successfully" })))
}

/// POST /api/v1/reviews/{id}/reply
///
/// Only the employee who owns the reviewed task may reply. Admins are
/// rejected here: the reply channel belongs to the employee.
pub async fn reply(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<ReplyRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if input.reply.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Reply cannot be empty".into(),
        )));
    }

    let review = find_review(&state, id).await?;
    ensure_task_owner(&state, &review, user.user_id).await?;

    let review = ReviewRepo::set_reply(&state.pool, id, Some(input.reply.trim().to_string()))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id,
        }))?;

    Ok(Json(json!({ "review": review })))
}

/// DELETE /api/v1/reviews/{id}/reply
///
/// Clears the reply and its timestamp together. Task owner only.
pub async fn delete_reply(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let review = find_review(&state, id).await?;
    ensure_task_owner(&state, &review, user.user_id).await?;

    ReviewRepo::set_reply(&state.pool, id, None).await?;

    Ok(Json(json!({ "message": "Reply removed" })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_review(state: &AppState, id: DbId) -> AppResult<Review> {
    ReviewRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id,
        }))
}

/// Reject callers who do not own the reviewed task.
async fn ensure_task_owner(state: &AppState, review: &Review, user_id: DbId) -> AppResult<()> {
    let task = TaskRepo::find_by_id(&state.pool, review.task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: review.task_id,
        }))?;

    if task.employee_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the task owner can reply to reviews".into(),
        )));
    }
    Ok(())
}

fn summarize_reviews(reviews: &[ReviewWithReviewer]) -> ReviewListSummary {
    let total = reviews.len() as i64;
    let average_rating = if total > 0 {
        let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
        format!("{:.2}", sum as f64 / total as f64)
    } else {
        "0".to_string()
    };
    let admin_reviews = reviews.iter().filter(|r| r.reviewer_type == "admin").count() as i64;

    ReviewListSummary {
        total_reviews: total,
        average_rating,
        admin_reviews,
    }
}
