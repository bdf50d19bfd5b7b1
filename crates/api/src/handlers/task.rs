//! Handlers for the `/tasks` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use worklog_core::error::CoreError;
use worklog_core::status::{is_known_status, STATUS_PENDING, STATUS_REJECTED};
use worklog_core::types::DbId;
use worklog_db::models::task::{CreateTask, UpdateTask};
use worklog_db::repositories::{ProjectRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /tasks`. No status field: every task starts at
/// `pending` no matter what the payload says.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub project_id: DbId,
    pub task_name: String,
    pub description: Option<String>,
    pub expected_hours: Option<Decimal>,
    pub actual_hours: Decimal,
}

/// Request body for `PUT /tasks/{id}`. All fields optional; `status` is
/// only honored for admins.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub task_name: Option<String>,
    pub description: Option<String>,
    pub expected_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    pub status: Option<String>,
    pub rejection_reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/tasks
///
/// Log a task against a project. The task always belongs to the caller.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    if input.task_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "taskName is required".into(),
        )));
    }
    validate_hours(input.expected_hours, Some(input.actual_hours))?;

    ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        }))?;

    let create = CreateTask {
        project_id: input.project_id,
        employee_id: user.user_id,
        task_name: input.task_name.trim().to_string(),
        description: input.description,
        expected_hours: input.expected_hours,
        actual_hours: input.actual_hours,
    };
    let task = TaskRepo::create(&state.pool, &create).await?;

    Ok((StatusCode::CREATED, Json(json!({ "task": task }))))
}

/// PUT /api/v1/tasks/{id}
///
/// Field edits are allowed for the owning employee while the task is still
/// `pending`, and for admins at any time. Status transitions are admin-only:
/// moving to `approved` or `rejected` stamps `approved_by`/`approved_at`
/// (plus the rejection reason), moving back to `pending` clears all three.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTaskRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    let is_owner = task.employee_id == user.user_id;
    if !is_owner && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only edit your own tasks".into(),
        )));
    }

    if let Some(name) = &input.task_name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "taskName cannot be empty".into(),
            )));
        }
    }
    validate_hours(input.expected_hours, input.actual_hours)?;

    // Role gate first: a non-admin touching `status` is refused before the
    // value is even looked at.
    if let Some(status) = &input.status {
        if !user.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only admins can change task status".into(),
            )));
        }
        if !is_known_status(status) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid status: {status}"
            ))));
        }
    }

    // Once a task has been reviewed, the owning employee can no longer
    // edit it; only an admin can.
    if !user.is_admin() && task.status != STATUS_PENDING {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot edit a task that has already been reviewed".into(),
        )));
    }

    let mut update = UpdateTask {
        task_name: input.task_name.map(|n| n.trim().to_string()),
        description: input.description,
        expected_hours: input.expected_hours,
        actual_hours: input.actual_hours,
        status: input.status.clone(),
        ..UpdateTask::default()
    };

    // Transition side effects. A move back to `pending` leaves the
    // metadata fields at None, which the repository writes through as
    // NULL whenever a status is present.
    match input.status.as_deref() {
        Some(STATUS_PENDING) | None => {}
        Some(status) => {
            update.approved_by = Some(user.user_id);
            update.approved_at = Some(Utc::now());
            if status == STATUS_REJECTED {
                update.rejection_reason = input.rejection_reason;
            }
        }
    }

    let task = TaskRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    Ok(Json(json!({ "task": task })))
}

/// DELETE /api/v1/tasks/{id}
///
/// Hard delete by the owning employee or an admin. Reviews cascade with
/// the task.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    if task.employee_id != user.user_id && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only delete your own tasks".into(),
        )));
    }

    TaskRepo::hard_delete(&state.pool, id).await?;

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reject negative hour values. Malformed (non-numeric) values never get
/// this far; serde refuses them at deserialization.
fn validate_hours(expected: Option<Decimal>, actual: Option<Decimal>) -> AppResult<()> {
    if expected.is_some_and(|h| h < Decimal::ZERO) || actual.is_some_and(|h| h < Decimal::ZERO) {
        return Err(AppError::Core(CoreError::Validation(
            "Hours cannot be negative".into(),
        )));
    }
    Ok(())
}
