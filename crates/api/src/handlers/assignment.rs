//! Handlers for project assignment management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use worklog_core::error::CoreError;
use worklog_core::types::DbId;
use worklog_db::repositories::{AssignmentRepo, ProjectRepo, UserRepo};

use super::project::{dedup_ids, ensure_project_access, AssignedUser, AssignmentEntry};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

/// Request body for `POST /projects/{id}/assignments`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAssignmentsRequest {
    pub user_ids: Vec<DbId>,
}

/// GET /api/v1/projects/{id}/assignments
///
/// The project row plus its assignment list with user display fields.
/// Same access rule as the project detail: admins, or users assigned to
/// the project.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let project = ensure_project_access(&state, project_id, &user).await?;

    let assignments: Vec<AssignmentEntry> =
        AssignmentRepo::list_with_users_for_projects(&state.pool, &[project_id])
            .await?
            .into_iter()
            .map(|a| AssignmentEntry {
                id: a.id,
                user_id: a.user_id,
                assigned_at: a.assigned_at,
                user: AssignedUser {
                    id: a.user_id,
                    name: a.user_name,
                    email: a.user_email,
                    role: a.user_role,
                    profile_pic: a.user_profile_pic,
                },
            })
            .collect();

    Ok(Json(json!({
        "project": project,
        "assignments": assignments,
    })))
}

/// POST /api/v1/projects/{id}/assignments
///
/// Batch-assign users to a project. The whole batch is validated up front
/// (every id must resolve to a user); already-assigned ids are skipped
/// rather than erroring. Returns 200 when the entire batch was already
/// assigned, 201 with the created rows otherwise.
pub async fn add(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(project_id): Path<DbId>,
    Json(input): Json<AddAssignmentsRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let user_ids = dedup_ids(&input.user_ids);
    if user_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "userIds must be a non-empty array".into(),
        )));
    }

    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    // All-or-nothing: reject the whole batch if any id is unknown.
    let found = UserRepo::count_existing(&state.pool, &user_ids).await?;
    if found != user_ids.len() as i64 {
        return Err(AppError::Core(CoreError::Validation(
            "One or more users not found".into(),
        )));
    }

    let already = AssignmentRepo::existing_user_ids(&state.pool, project_id, &user_ids).await?;
    let new_ids: Vec<DbId> = user_ids
        .into_iter()
        .filter(|id| !already.contains(id))
        .collect();

    if new_ids.is_empty() {
        return Ok((
            StatusCode::OK,
            Json(json!({ "message": "All users are already assigned to this project" })),
        ));
    }

    let assignments =
        AssignmentRepo::insert_many(&state.pool, project_id, &new_ids, admin.user_id).await?;

    tracing::info!(
        project_id,
        count = assignments.len(),
        assigned_by = admin.user_id,
        "Users assigned to project"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "assignments": assignments })),
    ))
}

/// DELETE /api/v1/projects/{id}/assignments/{user_id}
///
/// Remove a user from a project. Idempotent: removing a pair that does not
/// exist still succeeds with the same message.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((project_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<serde_json::Value>> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    AssignmentRepo::remove(&state.pool, project_id, user_id).await?;

    Ok(Json(json!({ "message": "User removed from project" })))
}
