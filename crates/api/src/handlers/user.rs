//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::Json;
use serde_json::json;
use worklog_core::roles::ROLE_USER;
use worklog_db::models::user::UserResponse;
use worklog_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/v1/users
///
/// Admin only. Active non-admin users, safe fields only, for the
/// assignment picker.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<serde_json::Value>> {
    let users = UserRepo::list_active_by_role(&state.pool, ROLE_USER).await?;
    let users: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();

    Ok(Json(json!({ "users": users })))
}
