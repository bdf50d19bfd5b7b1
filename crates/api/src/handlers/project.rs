//! Handlers for the `/projects` resource.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use worklog_core::error::CoreError;
use worklog_core::summary::{summarize, TaskSample};
use worklog_core::types::{DbId, Timestamp};
use worklog_db::models::assignment::AssignmentWithUser;
use worklog_db::models::project::{CreateProject, Project, ProjectWithCreator, UpdateProject};
use worklog_db::models::task::TaskWithEmployee;
use worklog_db::repositories::{AssignmentRepo, ProjectRepo, TaskRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /projects`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub project_name: String,
    pub description: Option<String>,
    /// Users to assign at creation time. Runs in the same transaction as
    /// the project insert.
    #[serde(default)]
    pub assigned_user_ids: Vec<DbId>,
}

/// Creator display fields embedded in listing items.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorInfo {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

/// Assigned user display fields embedded in listing items.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedUser {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub profile_pic: Option<String>,
}

/// One assignment entry in a listing item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub assigned_at: Timestamp,
    pub user: AssignedUser,
}

/// A project as returned by `GET /projects`: the row plus creator info and
/// the full assignment list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListItem {
    pub id: DbId,
    pub project_name: String,
    pub description: Option<String>,
    pub created_by: DbId,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub creator: CreatorInfo,
    pub assignments: Vec<AssignmentEntry>,
}

impl ProjectListItem {
    fn from_parts(project: ProjectWithCreator, assignments: Vec<AssignmentWithUser>) -> Self {
        Self {
            id: project.id,
            project_name: project.project_name,
            description: project.description,
            created_by: project.created_by,
            is_active: project.is_active,
            created_at: project.created_at,
            updated_at: project.updated_at,
            creator: CreatorInfo {
                id: project.created_by,
                name: project.creator_name,
                email: project.creator_email,
            },
            assignments: assignments
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
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects
///
/// Admins see every active project; other users see only the active
/// projects they are assigned to. Each item carries creator info and the
/// full assignment list.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<serde_json::Value>> {
    let projects = if user.is_admin() {
        ProjectRepo::list_active(&state.pool).await?
    } else {
        ProjectRepo::list_active_assigned(&state.pool, user.user_id).await?
    };

    // One assignment query for the whole page, grouped in memory.
    let project_ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();
    let mut by_project: HashMap<DbId, Vec<AssignmentWithUser>> = HashMap::new();
    if !project_ids.is_empty() {
        for assignment in
            AssignmentRepo::list_with_users_for_projects(&state.pool, &project_ids).await?
        {
            by_project
                .entry(assignment.project_id)
                .or_default()
                .push(assignment);
        }
    }

    let items: Vec<ProjectListItem> = projects
        .into_iter()
        .map(|p| {
            let assignments = by_project.remove(&p.id).unwrap_or_default();
            ProjectListItem::from_parts(p, assignments)
        })
        .collect();

    Ok(Json(json!({ "projects": items })))
}

/// POST /api/v1/projects
///
/// Admin only. Validates every assigned user id before writing anything;
/// the project insert and the assignment inserts share one transaction.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    if input.project_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "projectName is required".into(),
        )));
    }

    let assigned_ids = dedup_ids(&input.assigned_user_ids);
    if !assigned_ids.is_empty() {
        let found = UserRepo::count_existing(&state.pool, &assigned_ids).await?;
        if found != assigned_ids.len() as i64 {
            return Err(AppError::Core(CoreError::Validation(
                "One or more users not found".into(),
            )));
        }
    }

    let create = CreateProject {
        project_name: input.project_name.trim().to_string(),
        description: input.description,
        created_by: admin.user_id,
    };
    let project = ProjectRepo::create_with_assignments(&state.pool, &create, &assigned_ids).await?;

    tracing::info!(project_id = project.id, created_by = admin.user_id, "Project created");

    Ok((StatusCode::CREATED, Json(json!({ "project": project }))))
}

/// GET /api/v1/projects/{id}
///
/// Project detail: the row, all its tasks with employee info, the hour
/// summary, and the per-employee breakdown. Accessible to admins and to
/// users assigned to the project.
pub async fn get_detail(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let project = ensure_project_access(&state, id, &user).await?;

    let tasks = TaskRepo::list_for_project(&state.pool, id).await?;
    let (summary, employees) = summarize(&to_samples(&tasks));

    Ok(Json(json!({
        "project": project,
        "tasks": tasks,
        "summary": summary,
        "employees": employees,
    })))
}

/// GET /api/v1/projects/{id}/my-tasks
///
/// Same envelope as the project detail, scoped to the caller's own tasks.
pub async fn my_tasks(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let project = ensure_project_access(&state, id, &user).await?;

    let tasks = TaskRepo::list_for_project_and_employee(&state.pool, id, user.user_id).await?;
    let (summary, employees) = summarize(&to_samples(&tasks));

    Ok(Json(json!({
        "project": project,
        "tasks": tasks,
        "summary": summary,
        "employees": employees,
    })))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(name) = &input.project_name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "projectName cannot be empty".into(),
            )));
        }
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    Ok(Json(json!({ "project": project })))
}

/// DELETE /api/v1/projects/{id}
///
/// Soft delete: the project disappears from listings but stays reachable
/// by id, so its tasks remain queryable.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = ProjectRepo::soft_delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }

    Ok(Json(json!({ "message": "Project deleted successfully" })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a project by id and enforce detail access: admins always pass,
/// everyone else must appear in the project's assignment list.
pub(crate) async fn ensure_project_access(
    state: &AppState,
    project_id: DbId,
    user: &AuthUser,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    if !user.is_admin() && !AssignmentRepo::is_assigned(&state.pool, project_id, user.user_id).await?
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this project".into(),
        )));
    }

    Ok(project)
}

/// Flatten task rows into aggregation samples.
fn to_samples(tasks: &[TaskWithEmployee]) -> Vec<TaskSample> {
    tasks
        .iter()
        .map(|t| TaskSample {
            employee_id: t.employee_id,
            employee_name: t.employee_name.clone(),
            employee_email: t.employee_email.clone(),
            expected_hours: t.expected_hours,
            actual_hours: t.actual_hours,
            status: t.status.clone(),
        })
        .collect()
}

/// Deduplicate ids preserving first-seen order.
pub(crate) fn dedup_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut out: Vec<DbId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}
