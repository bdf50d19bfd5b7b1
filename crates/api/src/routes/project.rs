//! Route definitions for the `/projects` resource, including the nested
//! assignment management routes.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{assignment, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create (admin)
/// GET    /{id}                          -> get_detail
/// PUT    /{id}                          -> update (admin)
/// DELETE /{id}                          -> delete (admin, soft)
/// GET    /{id}/my-tasks                 -> my_tasks (caller-scoped)
/// GET    /{id}/assignments              -> assignment::list (admin or assigned)
/// POST   /{id}/assignments              -> assignment::add (admin)
/// DELETE /{id}/assignments/{user_id}    -> assignment::remove (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_detail)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/my-tasks", get(project::my_tasks))
        .route(
            "/{id}/assignments",
            get(assignment::list).post(assignment::add),
        )
        .route("/{id}/assignments/{user_id}", delete(assignment::remove))
}
