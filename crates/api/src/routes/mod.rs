//! Route definitions, grouped by resource.

pub mod auth;
pub mod health;
pub mod project;
pub mod review;
pub mod task;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// All routes mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", user::router())
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
        .nest("/reviews", review::router())
}
