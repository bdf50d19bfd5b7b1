//! HTTP error surface.
//!
//! Every handler returns [`AppResult`]; the [`IntoResponse`] impl turns
//! domain errors and raw sqlx failures alike into the `{"error", "code"}`
//! JSON body clients expect. Status codes live here, next to the mapping,
//! not in the handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use worklog_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain rule rejected the request. The variant picks the status.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A query failed. Classified further in [`classify_sqlx_error`].
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A dependency below the domain failed (hashing, token signing).
    /// Logged in full, sanitized on the wire.
    #[error("internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => {
                let (status, code) = match core {
                    CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                    CoreError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
                    CoreError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                };
                (status, code, core.to_string())
            }
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx failure into a status, error code, and wire message.
///
/// `RowNotFound` becomes 404. A Postgres unique violation (23505) on one of
/// the schema's `uq_` constraints becomes 409 with a message naming what
/// collided. Everything else is logged and sanitized to a 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    conflict_message(constraint).to_string(),
                )
            } else {
                tracing::error!(error = %db_err, constraint, "unexpected unique violation");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        }
        other => {
            tracing::error!(error = %other, "database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}

/// Client-facing message for a violated unique constraint.
fn conflict_message(constraint: &str) -> &'static str {
    match constraint {
        "uq_users_email" => "A user with this email already exists",
        "uq_project_assignments_project_user" => "User is already assigned to this project",
        "uq_task_reviews_task_reviewer" => "You have already reviewed this task",
        _ => "Duplicate value violates a unique constraint",
    }
}
