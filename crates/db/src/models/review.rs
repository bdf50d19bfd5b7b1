//! Task review entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use worklog_core::types::{DbId, Timestamp};

/// A review row from the `task_reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: DbId,
    pub task_id: DbId,
    pub reviewer_id: DbId,
    pub reviewer_type: String,
    pub rating: i32,
    pub feedback: Option<String>,
    pub reply: Option<String>,
    pub replied_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A review row joined with the reviewer's display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithReviewer {
    pub id: DbId,
    pub task_id: DbId,
    pub reviewer_id: DbId,
    pub reviewer_type: String,
    pub rating: i32,
    pub feedback: Option<String>,
    pub reply: Option<String>,
    pub replied_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub reviewer_name: String,
    pub reviewer_email: String,
}

/// DTO for creating a new review. `reviewer_type` is always `"admin"` in the
/// current flow.
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub task_id: DbId,
    pub reviewer_id: DbId,
    pub rating: i32,
    pub feedback: Option<String>,
}
