//! Project assignment entity model.

use serde::Serialize;
use sqlx::FromRow;
use worklog_core::types::{DbId, Timestamp};

/// A row from the `project_assignments` join table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub assigned_by: DbId,
    pub assigned_at: Timestamp,
}

/// An assignment row joined with the assigned user's display fields.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentWithUser {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub assigned_by: DbId,
    pub assigned_at: Timestamp,
    pub user_name: String,
    pub user_email: String,
    pub user_role: String,
    pub user_profile_pic: Option<String>,
}
