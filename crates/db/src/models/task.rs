//! Task entity model and DTOs.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use worklog_core::types::{DbId, Timestamp};

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub employee_id: DbId,
    pub task_name: String,
    pub description: Option<String>,
    pub expected_hours: Option<Decimal>,
    pub actual_hours: Decimal,
    pub status: String,
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A task row joined with its employee's display fields, as returned by the
/// project detail queries.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithEmployee {
    pub task_id: DbId,
    pub task_name: String,
    pub description: Option<String>,
    pub expected_hours: Option<Decimal>,
    pub actual_hours: Decimal,
    pub status: String,
    pub approved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub employee_id: DbId,
    pub employee_name: String,
    pub employee_email: String,
}

/// DTO for creating a new task. Status is not accepted here: every task
/// starts at `pending` regardless of the request payload.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: DbId,
    pub employee_id: DbId,
    pub task_name: String,
    pub description: Option<String>,
    pub expected_hours: Option<Decimal>,
    pub actual_hours: Decimal,
}

/// DTO for updating a task. Field edits use COALESCE semantics; a present
/// `status` also overwrites the approval metadata columns with the values
/// given here (the handler computes them from the transition).
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub task_name: Option<String>,
    pub description: Option<String>,
    pub expected_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    pub status: Option<String>,
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
}
