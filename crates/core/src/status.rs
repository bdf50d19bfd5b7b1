//! Well-known task status constants.
//!
//! These must match the CHECK constraint on `tasks.status` in
//! `20260801000004_create_tasks.sql`. Statuses travel as plain strings over
//! the wire and through the database; handlers validate incoming values
//! against this vocabulary before writing.

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

/// Whether a string is one of the three known task statuses.
pub fn is_known_status(status: &str) -> bool {
    matches!(status, STATUS_PENDING | STATUS_APPROVED | STATUS_REJECTED)
}
