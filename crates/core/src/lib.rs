//! Pure domain logic for the worklog time-tracking platform.
//!
//! This crate has no database or HTTP dependencies. It holds the error
//! taxonomy, shared type aliases, role and task-status vocabulary, and the
//! task aggregation engine that folds task lists into hour summaries.

pub mod error;
pub mod roles;
pub mod status;
pub mod summary;
pub mod types;
