//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use worklog_core::types::{DbId, Timestamp};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub project_name: String,
    pub description: Option<String>,
    pub created_by: DbId,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project row joined with its creator's display fields, as returned by
/// the listing queries.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectWithCreator {
    pub id: DbId,
    pub project_name: String,
    pub description: Option<String>,
    pub created_by: DbId,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub creator_name: String,
    pub creator_email: String,
}

/// DTO for creating a new project. `created_by` is always the caller.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub project_name: String,
    pub description: Option<String>,
    pub created_by: DbId,
}

/// DTO for updating an existing project. All fields are optional.
///
/// `description` distinguishes "field absent" (outer `None`, keep current
/// value) from an explicit JSON `null` (`Some(None)`, clear to NULL).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub project_name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Wraps a deserialized value in `Some`, so a field that appears in the
/// payload (even as `null`) lands as `Some(...)` while an absent field
/// falls back to the `default` of `None`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
