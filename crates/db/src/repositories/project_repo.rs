//! Repository for the `projects` table.

use sqlx::PgPool;
use worklog_core::types::DbId;

use crate::models::project::{CreateProject, Project, ProjectWithCreator, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_name, description, created_by, is_active, created_at, updated_at";

/// Column list for queries joining the creator's display fields.
const COLUMNS_WITH_CREATOR: &str = "p.id, p.project_name, p.description, p.created_by, \
     p.is_active, p.created_at, p.updated_at, \
     u.name AS creator_name, u.email AS creator_email";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project and its initial assignments in one transaction.
    ///
    /// Either the project row and every assignment row are written, or
    /// nothing is: a failure on any assignment insert (for example a
    /// dangling user id) rolls the project back too.
    pub async fn create_with_assignments(
        pool: &PgPool,
        input: &CreateProject,
        assigned_user_ids: &[DbId],
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (project_name, description, created_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.project_name)
            .bind(&input.description)
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        if !assigned_user_ids.is_empty() {
            sqlx::query(
                "INSERT INTO project_assignments (project_id, user_id, assigned_by)
                 SELECT $1, unnest($2::bigint[]), $3",
            )
            .bind(project.id)
            .bind(assigned_user_ids)
            .bind(input.created_by)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(project)
    }

    /// Find a project by its internal ID, soft-deleted rows included.
    ///
    /// Soft-deleted projects stay reachable by id so their tasks remain
    /// queryable; only the default listings exclude them.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all active projects with creator info, most recent first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<ProjectWithCreator>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS_WITH_CREATOR}
             FROM projects p
             JOIN users u ON u.id = p.created_by
             WHERE p.is_active
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, ProjectWithCreator>(&query)
            .fetch_all(pool)
            .await
    }

    /// List the active projects a user is assigned to, most recent first.
    pub async fn list_active_assigned(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ProjectWithCreator>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS_WITH_CREATOR}
             FROM projects p
             JOIN users u ON u.id = p.created_by
             JOIN project_assignments pa ON pa.project_id = p.id
             WHERE pa.user_id = $1 AND p.is_active
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, ProjectWithCreator>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Absent fields keep their current value; a present
    /// `description` overwrites, including an explicit null that clears it.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                project_name = COALESCE($2, project_name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.project_name)
            .bind(input.description.is_some())
            .bind(input.description.clone().flatten())
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a project by ID. Returns `true` if a row was found.
    ///
    /// Tasks and assignments are not touched; they stay queryable by id.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE projects SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
