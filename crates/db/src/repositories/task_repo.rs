//! Repository for the `tasks` table.

use sqlx::PgPool;
use worklog_core::types::DbId;

use crate::models::task::{CreateTask, Task, TaskWithEmployee, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, employee_id, task_name, description, expected_hours, \
     actual_hours, status, approved_by, approved_at, rejection_reason, created_at, updated_at";

/// Column list for queries joining the employee's display fields.
const COLUMNS_WITH_EMPLOYEE: &str = "t.id AS task_id, t.task_name, t.description, t.expected_hours, t.actual_hours, \
     t.status, t.approved_at, t.created_at, \
     u.id AS employee_id, u.name AS employee_name, u.email AS employee_email";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task. The status column is left to its `pending`
    /// default, so a status smuggled into the request can never take effect.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (project_id, employee_id, task_name, description, expected_hours, actual_hours)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.project_id)
            .bind(input.employee_id)
            .bind(&input.task_name)
            .bind(&input.description)
            .bind(input.expected_hours)
            .bind(input.actual_hours)
            .fetch_one(pool)
            .await
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's tasks with employee info, most recent first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<TaskWithEmployee>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS_WITH_EMPLOYEE}
             FROM tasks t
             JOIN users u ON u.id = t.employee_id
             WHERE t.project_id = $1
             ORDER BY t.created_at DESC"
        );
        sqlx::query_as::<_, TaskWithEmployee>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List one employee's tasks within a project, most recent first.
    pub async fn list_for_project_and_employee(
        pool: &PgPool,
        project_id: DbId,
        employee_id: DbId,
    ) -> Result<Vec<TaskWithEmployee>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS_WITH_EMPLOYEE}
             FROM tasks t
             JOIN users u ON u.id = t.employee_id
             WHERE t.project_id = $1 AND t.employee_id = $2
             ORDER BY t.created_at DESC"
        );
        sqlx::query_as::<_, TaskWithEmployee>(&query)
            .bind(project_id)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task in one statement.
    ///
    /// Plain fields use COALESCE semantics. When `status` is present the
    /// approval metadata columns (`approved_by`, `approved_at`,
    /// `rejection_reason`) are overwritten with the values supplied in
    /// `input`, so a transition back to `pending` clears them.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                task_name = COALESCE($2, task_name),
                description = COALESCE($3, description),
                expected_hours = COALESCE($4, expected_hours),
                actual_hours = COALESCE($5, actual_hours),
                status = COALESCE($6, status),
                approved_by = CASE WHEN $6 IS NULL THEN approved_by ELSE $7 END,
                approved_at = CASE WHEN $6 IS NULL THEN approved_at ELSE $8 END,
                rejection_reason = CASE WHEN $6 IS NULL THEN rejection_reason ELSE $9 END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.task_name)
            .bind(&input.description)
            .bind(input.expected_hours)
            .bind(input.actual_hours)
            .bind(&input.status)
            .bind(input.approved_by)
            .bind(input.approved_at)
            .bind(&input.rejection_reason)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a task by ID. Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
