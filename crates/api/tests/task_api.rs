//! HTTP-level integration tests for the `/tasks` resource: the forced
//! pending status, the edit permission matrix, status transitions, and
//! deletion.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_admin, create_employee, delete_auth, post_json_auth,
    put_json_auth, token_for,
};
use sqlx::PgPool;
use worklog_core::types::DbId;
use worklog_db::models::project::CreateProject;
use worklog_db::models::user::User;
use worklog_db::repositories::{ProjectRepo, TaskRepo};

/// Seed a project (with the given assignees) directly and return its id.
async fn seed_project(pool: &PgPool, admin: &User, assignees: &[DbId]) -> DbId {
    let project = ProjectRepo::create_with_assignments(
        pool,
        &CreateProject {
            project_name: "Test Project".to_string(),
            description: None,
            created_by: admin.id,
        },
        assignees,
    )
    .await
    .expect("project creation should succeed");
    project.id
}

/// Create a task via the API as the given user and return its id.
async fn create_task_via_api(pool: &PgPool, token: &str, project_id: DbId) -> DbId {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "projectId": project_id,
        "taskName": "Write report",
        "expectedHours": "4.00",
        "actualHours": "3.50",
    });
    let response = post_json_auth(app, "/api/v1/tasks", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["task"]["id"].as_i64().expect("task id")
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Every new task starts at `pending`, even when the payload smuggles a
/// status field.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_forces_pending(pool: PgPool) {
    let admin = create_admin(&pool, "boss").await;
    let alice = create_employee(&pool, "alice").await;
    let project_id = seed_project(&pool, &admin, &[alice.id]).await;

    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "projectId": project_id,
        "taskName": "Sneaky",
        "actualHours": "1.00",
        "status": "approved",
    });
    let response = post_json_auth(app, "/api/v1/tasks", body, &token_for(&alice)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["task"]["status"], "pending");
    assert_eq!(json["task"]["employeeId"], alice.id);
    assert!(json["task"]["approvedBy"].is_null());
}

/// An empty task name is rejected.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_empty_name(pool: PgPool) {
    let admin = create_admin(&pool, "boss").await;
    let alice = create_employee(&pool, "alice").await;
    let project_id = seed_project(&pool, &admin, &[alice.id]).await;

    let app = build_test_app(pool);
    let body = serde_json::json!({
        "projectId": project_id,
        "taskName": "  ",
        "actualHours": "1.00",
    });
    let response = post_json_auth(app, "/api/v1/tasks", body, &token_for(&alice)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Negative hours are rejected at the boundary.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_negative_hours(pool: PgPool) {
    let admin = create_admin(&pool, "boss").await;
    let alice = create_employee(&pool, "alice").await;
    let project_id = seed_project(&pool, &admin, &[alice.id]).await;

    let app = build_test_app(pool);
    let body = serde_json::json!({
        "projectId": project_id,
        "taskName": "Negative",
        "actualHours": "-1.00",
    });
    let response = post_json_auth(app, "/api/v1/tasks", body, &token_for(&alice)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A non-numeric hours value fails at deserialization, before any handler
/// logic runs.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_malformed_hours(pool: PgPool) {
    let admin = create_admin(&pool, "boss").await;
    let alice = create_employee(&pool, "alice").await;
    let project_id = seed_project(&pool, &admin, &[alice.id]).await;

    let app = build_test_app(pool);
    let body = serde_json::json!({
        "projectId": project_id,
        "taskName": "Garbage hours",
        "actualHours": "not-a-number",
    });
    let response = post_json_auth(app, "/api/v1/tasks", body, &token_for(&alice)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

/// Logging a task against an unknown project yields 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_unknown_project(pool: PgPool) {
    let alice = create_employee(&pool, "alice").await;

    let app = build_test_app(pool);
    let body = serde_json::json!({
        "projectId": 424242,
        "taskName": "Orphan",
        "actualHours": "1.00",
    });
    let response = post_json_auth(app, "/api/v1/tasks", body, &token_for(&alice)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Update permission matrix
// ---------------------------------------------------------------------------

/// A non-admin attempting a status change gets 403 and the row stays
/// untouched.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_admin_cannot_change_status(pool: PgPool) {
    let admin = create_admin(&pool, "boss").await;
    let alice = create_employee(&pool, "alice").await;
    let project_id = seed_project(&pool, &admin, &[alice.id]).await;
    let task_id = create_task_via_api(&pool, &token_for(&alice), project_id).await;

    let app = build_test_app(pool.clone());
    let body = serde_json::json!({ "status": "approved" });
    let response = put_json_auth(
        app,
        &format!("/api/v1/tasks/{task_id}"),
        body,
        &token_for(&alice),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let task = TaskRepo::find_by_id(&pool, task_id)
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(task.status, "pending");
    assert!(task.approved_by.is_none());
}

/// The role gate fires before status validation: a non-admin sending a
/// status outside the vocabulary still gets 403, not 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_admin_unknown_status_is_forbidden_not_invalid(pool: PgPool) {
    let admin = create_admin(&pool, "boss").await;
    let alice = create_employee(&pool, "alice").await;
    let project_id = seed_project(&pool, &admin, &[alice.id]).await;
    let task_id = create_task_via_api(&pool, &token_for(&alice), project_id).await;

    let app = build_test_app(pool);
    let body = serde_json::json!({ "status": "bogus" });
    let response = put_json_auth(
        app,
        &format!("/api/v1/tasks/{task_id}"),
        body,
        &token_for(&alice),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Only admins can change task status");
}

/// The owning employee can edit fields while the task is pending.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_edits_pending_task(pool: PgPool) {
    let admin = create_admin(&pool, "boss").await;
    let alice = create_employee(&pool, "alice").await;
    let project_id = seed_project(&pool, &admin, &[alice.id]).await;
    let task_id = create_task_via_api(&pool, &token_for(&alice), project_id).await;

    let app = build_test_app(pool);
    let body = serde_json::json!({ "taskName": "Revised report", "actualHours": "5.25" });
    let response = put_json_auth(
        app,
        &format!("/api/v1/tasks/{task_id}"),
        body,
        &token_for(&alice),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["task"]["taskName"], "Revised report");
    assert_eq!(json["task"]["actualHours"], "5.25");
}

/// Once a task is approved the owner can no longer edit it.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_cannot_edit_reviewed_task(pool: PgPool) {
    let admin = create_admin(&pool, "boss").await;
    let alice = create_employee(&pool, "alice").await;
    let project_id = seed_project(&pool, &admin, &[alice.id]).await;
    let task_id = create_task_via_api(&pool, &token_for(&alice), project_id).await;

    let app = build_test_app(pool.clone());
    let body = serde_json::json!({ "status": "approved" });
    let response = put_json_auth(
        app,
        &format!("/api/v1/tasks/{task_id}"),
        body,
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = build_test_app(pool);
    let body = serde_json::json!({ "taskName": "Too late" });
    let response = put_json_auth(
        app,
        &format!("/api/v1/tasks/{task_id}"),
        body,
        &token_for(&alice),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Users cannot edit each other's tasks.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cannot_edit_someone_elses_task(pool: PgPool) {
    let admin = create_admin(&pool, "boss").await;
    let alice = create_employee(&pool, "alice").await;
    let bob = create_employee(&pool, "bob").await;
    let project_id = seed_project(&pool, &admin, &[alice.id, bob.id]).await;
    let task_id = create_task_via_api(&pool, &token_for(&alice), project_id).await;

    let app = build_test_app(pool);
    let body = serde_json::json!({ "taskName": "Hijacked" });
    let response = put_json_auth(
        app,
        &format!("/api/v1/tasks/{task_id}"),
        body,
        &token_for(&bob),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// A status outside the known vocabulary is rejected.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_status_rejected(pool: PgPool) {
    let admin = create_admin(&pool, "boss").await;
    let alice = create_employee(&pool, "alice").await;
    let project_id = seed_project(&pool, &admin, &[alice.id]).await;
    let task_id = create_task_via_api(&pool, &token_for(&alice), project_id).await;

    let app = build_test_app(pool);
    let body = serde_json::json!({ "status": "done" });
    let response = put_json_auth(
        app,
        &format!("/api/v1/tasks/{task_id}"),
        body,
        &token_for(&admin),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Approval stamps the approval metadata; moving back to pending clears it.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_then_reopen_clears_metadata(pool: PgPool) {
    let admin = create_admin(&pool, "boss").await;
    let alice = create_employee(&pool, "alice").await;
    let project_id = seed_project(&pool, &admin, &[alice.id]).await;
    let task_id = create_task_via_api(&pool, &token_for(&alice), project_id).await;
    let admin_token = token_for(&admin);

    let app = build_test_app(pool.clone());
    let body = serde_json::json!({ "status": "approved" });
    let response =
        put_json_auth(app, &format!("/api/v1/tasks/{task_id}"), body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["task"]["status"], "approved");
    assert_eq!(json["task"]["approvedBy"], admin.id);
    assert!(json["task"]["approvedAt"].is_string());

    let app = build_test_app(pool);
    let body = serde_json::json!({ "status": "pending" });
    let response =
        put_json_auth(app, &format!("/api/v1/tasks/{task_id}"), body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["task"]["status"], "pending");
    assert!(json["task"]["approvedBy"].is_null());
    assert!(json["task"]["approvedAt"].is_null());
    assert!(json["task"]["rejectionReason"].is_null());
}

/// Rejection records the reason alongside the reviewer stamp.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_records_reason(pool: PgPool) {
    let admin = create_admin(&pool, "boss").await;
    let alice = create_employee(&pool, "alice").await;
    let project_id = seed_project(&pool, &admin, &[alice.id]).await;
    let task_id = create_task_via_api(&pool, &token_for(&alice), project_id).await;

    let app = build_test_app(pool);
    let body = serde_json::json!({ "status": "rejected", "rejectionReason": "Hours look off" });
    let response = put_json_auth(
        app,
        &format!("/api/v1/tasks/{task_id}"),
        body,
        &token_for(&admin),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["task"]["status"], "rejected");
    assert_eq!(json["task"]["rejectionReason"], "Hours look off");
    assert_eq!(json["task"]["approvedBy"], admin.id);
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

/// Owners and admins can delete a task; other users cannot.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_permission_matrix(pool: PgPool) {
    let admin = create_admin(&pool, "boss").await;
    let alice = create_employee(&pool, "alice").await;
    let bob = create_employee(&pool, "bob").await;
    let project_id = seed_project(&pool, &admin, &[alice.id, bob.id]).await;
    let alice_token = token_for(&alice);

    let task_id = create_task_via_api(&pool, &alice_token, project_id).await;

    // A stranger to the task cannot delete it.
    let app = build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/tasks/{task_id}"), &token_for(&bob)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner can.
    let app = build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/tasks/{task_id}"), &alice_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The row is gone.
    let task = TaskRepo::find_by_id(&pool, task_id)
        .await
        .expect("lookup should succeed");
    assert!(task.is_none());

    // Admins can delete another user's task.
    let task_id = create_task_via_api(&pool, &alice_token, project_id).await;
    let app = build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/tasks/{task_id}"), &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
}
