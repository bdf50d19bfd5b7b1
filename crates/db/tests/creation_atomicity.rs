//! Verifies that project creation and its initial assignments are atomic:
//! a failure on any assignment insert must roll the project row back too.

use worklog_db::models::project::CreateProject;
use worklog_db::models::user::CreateUser;
use worklog_db::repositories::{ProjectRepo, UserRepo};

#[sqlx::test(migrations = "../../db/migrations")]
async fn dangling_assignee_rolls_back_project(pool: sqlx::PgPool) {
    let admin = UserRepo::create(
        &pool,
        &CreateUser {
            name: "boss".to_string(),
            email: "boss@test.com".to_string(),
            password_hash: "x".to_string(),
            role: Some("platform_admin".to_string()),
        },
    )
    .await
    .expect("user creation should succeed");

    let input = CreateProject {
        project_name: "Doomed".to_string(),
        description: None,
        created_by: admin.id,
    };

    // 999_999 violates the user FK inside the transaction.
    let result = ProjectRepo::create_with_assignments(&pool, &input, &[999_999]).await;
    assert!(result.is_err(), "dangling assignee must fail the insert");

    let projects = ProjectRepo::list_active(&pool)
        .await
        .expect("listing should succeed");
    assert!(
        projects.is_empty(),
        "the project row must not survive the rollback"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn valid_assignees_commit_together(pool: sqlx::PgPool) {
    let admin = UserRepo::create(
        &pool,
        &CreateUser {
            name: "boss".to_string(),
            email: "boss@test.com".to_string(),
            password_hash: "x".to_string(),
            role: Some("platform_admin".to_string()),
        },
    )
    .await
    .expect("user creation should succeed");

    let alice = UserRepo::create(
        &pool,
        &CreateUser {
            name: "alice".to_string(),
            email: "alice@test.com".to_string(),
            password_hash: "x".to_string(),
            role: None,
        },
    )
    .await
    .expect("user creation should succeed");

    let input = CreateProject {
        project_name: "Apollo".to_string(),
        description: Some("moonshot".to_string()),
        created_by: admin.id,
    };

    let project = ProjectRepo::create_with_assignments(&pool, &input, &[alice.id])
        .await
        .expect("creation should succeed");

    let assigned = ProjectRepo::list_active_assigned(&pool, alice.id)
        .await
        .expect("listing should succeed");
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].id, project.id);
    assert_eq!(assigned[0].creator_name, "boss");
}
