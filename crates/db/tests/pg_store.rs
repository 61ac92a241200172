//! PostgreSQL store tests.
//!
//! These need a running database (`DATABASE_URL`) and are ignored by default:
//! `cargo test -p draftboard-db -- --ignored`.

use assert_matches::assert_matches;
use draftboard_core::error::CoreError;
use draftboard_db::models::project::CreateProject;
use draftboard_db::store::{PgStore, ProjectStore};
use draftboard_db::DbError;
use sqlx::PgPool;

fn new_project(owner_id: &str) -> CreateProject {
    CreateProject {
        owner_id: owner_id.to_string(),
        name: None,
        sketch_data: serde_json::json!({"shapes": []}),
        thumbnail: None,
    }
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn numbers_are_sequential_per_owner(pool: PgPool) {
    let store = PgStore::new(pool);
    for expected in 1..=3 {
        let project = store.create_project(&new_project("u1")).await.unwrap();
        assert_eq!(project.project_number, expected);
        assert_eq!(project.name, format!("Project {expected}"));
    }
    let other = store.create_project(&new_project("u2")).await.unwrap();
    assert_eq!(other.project_number, 1);
    assert_eq!(store.counter_value("u1").await.unwrap(), Some(4));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_creation_never_duplicates(pool: PgPool) {
    let store = PgStore::new(pool);
    let mut handles = Vec::new();
    for _ in 0..20 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.create_project(&new_project("u1")).await.unwrap().project_number
        }));
    }
    let mut numbers = Vec::new();
    for handle in handles {
        numbers.push(handle.await.unwrap());
    }
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=20).collect::<Vec<i64>>());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn soft_delete_keeps_counter(pool: PgPool) {
    let store = PgStore::new(pool);
    let first = store.create_project(&new_project("u1")).await.unwrap();
    assert!(store.soft_delete_project(first.id).await.unwrap());
    assert!(store.find_project(first.id).await.unwrap().is_none());

    let second = store.create_project(&new_project("u1")).await.unwrap();
    assert_eq!(second.project_number, 2);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn corrupt_counter_is_reported(pool: PgPool) {
    sqlx::query("INSERT INTO project_counters (owner_id, next_project_number) VALUES ('u1', 0)")
        .execute(&pool)
        .await
        .unwrap();
    let store = PgStore::new(pool);
    assert_matches!(
        store.next_project_number("u1").await,
        Err(DbError::Core(CoreError::CorruptState(_)))
    );
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn moodboard_cap_is_enforced(pool: PgPool) {
    let store = PgStore::new(pool);
    let project = store.create_project(&new_project("u1")).await.unwrap();
    store.attach_moodboard_image(project.id, "a", 1).await.unwrap();
    assert_matches!(
        store.attach_moodboard_image(project.id, "b", 1).await,
        Err(DbError::Core(CoreError::LimitExceeded(_)))
    );
    let detached = store
        .detach_moodboard_image(project.id, "a")
        .await
        .unwrap()
        .unwrap();
    assert!(detached.moodboard_images.is_empty());
}
