// ABOUTME: Integration tests for the book manager's tenant-scoped CRUD operations
// ABOUTME: Covers isolation, field separation between update and patch, and hard deletes

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::test_database;
use dewey::database::{BookManager, BookUpdate, NewBook, Priority};

fn full_book() -> NewBook {
    NewBook {
        title: "The Dispossessed".to_owned(),
        description: Some("An ambiguous utopia".to_owned()),
        priority: Some(Priority::High),
        category: Some("Science Fiction".to_owned()),
        due_date: Some("2026-09-01T00:00:00+00:00".to_owned()),
        due_date_end: Some("2026-09-30T00:00:00+00:00".to_owned()),
    }
}

// ============================================================================
// Round-trip and Creation
// ============================================================================

#[tokio::test]
async fn test_create_and_get_roundtrip() {
    let db = test_database().await;
    let books = BookManager::new(db.pool().clone());

    let created = books.create("u1", full_book()).await.unwrap();
    assert!(created.id > 0);
    assert!(!created.completed);
    assert_eq!(created.created_at, created.updated_at);

    let fetched = books.get(created.id, "u1").await.unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_always_starts_pending() {
    let db = test_database().await;
    let books = BookManager::new(db.pool().clone());

    let created = books.create("u1", full_book()).await.unwrap();
    assert!(!created.completed);
}

#[tokio::test]
async fn test_list_empty_is_not_an_error() {
    let db = test_database().await;
    let books = BookManager::new(db.pool().clone());

    let list = books.list("u1").await.unwrap();
    assert!(list.is_empty());
}

// ============================================================================
// Tenant Isolation
// ============================================================================

#[tokio::test]
async fn test_foreign_tenant_cannot_read_update_or_delete() {
    let db = test_database().await;
    let books = BookManager::new(db.pool().clone());

    let created = books.create("u1", full_book()).await.unwrap();

    // Correct numeric id, wrong tenant: indistinguishable from absent.
    assert!(books.get(created.id, "u2").await.unwrap().is_none());
    assert!(books
        .set_completed(created.id, "u2", true)
        .await
        .unwrap()
        .is_none());
    let update = BookUpdate {
        title: "Hijacked".to_owned(),
        ..BookUpdate::default()
    };
    assert!(books
        .update(created.id, "u2", update)
        .await
        .unwrap()
        .is_none());
    assert!(!books.delete(created.id, "u2").await.unwrap());

    assert!(books.list("u2").await.unwrap().is_empty());

    // The owner's book is untouched by all of the above.
    let fetched = books.get(created.id, "u1").await.unwrap().unwrap();
    assert_eq!(fetched.title, "The Dispossessed");
    assert!(!fetched.completed);
}

// ============================================================================
// Update vs Patch Field Separation
// ============================================================================

#[tokio::test]
async fn test_full_update_never_touches_completed() {
    let db = test_database().await;
    let books = BookManager::new(db.pool().clone());

    let created = books.create("u1", full_book()).await.unwrap();
    books
        .set_completed(created.id, "u1", true)
        .await
        .unwrap()
        .unwrap();

    let update = BookUpdate {
        title: "The Dispossessed (annotated)".to_owned(),
        description: None,
        priority: Some(Priority::Low),
        category: None,
        due_date: None,
        due_date_end: None,
    };
    let updated = books
        .update(created.id, "u1", update)
        .await
        .unwrap()
        .unwrap();

    assert!(updated.completed, "update must not reset completion");
    assert_eq!(updated.title, "The Dispossessed (annotated)");
    assert_eq!(updated.priority, Some(Priority::Low));
    // Full replacement clears fields that were not supplied.
    assert!(updated.description.is_none());
    assert!(updated.category.is_none());
}

#[tokio::test]
async fn test_patch_only_touches_completed_and_updated_at() {
    let db = test_database().await;
    let books = BookManager::new(db.pool().clone());

    let created = books.create("u1", full_book()).await.unwrap();
    let patched = books
        .set_completed(created.id, "u1", true)
        .await
        .unwrap()
        .unwrap();

    assert!(patched.completed);
    assert_eq!(patched.title, created.title);
    assert_eq!(patched.description, created.description);
    assert_eq!(patched.priority, created.priority);
    assert_eq!(patched.category, created.category);
    assert_eq!(patched.due_date, created.due_date);
    assert_eq!(patched.due_date_end, created.due_date_end);
    assert_eq!(patched.created_at, created.created_at);
    assert!(patched.updated_at >= created.updated_at);
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let db = test_database().await;
    let books = BookManager::new(db.pool().clone());

    let created = books.create("u1", full_book()).await.unwrap();

    assert!(books.delete(created.id, "u1").await.unwrap());
    assert!(books.get(created.id, "u1").await.unwrap().is_none());
    assert!(!books.delete(created.id, "u1").await.unwrap());
}

#[tokio::test]
async fn test_patch_nonexistent_book_creates_nothing() {
    let db = test_database().await;
    let books = BookManager::new(db.pool().clone());

    assert!(books.set_completed(4242, "u1", true).await.unwrap().is_none());
    assert!(books.list("u1").await.unwrap().is_empty());
}
