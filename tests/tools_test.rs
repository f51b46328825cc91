// ABOUTME: Integration tests for the tool registry and book tool bindings
// ABOUTME: Covers dispatch, tenant defense-in-depth, strict argument parsing, and payload kinds

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::test_database;
use dewey::database::{BookManager, Database, NewBook, Priority};
use dewey::tools::{ToolContext, ToolPayload, ToolRegistry};
use serde_json::json;

fn context(database: &Database, tenant: &str) -> ToolContext {
    ToolContext::new(tenant.to_owned(), database.clone())
}

// ============================================================================
// Dispatch and Defense in Depth
// ============================================================================

#[tokio::test]
async fn test_add_book_dispatch_creates_row_for_tenant() {
    let db = test_database().await;
    let registry = ToolRegistry::new();
    let ctx = context(&db, "u1");

    let result = registry
        .dispatch(
            "add_book",
            "u1",
            &ctx,
            &json!({"title": "Dune", "priority": "high"}).to_string(),
        )
        .await;

    assert!(result.success, "dispatch failed: {:?}", result.error);
    let Some(ToolPayload::Book { book }) = result.payload else {
        panic!("expected book payload");
    };
    assert_eq!(book.title, "Dune");
    assert_eq!(book.priority, Some(Priority::High));
    assert_eq!(book.tenant_id, "u1");

    let books = BookManager::new(db.pool().clone());
    assert_eq!(books.list("u1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_dispatch_rejects_tenant_mismatch() {
    let db = test_database().await;
    let registry = ToolRegistry::new();
    let ctx = context(&db, "u1");

    // The binding re-validates that the tenant it executes under equals the
    // request context's tenant, even though the orchestrator is the only
    // caller.
    let result = registry
        .dispatch("add_book", "u2", &ctx, &json!({"title": "Dune"}).to_string())
        .await;

    assert!(result.is_error());
    assert!(result.error.unwrap().contains("tenant mismatch"));

    let books = BookManager::new(db.pool().clone());
    assert!(books.list("u1").await.unwrap().is_empty());
    assert!(books.list("u2").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_dispatch_unknown_tool_is_an_error_result() {
    let db = test_database().await;
    let registry = ToolRegistry::new();
    let ctx = context(&db, "u1");

    let result = registry.dispatch("drop_tables", "u1", &ctx, "{}").await;

    assert!(result.is_error());
    assert!(result.error.unwrap().contains("unknown tool"));
}

#[tokio::test]
async fn test_dispatch_malformed_json_is_an_error_result() {
    let db = test_database().await;
    let registry = ToolRegistry::new();
    let ctx = context(&db, "u1");

    let result = registry
        .dispatch("add_book", "u1", &ctx, "{not json at all")
        .await;

    assert!(result.is_error());
    assert!(result.error.unwrap().contains("malformed arguments"));
}

#[tokio::test]
async fn test_dispatch_missing_required_argument_is_an_error_result() {
    let db = test_database().await;
    let registry = ToolRegistry::new();
    let ctx = context(&db, "u1");

    let result = registry
        .dispatch("add_book", "u1", &ctx, &json!({"priority": "low"}).to_string())
        .await;

    assert!(result.is_error());
    assert!(result.error.unwrap().contains("invalid arguments"));
}

#[tokio::test]
async fn test_dispatch_empty_arguments_default_to_no_filter() {
    let db = test_database().await;
    let registry = ToolRegistry::new();
    let ctx = context(&db, "u1");

    let result = registry.dispatch("list_books", "u1", &ctx, "").await;

    assert!(result.success);
    assert!(matches!(
        result.payload,
        Some(ToolPayload::List { count: 0, .. })
    ));
}

// ============================================================================
// Tool Semantics
// ============================================================================

async fn seed_books(db: &Database) -> (i64, i64) {
    let books = BookManager::new(db.pool().clone());
    let pending = books
        .create(
            "u1",
            NewBook {
                title: "Pending Book".to_owned(),
                description: Some("unread".to_owned()),
                ..NewBook::default()
            },
        )
        .await
        .unwrap();
    let completed = books
        .create(
            "u1",
            NewBook {
                title: "Completed Book".to_owned(),
                ..NewBook::default()
            },
        )
        .await
        .unwrap();
    books
        .set_completed(completed.id, "u1", true)
        .await
        .unwrap()
        .unwrap();
    (pending.id, completed.id)
}

#[tokio::test]
async fn test_list_books_status_filter() {
    let db = test_database().await;
    let (pending_id, completed_id) = seed_books(&db).await;
    let registry = ToolRegistry::new();
    let ctx = context(&db, "u1");

    let result = registry
        .dispatch("list_books", "u1", &ctx, &json!({"status": "completed"}).to_string())
        .await;
    let Some(ToolPayload::List { count, books }) = result.payload else {
        panic!("expected list payload");
    };
    assert_eq!(count, 1);
    assert_eq!(books[0].id, completed_id);

    let result = registry
        .dispatch("list_books", "u1", &ctx, &json!({"status": "pending"}).to_string())
        .await;
    let Some(ToolPayload::List { count, books }) = result.payload else {
        panic!("expected list payload");
    };
    assert_eq!(count, 1);
    assert_eq!(books[0].id, pending_id);
}

#[tokio::test]
async fn test_complete_book_missing_id_is_an_error_result() {
    let db = test_database().await;
    let registry = ToolRegistry::new();
    let ctx = context(&db, "u1");

    let result = registry
        .dispatch("complete_book", "u1", &ctx, &json!({"book_id": 4242}).to_string())
        .await;

    assert!(result.is_error());
    assert!(result.error.unwrap().contains("not found"));
}

#[tokio::test]
async fn test_update_book_keeps_unspecified_fields() {
    let db = test_database().await;
    let (pending_id, _) = seed_books(&db).await;
    let registry = ToolRegistry::new();
    let ctx = context(&db, "u1");

    let result = registry
        .dispatch(
            "update_book",
            "u1",
            &ctx,
            &json!({"book_id": pending_id, "title": "Renamed Book"}).to_string(),
        )
        .await;

    assert!(result.success);
    let Some(ToolPayload::Book { book }) = result.payload else {
        panic!("expected book payload");
    };
    assert_eq!(book.title, "Renamed Book");
    // Unspecified fields fall back to the stored values.
    assert_eq!(book.description.as_deref(), Some("unread"));
}

#[tokio::test]
async fn test_delete_book_reports_kind_deleted() {
    let db = test_database().await;
    let (pending_id, _) = seed_books(&db).await;
    let registry = ToolRegistry::new();
    let ctx = context(&db, "u1");

    let result = registry
        .dispatch("delete_book", "u1", &ctx, &json!({"book_id": pending_id}).to_string())
        .await;

    assert!(result.success);
    let value = result.to_value();
    assert_eq!(value["payload"]["kind"], "deleted");
    assert_eq!(value["payload"]["title"], "Pending Book");

    let books = BookManager::new(db.pool().clone());
    assert!(books.get(pending_id, "u1").await.unwrap().is_none());
}
