// ABOUTME: Integration tests for the book REST route handlers
// ABOUTME: Covers status codes, tenant enforcement, validation rejection, and NotFound collapse

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{test_database, test_router, MockProvider};
use dewey::auth::IDENTITY_HEADER;
use dewey::database::BookRecord;
use dewey::routes::books::BookListResponse;
use serde_json::json;

use helpers::axum_test::AxumTestRequest;

async fn setup() -> axum::Router {
    let database = test_database().await;
    test_router(database, MockProvider::new())
}

// ============================================================================
// Create and List
// ============================================================================

#[tokio::test]
async fn test_create_book_returns_201() {
    let router = setup().await;

    let response = AxumTestRequest::post("/api/u1/books")
        .header(IDENTITY_HEADER, "u1")
        .json(&json!({
            "title": "The Great Gatsby",
            "description": "A classic American novel",
            "priority": "high",
            "category": "Fiction"
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);

    let book: BookRecord = response.json();
    assert!(book.id > 0);
    assert_eq!(book.tenant_id, "u1");
    assert_eq!(book.title, "The Great Gatsby");
    assert!(!book.completed);
}

#[tokio::test]
async fn test_list_books_empty_is_200() {
    let router = setup().await;

    let response = AxumTestRequest::get("/api/u1/books")
        .header(IDENTITY_HEADER, "u1")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let list: BookListResponse = response.json();
    assert!(list.data.is_empty());
}

// ============================================================================
// Authentication and Tenant Enforcement
// ============================================================================

#[tokio::test]
async fn test_missing_identity_header_is_401() {
    let router = setup().await;

    let response = AxumTestRequest::get("/api/u1/books").send(router).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_identity_path_mismatch_is_403() {
    let router = setup().await;

    let response = AxumTestRequest::post("/api/u2/books")
        .header(IDENTITY_HEADER, "u1")
        .json(&json!({"title": "Sneaky"}))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    // The mismatch is rejected before any storage access.
    let response = AxumTestRequest::get("/api/u2/books")
        .header(IDENTITY_HEADER, "u2")
        .send(router)
        .await;
    let list: BookListResponse = response.json();
    assert!(list.data.is_empty());
}

#[tokio::test]
async fn test_foreign_book_reads_as_404() {
    let router = setup().await;

    let created = AxumTestRequest::post("/api/u1/books")
        .header(IDENTITY_HEADER, "u1")
        .json(&json!({"title": "Private"}))
        .send(router.clone())
        .await;
    let book: BookRecord = created.json();

    let response = AxumTestRequest::get(&format!("/api/u2/books/{}", book.id))
        .header(IDENTITY_HEADER, "u2")
        .send(router)
        .await;

    // NotFound, not Forbidden: existence must not be disclosed.
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_blank_title_is_422() {
    let router = setup().await;

    let response = AxumTestRequest::post("/api/u1/books")
        .header(IDENTITY_HEADER, "u1")
        .json(&json!({"title": "   "}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().contains("INVALID_INPUT"));
}

#[tokio::test]
async fn test_overlong_title_is_422() {
    let router = setup().await;

    let response = AxumTestRequest::post("/api/u1/books")
        .header(IDENTITY_HEADER, "u1")
        .json(&json!({"title": "x".repeat(201)}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_bad_due_date_is_422() {
    let router = setup().await;

    let response = AxumTestRequest::post("/api/u1/books")
        .header(IDENTITY_HEADER, "u1")
        .json(&json!({"title": "Dated", "due_date": "next tuesday"}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Update, Patch, Delete
// ============================================================================

#[tokio::test]
async fn test_full_update_replaces_fields_but_not_completed() {
    let router = setup().await;

    let created: BookRecord = AxumTestRequest::post("/api/u1/books")
        .header(IDENTITY_HEADER, "u1")
        .json(&json!({"title": "Original", "description": "old", "priority": "low"}))
        .send(router.clone())
        .await
        .json();

    // Mark as read first.
    AxumTestRequest::patch(&format!("/api/u1/books/{}", created.id))
        .header(IDENTITY_HEADER, "u1")
        .json(&json!({"completed": true}))
        .send(router.clone())
        .await;

    let response = AxumTestRequest::put(&format!("/api/u1/books/{}", created.id))
        .header(IDENTITY_HEADER, "u1")
        .json(&json!({"title": "Replaced"}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let book: BookRecord = response.json();
    assert_eq!(book.title, "Replaced");
    assert!(book.description.is_none(), "full update replaces description");
    assert!(book.completed, "full update must not touch completed");
}

#[tokio::test]
async fn test_patch_completion_only() {
    let router = setup().await;

    let created: BookRecord = AxumTestRequest::post("/api/u1/books")
        .header(IDENTITY_HEADER, "u1")
        .json(&json!({"title": "To Read", "description": "keep me"}))
        .send(router.clone())
        .await
        .json();

    let response = AxumTestRequest::patch(&format!("/api/u1/books/{}", created.id))
        .header(IDENTITY_HEADER, "u1")
        .json(&json!({"completed": true}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let book: BookRecord = response.json();
    assert!(book.completed);
    assert_eq!(book.description.as_deref(), Some("keep me"));
}

#[tokio::test]
async fn test_patch_nonexistent_book_is_404() {
    let router = setup().await;

    let response = AxumTestRequest::patch("/api/u1/books/4242")
        .header(IDENTITY_HEADER, "u1")
        .json(&json!({"completed": true}))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // And no row came into existence.
    let list: BookListResponse = AxumTestRequest::get("/api/u1/books")
        .header(IDENTITY_HEADER, "u1")
        .send(router)
        .await
        .json();
    assert!(list.data.is_empty());
}

#[tokio::test]
async fn test_delete_is_204_then_404() {
    let router = setup().await;

    let created: BookRecord = AxumTestRequest::post("/api/u1/books")
        .header(IDENTITY_HEADER, "u1")
        .json(&json!({"title": "Short-lived"}))
        .send(router.clone())
        .await
        .json();

    let response = AxumTestRequest::delete(&format!("/api/u1/books/{}", created.id))
        .header(IDENTITY_HEADER, "u1")
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = AxumTestRequest::get(&format!("/api/u1/books/{}", created.id))
        .header(IDENTITY_HEADER, "u1")
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = AxumTestRequest::delete(&format!("/api/u1/books/{}", created.id))
        .header(IDENTITY_HEADER, "u1")
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
