// ABOUTME: REST route handlers for book CRUD operations
// ABOUTME: Validates input, enforces tenant identity, and delegates to the book manager
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Book routes.
//!
//! Standard REST semantics under `/api/{tenant}/books`: create (201), list
//! (200, possibly empty), get by id (200/404), full update (200/404),
//! completion patch (200/404), delete (204/404). The identity/path check
//! runs before any storage access; an absent book and a foreign-tenant book
//! return the same 404.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::auth::{ensure_tenant, AuthContext};
use crate::database::{
    validate_category, validate_description, validate_timestamp, validate_title, BookManager,
    BookRecord, BookUpdate, NewBook, Priority,
};
use crate::errors::{AppError, AppResult};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a new book
#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    /// Book title (required, 1-200 characters)
    pub title: String,
    /// Optional description (max 1000 characters)
    #[serde(default)]
    pub description: Option<String>,
    /// Optional reading start date (RFC 3339)
    #[serde(default)]
    pub due_date: Option<String>,
    /// Optional reading end date (RFC 3339)
    #[serde(default)]
    pub due_date_end: Option<String>,
    /// Optional priority level
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Optional category/genre (max 100 characters)
    #[serde(default)]
    pub category: Option<String>,
}

impl CreateBookRequest {
    fn validate(self) -> AppResult<NewBook> {
        let title = validate_title(&self.title)?;
        validate_description(self.description.as_deref())?;
        validate_category(self.category.as_deref())?;
        validate_timestamp("due_date", self.due_date.as_deref())?;
        validate_timestamp("due_date_end", self.due_date_end.as_deref())?;

        Ok(NewBook {
            title,
            description: self.description,
            priority: self.priority,
            category: self.category,
            due_date: self.due_date,
            due_date_end: self.due_date_end,
        })
    }
}

/// Request for a full book update; absent optional fields clear stored values
#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub due_date_end: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<String>,
}

impl UpdateBookRequest {
    fn validate(self) -> AppResult<BookUpdate> {
        let title = validate_title(&self.title)?;
        validate_description(self.description.as_deref())?;
        validate_category(self.category.as_deref())?;
        validate_timestamp("due_date", self.due_date.as_deref())?;
        validate_timestamp("due_date_end", self.due_date_end.as_deref())?;

        Ok(BookUpdate {
            title,
            description: self.description,
            priority: self.priority,
            category: self.category,
            due_date: self.due_date,
            due_date_end: self.due_date_end,
        })
    }
}

/// Request to patch only the completion status
#[derive(Debug, Deserialize)]
pub struct PatchBookRequest {
    /// New completion status
    pub completed: bool,
}

/// Response for listing books
#[derive(Debug, Serialize, Deserialize)]
pub struct BookListResponse {
    /// The tenant's books
    pub data: Vec<BookRecord>,
}

// ============================================================================
// Book Routes
// ============================================================================

/// Book routes handler
pub struct BookRoutes;

impl BookRoutes {
    /// Create all book routes
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route(
                "/api/:tenant/books",
                get(Self::list_books).post(Self::create_book),
            )
            .route(
                "/api/:tenant/books/:book_id",
                get(Self::get_book)
                    .put(Self::update_book)
                    .patch(Self::patch_book)
                    .delete(Self::delete_book),
            )
            .with_state(state)
    }

    fn manager(state: &AppState) -> BookManager {
        BookManager::new(state.database.pool().clone())
    }

    /// Create a new book
    async fn create_book(
        State(state): State<AppState>,
        auth: AuthContext,
        Path(tenant): Path<String>,
        Json(request): Json<CreateBookRequest>,
    ) -> Result<Response, AppError> {
        ensure_tenant(&auth, &tenant)?;
        let new_book = request.validate()?;

        let book = Self::manager(&state).create(&auth.tenant_id, new_book).await?;

        Ok((StatusCode::CREATED, Json(book)).into_response())
    }

    /// List the tenant's books
    async fn list_books(
        State(state): State<AppState>,
        auth: AuthContext,
        Path(tenant): Path<String>,
    ) -> Result<Response, AppError> {
        ensure_tenant(&auth, &tenant)?;

        let books = Self::manager(&state).list(&auth.tenant_id).await?;

        Ok((StatusCode::OK, Json(BookListResponse { data: books })).into_response())
    }

    /// Get a specific book
    async fn get_book(
        State(state): State<AppState>,
        auth: AuthContext,
        Path((tenant, book_id)): Path<(String, i64)>,
    ) -> Result<Response, AppError> {
        ensure_tenant(&auth, &tenant)?;

        let book = Self::manager(&state)
            .get(book_id, &auth.tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;

        Ok((StatusCode::OK, Json(book)).into_response())
    }

    /// Full update of a book's content fields
    async fn update_book(
        State(state): State<AppState>,
        auth: AuthContext,
        Path((tenant, book_id)): Path<(String, i64)>,
        Json(request): Json<UpdateBookRequest>,
    ) -> Result<Response, AppError> {
        ensure_tenant(&auth, &tenant)?;
        let update = request.validate()?;

        let book = Self::manager(&state)
            .update(book_id, &auth.tenant_id, update)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;

        Ok((StatusCode::OK, Json(book)).into_response())
    }

    /// Patch only the completion status
    async fn patch_book(
        State(state): State<AppState>,
        auth: AuthContext,
        Path((tenant, book_id)): Path<(String, i64)>,
        Json(request): Json<PatchBookRequest>,
    ) -> Result<Response, AppError> {
        ensure_tenant(&auth, &tenant)?;

        let book = Self::manager(&state)
            .set_completed(book_id, &auth.tenant_id, request.completed)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;

        Ok((StatusCode::OK, Json(book)).into_response())
    }

    /// Delete a book
    async fn delete_book(
        State(state): State<AppState>,
        auth: AuthContext,
        Path((tenant, book_id)): Path<(String, i64)>,
    ) -> Result<Response, AppError> {
        ensure_tenant(&auth, &tenant)?;

        let deleted = Self::manager(&state).delete(book_id, &auth.tenant_id).await?;

        if !deleted {
            return Err(AppError::not_found("Book"));
        }

        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }
}
