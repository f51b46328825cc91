// ABOUTME: Book tool bindings executed on behalf of the language model
// ABOUTME: Validated argument structs and handlers that call the domain service
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::Deserialize;

use super::context::ToolContext;
use super::result::{ToolPayload, ToolResult};
use crate::database::{
    validate_category, validate_description, validate_timestamp, validate_title, BookManager,
    BookUpdate, NewBook, Priority,
};
use crate::errors::AppResult;

/// Status filter accepted by `list_books`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Pending,
    Completed,
}

// ============================================================================
// Argument Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddBookArgs {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub due_date_end: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListBooksArgs {
    #[serde(default)]
    pub status: Option<StatusFilter>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteBookArgs {
    pub book_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct DeleteBookArgs {
    pub book_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookArgs {
    pub book_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub due_date_end: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new book for the tenant
pub(super) async fn add_book(ctx: &ToolContext, args: AddBookArgs) -> AppResult<ToolResult> {
    let title = validate_title(&args.title)?;
    validate_description(args.description.as_deref())?;
    validate_category(args.category.as_deref())?;
    validate_timestamp("due_date", args.due_date.as_deref())?;
    validate_timestamp("due_date_end", args.due_date_end.as_deref())?;

    let books = BookManager::new(ctx.database.pool().clone());
    let book = books
        .create(
            &ctx.tenant_id,
            NewBook {
                title,
                description: args.description,
                priority: args.priority,
                category: args.category,
                due_date: args.due_date,
                due_date_end: args.due_date_end,
            },
        )
        .await?;

    Ok(ToolResult::ok(ToolPayload::Book { book }))
}

/// List the tenant's books, optionally filtered by status
pub(super) async fn list_books(ctx: &ToolContext, args: ListBooksArgs) -> AppResult<ToolResult> {
    let books = BookManager::new(ctx.database.pool().clone());
    let mut all = books.list(&ctx.tenant_id).await?;

    if let Some(status) = args.status {
        let want_completed = status == StatusFilter::Completed;
        all.retain(|book| book.completed == want_completed);
    }

    Ok(ToolResult::ok(ToolPayload::List {
        count: all.len(),
        books: all,
    }))
}

/// Mark a book as completed (read)
pub(super) async fn complete_book(
    ctx: &ToolContext,
    args: CompleteBookArgs,
) -> AppResult<ToolResult> {
    let books = BookManager::new(ctx.database.pool().clone());

    match books.set_completed(args.book_id, &ctx.tenant_id, true).await? {
        Some(book) => Ok(ToolResult::ok(ToolPayload::Book { book })),
        None => Ok(ToolResult::error(format!(
            "Book {} not found",
            args.book_id
        ))),
    }
}

/// Delete a book
pub(super) async fn delete_book(ctx: &ToolContext, args: DeleteBookArgs) -> AppResult<ToolResult> {
    let books = BookManager::new(ctx.database.pool().clone());

    // Fetch first so the confirmation can name the removed book.
    let Some(book) = books.get(args.book_id, &ctx.tenant_id).await? else {
        return Ok(ToolResult::error(format!(
            "Book {} not found",
            args.book_id
        )));
    };

    if !books.delete(args.book_id, &ctx.tenant_id).await? {
        return Ok(ToolResult::error(format!(
            "Book {} not found",
            args.book_id
        )));
    }

    Ok(ToolResult::ok(ToolPayload::Deleted {
        id: book.id,
        title: book.title,
    }))
}

/// Partially update a book; unspecified fields keep their stored values
pub(super) async fn update_book(ctx: &ToolContext, args: UpdateBookArgs) -> AppResult<ToolResult> {
    if let Some(ref title) = args.title {
        validate_title(title)?;
    }
    validate_description(args.description.as_deref())?;
    validate_category(args.category.as_deref())?;
    validate_timestamp("due_date", args.due_date.as_deref())?;
    validate_timestamp("due_date_end", args.due_date_end.as_deref())?;

    let books = BookManager::new(ctx.database.pool().clone());

    let Some(current) = books.get(args.book_id, &ctx.tenant_id).await? else {
        return Ok(ToolResult::error(format!(
            "Book {} not found",
            args.book_id
        )));
    };

    let update = BookUpdate {
        title: args
            .title
            .map_or(current.title, |t| t.trim().to_owned()),
        description: args.description.or(current.description),
        priority: args.priority.or(current.priority),
        category: args.category.or(current.category),
        due_date: args.due_date.or(current.due_date),
        due_date_end: args.due_date_end.or(current.due_date_end),
    };

    match books.update(args.book_id, &ctx.tenant_id, update).await? {
        Some(book) => Ok(ToolResult::ok(ToolPayload::Book { book })),
        None => Ok(ToolResult::error(format!(
            "Book {} not found",
            args.book_id
        ))),
    }
}
