// ABOUTME: Database operations for books with multi-tenant isolation
// ABOUTME: Every query is scoped to (id, tenant_id) so foreign rows are indistinguishable from absent ones
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Maximum title length in characters
pub const TITLE_MAX_CHARS: usize = 200;

/// Maximum description length in characters
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Maximum category length in characters
pub const CATEGORY_MAX_CHARS: usize = 100;

// ============================================================================
// Field Validation
// ============================================================================

/// Validate and normalize a book title (1-200 characters after trimming)
///
/// # Errors
///
/// Returns `InvalidInput` if the title is blank or too long.
pub fn validate_title(title: &str) -> AppResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("title must not be empty"));
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        return Err(AppError::invalid_input(format!(
            "title must be at most {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Validate an optional description (max 1000 characters)
///
/// # Errors
///
/// Returns `InvalidInput` if the description is too long.
pub fn validate_description(description: Option<&str>) -> AppResult<()> {
    if let Some(text) = description {
        if text.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(AppError::invalid_input(format!(
                "description must be at most {DESCRIPTION_MAX_CHARS} characters"
            )));
        }
    }
    Ok(())
}

/// Validate an optional category (max 100 characters)
///
/// # Errors
///
/// Returns `InvalidInput` if the category is too long.
pub fn validate_category(category: Option<&str>) -> AppResult<()> {
    if let Some(text) = category {
        if text.chars().count() > CATEGORY_MAX_CHARS {
            return Err(AppError::invalid_input(format!(
                "category must be at most {CATEGORY_MAX_CHARS} characters"
            )));
        }
    }
    Ok(())
}

/// Validate an optional RFC 3339 timestamp field
///
/// # Errors
///
/// Returns `InvalidInput` naming the field if the value does not parse.
pub fn validate_timestamp(field: &str, value: Option<&str>) -> AppResult<()> {
    if let Some(text) = value {
        chrono::DateTime::parse_from_rfc3339(text)
            .map_err(|_| AppError::invalid_input(format!("{field} must be an RFC 3339 timestamp")))?;
    }
    Ok(())
}

// ============================================================================
// Record Types
// ============================================================================

/// Priority level for a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// String representation stored in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a stored value back into a priority
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Database representation of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Unique book ID
    pub id: i64,
    /// Tenant that owns this book (immutable after creation)
    pub tenant_id: String,
    /// Book title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Reading completion status
    pub completed: bool,
    /// Optional priority level
    pub priority: Option<Priority>,
    /// Optional category/genre
    pub category: Option<String>,
    /// Optional reading start date (RFC 3339)
    pub due_date: Option<String>,
    /// Optional reading end date (RFC 3339)
    pub due_date_end: Option<String>,
    /// When the book was created (RFC 3339)
    pub created_at: String,
    /// When the book was last modified (RFC 3339)
    pub updated_at: String,
}

/// Fields for creating a book
#[derive(Debug, Clone, Default)]
pub struct NewBook {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub due_date: Option<String>,
    pub due_date_end: Option<String>,
}

/// Fields for a full update; every field replaces the stored value
#[derive(Debug, Clone, Default)]
pub struct BookUpdate {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub due_date: Option<String>,
    pub due_date_end: Option<String>,
}

// ============================================================================
// Book Manager
// ============================================================================

/// Book database operations manager
pub struct BookManager {
    pool: SqlitePool,
}

impl BookManager {
    /// Create a new book manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row(row: &SqliteRow) -> BookRecord {
        let priority: Option<String> = row.get("priority");
        BookRecord {
            id: row.get("id"),
            tenant_id: row.get("tenant_id"),
            title: row.get("title"),
            description: row.get("description"),
            completed: row.get("completed"),
            priority: priority.as_deref().and_then(Priority::parse),
            category: row.get("category"),
            due_date: row.get("due_date"),
            due_date_end: row.get("due_date_end"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    /// Create a new book for a tenant
    ///
    /// The book always starts with `completed = false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(&self, tenant_id: &str, book: NewBook) -> AppResult<BookRecord> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            r"
            INSERT INTO books (tenant_id, title, description, completed, priority, category,
                               due_date, due_date_end, created_at, updated_at)
            VALUES ($1, $2, $3, 0, $4, $5, $6, $7, $8, $8)
            ",
        )
        .bind(tenant_id)
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.priority.map(Priority::as_str))
        .bind(&book.category)
        .bind(&book.due_date)
        .bind(&book.due_date_end)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create book: {e}")))?;

        Ok(BookRecord {
            id: result.last_insert_rowid(),
            tenant_id: tenant_id.to_owned(),
            title: book.title,
            description: book.description,
            completed: false,
            priority: book.priority,
            category: book.category,
            due_date: book.due_date,
            due_date_end: book.due_date_end,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// List all books for a tenant; empty when none exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self, tenant_id: &str) -> AppResult<Vec<BookRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, tenant_id, title, description, completed, priority, category,
                   due_date, due_date_end, created_at, updated_at
            FROM books
            WHERE tenant_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list books: {e}")))?;

        Ok(rows.iter().map(Self::map_row).collect())
    }

    /// Get a book by ID with tenant isolation
    ///
    /// Returns `None` when the book is absent or owned by another tenant;
    /// the two cases are indistinguishable to callers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get(&self, book_id: i64, tenant_id: &str) -> AppResult<Option<BookRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, tenant_id, title, description, completed, priority, category,
                   due_date, due_date_end, created_at, updated_at
            FROM books
            WHERE id = $1 AND tenant_id = $2
            ",
        )
        .bind(book_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get book: {e}")))?;

        Ok(row.as_ref().map(Self::map_row))
    }

    /// Full update of a book's content fields
    ///
    /// Replaces title, description, priority, category, and due dates.
    /// Never touches `completed`. Bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn update(
        &self,
        book_id: i64,
        tenant_id: &str,
        update: BookUpdate,
    ) -> AppResult<Option<BookRecord>> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            r"
            UPDATE books
            SET title = $1, description = $2, priority = $3, category = $4,
                due_date = $5, due_date_end = $6, updated_at = $7
            WHERE id = $8 AND tenant_id = $9
            ",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.priority.map(Priority::as_str))
        .bind(&update.category)
        .bind(&update.due_date)
        .bind(&update.due_date_end)
        .bind(&now)
        .bind(book_id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update book: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(book_id, tenant_id).await
    }

    /// Patch only the completion status of a book
    ///
    /// Mutates `completed` and `updated_at`; every other field is untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn set_completed(
        &self,
        book_id: i64,
        tenant_id: &str,
        completed: bool,
    ) -> AppResult<Option<BookRecord>> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            r"
            UPDATE books
            SET completed = $1, updated_at = $2
            WHERE id = $3 AND tenant_id = $4
            ",
        )
        .bind(completed)
        .bind(&now)
        .bind(book_id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to patch book status: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(book_id, tenant_id).await
    }

    /// Delete a book (hard delete)
    ///
    /// Returns `true` iff a matching row existed and was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete(&self, book_id: i64, tenant_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1 AND tenant_id = $2")
            .bind(book_id)
            .bind(tenant_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete book: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
