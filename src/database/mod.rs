// ABOUTME: Database connection management and schema migrations for SQLite storage
// ABOUTME: Provides the Database wrapper that owns the pool and creates tables at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Database Management
//!
//! Owns the SQLite connection pool and the startup migrations for the three
//! persisted entities: books, conversations, and messages. Tenant isolation
//! is enforced at the query level by the managers in the submodules; this
//! module only guarantees the schema and its indexes exist.

mod books;
mod chat;

pub use books::{
    validate_category, validate_description, validate_timestamp, validate_title, BookManager,
    BookRecord, BookUpdate, NewBook, Priority, CATEGORY_MAX_CHARS, DESCRIPTION_MAX_CHARS,
    TITLE_MAX_CHARS,
};
pub use chat::{ChatManager, ConversationRecord, ConversationSummary, MessageRecord};

use crate::errors::{AppError, AppResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database wrapper that owns the SQLite pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// The database file is created if it does not exist. Foreign keys are
    /// enabled on every connection so that deleting a conversation cascades
    /// to its messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed, the connection fails, or a
    /// migration statement fails.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::database(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        // A pooled in-memory database would give every connection its own
        // empty schema, so :memory: URLs are pinned to a single connection.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a migration statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_books().await?;
        self.migrate_chat().await?;
        Ok(())
    }

    /// Create the books table
    async fn migrate_books(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tenant_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                completed BOOLEAN NOT NULL DEFAULT 0,
                priority TEXT,
                category TEXT,
                due_date TEXT,
                due_date_end TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create books table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_tenant_id ON books(tenant_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create books index: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_completed ON books(completed)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create books index: {e}")))?;

        Ok(())
    }

    /// Create the conversations and messages tables
    async fn migrate_chat(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS conversations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tenant_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create conversations table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_conversations_tenant_id ON conversations(tenant_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create conversations index: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                conversation_id INTEGER NOT NULL
                    REFERENCES conversations(id) ON DELETE CASCADE,
                tenant_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create messages table: {e}")))?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_messages_conversation_id ON messages(conversation_id)",
            "CREATE INDEX IF NOT EXISTS idx_messages_tenant_id ON messages(tenant_id)",
            "CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages(created_at)",
            "CREATE INDEX IF NOT EXISTS idx_messages_conversation_created
                ON messages(conversation_id, created_at DESC)",
        ] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to create messages index: {e}")))?;
        }

        Ok(())
    }
}
