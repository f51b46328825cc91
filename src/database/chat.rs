// ABOUTME: Database operations for chat conversations and messages
// ABOUTME: Handles conversation lifecycle and ordered message history with tenant isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::{AppError, AppResult};
use crate::llm::MessageRole;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

// ============================================================================
// Record Types
// ============================================================================

/// Database representation of a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Unique conversation ID
    pub id: i64,
    /// Tenant that owns the conversation
    pub tenant_id: String,
    /// When the conversation was created (RFC 3339)
    pub created_at: String,
    /// When the conversation was last updated (RFC 3339)
    pub updated_at: String,
}

/// Database representation of a chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Unique message ID
    pub id: i64,
    /// Conversation this message belongs to
    pub conversation_id: i64,
    /// Tenant copy, must match the owning conversation's tenant
    pub tenant_id: String,
    /// Role of the message sender (user or assistant)
    pub role: String,
    /// Message content
    pub content: String,
    /// When the message was created (RFC 3339)
    pub created_at: String,
}

/// Summary of a conversation for listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Conversation ID
    pub id: i64,
    /// Number of messages in the conversation
    pub message_count: i64,
    /// When the conversation was created
    pub created_at: String,
    /// When the conversation was last updated
    pub updated_at: String,
}

// ============================================================================
// Chat Manager
// ============================================================================

/// Chat database operations manager
pub struct ChatManager {
    pool: SqlitePool,
}

impl ChatManager {
    /// Create a new chat manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new conversation for a tenant
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_conversation(&self, tenant_id: &str) -> AppResult<ConversationRecord> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            r"
            INSERT INTO conversations (tenant_id, created_at, updated_at)
            VALUES ($1, $2, $2)
            ",
        )
        .bind(tenant_id)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create conversation: {e}")))?;

        Ok(ConversationRecord {
            id: result.last_insert_rowid(),
            tenant_id: tenant_id.to_owned(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get a conversation by ID with tenant isolation
    ///
    /// Returns `None` when the conversation is absent or owned by another
    /// tenant; the two cases are indistinguishable to callers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_conversation(
        &self,
        conversation_id: i64,
        tenant_id: &str,
    ) -> AppResult<Option<ConversationRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, tenant_id, created_at, updated_at
            FROM conversations
            WHERE id = $1 AND tenant_id = $2
            ",
        )
        .bind(conversation_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get conversation: {e}")))?;

        Ok(row.map(|r| ConversationRecord {
            id: r.get("id"),
            tenant_id: r.get("tenant_id"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        }))
    }

    /// List a tenant's conversations with message counts, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_conversations(&self, tenant_id: &str) -> AppResult<Vec<ConversationSummary>> {
        let rows = sqlx::query(
            r"
            SELECT c.id, c.created_at, c.updated_at,
                   COUNT(m.id) AS message_count
            FROM conversations c
            LEFT JOIN messages m ON m.conversation_id = c.id
            WHERE c.tenant_id = $1
            GROUP BY c.id
            ORDER BY c.updated_at DESC
            ",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list conversations: {e}")))?;

        let summaries = rows
            .into_iter()
            .map(|r| ConversationSummary {
                id: r.get("id"),
                message_count: r.get("message_count"),
                created_at: r.get("created_at"),
                updated_at: r.get("updated_at"),
            })
            .collect();

        Ok(summaries)
    }

    /// Get all messages for a conversation in chronological order
    ///
    /// Ordered by `created_at` ascending with ties broken by insertion
    /// order. Returns an empty list when the conversation is missing or not
    /// owned by the tenant; the orchestrator validates ownership before it
    /// fetches history, so this read fails soft instead of erroring.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_messages(
        &self,
        conversation_id: i64,
        tenant_id: &str,
    ) -> AppResult<Vec<MessageRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, conversation_id, tenant_id, role, content, created_at
            FROM messages
            WHERE conversation_id = $1 AND tenant_id = $2
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(conversation_id)
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get messages: {e}")))?;

        let messages = rows
            .into_iter()
            .map(|r| MessageRecord {
                id: r.get("id"),
                conversation_id: r.get("conversation_id"),
                tenant_id: r.get("tenant_id"),
                role: r.get("role"),
                content: r.get("content"),
                created_at: r.get("created_at"),
            })
            .collect();

        Ok(messages)
    }

    /// Append a message to a conversation
    ///
    /// Verifies conversation ownership and bumps the parent's `updated_at`
    /// in the same transaction as the insert.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the conversation is absent or owned by
    /// another tenant, or a database error if the write fails.
    pub async fn add_message(
        &self,
        conversation_id: i64,
        tenant_id: &str,
        role: MessageRole,
        content: &str,
    ) -> AppResult<MessageRecord> {
        let now = chrono::Utc::now().to_rfc3339();
        let role_str = role.as_str();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        // The ownership check doubles as the parent timestamp bump.
        let bumped = sqlx::query(
            r"
            UPDATE conversations
            SET updated_at = $1
            WHERE id = $2 AND tenant_id = $3
            ",
        )
        .bind(&now)
        .bind(conversation_id)
        .bind(tenant_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update conversation: {e}")))?;

        if bumped.rows_affected() == 0 {
            return Err(AppError::not_found("Conversation"));
        }

        let result = sqlx::query(
            r"
            INSERT INTO messages (conversation_id, tenant_id, role, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(conversation_id)
        .bind(tenant_id)
        .bind(role_str)
        .bind(content)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to add message: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit message: {e}")))?;

        Ok(MessageRecord {
            id: result.last_insert_rowid(),
            conversation_id,
            tenant_id: tenant_id.to_owned(),
            role: role_str.to_owned(),
            content: content.to_owned(),
            created_at: now,
        })
    }
}
