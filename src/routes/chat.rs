// ABOUTME: Chat route handlers for the conversational assistant
// ABOUTME: Validates the message, enforces tenant identity, and delegates to the orchestrator
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat routes.
//!
//! `POST /api/{tenant}/chat` runs one complete chat turn through the
//! orchestrator. The chat wire format is camelCase (`conversationId`,
//! `toolCalls`). Conversation listing and message history back the client's
//! chat view.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::auth::{ensure_tenant, AuthContext};
use crate::database::{ChatManager, ConversationSummary, MessageRecord};
use crate::errors::{AppError, AppResult};
use crate::services::{self, ExecutedToolCall};

/// Maximum chat message length in characters
const MESSAGE_MAX_CHARS: usize = 10_000;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to send a chat message
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    /// The user's message (1-10000 characters)
    pub message: String,
    /// Existing conversation to continue; a new one is created when absent
    #[serde(default)]
    pub conversation_id: Option<i64>,
}

impl ChatMessageRequest {
    fn validate(&self) -> AppResult<()> {
        if self.message.trim().is_empty() {
            return Err(AppError::invalid_input("message must not be empty"));
        }
        if self.message.chars().count() > MESSAGE_MAX_CHARS {
            return Err(AppError::invalid_input(format!(
                "message must be at most {MESSAGE_MAX_CHARS} characters"
            )));
        }
        Ok(())
    }
}

/// Response for a completed chat turn
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    /// Conversation the turn belongs to
    pub conversation_id: i64,
    /// Assistant's natural-language reply
    pub response: String,
    /// Tool calls executed during the turn
    pub tool_calls: Vec<ExecutedToolCall>,
}

/// Response for listing conversations
#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationListResponse {
    /// The tenant's conversations, most recently updated first
    pub conversations: Vec<ConversationSummary>,
    /// Total count
    pub total: usize,
}

/// Response for a conversation's message history
#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesListResponse {
    /// Messages in chronological order
    pub messages: Vec<MessageRecord>,
}

// ============================================================================
// Chat Routes
// ============================================================================

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create all chat routes
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/api/:tenant/chat", post(Self::send_message))
            .route("/api/:tenant/conversations", get(Self::list_conversations))
            .route(
                "/api/:tenant/conversations/:conversation_id/messages",
                get(Self::get_messages),
            )
            .with_state(state)
    }

    /// Run one chat turn
    async fn send_message(
        State(state): State<AppState>,
        auth: AuthContext,
        Path(tenant): Path<String>,
        Json(request): Json<ChatMessageRequest>,
    ) -> Result<Response, AppError> {
        ensure_tenant(&auth, &tenant)?;
        request.validate()?;

        let turn = services::process_message(
            &state.database,
            state.provider.as_ref(),
            &state.registry,
            &auth.tenant_id,
            request.conversation_id,
            &request.message,
        )
        .await?;

        let response = ChatMessageResponse {
            conversation_id: turn.conversation_id,
            response: turn.response,
            tool_calls: turn.tool_calls,
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// List the tenant's conversations
    async fn list_conversations(
        State(state): State<AppState>,
        auth: AuthContext,
        Path(tenant): Path<String>,
    ) -> Result<Response, AppError> {
        ensure_tenant(&auth, &tenant)?;

        let chat = ChatManager::new(state.database.pool().clone());
        let conversations = chat.list_conversations(&auth.tenant_id).await?;

        let total = conversations.len();
        let response = ConversationListResponse {
            conversations,
            total,
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Get a conversation's message history
    async fn get_messages(
        State(state): State<AppState>,
        auth: AuthContext,
        Path((tenant, conversation_id)): Path<(String, i64)>,
    ) -> Result<Response, AppError> {
        ensure_tenant(&auth, &tenant)?;

        let chat = ChatManager::new(state.database.pool().clone());

        // Verify ownership before reading history
        chat.get_conversation(conversation_id, &auth.tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found("Conversation"))?;

        let messages = chat.get_messages(conversation_id, &auth.tenant_id).await?;

        Ok((StatusCode::OK, Json(MessagesListResponse { messages })).into_response())
    }
}
