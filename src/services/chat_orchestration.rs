// ABOUTME: Stateless chat orchestration driving the model's tool-calling loop per request
// ABOUTME: Resolves the conversation, executes tool calls with the trusted tenant, persists the turn
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Chat Orchestration
//!
//! One call to [`process_message`] is one complete chat turn. The flow is
//! strictly sequential and reconstructs all working state from storage:
//!
//! 1. Resolve the conversation (create when no id was given; NotFound when
//!    the id is absent or owned by another tenant).
//! 2. Fetch history, deliberately before the new message is persisted, so
//!    the prompt never contains the in-flight message twice.
//! 3. Compose the prompt: system instruction, history, the new message, and
//!    the registry's tool declarations.
//! 4. First model call.
//! 5. Execute requested tool calls in the model's order. Arguments are
//!    parsed strictly; a malformed or unknown call becomes a failure result
//!    that is recorded and fed back to the model, and the remaining calls
//!    still run. The trusted tenant id is injected into every dispatch;
//!    a model-supplied tenant is never honored.
//! 6. Second model call (without tool declarations) for the final reply;
//!    when it fails, the turn falls back to the partial text from step 4.
//! 7. Persist the user message, then the assistant reply.
//! 8. Return the turn.
//!
//! Persistence happens only after the model interaction completes, so a
//! failed turn leaves no partial messages. Tool side effects are separate
//! short transactions: a crash between step 5 and step 7 can leave a tool's
//! effect (e.g. a created book) without a chat record of it. That gap is a
//! known property of this design, not hidden behind a compensating log.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::database::{ChatManager, Database};
use crate::errors::{AppError, AppResult};
use crate::llm::{get_assistant_system_prompt, ChatMessage, ChatRequest, LlmProvider, MessageRole};
use crate::tools::{ToolContext, ToolRegistry, ToolResult};

/// Reply used when the model produced neither text nor tool calls
const FALLBACK_REPLY: &str = "I'm here to help you manage your reading list.";

/// A tool call executed (or rejected) during a turn
#[derive(Debug, Clone, Serialize)]
pub struct ExecutedToolCall {
    /// Tool name as requested by the model
    pub name: String,
    /// Parsed arguments, or `null` when they failed to parse
    pub arguments: Value,
    /// Tagged outcome of the invocation
    pub result: ToolResult,
}

/// Result of one complete chat turn
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    /// The conversation this turn belongs to (fresh when none was supplied)
    pub conversation_id: i64,
    /// Final assistant reply
    pub response: String,
    /// Tool calls executed during the turn, in model order
    pub tool_calls: Vec<ExecutedToolCall>,
}

/// Process one chat message through the full turn state machine
///
/// # Errors
///
/// Returns `NotFound` when a supplied conversation id is absent or owned by
/// another tenant, an upstream error when the first model call fails, or a
/// database error when persistence fails. No messages are persisted on any
/// failure before step 7.
pub async fn process_message(
    database: &Database,
    provider: &dyn LlmProvider,
    registry: &ToolRegistry,
    tenant_id: &str,
    conversation_id: Option<i64>,
    message: &str,
) -> AppResult<ChatTurn> {
    let chat = ChatManager::new(database.pool().clone());

    // 1. Resolve
    let conversation = match conversation_id {
        Some(id) => chat
            .get_conversation(id, tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found("Conversation"))?,
        None => chat.create_conversation(tenant_id).await?,
    };

    // 2. History, before the new message exists in storage
    let history = chat.get_messages(conversation.id, tenant_id).await?;

    // 3. Compose
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(get_assistant_system_prompt()));
    for record in &history {
        match record.role.as_str() {
            "user" => messages.push(ChatMessage::user(&record.content)),
            "assistant" => messages.push(ChatMessage::assistant(&record.content)),
            _ => continue,
        }
    }
    messages.push(ChatMessage::user(message));

    let toolset = [registry.tool_schema()];

    // 4. First model call
    let request = ChatRequest::new(messages.clone());
    let response = provider
        .complete_with_tools(&request, Some(toolset.as_slice()))
        .await?;

    let partial = response.content.unwrap_or_default();
    let mut reply = partial.clone();
    let mut executed = Vec::new();

    let tool_calls = response.tool_calls.unwrap_or_default();
    if !tool_calls.is_empty() {
        info!(
            "Executing {} tool calls for conversation {}",
            tool_calls.len(),
            conversation.id
        );

        if !partial.is_empty() {
            messages.push(ChatMessage::assistant(&partial));
        }

        // 5. Tool execution, strictly in the order the model emitted
        let ctx = ToolContext::new(tenant_id.to_owned(), database.clone());
        for call in &tool_calls {
            let result = registry
                .dispatch(&call.name, tenant_id, &ctx, &call.arguments)
                .await;

            let arguments: Value =
                serde_json::from_str(&call.arguments).unwrap_or(Value::Null);

            messages.push(ChatMessage::user(format!(
                "[Tool result for {}]: {}",
                call.name,
                result.to_value()
            )));

            executed.push(ExecutedToolCall {
                name: call.name.clone(),
                arguments,
                result,
            });
        }

        // 6. Second model call for the natural-language reply
        let final_request = ChatRequest::new(messages);
        match provider.complete(&final_request).await {
            Ok(final_response) if !final_response.content.is_empty() => {
                reply = final_response.content;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Finalization call failed, falling back to partial reply: {e}");
            }
        }
    }

    if reply.trim().is_empty() {
        reply = FALLBACK_REPLY.to_owned();
    }

    // 7. Persist user then assistant, in that order
    chat.add_message(conversation.id, tenant_id, MessageRole::User, message)
        .await?;
    chat.add_message(conversation.id, tenant_id, MessageRole::Assistant, &reply)
        .await?;

    // 8. Return
    Ok(ChatTurn {
        conversation_id: conversation.id,
        response: reply,
        tool_calls: executed,
    })
}
