// ABOUTME: Shared test fixtures: in-memory database, scripted mock LLM provider, router setup
// ABOUTME: Used by the integration tests via `mod common;`

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;

use dewey::database::Database;
use dewey::errors::AppError;
use dewey::llm::{
    ChatRequest, ChatResponse, ChatResponseWithTools, FunctionCall, LlmCapabilities, LlmProvider,
    Tool,
};
use dewey::routes::{router, AppState};

/// Create a fresh in-memory database with migrations applied
pub async fn test_database() -> Database {
    Database::new("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

/// Build the application router over a database and a mock provider
pub fn test_router(database: Database, provider: Arc<MockProvider>) -> Router {
    router(AppState::new(database, provider))
}

// ============================================================================
// Mock LLM Provider
// ============================================================================

/// Scripted LLM provider for orchestrator and route tests
///
/// Responses are queued per method; when a queue is empty a benign default
/// reply is returned. Every request is recorded so tests can assert on the
/// prompt composition.
pub struct MockProvider {
    tool_responses: Mutex<VecDeque<Result<ChatResponseWithTools, AppError>>>,
    plain_responses: Mutex<VecDeque<Result<ChatResponse, AppError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            tool_responses: Mutex::new(VecDeque::new()),
            plain_responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Queue a response for the next `complete_with_tools` call
    pub fn push_tool_response(&self, response: Result<ChatResponseWithTools, AppError>) {
        self.tool_responses.lock().unwrap().push_back(response);
    }

    /// Queue a response for the next `complete` call
    pub fn push_plain_response(&self, response: Result<ChatResponse, AppError>) {
        self.plain_responses.lock().unwrap().push_back(response);
    }

    /// All requests the provider has seen, in call order
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn display_name(&self) -> &'static str {
        "Mock Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::FUNCTION_CALLING | LlmCapabilities::SYSTEM_MESSAGES
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        self.plain_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(text_response("Done.")))
    }

    async fn complete_with_tools(
        &self,
        request: &ChatRequest,
        _tools: Option<&[Tool]>,
    ) -> Result<ChatResponseWithTools, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        self.tool_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(tools_response(Some("Hello! How can I help?"), Vec::new())))
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

// ============================================================================
// Response Builders
// ============================================================================

/// Build a tool call the way the provider wire would deliver it
pub fn tool_call(name: &str, args: Value) -> FunctionCall {
    FunctionCall {
        name: name.to_owned(),
        arguments: args.to_string(),
    }
}

/// Build a tool call whose argument payload is not valid JSON
pub fn malformed_tool_call(name: &str, raw: &str) -> FunctionCall {
    FunctionCall {
        name: name.to_owned(),
        arguments: raw.to_owned(),
    }
}

/// Build a first-call response with optional text and tool calls
pub fn tools_response(content: Option<&str>, calls: Vec<FunctionCall>) -> ChatResponseWithTools {
    ChatResponseWithTools {
        content: content.map(ToOwned::to_owned),
        tool_calls: if calls.is_empty() { None } else { Some(calls) },
        model: "mock-model".to_owned(),
        usage: None,
        finish_reason: Some("stop".to_owned()),
    }
}

/// Build a plain text completion response
pub fn text_response(content: &str) -> ChatResponse {
    ChatResponse {
        content: content.to_owned(),
        model: "mock-model".to_owned(),
        usage: None,
        finish_reason: Some("stop".to_owned()),
    }
}
