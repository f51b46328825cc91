// ABOUTME: Generic OpenAI-compatible LLM provider for cloud and local endpoints
// ABOUTME: Supports the OpenAI API, Ollama, vLLM, and any compatible chat completions server
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # `OpenAI`-Compatible Provider
//!
//! Implementation of [`LlmProvider`] for any endpoint speaking the `OpenAI`
//! chat completions protocol. Both the hosted `OpenAI` API and local servers
//! (Ollama, vLLM) use this provider with different configurations.
//!
//! Every request is bounded by connect and request timeouts; provider
//! failures are translated into the application error taxonomy (auth,
//! rate-limit, and availability problems all surface as upstream errors).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

use super::{
    ChatMessage, ChatRequest, ChatResponse, ChatResponseWithTools, FunctionCall, LlmCapabilities,
    LlmProvider, TokenUsage, Tool,
};
use crate::errors::{AppError, ErrorCode};

/// Connection timeout for the provider endpoint
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Hard upper bound on a single model call
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default base URL for the hosted `OpenAI` API
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default base URL for a local Ollama server
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// Default model for the hosted `OpenAI` API
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default model for local inference
pub const LOCAL_DEFAULT_MODEL: &str = "qwen2.5:14b-instruct";

// ============================================================================
// API Request/Response Types (OpenAI wire format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct OpenAiTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAiFunction,
}

#[derive(Debug, Clone, Serialize)]
struct OpenAiFunction {
    name: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAiToolCall {
    function: OpenAiFunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider name for display/logging
    pub provider_name: String,
    /// Provider display name
    pub display_name: String,
    /// Capabilities of this provider
    pub capabilities: LlmCapabilities,
}

impl OpenAiCompatibleConfig {
    /// Configuration for the hosted `OpenAI` API
    #[must_use]
    pub fn openai(api_key: String, base_url: String, model: String) -> Self {
        Self {
            base_url,
            api_key: Some(api_key),
            default_model: model,
            provider_name: "openai".to_owned(),
            display_name: "OpenAI".to_owned(),
            capabilities: LlmCapabilities::FUNCTION_CALLING
                | LlmCapabilities::SYSTEM_MESSAGES
                | LlmCapabilities::JSON_MODE,
        }
    }

    /// Configuration for a local Ollama instance
    #[must_use]
    pub fn ollama(base_url: String, model: String) -> Self {
        Self {
            base_url,
            api_key: None,
            default_model: model,
            provider_name: "ollama".to_owned(),
            display_name: "Ollama (Local)".to_owned(),
            capabilities: LlmCapabilities::FUNCTION_CALLING | LlmCapabilities::SYSTEM_MESSAGES,
        }
    }
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self::ollama(OLLAMA_BASE_URL.to_owned(), LOCAL_DEFAULT_MODEL.to_owned())
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initializing {} provider: base_url={}, model={}",
            config.display_name, config.base_url, config.default_model
        );

        Ok(Self { client, config })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    fn convert_messages(messages: &[ChatMessage]) -> Vec<OpenAiMessage> {
        messages.iter().map(OpenAiMessage::from).collect()
    }

    /// Convert internal tool format to the `OpenAI` wire format
    fn convert_tools(tools: &[Tool]) -> Vec<OpenAiTool> {
        tools
            .iter()
            .flat_map(|tool| {
                tool.function_declarations.iter().map(|func| OpenAiTool {
                    tool_type: "function".to_owned(),
                    function: OpenAiFunction {
                        name: func.name.clone(),
                        description: func.description.clone(),
                        parameters: func.parameters.clone(),
                    },
                })
            })
            .collect()
    }

    /// Convert provider tool calls to internal `FunctionCall` format
    ///
    /// The raw argument strings are carried through unparsed; the tool layer
    /// applies the single strict parse.
    fn convert_tool_calls(tool_calls: Vec<OpenAiToolCall>) -> Vec<FunctionCall> {
        tool_calls
            .into_iter()
            .map(|call| FunctionCall {
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect()
    }

    /// Map a failed provider response into the error taxonomy
    ///
    /// Every provider-side failure (auth, rate limit, missing model, outage)
    /// is an upstream condition from the caller's point of view.
    fn parse_error_response(&self, status: reqwest::StatusCode, body: &str) -> AppError {
        let service = self.config.display_name.as_str();

        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let detail = error_response.error.message;
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());

            match status.as_u16() {
                401 | 403 => AppError::external_service(
                    service,
                    format!("API authentication failed: {detail}"),
                ),
                429 => AppError::new(
                    ErrorCode::ExternalRateLimited,
                    format!("{service} rate limit reached: {detail}"),
                ),
                404 => AppError::external_service(
                    service,
                    format!("Model or endpoint not found: {detail}"),
                ),
                _ => AppError::external_service(service, format!("{error_type} - {detail}")),
            }
        } else {
            AppError::external_service(
                service,
                format!(
                    "API error ({}): {}",
                    status,
                    body.chars().take(200).collect::<String>()
                ),
            )
        }
    }

    /// Map a transport failure into the error taxonomy
    fn transport_error(&self, e: &reqwest::Error) -> AppError {
        error!("Request to {} failed: {}", self.config.provider_name, e);
        if e.is_connect() {
            AppError::external_service(
                self.config.display_name.clone(),
                format!(
                    "Cannot connect to {}. Is the server reachable at {}?",
                    self.config.display_name, self.config.base_url
                ),
            )
        } else if e.is_timeout() {
            AppError::external_service(
                self.config.display_name.clone(),
                "Model call exceeded its deadline",
            )
        } else {
            AppError::external_service(self.config.display_name.clone(), format!("Request failed: {e}"))
        }
    }

    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    /// Send a chat completions request and return the first choice
    async fn send_request(&self, openai_request: &OpenAiRequest) -> Result<OpenAiResponse, AppError> {
        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service(
                self.config.display_name.clone(),
                format!("Failed to read response: {e}"),
            )
        })?;

        if !status.is_success() {
            return Err(self.parse_error_response(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse API response: {} - body: {}",
                e,
                &body[..body.len().min(500)]
            );
            AppError::external_service(
                self.config.display_name.clone(),
                format!("Failed to parse response: {e}"),
            )
        })
    }

    fn first_choice(
        &self,
        response: OpenAiResponse,
    ) -> Result<(OpenAiChoice, String, Option<TokenUsage>), AppError> {
        let model = response.model;
        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            AppError::external_service(self.config.display_name.clone(), "API returned no choices")
        })?;
        Ok((choice, model, usage))
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        match self.config.provider_name.as_str() {
            "openai" => "openai",
            "ollama" => "ollama",
            "vllm" => "vllm",
            _ => "local",
        }
    }

    fn display_name(&self) -> &'static str {
        match self.config.provider_name.as_str() {
            "openai" => "OpenAI",
            "ollama" => "Ollama (Local)",
            "vllm" => "vLLM (Local)",
            _ => "Local LLM",
        }
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        debug!(
            "Sending chat completion to {} with {} messages",
            self.config.provider_name,
            request.messages.len()
        );

        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages: Self::convert_messages(&request.messages),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            tools: None,
            tool_choice: None,
        };

        let response = self.send_request(&openai_request).await?;
        let (choice, model, usage) = self.first_choice(response)?;
        let content = choice.message.content.unwrap_or_default();

        debug!(
            "Received response from {}: {} chars, finish_reason: {:?}",
            self.config.provider_name,
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model,
            usage,
            finish_reason: choice.finish_reason,
        })
    }

    async fn complete_with_tools(
        &self,
        request: &ChatRequest,
        tools: Option<&[Tool]>,
    ) -> Result<ChatResponseWithTools, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        debug!(
            "Sending chat completion to {} with {} messages, tools={}",
            self.config.provider_name,
            request.messages.len(),
            tools.is_some()
        );

        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages: Self::convert_messages(&request.messages),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            tools: tools.map(Self::convert_tools),
            tool_choice: tools.map(|_| "auto".to_owned()),
        };

        let response = self.send_request(&openai_request).await?;
        let (choice, model, usage) = self.first_choice(response)?;

        let content = choice.message.content;
        let tool_calls = choice.message.tool_calls.map(|calls| {
            info!(
                "{} returned {} tool calls",
                self.config.provider_name,
                calls.len()
            );
            Self::convert_tool_calls(calls)
        });

        Ok(ChatResponseWithTools {
            content,
            tool_calls,
            model,
            usage,
            finish_reason: choice.finish_reason,
        })
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        let request = self.client.get(self.api_url("models"));
        let response = self
            .add_auth_header(request)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        Ok(response.status().is_success())
    }
}
