// ABOUTME: Provider selection resolved once at startup from environment configuration
// ABOUTME: Maps the configured provider type to a ready OpenAI-compatible client
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider factory.
//!
//! The provider is constructed exactly once at startup and shared behind an
//! `Arc<dyn LlmProvider>`; there is no runtime-mutable provider state.
//! A cloud provider with a missing or blank API key is a startup
//! configuration error, not a per-request condition. Credential rotation is
//! a restart concern.

use std::env;
use std::sync::Arc;

use super::openai_compatible::{
    OpenAiCompatibleConfig, OpenAiCompatibleProvider, LOCAL_DEFAULT_MODEL, OLLAMA_BASE_URL,
    OPENAI_BASE_URL, OPENAI_DEFAULT_MODEL,
};
use super::LlmProvider;
use crate::config::LlmProviderType;
use crate::errors::{AppError, AppResult};

/// Build the configured LLM provider from environment variables
///
/// For [`LlmProviderType::OpenAi`]:
/// - `OPENAI_API_KEY`: required
/// - `OPENAI_BASE_URL`: optional override
/// - `OPENAI_MODEL_NAME`: optional, defaults to `gpt-4o-mini`
///
/// For [`LlmProviderType::Local`]:
/// - `LOCAL_LLM_BASE_URL`: optional, defaults to Ollama at localhost:11434
/// - `LOCAL_LLM_MODEL`: optional
/// - `LOCAL_LLM_API_KEY`: optional
///
/// # Errors
///
/// Returns a configuration error if a required credential is missing or
/// blank, or if the HTTP client cannot be constructed.
pub fn provider_from_env(provider_type: LlmProviderType) -> AppResult<Arc<dyn LlmProvider>> {
    let config = match provider_type {
        LlmProviderType::OpenAi => {
            let api_key = env::var("OPENAI_API_KEY")
                .ok()
                .map(|k| k.trim().to_owned())
                .filter(|k| !k.is_empty())
                .ok_or_else(|| {
                    AppError::config(
                        "OPENAI_API_KEY must be set when the openai provider is selected",
                    )
                })?;
            let base_url =
                env::var("OPENAI_BASE_URL").unwrap_or_else(|_| OPENAI_BASE_URL.to_owned());
            let model =
                env::var("OPENAI_MODEL_NAME").unwrap_or_else(|_| OPENAI_DEFAULT_MODEL.to_owned());
            OpenAiCompatibleConfig::openai(api_key, base_url, model)
        }
        LlmProviderType::Local => {
            let base_url =
                env::var("LOCAL_LLM_BASE_URL").unwrap_or_else(|_| OLLAMA_BASE_URL.to_owned());
            let model =
                env::var("LOCAL_LLM_MODEL").unwrap_or_else(|_| LOCAL_DEFAULT_MODEL.to_owned());
            let mut config = OpenAiCompatibleConfig::ollama(base_url, model);
            config.api_key = env::var("LOCAL_LLM_API_KEY").ok().filter(|k| !k.is_empty());
            config
        }
    };

    Ok(Arc::new(OpenAiCompatibleProvider::new(config)?))
}
