// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, server ports, and LLM provider selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-based configuration, resolved once at startup.
//!
//! All configuration comes from environment variables so that deployment
//! targets (containers, CI, local development) configure the server the same
//! way. Credential rotation is a restart concern; nothing here is mutated
//! after startup.

use anyhow::{Context, Result};
use std::env;
use std::fmt;

/// Default HTTP port when `DEWEY_HTTP_PORT` is unset
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default SQLite database URL when `DEWEY_DATABASE_URL` is unset
pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/dewey.db";

/// Environment type for deployment-specific behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Which language-model provider backs the chat assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProviderType {
    /// `OpenAI` cloud API (requires `OPENAI_API_KEY`)
    #[default]
    OpenAi,
    /// Local `OpenAI`-compatible server (Ollama, vLLM)
    Local,
}

impl LlmProviderType {
    /// Environment variable that selects the provider
    pub const ENV_VAR: &'static str = "DEWEY_LLM_PROVIDER";

    /// Read the provider selection from the environment
    #[must_use]
    pub fn from_env() -> Self {
        match env::var(Self::ENV_VAR).as_deref() {
            Ok("local") | Ok("ollama") | Ok("vllm") => Self::Local,
            _ => Self::OpenAi,
        }
    }
}

impl fmt::Display for LlmProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Database connection URL (SQLite)
    pub database_url: String,
    /// Deployment environment
    pub environment: Environment,
    /// Selected LLM provider
    pub llm_provider: LlmProviderType,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DEWEY_HTTP_PORT` is set but not a valid port.
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var("DEWEY_HTTP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("DEWEY_HTTP_PORT is not a valid port: {value}"))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let database_url =
            env::var("DEWEY_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());

        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT").unwrap_or_default(),
        );

        Ok(Self {
            http_port,
            database_url,
            environment,
            llm_provider: LlmProviderType::from_env(),
        })
    }

    /// One-line configuration summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "environment={}, http_port={}, database_url={}, llm_provider={}",
            self.environment, self.http_port, self.database_url, self.llm_provider
        )
    }
}
