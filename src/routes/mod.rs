// ABOUTME: Route module organization and shared application state
// ABOUTME: Assembles the HTTP router from the per-domain route groups
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route modules, organized by domain. Handlers stay thin and delegate to
//! the managers and services.

/// Book CRUD routes
pub mod books;
/// Chat and conversation routes
pub mod chat;
/// Health check routes
pub mod health;

pub use books::BookRoutes;
pub use chat::ChatRoutes;
pub use health::HealthRoutes;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::database::Database;
use crate::llm::LlmProvider;
use crate::tools::ToolRegistry;

/// Shared state available to every handler
#[derive(Clone)]
pub struct AppState {
    /// Database access
    pub database: Database,
    /// Language-model provider, resolved once at startup
    pub provider: Arc<dyn LlmProvider>,
    /// Tool registry exposed to the model
    pub registry: Arc<ToolRegistry>,
}

impl AppState {
    /// Create the application state
    #[must_use]
    pub fn new(database: Database, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            database,
            provider,
            registry: Arc::new(ToolRegistry::new()),
        }
    }
}

/// Build the full application router
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(state.clone()))
        .merge(BookRoutes::routes(state.clone()))
        .merge(ChatRoutes::routes(state))
        .layer(TraceLayer::new_for_http())
}
