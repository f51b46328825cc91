// ABOUTME: Health check route reporting service liveness and database reachability
// ABOUTME: Used by load balancers and deployment probes
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,
    /// Database reachability
    pub database: String,
}

/// Health routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health route
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/health", get(Self::health))
            .with_state(state)
    }

    /// Report liveness and database reachability
    async fn health(State(state): State<AppState>) -> Response {
        let database = match sqlx::query("SELECT 1").execute(state.database.pool()).await {
            Ok(_) => "up",
            Err(_) => "down",
        };

        let response = HealthResponse {
            status: "ok".to_owned(),
            database: database.to_owned(),
        };

        (StatusCode::OK, Json(response)).into_response()
    }
}
