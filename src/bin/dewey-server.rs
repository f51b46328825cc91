// ABOUTME: Server binary that wires configuration, storage, the LLM provider, and HTTP routes
// ABOUTME: Production entry point with fail-fast startup and graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Dewey Server Binary
//!
//! Starts the reading-list API. Configuration comes from the environment
//! (see `config`), with port and database overrides available as flags. The
//! LLM provider is resolved once here; a missing credential aborts startup
//! instead of failing requests later.

use anyhow::Result;
use clap::Parser;
use dewey::{
    config::ServerConfig,
    database::Database,
    llm::provider_from_env,
    logging,
    routes::{router, AppState},
};
use tracing::info;

#[derive(Parser)]
#[command(name = "dewey-server")]
#[command(about = "Dewey - multi-tenant reading-list manager with a chat assistant")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    info!("Starting Dewey server");
    info!("{}", config.summary());

    let database = Database::new(&config.database_url).await?;
    info!("Database initialized: {}", config.database_url);

    let provider = provider_from_env(config.llm_provider)?;
    info!(
        "LLM provider ready: {} (model: {})",
        provider.display_name(),
        provider.default_model()
    );

    let state = AppState::new(database, provider);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    info!("Listening on 0.0.0.0:{}", config.http_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
