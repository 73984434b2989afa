// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify Status server
//!
//! Runs the status sync scheduler and serves the Slack slash commands.

use spotify_status::{
    config::{Config, UserStore},
    db::{FirestoreDb, InMemoryUserDirectory, UserDirectory},
    services::{spawn_scheduler, SlackClient, SpotifyClient, SyncEngine, UserService, Vault},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        sync_interval_secs = config.sync_interval.as_secs(),
        "Starting Spotify Status"
    );

    let directory: Arc<dyn UserDirectory> = match config.user_store {
        UserStore::Firestore => Arc::new(FirestoreDb::new(&config.gcp_project_id).await?),
        UserStore::Memory => {
            tracing::warn!("Using in-memory user store; users are lost on restart");
            Arc::new(InMemoryUserDirectory::new())
        }
    };

    let vault = Arc::new(Vault::new(&config.token_encryption_key)?);
    tracing::info!("Token vault initialized");

    let engine = SyncEngine::new(
        directory.clone(),
        vault.clone(),
        Arc::new(SpotifyClient::new(config.spotify_api_url.clone())),
        Arc::new(SlackClient::new(config.slack_api_url.clone())),
    );
    let scheduler = spawn_scheduler(engine, config.sync_interval);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        user_service: UserService::new(directory, vault),
    });

    let app = spotify_status::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.abort();
    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("spotify_status=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
