//! InviteBot web server - Slack invite-gate webhook receiver.
//!
//! This binary provides a small web server that:
//! - Receives Slack Events API callbacks
//! - Verifies the request signature
//! - Replies to direct invite attempts via the Slack Web API

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use invitebot::web::{health, slack_events, slack_events_get, AppState};
use invitebot::{Config, Notifier, SlackClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("invitebot_starting");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        port = config.port,
        signature_max_age = config.signature_max_age,
        confirm_channel = ?config.confirm_channel,
        trigger_phrases_overridden = config.trigger_phrases.is_some(),
        "config_loaded"
    );

    // Create the Slack Web API client and notifier
    let client = SlackClient::new(
        config.bot_token.clone(),
        Duration::from_millis(config.request_timeout_ms),
    )
    .context("Failed to build Slack client")?;
    let notifier = Notifier::new(
        client,
        config.application_url.clone(),
        config.confirm_channel.clone(),
    );

    // Create application state
    let state = AppState::new(config.clone(), notifier);

    // Build the router
    let app = Router::new()
        .route("/health", get(health))
        .route("/slack/events", post(slack_events).get(slack_events_get))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "invitebot_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("invitebot_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("invitebot_shutting_down");
}
