mod config;
mod telegram;
mod webhook;

use std::future::Future;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::telegram::TelegramClient;
use crate::webhook::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,echobot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded environment from: {}", path.display());
    }

    // Load configuration
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    match &config_path {
        Some(path) => info!("Loading configuration from: {}", path.display()),
        None => info!("No config file given, using environment only"),
    }
    let config = Config::load(config_path.as_deref()).context("Failed to load configuration")?;

    info!("  API base URL: {}", config.telegram.api_base_url);
    if !config.has_token() {
        warn!("TELEGRAM_API_BOT_TOKEN is not set; outbound calls will be rejected");
    }

    let client = TelegramClient::new(&config.telegram);
    match client.get_me().await {
        Ok(me) => info!("Bot identity: @{} ({})", me.username, me.id),
        Err(e) => warn!("getMe failed: {}", e),
    }

    let app = webhook::router(AppState::new(client));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Listening on port {}", config.server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
        .await
        .context("Server error")?;

    Ok(())
}

/// Resolve once `signal` fires. If the signal cannot be registered, never
/// resolve, so the server keeps running instead of exiting right after bind.
async fn shutdown_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
