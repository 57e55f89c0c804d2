mod api_client;
mod auth;
mod config;
mod dashboard;
mod dates;
mod errors;
mod jobs;
mod models;
mod profile;
mod routes;
mod session;
mod state;
mod views;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::TrackerClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::session::Session;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tracker web v{}", env!("CARGO_PKG_VERSION"));

    // Backend client
    let api = Arc::new(TrackerClient::new(
        config.api_url.clone(),
        config.request_timeout,
    )?);
    info!(
        "Tracker API client initialized ({}, timeout {}s)",
        config.api_url,
        config.request_timeout.as_secs()
    );

    // Restore the persisted session, if any
    let session = Session::load(&config.session_file).await;

    let state = AppState::new(api, session, config.clone());

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.bind_addr, config.port)
        .parse()
        .context("BIND_ADDR and PORT must form a socket address")?;
    info!("Listening on {addr}, serving pages from {}", config.static_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
