use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use axum::http::HeaderValue;

/// View server configuration loaded from environment variables.
/// Every key has a default so a bare `cargo run` talks to a local backend.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the tracker REST backend, including the `/api` prefix.
    pub api_url: String,
    /// Listen address. Loopback unless overridden.
    pub bind_addr: String,
    pub port: u16,
    /// Extra origins allowed to call the view server cross-origin. Empty by
    /// default: the pages are served from the same origin.
    pub allowed_origins: Vec<HeaderValue>,
    pub rust_log: String,
    /// Where the session (token + dark-mode flag) is persisted between runs.
    pub session_file: PathBuf,
    /// Directory holding the static page markup served as the router fallback.
    pub static_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = env_or("REQUEST_TIMEOUT_SECS", "15")
            .parse::<u64>()
            .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;

        let allowed_origins = parse_origins(&env_or("ALLOWED_ORIGINS", ""))?;

        Ok(Config {
            api_url: env_or("TRACKER_API_URL", "http://localhost:5000/api")
                .trim_end_matches('/')
                .to_string(),
            bind_addr: env_or("BIND_ADDR", "127.0.0.1"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            session_file: PathBuf::from(env_or("SESSION_FILE", ".tracker-session.json")),
            static_dir: PathBuf::from(env_or("STATIC_DIR", "static")),
            request_timeout: Duration::from_secs(timeout_secs),
            allowed_origins,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Comma-separated origins. A wildcard is refused.
fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            if origin == "*" {
                bail!("ALLOWED_ORIGINS must list explicit origins, not '*'");
            }
            HeaderValue::from_str(origin)
                .with_context(|| format!("ALLOWED_ORIGINS entry '{origin}' is not a valid origin"))
        })
        .collect()
}
