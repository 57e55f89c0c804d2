use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::errors::{AppError, LOGIN_PAGE};
use crate::models::user::{Credentials, Registration};
use crate::state::AppState;
use crate::views::layout::Layout;

pub const HOME_PAGE: &str = "/home.html";

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub layout: Layout,
    /// Page the browser should navigate to next.
    pub redirect: &'static str,
}

fn required(values: &[&str], message: &str) -> Result<(), AppError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

/// Prefixes a form failure the way the sign-in pages show it.
fn form_failure(prefix: &str, err: AppError) -> AppError {
    match err {
        AppError::Validation(msg) => AppError::Validation(format!("{prefix}: {msg}")),
        other => other,
    }
}

/// GET /session
pub async fn handle_session(State(state): State<AppState>) -> Json<Layout> {
    Json(state.layout().await)
}

/// POST /session/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<SessionResponse>, AppError> {
    required(
        &[&credentials.email, &credentials.password],
        "Email and password are required",
    )?;

    let token = state
        .api
        .login(&credentials)
        .await
        .map_err(|e| form_failure("Login failed", AppError::from_form_rejection(e)))?;

    state.jobs.clear().await;
    state.session.begin(token).await?;
    info!("signed in");

    Ok(Json(SessionResponse {
        layout: state.layout().await,
        redirect: HOME_PAGE,
    }))
}

/// POST /session/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(registration): Json<Registration>,
) -> Result<Json<SessionResponse>, AppError> {
    required(
        &[
            &registration.username,
            &registration.email,
            &registration.password,
        ],
        "Missing required fields",
    )?;

    let token = state
        .api
        .register(&registration)
        .await
        .map_err(|e| form_failure("Registration failed", AppError::from_form_rejection(e)))?;

    state.jobs.clear().await;
    state.session.begin(token).await?;
    info!(username = %registration.username, "registered and signed in");

    Ok(Json(SessionResponse {
        layout: state.layout().await,
        redirect: HOME_PAGE,
    }))
}

/// POST /session/logout
pub async fn handle_logout(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, AppError> {
    state.session.end().await?;
    state.jobs.clear().await;
    info!("signed out");

    Ok(Json(SessionResponse {
        layout: state.layout().await,
        redirect: LOGIN_PAGE,
    }))
}

/// PUT /session/dark-mode
pub async fn handle_toggle_dark_mode(
    State(state): State<AppState>,
) -> Result<Json<Layout>, AppError> {
    let mode = state.session.toggle_dark_mode().await?;
    info!(dark_mode = ?mode, "theme toggled");
    Ok(Json(state.layout().await))
}
