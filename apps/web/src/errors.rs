use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::api_client::ApiError;
use crate::session::SessionError;

/// Where the browser is sent when the session is missing or rejected.
pub const LOGIN_PAGE: &str = "/index.html";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// The backend request never completed (connection failure or timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success body.
    #[error("Server error: {0}")]
    Server(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// No token in the session, or the backend rejected it.
    #[error("Unauthorized")]
    Auth,

    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Network(_) | AppError::Server(_) => StatusCode::BAD_GATEWAY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Auth => StatusCode::UNAUTHORIZED,
            AppError::ConfirmationRequired(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Auth => "UNAUTHORIZED",
            AppError::ConfirmationRequired(_) => "CONFIRMATION_REQUIRED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The message shown to the user. Internal details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(msg)
            | AppError::Server(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::ConfirmationRequired(msg) => msg.clone(),
            AppError::Auth => "Authentication required".to_string(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl AppError {
    /// For form submissions (login, password change) a 401 means the
    /// credentials were wrong, not that the session is gone.
    pub fn from_form_rejection(err: ApiError) -> Self {
        match err {
            ApiError::Rejected {
                status: 401,
                message,
            } => AppError::Validation(message),
            other => other.into(),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(e) => AppError::Network(format!("Backend unreachable: {e}")),
            ApiError::Timeout(after) => {
                AppError::Network(format!("Backend did not answer within {}s", after.as_secs()))
            }
            ApiError::Rejected { status, message } => match status {
                401 | 422 => AppError::Auth,
                404 => AppError::NotFound(message),
                400 | 409 => AppError::Validation(message),
                _ => AppError::Server(message),
            },
            ApiError::Parse(e) => AppError::Server(format!("Unexpected backend response: {e}")),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::Internal(anyhow::Error::new(err).context("failed to persist session"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.user_message();

        match &self {
            AppError::Network(msg) => tracing::error!("Network error: {msg}"),
            AppError::Server(msg) => tracing::error!("Server error: {msg}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            AppError::Auth => tracing::warn!("session missing or rejected, redirecting to login"),
            AppError::Validation(msg) => tracing::warn!("Validation error: {msg}"),
            AppError::NotFound(msg) => tracing::warn!("Not found: {msg}"),
            AppError::ConfirmationRequired(msg) => {
                tracing::warn!("Confirmation required: {msg}")
            }
        }

        let body = if matches!(self, AppError::Auth) {
            json!({
                "error": {
                    "code": code,
                    "message": message,
                    "redirect": LOGIN_PAGE
                }
            })
        } else {
            json!({
                "error": {
                    "code": code,
                    "message": message
                }
            })
        };

        (status, Json(body)).into_response()
    }
}
