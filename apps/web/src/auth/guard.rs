use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::errors::AppError;
use crate::state::AppState;

/// Bearer token of the current session, inserted by `require_session`.
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

/// Session guard for every page view and command.
///
/// Without a token the request is refused with a login redirect. When the
/// backend rejects the token mid-request the session is ended, so the next
/// page load redirects as well. Only the token this request carried is
/// ended; a session begun in the meantime survives.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = state.session.token().await else {
        tracing::warn!(path = %request.uri().path(), "no session token, authentication denied");
        return Err(AppError::Auth);
    };
    request.extensions_mut().insert(AuthToken(token.clone()));

    let response = next.run(request).await;
    if response.status() == StatusCode::UNAUTHORIZED {
        if state.session.end_if(&token).await? {
            tracing::warn!("backend rejected session token, signed out");
            state.jobs.clear().await;
        } else {
            tracing::debug!("stale token rejected, session already replaced");
        }
    }
    Ok(response)
}
