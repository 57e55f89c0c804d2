use axum::{extract::State, Extension, Json};
use tracing::{info, warn};

use crate::auth::guard::AuthToken;
use crate::errors::AppError;
use crate::jobs::handlers::ActionResponse;
use crate::models::user::{PasswordChange, ProfileUpdate, UserProfile};
use crate::profile::validation::{validate_password_change, validate_profile_update};
use crate::state::AppState;
use crate::views::layout::Notice;
use crate::views::pages::{render_profile, ProfileView};

/// Renders the profile page. Stats are optional: a failed dashboard request
/// is logged and the page renders without them.
async fn profile_view(state: &AppState, token: &str, user: &UserProfile) -> ProfileView {
    match state.api.dashboard(token).await {
        Ok(summary) => render_profile(user, Some(&summary.counts)),
        Err(e) => {
            warn!(error = %e, "profile stats unavailable");
            render_profile(user, None)
        }
    }
}

async fn respond(
    state: &AppState,
    token: &str,
    user: &UserProfile,
    notice: Option<Notice>,
) -> Json<ActionResponse<ProfileView>> {
    let view = profile_view(state, token, user).await;
    Json(ActionResponse {
        notice,
        page: state.page(view).await,
    })
}

/// GET /views/profile
pub async fn handle_profile(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
) -> Result<Json<ActionResponse<ProfileView>>, AppError> {
    let user = state.api.user(&token).await?;
    Ok(respond(&state, &token, &user, None).await)
}

/// PUT /views/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ActionResponse<ProfileView>>, AppError> {
    let update = validate_profile_update(update)?;
    let user = state.api.update_user(&token, &update).await?;
    info!(username = %user.username, "profile updated");
    let notice = Notice::info("Profile updated successfully");
    Ok(respond(&state, &token, &user, Some(notice)).await)
}

/// PUT /views/profile/password
///
/// A wrong current password comes back from the backend as 401; that is a
/// form error here, not an expired session.
pub async fn handle_change_password(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
    Json(change): Json<PasswordChange>,
) -> Result<Json<ActionResponse<ProfileView>>, AppError> {
    validate_password_change(&change)?;
    state
        .api
        .change_password(&token, &change.current_password, &change.new_password)
        .await
        .map_err(AppError::from_form_rejection)?;
    info!("password changed");

    let user = state.api.user(&token).await?;
    let notice = Notice::info("Password updated successfully");
    Ok(respond(&state, &token, &user, Some(notice)).await)
}
