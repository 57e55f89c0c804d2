pub mod health;

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;

use crate::auth::{guard::require_session, handlers as auth};
use crate::dashboard::handlers as dashboard;
use crate::jobs::handlers as jobs;
use crate::profile::handlers as profile;
use crate::config::Config;
use crate::state::AppState;

/// Only the configured origins get CORS headers. With none configured the
/// views are same-origin only.
fn cors_layer(config: &Config) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: AppState) -> Router {
    // Page views and commands; all of them need a signed-in session
    let views = Router::new()
        .route("/jobs", get(jobs::handle_list).post(jobs::handle_create))
        .route(
            "/jobs/:id",
            get(jobs::handle_detail)
                .put(jobs::handle_edit)
                .delete(jobs::handle_delete),
        )
        .route("/jobs/:id/status", put(jobs::handle_status))
        .route("/jobs/:id/fields/:field", patch(jobs::handle_field))
        .route("/dashboard", get(dashboard::handle_dashboard))
        .route(
            "/profile",
            get(profile::handle_profile).put(profile::handle_update_profile),
        )
        .route("/profile/password", put(profile::handle_change_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/session", get(auth::handle_session))
        .route("/session/login", post(auth::handle_login))
        .route("/session/register", post(auth::handle_register))
        .route("/session/logout", post(auth::handle_logout))
        .route("/session/dark-mode", put(auth::handle_toggle_dark_mode))
        .nest("/views", views)
        // Page markup
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(cors)
        .with_state(state)
}
