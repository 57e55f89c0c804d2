use std::sync::Arc;

use crate::api_client::TrackerApi;
use crate::config::Config;
use crate::jobs::store::JobStore;
use crate::session::Session;
use crate::views::layout::{Layout, Page};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Backend seam. `TrackerClient` in production, an in-memory fake in tests.
    pub api: Arc<dyn TrackerApi>,
    pub session: Session,
    /// Snapshot of the job list page, shared by its reloads and commands.
    pub jobs: Arc<JobStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(api: Arc<dyn TrackerApi>, session: Session, config: Config) -> Self {
        Self {
            jobs: Arc::new(JobStore::new(api.clone())),
            api,
            session,
            config,
        }
    }

    pub async fn layout(&self) -> Layout {
        Layout::from_session(&self.session.snapshot().await)
    }

    /// Wraps a view with the shared layout.
    pub async fn page<T>(&self, view: T) -> Page<T> {
        Page {
            layout: self.layout().await,
            view,
        }
    }
}
