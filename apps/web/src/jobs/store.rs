use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::api_client::TrackerApi;
use crate::errors::AppError;
use crate::models::job::{JobFilter, JobRecord};

/// One committed reload. Always replaced wholesale, never patched.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Request token of the reload that produced it.
    pub request: u64,
    pub filter: JobFilter,
    pub jobs: Arc<Vec<JobRecord>>,
}

/// Client-side cache of the job list.
///
/// Reloads may overlap. Each one takes a monotonically increasing request
/// token, and a response only commits if no later-issued reload has
/// committed first, so a slow response can never overwrite a newer one.
pub struct JobStore {
    api: Arc<dyn TrackerApi>,
    issued: AtomicU64,
    current: RwLock<Option<Snapshot>>,
}

impl JobStore {
    pub fn new(api: Arc<dyn TrackerApi>) -> Self {
        Self {
            api,
            issued: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    /// Full re-fetch with `filter` passed through to the backend.
    /// Returns the snapshot the view should render: this reload's, or a
    /// newer one if this reload was superseded while in flight.
    pub async fn load(&self, token: &str, filter: &JobFilter) -> Result<Snapshot, AppError> {
        let request = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(request, status = filter.status.as_str(), "reloading job list");

        let jobs = self
            .api
            .list_jobs(token, filter)
            .await
            .map_err(|e| {
                let err = AppError::from(e);
                error!(request, error = %err, "failed to load jobs");
                err
            })?;

        let mut current = self.current.write().await;
        if let Some(newer) = current.as_ref().filter(|s| s.request > request) {
            debug!(request, newer = newer.request, "discarding superseded reload");
            return Ok(newer.clone());
        }

        info!(request, count = jobs.len(), "job list reloaded");
        let snapshot = Snapshot {
            request,
            filter: filter.clone(),
            jobs: Arc::new(jobs),
        };
        *current = Some(snapshot.clone());
        Ok(snapshot)
    }

    #[cfg(test)]
    pub async fn current(&self) -> Option<Snapshot> {
        self.current.read().await.clone()
    }

    /// Drops the cached jobs, e.g. on logout.
    pub async fn clear(&self) {
        *self.current.write().await = None;
    }
}
