//! Tracker API: the single point of entry for all backend calls.
//!
//! No other module talks to the REST backend directly. Views, stores and
//! command handlers all go through `TrackerApi`. The production
//! implementation is `TrackerClient`; tests swap in an in-memory backend.
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::dashboard::ServerDashboard;
use crate::models::job::{JobFilter, JobRecord, NewJob};
use crate::models::user::{Credentials, ProfileUpdate, Registration, UserProfile};

mod client;
#[cfg(test)]
pub mod fake;

pub use client::TrackerClient;

/// A partial job update: any subset of the job's fields, keyed by backend name.
pub type JobChanges = Map<String, Value>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed.
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The backend answered, but with `success: false` or an error status.
    #[error("backend rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The backend seam. Every method is one round trip; none retry.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// `POST /login`, returns the bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError>;

    /// `POST /register`, returns the bearer token.
    async fn register(&self, registration: &Registration) -> Result<String, ApiError>;

    /// `GET /jobs`. Filtering happens on the backend.
    async fn list_jobs(&self, token: &str, filter: &JobFilter) -> Result<Vec<JobRecord>, ApiError>;

    async fn get_job(&self, token: &str, id: i64) -> Result<JobRecord, ApiError>;

    async fn create_job(&self, token: &str, job: &NewJob) -> Result<JobRecord, ApiError>;

    /// `PUT /jobs/:id` with any subset of fields.
    async fn update_job(
        &self,
        token: &str,
        id: i64,
        changes: &JobChanges,
    ) -> Result<JobRecord, ApiError>;

    async fn delete_job(&self, token: &str, id: i64) -> Result<(), ApiError>;

    async fn dashboard(&self, token: &str) -> Result<ServerDashboard, ApiError>;

    async fn user(&self, token: &str) -> Result<UserProfile, ApiError>;

    async fn update_user(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError>;

    async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError>;
}
