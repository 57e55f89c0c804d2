use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{ApiError, JobChanges, TrackerApi};
use crate::models::dashboard::ServerDashboard;
use crate::models::job::{JobFilter, JobRecord, NewJob};
use crate::models::user::{Credentials, ProfileUpdate, Registration, UserProfile};

/// reqwest-backed client for the tracker REST backend.
#[derive(Clone)]
pub struct TrackerClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl TrackerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and returns the decoded body of a successful envelope.
    /// Any non-2xx status or `success: false` becomes `ApiError::Rejected`.
    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request
            .header("content-type", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.timeout)
                } else {
                    ApiError::Network(e)
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(ApiError::Network)?;
        debug!(status = status.as_u16(), bytes = text.len(), "backend responded");

        let body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(ApiError::Rejected {
                    status: status.as_u16(),
                    message: text,
                })
            }
            Err(e) => return Err(ApiError::Parse(e)),
        };

        let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
        if !status.is_success() || !success {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string();
            warn!(status = status.as_u16(), %message, "backend rejected request");
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    fn authed(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request.bearer_auth(token)
    }
}

/// Pulls `key` out of a successful envelope and decodes it.
fn field<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<T, ApiError> {
    let value = body.get_mut(key).map(Value::take).unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(ApiError::Parse)
}

#[async_trait]
impl TrackerApi for TrackerClient {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        let body = self
            .send(self.client.post(self.url("/login")).json(credentials))
            .await?;
        field(body, "token")
    }

    async fn register(&self, registration: &Registration) -> Result<String, ApiError> {
        let body = self
            .send(self.client.post(self.url("/register")).json(registration))
            .await?;
        field(body, "token")
    }

    async fn list_jobs(&self, token: &str, filter: &JobFilter) -> Result<Vec<JobRecord>, ApiError> {
        let request = self.client.get(self.url("/jobs")).query(&filter.query_pairs());
        let body = self.send(self.authed(request, token)).await?;
        field(body, "jobs")
    }

    async fn get_job(&self, token: &str, id: i64) -> Result<JobRecord, ApiError> {
        let request = self.client.get(self.url(&format!("/jobs/{id}")));
        let body = self.send(self.authed(request, token)).await?;
        field(body, "job")
    }

    async fn create_job(&self, token: &str, job: &NewJob) -> Result<JobRecord, ApiError> {
        let request = self.client.post(self.url("/jobs")).json(job);
        let body = self.send(self.authed(request, token)).await?;
        field(body, "job")
    }

    async fn update_job(
        &self,
        token: &str,
        id: i64,
        changes: &JobChanges,
    ) -> Result<JobRecord, ApiError> {
        let request = self.client.put(self.url(&format!("/jobs/{id}"))).json(changes);
        let body = self.send(self.authed(request, token)).await?;
        field(body, "job")
    }

    async fn delete_job(&self, token: &str, id: i64) -> Result<(), ApiError> {
        let request = self.client.delete(self.url(&format!("/jobs/{id}")));
        self.send(self.authed(request, token)).await?;
        Ok(())
    }

    async fn dashboard(&self, token: &str) -> Result<ServerDashboard, ApiError> {
        let request = self.client.get(self.url("/dashboard"));
        let body = self.send(self.authed(request, token)).await?;
        field(body, "stats")
    }

    async fn user(&self, token: &str) -> Result<UserProfile, ApiError> {
        let request = self.client.get(self.url("/user"));
        let body = self.send(self.authed(request, token)).await?;
        field(body, "user")
    }

    async fn update_user(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        let request = self.client.put(self.url("/user")).json(update);
        let body = self.send(self.authed(request, token)).await?;
        field(body, "user")
    }

    async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let payload = json!({
            "current_password": current_password,
            "new_password": new_password,
        });
        let request = self.client.put(self.url("/user/password")).json(&payload);
        self.send(self.authed(request, token)).await?;
        Ok(())
    }
}
