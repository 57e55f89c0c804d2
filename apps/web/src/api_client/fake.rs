//! In-memory stand-in for the tracker backend, used by store, command and
//! router tests. Mirrors the backend's filtering, validation and status codes.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use super::{ApiError, JobChanges, TrackerApi};
use crate::models::dashboard::{ServerDashboard, ServerDeadline, StatusCounts};
use crate::models::job::{JobFilter, JobRecord, NewJob, StatusFilter};
use crate::models::user::{Credentials, ProfileUpdate, Registration, UserProfile};

pub const TOKEN: &str = "test-token";

#[derive(Default)]
struct Inner {
    jobs: Vec<JobRecord>,
    next_id: i64,
    user: Option<UserProfile>,
    /// Status code and message for the next call that checks the token.
    fail_next: Option<(u16, String)>,
    /// Every job list request fails with this.
    list_failure: Option<(u16, String)>,
    /// Artificial latency per search term, for reload ordering tests.
    list_delays: HashMap<String, Duration>,
    list_calls: usize,
}

#[derive(Default)]
pub struct FakeTracker {
    inner: Mutex<Inner>,
}

impl FakeTracker {
    pub fn new() -> Self {
        let fake = Self::default();
        {
            let mut inner = fake.inner.lock().unwrap();
            inner.next_id = 1;
            inner.user = Some(UserProfile {
                username: "ada".into(),
                email: "ada@example.com".into(),
                created_at: NaiveDate::from_ymd_opt(2024, 11, 3).and_then(|d| d.and_hms_opt(9, 0, 0)),
            });
        }
        fake
    }

    pub fn with_jobs(jobs: Vec<JobRecord>) -> Self {
        let fake = Self::new();
        {
            let mut inner = fake.inner.lock().unwrap();
            inner.next_id = jobs.iter().map(|j| j.id).max().unwrap_or(0) + 1;
            inner.jobs = jobs;
        }
        fake
    }

    pub fn fail_next(&self, status: u16, message: &str) {
        self.inner.lock().unwrap().fail_next = Some((status, message.to_string()));
    }

    pub fn fail_lists(&self, status: u16, message: &str) {
        self.inner.lock().unwrap().list_failure = Some((status, message.to_string()));
    }

    pub fn delay_search(&self, search: &str, delay: Duration) {
        self.inner
            .lock()
            .unwrap()
            .list_delays
            .insert(search.to_string(), delay);
    }

    pub fn jobs(&self) -> Vec<JobRecord> {
        self.inner.lock().unwrap().jobs.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.inner.lock().unwrap().list_calls
    }

    fn check(&self, token: &str) -> Result<(), ApiError> {
        if token != TOKEN {
            return Err(rejected(401, "Token has expired"));
        }
        match self.inner.lock().unwrap().fail_next.take() {
            Some((status, message)) => Err(rejected(status, &message)),
            None => Ok(()),
        }
    }
}

fn rejected(status: u16, message: &str) -> ApiError {
    ApiError::Rejected {
        status,
        message: message.to_string(),
    }
}

fn not_found() -> ApiError {
    rejected(404, "Job not found")
}

#[async_trait]
impl TrackerApi for FakeTracker {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        if credentials.password == "secret" {
            Ok(TOKEN.to_string())
        } else {
            Err(rejected(401, "Invalid credentials"))
        }
    }

    async fn register(&self, _registration: &Registration) -> Result<String, ApiError> {
        Ok(TOKEN.to_string())
    }

    async fn list_jobs(&self, token: &str, filter: &JobFilter) -> Result<Vec<JobRecord>, ApiError> {
        let search = filter.search.clone().unwrap_or_default();
        let delay = {
            let mut inner = self.inner.lock().unwrap();
            inner.list_calls += 1;
            inner.list_delays.get(&search).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check(token)?;
        if let Some((status, message)) = self.inner.lock().unwrap().list_failure.clone() {
            return Err(rejected(status, &message));
        }

        let needle = search.to_lowercase();
        let mut jobs: Vec<JobRecord> = self
            .inner
            .lock()
            .unwrap()
            .jobs
            .iter()
            .filter(|j| match filter.status {
                StatusFilter::All => true,
                StatusFilter::Only(status) => j.status == status,
            })
            .filter(|j| {
                needle.is_empty()
                    || j.title.to_lowercase().contains(&needle)
                    || j.company.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        // newest application first, like the backend
        jobs.sort_by(|a, b| b.application_date.cmp(&a.application_date));
        Ok(jobs)
    }

    async fn get_job(&self, token: &str, id: i64) -> Result<JobRecord, ApiError> {
        self.check(token)?;
        let inner = self.inner.lock().unwrap();
        inner.jobs.iter().find(|j| j.id == id).cloned().ok_or_else(not_found)
    }

    async fn create_job(&self, token: &str, job: &NewJob) -> Result<JobRecord, ApiError> {
        self.check(token)?;
        let mut inner = self.inner.lock().unwrap();
        let record = JobRecord {
            id: inner.next_id,
            title: job.title.clone(),
            company: job.company.clone(),
            status: job.status,
            application_date: job.application_date,
            deadline_date: job.deadline_date,
            notes: job.notes.clone(),
            created_at: None,
            updated_at: None,
        };
        inner.next_id += 1;
        inner.jobs.push(record.clone());
        Ok(record)
    }

    async fn update_job(
        &self,
        token: &str,
        id: i64,
        changes: &JobChanges,
    ) -> Result<JobRecord, ApiError> {
        self.check(token)?;
        let mut inner = self.inner.lock().unwrap();
        let job = inner.jobs.iter_mut().find(|j| j.id == id).ok_or_else(not_found)?;

        let mut merged = serde_json::to_value(&*job).map_err(ApiError::Parse)?;
        if let Value::Object(fields) = &mut merged {
            for (key, value) in changes {
                fields.insert(key.clone(), value.clone());
            }
        }
        let updated: JobRecord =
            serde_json::from_value(merged).map_err(|e| rejected(400, &e.to_string()))?;
        *job = updated.clone();
        Ok(updated)
    }

    async fn delete_job(&self, token: &str, id: i64) -> Result<(), ApiError> {
        self.check(token)?;
        let mut inner = self.inner.lock().unwrap();
        let before = inner.jobs.len();
        inner.jobs.retain(|j| j.id != id);
        if inner.jobs.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    async fn dashboard(&self, token: &str) -> Result<ServerDashboard, ApiError> {
        self.check(token)?;
        let inner = self.inner.lock().unwrap();
        let mut counts = StatusCounts::default();
        for job in &inner.jobs {
            counts.increment(job.status);
        }
        let upcoming_deadlines = inner
            .jobs
            .iter()
            .filter_map(|j| {
                j.deadline_date.map(|deadline| ServerDeadline {
                    title: j.title.clone(),
                    company: j.company.clone(),
                    deadline_date: deadline,
                    days_remaining: 0,
                })
            })
            .collect();
        Ok(ServerDashboard {
            total_jobs: counts.total(),
            counts,
            upcoming_deadlines,
        })
    }

    async fn user(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.check(token)?;
        self.inner
            .lock()
            .unwrap()
            .user
            .clone()
            .ok_or_else(|| rejected(404, "User not found"))
    }

    async fn update_user(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        self.check(token)?;
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .user
            .as_mut()
            .ok_or_else(|| rejected(404, "User not found"))?;
        user.username = update.username.clone();
        user.email = update.email.clone();
        Ok(user.clone())
    }

    async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        _new_password: &str,
    ) -> Result<(), ApiError> {
        self.check(token)?;
        if current_password != "secret" {
            return Err(rejected(401, "Current password is incorrect"));
        }
        Ok(())
    }
}
