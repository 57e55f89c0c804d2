//! Job commands. Each one is a single backend round trip followed by a full
//! reload of the job list, whether the command succeeded or not, so the
//! view always ends up showing what the backend holds. Nothing is retried.

use chrono::NaiveDate;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::api_client::{JobChanges, TrackerApi};
use crate::errors::AppError;
use crate::jobs::store::{JobStore, Snapshot};
use crate::models::job::{JobEdit, JobField, JobFilter, JobRecord, NewJob, Status};
use crate::views::layout::Notice;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this job?";

/// Result of a dispatched command plus the reload that followed it.
#[derive(Debug)]
pub struct CommandOutcome<T> {
    pub result: Result<T, AppError>,
    pub reload: Result<Snapshot, AppError>,
}

impl<T> CommandOutcome<T> {
    /// The blocking notification for a failed command, if any.
    pub fn notice(&self, action: &str) -> Option<Notice> {
        self.result
            .as_ref()
            .err()
            .map(|err| Notice::failure(action, err))
    }
}

pub struct CommandDispatcher<'a> {
    api: &'a dyn TrackerApi,
    store: &'a JobStore,
    token: &'a str,
    /// Filter the post-command reload uses, so the page keeps its view.
    filter: &'a JobFilter,
}

impl<'a> CommandDispatcher<'a> {
    pub fn new(
        api: &'a dyn TrackerApi,
        store: &'a JobStore,
        token: &'a str,
        filter: &'a JobFilter,
    ) -> Self {
        Self {
            api,
            store,
            token,
            filter,
        }
    }

    /// Creates a job. Rejects blank title or company before dispatch.
    pub async fn create(&self, input: NewJob) -> Result<CommandOutcome<JobRecord>, AppError> {
        let input = validate_new_job(input)?;
        let result = self.api.create_job(self.token, &input).await.map_err(AppError::from);
        Ok(self.finish("create", result).await)
    }

    /// Replaces one field. The value is trimmed; empty dates clear the date.
    pub async fn update_field(
        &self,
        id: i64,
        field: JobField,
        value: &str,
    ) -> Result<CommandOutcome<JobRecord>, AppError> {
        let mut changes = JobChanges::new();
        changes.insert(field.as_str().to_string(), field_value(field, value)?);
        let result = self
            .api
            .update_job(self.token, id, &changes)
            .await
            .map_err(AppError::from);
        Ok(self.finish("update_field", result).await)
    }

    pub async fn update_status(&self, id: i64, status: Status) -> CommandOutcome<JobRecord> {
        let mut changes = JobChanges::new();
        changes.insert("status".to_string(), json!(status));
        let result = self
            .api
            .update_job(self.token, id, &changes)
            .await
            .map_err(AppError::from);
        self.finish("update_status", result).await
    }

    /// Full edit from the job-detail page.
    pub async fn update_job(
        &self,
        id: i64,
        edit: JobEdit,
    ) -> Result<CommandOutcome<JobRecord>, AppError> {
        let edit = validate_edit(edit)?;
        let changes = match serde_json::to_value(&edit) {
            Ok(Value::Object(changes)) => changes,
            Ok(_) => JobChanges::new(),
            Err(e) => return Err(AppError::Internal(e.into())),
        };
        let result = self
            .api
            .update_job(self.token, id, &changes)
            .await
            .map_err(AppError::from);
        Ok(self.finish("update_job", result).await)
    }

    /// Deletes a job. Without explicit confirmation nothing is dispatched.
    pub async fn delete(
        &self,
        id: i64,
        confirmed: bool,
    ) -> Result<CommandOutcome<()>, AppError> {
        if !confirmed {
            return Err(AppError::ConfirmationRequired(DELETE_PROMPT.to_string()));
        }
        let result = self
            .api
            .delete_job(self.token, id)
            .await
            .map_err(AppError::from);
        Ok(self.finish("delete", result).await)
    }

    async fn finish<T>(&self, command: &str, result: Result<T, AppError>) -> CommandOutcome<T> {
        match &result {
            Ok(_) => info!(command, "command succeeded"),
            Err(e) => error!(command, error = %e, "command failed, reloading to resync"),
        }
        let reload = self.store.load(self.token, self.filter).await;
        CommandOutcome { result, reload }
    }
}

fn require(value: &str, message: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

fn validate_new_job(input: NewJob) -> Result<NewJob, AppError> {
    const MESSAGE: &str = "Job title and company are required";
    Ok(NewJob {
        title: require(&input.title, MESSAGE)?,
        company: require(&input.company, MESSAGE)?,
        notes: input.notes.filter(|n| !n.trim().is_empty()),
        ..input
    })
}

fn validate_edit(edit: JobEdit) -> Result<JobEdit, AppError> {
    const MESSAGE: &str = "Job title and company are required";
    Ok(JobEdit {
        title: require(&edit.title, MESSAGE)?,
        company: require(&edit.company, MESSAGE)?,
        ..edit
    })
}

/// Converts raw input for `field` into the backend's JSON value.
fn field_value(field: JobField, raw: &str) -> Result<Value, AppError> {
    let value = raw.trim();
    match field {
        JobField::Title => Ok(json!(require(value, "Job title is required")?)),
        JobField::Company => Ok(json!(require(value, "Company is required")?)),
        JobField::Notes => Ok(json!(value)),
        JobField::Status => value
            .parse::<Status>()
            .map(|s| json!(s))
            .map_err(|e| AppError::Validation(e.to_string())),
        JobField::ApplicationDate | JobField::DeadlineDate => {
            if value.is_empty() {
                return Ok(Value::Null);
            }
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|d| json!(d))
                .map_err(|_| {
                    AppError::Validation(format!(
                        "Invalid {}: '{value}'. Use YYYY-MM-DD format.",
                        field.as_str()
                    ))
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::api_client::fake::{FakeTracker, TOKEN};
    use crate::views::aggregate::summarize;
    use crate::views::aggregate::tests::{d, job};
    use crate::views::table::{render_table, TableRow};

    fn setup(jobs: Vec<JobRecord>) -> (Arc<FakeTracker>, JobStore) {
        let fake = Arc::new(FakeTracker::with_jobs(jobs));
        let store = JobStore::new(fake.clone());
        (fake, store)
    }

    fn new_job(title: &str, company: &str) -> NewJob {
        NewJob {
            title: title.into(),
            company: company.into(),
            status: Status::Applied,
            application_date: None,
            deadline_date: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_reload_shows_single_row_with_empty_dates() {
        let (fake, store) = setup(Vec::new());
        let filter = JobFilter::default();
        let dispatcher = CommandDispatcher::new(fake.as_ref(), &store, TOKEN, &filter);

        let outcome = dispatcher.create(new_job("SWE", "Acme")).await.unwrap();
        assert!(outcome.result.is_ok());

        let snapshot = outcome.reload.unwrap();
        let rows = render_table(&snapshot.jobs, d(2025, 6, 1));
        assert_eq!(rows.len(), 1);
        let TableRow::Job(row) = &rows[0] else {
            panic!("expected a job row");
        };
        assert_eq!(row.title, "SWE");
        assert_eq!(row.status, Status::Applied);
        assert_eq!(row.application_date, "");
        assert_eq!(row.deadline_date, "");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title_before_dispatch() {
        let (fake, store) = setup(Vec::new());
        let filter = JobFilter::default();
        let dispatcher = CommandDispatcher::new(fake.as_ref(), &store, TOKEN, &filter);

        let err = dispatcher.create(new_job("  ", "Acme")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(fake.list_calls(), 0);
        assert!(fake.jobs().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_job_and_keeps_other_counts() {
        let (fake, store) = setup(vec![
            job(1, Status::Applied),
            job(2, Status::Interview),
            job(3, Status::Rejected),
        ]);
        let filter = JobFilter::default();
        let today = d(2025, 6, 1);
        let before = summarize(&store.load(TOKEN, &filter).await.unwrap().jobs, today);

        let dispatcher = CommandDispatcher::new(fake.as_ref(), &store, TOKEN, &filter);
        let outcome = dispatcher.delete(2, true).await.unwrap();
        assert!(outcome.result.is_ok());

        let snapshot = outcome.reload.unwrap();
        assert!(snapshot.jobs.iter().all(|j| j.id != 2));
        let after = summarize(&snapshot.jobs, today);
        assert_eq!(after.counts_by_status.interview, before.counts_by_status.interview - 1);
        assert_eq!(after.counts_by_status.applied, before.counts_by_status.applied);
        assert_eq!(after.counts_by_status.rejected, before.counts_by_status.rejected);
    }

    #[tokio::test]
    async fn test_delete_without_confirmation_dispatches_nothing() {
        let (fake, store) = setup(vec![job(1, Status::Applied)]);
        let filter = JobFilter::default();
        let dispatcher = CommandDispatcher::new(fake.as_ref(), &store, TOKEN, &filter);

        let err = dispatcher.delete(1, false).await.unwrap_err();
        assert!(matches!(err, AppError::ConfirmationRequired(ref p) if p == DELETE_PROMPT));
        assert_eq!(fake.jobs().len(), 1);
        assert_eq!(fake.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_status_change_moves_one_count() {
        let (fake, store) = setup(vec![
            job(1, Status::Applied),
            job(2, Status::Applied),
            job(3, Status::Bookmark),
        ]);
        let filter = JobFilter::default();
        let today = d(2025, 6, 1);
        let before = summarize(&store.load(TOKEN, &filter).await.unwrap().jobs, today);

        let dispatcher = CommandDispatcher::new(fake.as_ref(), &store, TOKEN, &filter);
        let outcome = dispatcher.update_status(1, Status::Interview).await;
        assert!(outcome.result.is_ok());
        let after = summarize(&outcome.reload.unwrap().jobs, today);

        let (b, a) = (before.counts_by_status, after.counts_by_status);
        assert_eq!(a.applied, b.applied - 1);
        assert_eq!(a.interview, b.interview + 1);
        assert_eq!(a.bookmark, b.bookmark);
        assert_eq!(a.accepted, b.accepted);
        assert_eq!(a.rejected, b.rejected);
        assert_eq!(after.total_jobs, before.total_jobs);
    }

    #[tokio::test]
    async fn test_failed_command_still_reloads_and_notifies() {
        let (fake, store) = setup(vec![job(1, Status::Applied)]);
        fake.fail_next(500, "Error updating job: database locked");
        let filter = JobFilter::default();
        let dispatcher = CommandDispatcher::new(fake.as_ref(), &store, TOKEN, &filter);

        let outcome = dispatcher.update_status(1, Status::Accepted).await;
        assert!(matches!(outcome.result, Err(AppError::Server(_))));
        let snapshot = outcome.reload.as_ref().unwrap();
        assert_eq!(snapshot.jobs[0].status, Status::Applied);
        assert_eq!(fake.list_calls(), 1);

        let notice = outcome.notice("Error updating job status").unwrap();
        assert_eq!(
            notice.message,
            "Error updating job status: Error updating job: database locked"
        );
    }

    #[tokio::test]
    async fn test_update_field_trims_and_clears_dates() {
        let mut record = job(1, Status::Applied);
        record.deadline_date = Some(d(2025, 7, 1));
        let (fake, store) = setup(vec![record]);
        let filter = JobFilter::default();
        let dispatcher = CommandDispatcher::new(fake.as_ref(), &store, TOKEN, &filter);

        let outcome = dispatcher
            .update_field(1, JobField::Title, "  Staff Engineer ")
            .await
            .unwrap();
        assert_eq!(outcome.result.unwrap().title, "Staff Engineer");

        let outcome = dispatcher
            .update_field(1, JobField::DeadlineDate, "")
            .await
            .unwrap();
        assert_eq!(outcome.result.unwrap().deadline_date, None);
    }

    #[tokio::test]
    async fn test_update_field_rejects_bad_date() {
        let (fake, store) = setup(vec![job(1, Status::Applied)]);
        let filter = JobFilter::default();
        let dispatcher = CommandDispatcher::new(fake.as_ref(), &store, TOKEN, &filter);

        let err = dispatcher
            .update_field(1, JobField::ApplicationDate, "03/04/2025")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("YYYY-MM-DD")));
    }

    #[tokio::test]
    async fn test_update_missing_job_is_not_found() {
        let (fake, store) = setup(Vec::new());
        let filter = JobFilter::default();
        let dispatcher = CommandDispatcher::new(fake.as_ref(), &store, TOKEN, &filter);

        let outcome = dispatcher.update_status(42, Status::Rejected).await;
        assert!(matches!(outcome.result, Err(AppError::NotFound(_))));
        assert!(outcome.reload.is_ok());
    }

    #[tokio::test]
    async fn test_full_edit_replaces_fields() {
        let (fake, store) = setup(vec![job(1, Status::Bookmark)]);
        let filter = JobFilter::default();
        let dispatcher = CommandDispatcher::new(fake.as_ref(), &store, TOKEN, &filter);

        let edit = JobEdit {
            title: "Platform Engineer".into(),
            company: "Globex".into(),
            status: Status::Interview,
            application_date: Some(d(2025, 5, 2)),
            deadline_date: None,
            notes: Some("Recruiter call Friday".into()),
        };
        let outcome = dispatcher.update_job(1, edit).await.unwrap();
        let updated = outcome.result.unwrap();
        assert_eq!(updated.company, "Globex");
        assert_eq!(updated.status, Status::Interview);
        assert_eq!(fake.jobs()[0].notes.as_deref(), Some("Recruiter call Friday"));
    }

    #[tokio::test]
    async fn test_identical_reloads_render_identically() {
        let mut record = job(1, Status::Applied);
        record.notes = Some("n".repeat(80));
        let (_fake, store) = setup(vec![record, job(2, Status::Accepted)]);
        let filter = JobFilter::default();
        let today = d(2025, 6, 1);

        let first = render_table(&store.load(TOKEN, &filter).await.unwrap().jobs, today);
        let second = render_table(&store.load(TOKEN, &filter).await.unwrap().jobs, today);
        assert_eq!(first, second);
    }
}
