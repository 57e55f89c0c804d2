use chrono::NaiveDate;
use serde::Serialize;

use crate::dates;
use crate::models::job::{JobRecord, Status};

/// Notes longer than this are cut in the table.
pub const NOTES_EXCERPT_CHARS: usize = 50;
const ELLIPSIS: &str = "...";

pub const EMPTY_TABLE_MESSAGE: &str = "No jobs found. Add your first job application above!";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusOption {
    pub value: Status,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub application_date: String,
    pub notes_excerpt: String,
    pub deadline_date: String,
    /// Style hint only; past-due jobs stay editable.
    pub deadline_past: bool,
    pub status: Status,
    pub status_options: Vec<StatusOption>,
    pub detail_href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableRow {
    Job(JobRow),
    /// Full-width message row: the empty-table hint or a load failure.
    Placeholder { message: String },
}

pub fn render_table(jobs: &[JobRecord], today: NaiveDate) -> Vec<TableRow> {
    if jobs.is_empty() {
        return vec![TableRow::Placeholder {
            message: EMPTY_TABLE_MESSAGE.to_string(),
        }];
    }
    jobs.iter().map(|job| TableRow::Job(render_row(job, today))).collect()
}

pub fn error_row(message: &str) -> TableRow {
    TableRow::Placeholder {
        message: format!("Error loading jobs: {message}"),
    }
}

fn render_row(job: &JobRecord, today: NaiveDate) -> JobRow {
    JobRow {
        id: job.id,
        title: job.title.clone(),
        company: job.company.clone(),
        application_date: dates::format_short_opt(job.application_date),
        notes_excerpt: job.notes.as_deref().map(notes_excerpt).unwrap_or_default(),
        deadline_date: dates::format_short_opt(job.deadline_date),
        deadline_past: dates::is_past(job.deadline_date, today),
        status: job.status,
        status_options: status_options(job.status),
        detail_href: format!("job-detail.html?id={}", job.id),
    }
}

pub fn status_options(current: Status) -> Vec<StatusOption> {
    Status::ALL
        .into_iter()
        .map(|status| StatusOption {
            value: status,
            label: status.label(),
            selected: status == current,
        })
        .collect()
}

/// First `NOTES_EXCERPT_CHARS` characters, with a marker when cut.
pub fn notes_excerpt(notes: &str) -> String {
    if notes.chars().count() <= NOTES_EXCERPT_CHARS {
        return notes.to_string();
    }
    let mut excerpt: String = notes.chars().take(NOTES_EXCERPT_CHARS).collect();
    excerpt.push_str(ELLIPSIS);
    excerpt
}
