use chrono::NaiveDate;
use serde::Serialize;

use crate::dates;
use crate::models::dashboard::{ServerDashboard, StatusCounts};
use crate::models::job::{JobFilter, JobRecord, Status};
use crate::models::user::UserProfile;
use crate::views::aggregate::{
    bucket_by_month, profile_stats, summarize, DashboardStats, ProfileStats, UpcomingDeadline,
};
use crate::views::charts::{render_status_chart, render_timeline_chart, ChartSpec};
use crate::views::table::{error_row, render_table, status_options, StatusOption, TableRow};

/// Deadlines this close are highlighted.
pub const URGENT_DAYS: i64 = 2;
pub const RECENT_JOBS: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Job list
// ────────────────────────────────────────────────────────────────────────────

/// Table plus both charts, all derived from one job snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobListView {
    pub filter: JobFilter,
    pub rows: Vec<TableRow>,
    pub stats: Option<DashboardStats>,
    pub deadlines: Vec<DeadlineItem>,
    pub status_chart: Option<ChartSpec>,
    pub timeline_chart: Option<ChartSpec>,
}

impl JobListView {
    pub fn render(filter: JobFilter, jobs: &[JobRecord], today: NaiveDate) -> Self {
        let stats = summarize(jobs, today);
        let buckets = bucket_by_month(jobs, today);
        Self {
            filter,
            rows: render_table(jobs, today),
            deadlines: stats.upcoming_deadlines.iter().map(DeadlineItem::from).collect(),
            status_chart: Some(render_status_chart(&stats.counts_by_status)),
            timeline_chart: Some(render_timeline_chart(&buckets)),
            stats: Some(stats),
        }
    }

    /// The load failed: a single error row and no charts, never stale data.
    pub fn failed(filter: JobFilter, message: &str) -> Self {
        Self {
            filter,
            rows: vec![error_row(message)],
            stats: None,
            deadlines: Vec::new(),
            status_chart: None,
            timeline_chart: None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dashboard
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeadlineItem {
    pub title: String,
    pub company: String,
    pub deadline_date: String,
    pub days_remaining: i64,
    /// `(3 days left)`
    pub remaining_label: String,
    pub urgent: bool,
}

pub fn deadline_item(
    title: &str,
    company: &str,
    deadline: NaiveDate,
    days_remaining: i64,
) -> DeadlineItem {
    let unit = if days_remaining == 1 { "day" } else { "days" };
    DeadlineItem {
        title: title.to_string(),
        company: company.to_string(),
        deadline_date: dates::format_short(deadline),
        days_remaining,
        remaining_label: format!("({days_remaining} {unit} left)"),
        urgent: days_remaining <= URGENT_DAYS,
    }
}

impl From<&UpcomingDeadline> for DeadlineItem {
    fn from(upcoming: &UpcomingDeadline) -> Self {
        deadline_item(
            &upcoming.job.title,
            &upcoming.job.company,
            upcoming.deadline,
            upcoming.days_remaining,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentJobRow {
    pub title: String,
    pub company: String,
    pub application_date: String,
    pub status: Status,
    pub status_label: &'static str,
    pub badge_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub total_jobs: u32,
    pub counts: StatusCounts,
    pub deadlines: Vec<DeadlineItem>,
    pub recent_jobs: Vec<RecentJobRow>,
    /// Shown in place of the recent-jobs table when it is empty.
    pub recent_jobs_placeholder: Option<&'static str>,
    pub status_chart: ChartSpec,
    /// Missing when the job list could not be loaded.
    pub timeline_chart: Option<ChartSpec>,
}

pub fn render_deadlines(server: &ServerDashboard) -> Vec<DeadlineItem> {
    server
        .upcoming_deadlines
        .iter()
        .map(|d| deadline_item(&d.title, &d.company, d.deadline_date, d.days_remaining))
        .collect()
}

pub fn render_recent_jobs(jobs: &[JobRecord]) -> Vec<RecentJobRow> {
    jobs.iter()
        .take(RECENT_JOBS)
        .map(|job| RecentJobRow {
            title: job.title.clone(),
            company: job.company.clone(),
            application_date: dates::format_short_opt(job.application_date),
            status: job.status,
            status_label: job.status.label(),
            badge_class: badge_class(job.status),
        })
        .collect()
}

/// Counts and deadlines come from the backend's dashboard; the timeline and
/// recent jobs come from the full job list. Without the list the summary
/// half still renders.
pub fn render_dashboard(
    server: &ServerDashboard,
    jobs: Option<&[JobRecord]>,
    today: NaiveDate,
) -> DashboardView {
    let recent_jobs = jobs.map(render_recent_jobs).unwrap_or_default();
    DashboardView {
        total_jobs: server.total_jobs,
        counts: server.counts,
        deadlines: render_deadlines(server),
        recent_jobs_placeholder: (jobs.is_some() && recent_jobs.is_empty())
            .then_some("No job applications yet"),
        recent_jobs,
        status_chart: render_status_chart(&server.counts),
        timeline_chart: jobs.map(|jobs| render_timeline_chart(&bucket_by_month(jobs, today))),
    }
}

fn badge_class(status: Status) -> String {
    format!("status-badge status-{status}")
}

// ────────────────────────────────────────────────────────────────────────────
// Job detail
// ────────────────────────────────────────────────────────────────────────────

/// Raw values for the edit form; dates stay in `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobEditForm {
    pub title: String,
    pub company: String,
    pub application_date: String,
    pub deadline_date: String,
    pub status: Status,
    pub status_options: Vec<StatusOption>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDetailView {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub application_date: String,
    pub deadline_date: String,
    pub status_label: &'static str,
    pub badge_class: String,
    pub notes: String,
    pub form: JobEditForm,
}

pub fn render_job_detail(job: &JobRecord) -> JobDetailView {
    let iso = |date: Option<NaiveDate>| date.map(|d| d.to_string()).unwrap_or_default();
    JobDetailView {
        id: job.id,
        title: job.title.clone(),
        company: job.company.clone(),
        application_date: job.application_date.map(dates::format_long).unwrap_or_default(),
        deadline_date: job
            .deadline_date
            .map(dates::format_long)
            .unwrap_or_else(|| "None".to_string()),
        status_label: job.status.label(),
        badge_class: badge_class(job.status),
        notes: job
            .notes
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "No notes added.".to_string()),
        form: JobEditForm {
            title: job.title.clone(),
            company: job.company.clone(),
            application_date: iso(job.application_date),
            deadline_date: iso(job.deadline_date),
            status: job.status,
            status_options: status_options(job.status),
            notes: job.notes.clone().unwrap_or_default(),
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Profile
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub username: String,
    pub email: String,
    pub avatar_initial: String,
    pub member_since: String,
    /// Missing when the dashboard request failed; the profile still renders.
    pub stats: Option<ProfileStats>,
}

pub fn render_profile(user: &UserProfile, counts: Option<&StatusCounts>) -> ProfileView {
    ProfileView {
        username: user.username.clone(),
        email: user.email.clone(),
        avatar_initial: user
            .username
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default(),
        member_since: dates::member_since(user.created_at),
        stats: counts.map(profile_stats),
    }
}
