use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::dates;
use crate::models::dashboard::StatusCounts;
use crate::models::job::JobRecord;

/// Number of calendar months shown on the timeline, current month included.
pub const TIMELINE_MONTHS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingDeadline {
    pub job: JobRecord,
    pub deadline: NaiveDate,
    pub days_remaining: i64,
}

/// Summary of one job snapshot. Derived on every render, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_jobs: u32,
    pub counts_by_status: StatusCounts,
    pub upcoming_deadlines: Vec<UpcomingDeadline>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub counts: StatusCounts,
}

/// Counts jobs per status and collects deadlines that have not passed,
/// earliest first. Equal deadlines are ordered by job id.
pub fn summarize(jobs: &[JobRecord], today: NaiveDate) -> DashboardStats {
    let mut counts = StatusCounts::default();
    for job in jobs {
        counts.increment(job.status);
    }

    let mut upcoming_deadlines: Vec<UpcomingDeadline> = jobs
        .iter()
        .filter_map(|job| {
            let deadline = job.deadline_date?;
            let days_remaining = dates::days_remaining(deadline, today);
            (days_remaining >= 0).then(|| UpcomingDeadline {
                job: job.clone(),
                deadline,
                days_remaining,
            })
        })
        .collect();
    upcoming_deadlines.sort_by_key(|d| (d.days_remaining, d.job.id));

    DashboardStats {
        total_jobs: counts.total(),
        counts_by_status: counts,
        upcoming_deadlines,
    }
}

/// Groups jobs by application month over the trailing window ending at
/// `reference`'s month. Always returns `TIMELINE_MONTHS` buckets, oldest
/// first. Jobs with no application date or outside the window are skipped.
pub fn bucket_by_month(jobs: &[JobRecord], reference: NaiveDate) -> Vec<MonthBucket> {
    let mut buckets: Vec<MonthBucket> = (0..TIMELINE_MONTHS)
        .rev()
        .map(|back| {
            let start = dates::month_start_before(reference, back);
            MonthBucket {
                label: dates::month_label(start),
                year: start.year(),
                month: start.month(),
                counts: StatusCounts::default(),
            }
        })
        .collect();

    for job in jobs {
        let Some(applied_on) = job.application_date else {
            continue;
        };
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|b| b.year == applied_on.year() && b.month == applied_on.month())
        {
            bucket.counts.increment(job.status);
        }
    }

    buckets
}

/// Headline numbers on the profile page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileStats {
    pub total_jobs: u32,
    /// Applied plus interviewing.
    pub active_jobs: u32,
    /// Percentage of all jobs that reached interview, rounded.
    pub interview_rate: u32,
}

pub fn profile_stats(counts: &StatusCounts) -> ProfileStats {
    let total_jobs = counts.total();
    let interview_rate = if total_jobs > 0 {
        (f64::from(counts.interview) / f64::from(total_jobs) * 100.0).round() as u32
    } else {
        0
    };
    ProfileStats {
        total_jobs,
        active_jobs: counts.applied + counts.interview,
        interview_rate,
    }
}
