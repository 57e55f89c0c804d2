use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::job::Status;

/// Per-status counters. Missing keys in a backend payload count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    #[serde(default)]
    pub bookmark: u32,
    #[serde(default)]
    pub applied: u32,
    #[serde(default)]
    pub interview: u32,
    #[serde(default)]
    pub accepted: u32,
    #[serde(default)]
    pub rejected: u32,
}

impl StatusCounts {
    pub fn get(&self, status: Status) -> u32 {
        match status {
            Status::Bookmark => self.bookmark,
            Status::Applied => self.applied,
            Status::Interview => self.interview,
            Status::Accepted => self.accepted,
            Status::Rejected => self.rejected,
        }
    }

    pub fn increment(&mut self, status: Status) {
        let slot = match status {
            Status::Bookmark => &mut self.bookmark,
            Status::Applied => &mut self.applied,
            Status::Interview => &mut self.interview,
            Status::Accepted => &mut self.accepted,
            Status::Rejected => &mut self.rejected,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u32 {
        Status::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

/// Body of `GET /dashboard`. `monthly_stats` and `recent_activity` are not
/// read: the timeline and recent jobs come from the job list.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerDashboard {
    pub total_jobs: u32,
    #[serde(flatten)]
    pub counts: StatusCounts,
    #[serde(default)]
    pub upcoming_deadlines: Vec<ServerDeadline>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerDeadline {
    pub title: String,
    pub company: String,
    pub deadline_date: NaiveDate,
    pub days_remaining: i64,
}
