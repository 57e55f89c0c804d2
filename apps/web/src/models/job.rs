use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Lifecycle stage of a job application. The set is closed: anything else
/// coming from the backend is an error, never silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Bookmark,
    Applied,
    Interview,
    Accepted,
    Rejected,
}

#[derive(Debug, Error, PartialEq)]
#[error("Invalid status: '{0}'. Must be one of: bookmark, applied, interview, accepted, rejected")]
pub struct UnknownStatus(pub String);

impl Status {
    /// Display and chart order.
    pub const ALL: [Status; 5] = [
        Status::Bookmark,
        Status::Applied,
        Status::Interview,
        Status::Accepted,
        Status::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Bookmark => "bookmark",
            Status::Applied => "applied",
            Status::Interview => "interview",
            Status::Accepted => "accepted",
            Status::Rejected => "rejected",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Bookmark => "Bookmark",
            Status::Applied => "Applied",
            Status::Interview => "Interview",
            Status::Accepted => "Accepted",
            Status::Rejected => "Rejected",
        }
    }

    /// Chart color: purple, blue, green, orange, red.
    pub fn color(self) -> &'static str {
        match self {
            Status::Bookmark => "#9966cc",
            Status::Applied => "#4a90e2",
            Status::Interview => "#50c878",
            Status::Accepted => "#ffa500",
            Status::Rejected => "#e74c3c",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A job application as the backend stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(alias = "job_id")]
    pub id: i64,
    pub title: String,
    pub company: String,
    pub status: Status,
    #[serde(default)]
    pub application_date: Option<NaiveDate>,
    #[serde(default)]
    pub deadline_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Status part of a list filter. `All` sends no `status` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

impl<'de> Deserialize<'de> for StatusFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for StatusFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Filter passed through to `GET /jobs`. The backend decides what matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFilter {
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub search: Option<String>,
}

impl JobFilter {
    /// Query parameters for the backend; empty values are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let StatusFilter::Only(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                pairs.push(("search", search.to_string()));
            }
        }
        pairs
    }
}

/// Body of `POST /jobs`. Optional fields are omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    #[serde(default = "default_status")]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_status() -> Status {
    Status::Applied
}

/// Body of the full edit submitted from the job-detail page.
/// A `None` deadline is sent as `null` so the backend clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEdit {
    pub title: String,
    pub company: String,
    pub status: Status,
    #[serde(default)]
    pub application_date: Option<NaiveDate>,
    #[serde(default)]
    pub deadline_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A single editable column of a job row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobField {
    Title,
    Company,
    ApplicationDate,
    DeadlineDate,
    Status,
    Notes,
}

impl JobField {
    pub fn as_str(self) -> &'static str {
        match self {
            JobField::Title => "title",
            JobField::Company => "company",
            JobField::ApplicationDate => "application_date",
            JobField::DeadlineDate => "deadline_date",
            JobField::Status => "status",
            JobField::Notes => "notes",
        }
    }
}

impl FromStr for JobField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(JobField::Title),
            "company" => Ok(JobField::Company),
            "application_date" => Ok(JobField::ApplicationDate),
            "deadline_date" => Ok(JobField::DeadlineDate),
            "status" => Ok(JobField::Status),
            "notes" => Ok(JobField::Notes),
            other => Err(format!("Unknown job field '{other}'")),
        }
    }
}
