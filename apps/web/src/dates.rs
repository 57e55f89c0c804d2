//! Date display helpers. Every comparison uses the local wall-clock date;
//! there is no timezone normalization beyond that.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};

/// The local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `Jan 5, 2025`, used in tables and deadline lists.
pub fn format_short(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `January 5, 2025`, used on the job-detail page.
pub fn format_long(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// `Jan 2025`: month bucket labels and "member since".
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Formats an optional date, yielding an empty cell when absent.
pub fn format_short_opt(date: Option<NaiveDate>) -> String {
    date.map(format_short).unwrap_or_default()
}

pub fn member_since(created_at: Option<NaiveDateTime>) -> String {
    created_at
        .map(|at| month_label(at.date()))
        .unwrap_or_default()
}

/// A deadline is past once its day is over. No deadline is never past.
pub fn is_past(deadline: Option<NaiveDate>, today: NaiveDate) -> bool {
    deadline.is_some_and(|d| d < today)
}

/// Whole days from `today` until `deadline`; negative once it has passed.
pub fn days_remaining(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

/// First day of the month `months_back` months before `date`'s month.
pub fn month_start_before(date: NaiveDate, months_back: u32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 - months_back as i32;
    let (year, month0) = (index.div_euclid(12), index.rem_euclid(12) as u32);
    // month0 is always 0..12 and day 1 always exists
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(date)
}
