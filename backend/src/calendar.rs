//! Week-date math for the workout tracker.
//!
//! All weeks run Monday through Sunday. Both the explicit week view and the
//! prize key use ISO-8601 week numbering, so the week on screen and the week
//! being awarded always agree.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Canonical date format used for storage keys and the wire
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date string.
///
/// Only the canonical zero-padded form is accepted: stored records are keyed
/// by the formatted string, so `2025-5-4` must be rejected rather than create
/// a record the week view would never find.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(s, DATE_FORMAT).ok()?;
    if format_date(date) == s {
        Some(date)
    } else {
        None
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The 7 dates of the week containing `today`, Monday first.
pub fn current_week_dates(today: NaiveDate) -> Vec<String> {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    week_from(monday)
}

/// The 7 dates of ISO week `week` of ISO year `year`, or `None` when that
/// week does not exist (week 53 of a 52-week year, week 0, week 54).
pub fn explicit_week_dates(year: i32, week: u32) -> Option<Vec<String>> {
    let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
    Some(week_from(monday))
}

fn week_from(monday: NaiveDate) -> Vec<String> {
    (0..7)
        .map(|offset| format_date(monday + Duration::days(offset)))
        .collect()
}

/// ISO year-week key for `date`, e.g. `"2025-07"`.
///
/// Uses the ISO week-year, which differs from the calendar year around New
/// Year: 2024-12-30 belongs to ISO week 1 of 2025 and keys as `2025-01`.
pub fn iso_week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-{:02}", week.year(), week.week())
}
