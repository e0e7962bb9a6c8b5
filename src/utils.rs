//! Utility functions for the report clock, log truncation and HTTP responses.
//!
//! This module provides helpers used throughout the application:
//! - The report time zone (Asia/Taipei, a fixed UTC+8 offset with no DST)
//! - The rolling date window shared by the analytics query and both documents
//! - String truncation for logging upstream bodies
//! - Uniform handling of non-success HTTP responses

use crate::error::{ReportError, Result};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use tracing::instrument;

/// Offset of the report time zone from UTC, in seconds.
const REPORT_UTC_OFFSET_SECS: i32 = 8 * 3600;

/// Number of days before today covered by the analytics window.
pub const WINDOW_DAYS: i64 = 2;

/// The report time zone.
pub fn report_offset() -> FixedOffset {
    FixedOffset::east_opt(REPORT_UTC_OFFSET_SECS).unwrap()
}

/// Current time in the report time zone.
pub fn report_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&report_offset())
}

/// The date range and generation stamp of one run.
///
/// Built once per run so the analytics request and the published documents
/// agree on the same dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    /// `YYYY-MM-DD`, [`WINDOW_DAYS`] before `end_date`.
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    /// `YYYY-MM-DD HH:MM`
    pub generate_time: String,
}

impl DateWindow {
    /// Build the window ending on the local date of `now`.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let window = DateWindow::ending_at(report_now());
    /// assert_eq!(window.start_date.len(), 10);
    /// ```
    #[instrument(level = "debug")]
    pub fn ending_at(now: DateTime<FixedOffset>) -> Self {
        let start = now - Duration::days(WINDOW_DAYS);
        let window = Self {
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: now.format("%Y-%m-%d").to_string(),
            generate_time: now.format("%Y-%m-%d %H:%M").to_string(),
        };
        tracing::debug!(?window, "Computed report window");
        window
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (backing off to a char
/// boundary) with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Turn a non-success response into [`ReportError::Upstream`].
///
/// The body is read and truncated so the error stays loggable.
pub async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ReportError::Upstream {
        service,
        status: status.as_u16(),
        body: truncate_for_log(&body, 300),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        report_offset().with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_window_spans_two_days() {
        let window = DateWindow::ending_at(at(2026, 10, 14, 9, 5));
        assert_eq!(window.start_date, "2026-10-12");
        assert_eq!(window.end_date, "2026-10-14");
    }

    #[test]
    fn test_generate_time_uses_minutes() {
        // October is month 10; a minute of 05 must not turn into the month.
        let window = DateWindow::ending_at(at(2026, 10, 14, 9, 5));
        assert_eq!(window.generate_time, "2026-10-14 09:05");
    }

    #[test]
    fn test_window_crosses_month_boundary() {
        let window = DateWindow::ending_at(at(2026, 3, 1, 23, 59));
        assert_eq!(window.start_date, "2026-02-27");
        assert_eq!(window.end_date, "2026-03-01");
    }

    #[test]
    fn test_report_now_is_utc_plus_eight() {
        assert_eq!(report_now().offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        // Each CJK char is three bytes; cutting at 4 must back off to 3.
        let result = truncate_for_log("新聞熱門", 4);
        assert_eq!(result, "新…(+9 bytes)");
    }
}
