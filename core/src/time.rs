//! Time related utils.

use crate::Error;
use crate::Result;

/// DateTime in UTC.
pub type DateTime = chrono::DateTime<chrono::Utc>;

/// Return the current time in UTC.
pub fn now() -> DateTime {
    chrono::Utc::now()
}

/// Format a date stamp: `20220313`.
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format a compact ISO 8601 timestamp: `20220313T072004Z`.
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Parse an RFC 3339 timestamp: `2022-03-13T07:20:04Z`.
pub fn parse_rfc3339(s: &str) -> Result<DateTime> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&chrono::Utc))
        .map_err(|e| Error::unexpected("failed to parse rfc3339 timestamp").with_source(e))
}
