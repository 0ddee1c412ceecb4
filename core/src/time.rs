//! Time related utils.

use crate::{Error, Result};

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<chrono::Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    chrono::Utc::now()
}

/// Add a number of seconds to the given time, saturating instead of overflowing.
pub fn after_secs(time: DateTime, secs: u64) -> DateTime {
    let secs = i64::try_from(secs).unwrap_or(i64::MAX);
    chrono::TimeDelta::try_seconds(secs)
        .and_then(|delta| time.checked_add_signed(delta))
        .unwrap_or(DateTime::MAX_UTC)
}

/// Parse an RFC3339 timestamp like `2024-01-02T15:04:05Z`.
pub fn parse_rfc3339(s: &str) -> Result<DateTime> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| Error::unexpected(format!("failed to parse rfc3339 time {s}")).with_source(e))
}
