//! Time related utils.

use chrono::Utc;

/// DateTime used by the signers, always in UTC.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Seconds since the unix epoch, the form MAC signatures carry their timestamp in.
pub fn timestamp(t: DateTime) -> i64 {
    t.timestamp()
}

/// Build a datetime from seconds since the unix epoch.
///
/// Returns `None` if the value is out of range.
pub fn from_timestamp(secs: i64) -> Option<DateTime> {
    DateTime::from_timestamp(secs, 0)
}
