use crate::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Parse a HAR `startedDateTime` into an offset-aware timestamp.
///
/// Accepts RFC 3339 (`2015-01-01T12:00:00.000+01:00`, `...Z`) and the
/// colon-less offset form some exporters write (`...+0100`). A timestamp
/// without any offset is rejected: comparing it against aware timestamps
/// would silently shift deltas by the local offset.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed);
    }

    if let Ok(parsed) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(parsed);
    }

    let reason = if NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok() {
        "missing UTC offset".to_string()
    } else {
        "not an ISO-8601 date-time".to_string()
    };

    Err(Error::Timestamp {
        value: value.to_string(),
        reason,
    })
}
