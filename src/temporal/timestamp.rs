//! Timestamp parsing for outage timeframes and query windows.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{DataError, DataResult};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an RFC 3339 timestamp and normalizes it to UTC.
///
/// Any explicit offset is accepted (`Z`, `+00:00`, `-05:00`, ...). Input
/// without an offset is rejected with [`DataError::NaiveTimestamp`]; it is
/// never assumed to be UTC.
///
/// # Examples
///
/// ```
/// use nerc_rates::temporal::parse_timestamp;
///
/// let instant = parse_timestamp("2024-05-22T08:00:00Z").unwrap();
/// assert_eq!(instant.to_rfc3339(), "2024-05-22T08:00:00+00:00");
///
/// assert!(parse_timestamp("2024-01-01T12:00:00").is_err());
/// ```
pub fn parse_timestamp(value: &str) -> DataResult<DateTime<Utc>> {
    let trimmed = value.trim();

    let parsed = DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%:z"));

    match parsed {
        Ok(instant) => Ok(instant.with_timezone(&Utc)),
        Err(err) if is_naive(trimmed) => {
            tracing::debug!(value = %trimmed, error = %err, "rejected naive timestamp");
            Err(DataError::NaiveTimestamp {
                value: value.to_string(),
            })
        }
        Err(err) => Err(DataError::InvalidTimestamp {
            value: value.to_string(),
            message: err.to_string(),
        }),
    }
}

/// Parses one bound of a query window.
///
/// A plain date (`2024-05-01`) means midnight UTC on that day. Anything
/// else must be a full timestamp accepted by [`parse_timestamp`].
pub fn parse_query_bound(value: &str) -> DataResult<DateTime<Utc>> {
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        Ok(date) => Ok(date.and_time(chrono::NaiveTime::MIN).and_utc()),
        Err(_) => parse_timestamp(value),
    }
}

fn is_naive(value: &str) -> bool {
    NAIVE_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
