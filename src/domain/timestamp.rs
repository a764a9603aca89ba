//! Timestamp codec
//!
//! Timestamps are stored as `YYYY-MM-DDTHH:MM:SS.sssZ`: UTC, millisecond
//! precision, literal `Z`. Anything else is rejected.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use thiserror::Error;

/// chrono format string for the stored representation
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("bad timestamp '{0}' (expected YYYY-MM-DDTHH:MM:SS.sssZ)")]
    Malformed(String),
}

/// Renders an instant in the stored format
pub fn format(instant: &DateTime<Utc>) -> String {
    instant.format(FORMAT).to_string()
}

/// Parses the stored format
///
/// chrono's `%.3f` is lenient when parsing (any digit count, or none), so
/// the result is re-rendered and compared against the input.
pub fn parse(s: &str) -> Result<DateTime<Utc>, TimestampError> {
    let naive = NaiveDateTime::parse_from_str(s, FORMAT)
        .map_err(|_| TimestampError::Malformed(s.to_string()))?;
    let instant = naive.and_utc();

    if format(&instant) != s {
        return Err(TimestampError::Malformed(s.to_string()));
    }

    Ok(instant)
}

/// Drops sub-millisecond precision so an instant survives a format/parse cycle
pub fn truncate(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(3)
}

/// serde adapter for `#[serde(with = "timestamp::millis")]`
pub mod millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format(instant))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw).map_err(serde::de::Error::custom)
    }
}
