//! Closed datetime interval used by searches, opportunities, and orders.
//!
//! # Wire format
//!
//! Serializes as a two-element array of RFC 3339 strings, `["start", "end"]`. The
//! ISO 8601 interval string form `"start/end"` is also accepted on input.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};

/// Errors from building a [`DatetimeInterval`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatetimeIntervalError {
    #[error("interval start {start} is after end {end}")]
    StartAfterEnd { start: String, end: String },
    #[error("invalid RFC 3339 datetime `{value}`")]
    InvalidDatetime { value: String },
    #[error("interval string must have the form `start/end`")]
    MalformedInterval,
}

/// A datetime interval with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatetimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DatetimeInterval {
    /// # Errors
    ///
    /// Returns `DatetimeIntervalError::StartAfterEnd` if `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DatetimeIntervalError> {
        if start > end {
            return Err(DatetimeIntervalError::StartAfterEnd {
                start: format_instant(start),
                end: format_instant(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses two RFC 3339 strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either string is not RFC 3339 or the bounds are reversed.
    pub fn parse(start: &str, end: &str) -> Result<Self, DatetimeIntervalError> {
        Self::new(parse_instant(start)?, parse_instant(end)?)
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, DatetimeIntervalError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DatetimeIntervalError::InvalidDatetime {
            value: value.to_string(),
        })
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl fmt::Display for DatetimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", format_instant(self.start), format_instant(self.end))
    }
}

impl Serialize for DatetimeInterval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&format_instant(self.start))?;
        tuple.serialize_element(&format_instant(self.end))?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for DatetimeInterval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Pair(String, String),
            Interval(String),
        }

        let interval = match Wire::deserialize(deserializer)? {
            Wire::Pair(start, end) => Self::parse(&start, &end),
            Wire::Interval(text) => match text.split_once('/') {
                Some((start, end)) => Self::parse(start, end),
                None => Err(DatetimeIntervalError::MalformedInterval),
            },
        };
        interval.map_err(de::Error::custom)
    }
}
