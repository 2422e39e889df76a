//! Sensor data model.
//!
//! Defines the identifiers and sample values read back from the round-robin store.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name of a series (an RRD data source) in the store.
///
/// Any string is accepted here; the store decides whether the series exists.
///
/// # Example
///
/// ```
/// use shared::models::SensorName;
///
/// assert_eq!(SensorName::from_param(None).as_str(), "sensor1");
/// assert_eq!(SensorName::from_param(Some("")).as_str(), "sensor1");
/// assert_eq!(SensorName::from_param(Some("sensor2")).as_str(), "sensor2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorName(String);

impl SensorName {
    /// Series read when a request does not name one.
    pub const DEFAULT: &'static str = "sensor1";

    /// Creates a sensor name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Resolves an optional request parameter, falling back to [`Self::DEFAULT`]
    /// when it is absent or empty.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some(name) if !name.is_empty() => Self::new(name),
            _ => Self::default(),
        }
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the name is usable as an RRD data source name
    /// (1 to 19 characters of `[A-Za-z0-9_]`).
    #[must_use]
    pub fn is_valid_data_source(&self) -> bool {
        (1..=19).contains(&self.0.len())
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_')
    }
}

impl Default for SensorName {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for SensorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SensorName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for SensorName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Error returned when a timestamp token cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid timestamp: '{0}'")]
pub struct TimestampParseError(pub String);

/// Seconds since the Unix epoch, as reported by the store.
///
/// Serializes as a decimal string (`"1699999997"`), which is how the
/// reading document carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from epoch seconds.
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// Returns the epoch seconds.
    #[must_use]
    pub const fn as_secs(self) -> i64 {
        self.0
    }

    /// Returns this timestamp moved back by `secs` seconds.
    #[must_use]
    pub fn saturating_sub_secs(self, secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        Self(self.0.saturating_sub(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    /// Parses a timestamp token, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| TimestampParseError(s.trim().to_string()))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single data point for one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// When the point was recorded (bucket end for consolidated data).
    pub timestamp: Timestamp,
    /// The reading, or `None` when the store reports it as unknown.
    pub value: Option<f64>,
}

impl Sample {
    /// Creates a sample.
    #[must_use]
    pub fn new(timestamp: Timestamp, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }

    /// Renders the value the way the reading document carries it:
    /// the shortest decimal form of the number, or `None` if unknown or `NaN`.
    #[must_use]
    pub fn value_string(&self) -> Option<String> {
        self.value.filter(|v| !v.is_nan()).map(format_value)
    }
}

/// Formats a reading as the shortest decimal string that round-trips.
#[must_use]
pub fn format_value(value: f64) -> String {
    format!("{value}")
}
