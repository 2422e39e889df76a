//! Reading document model.
//!
//! The JSON shape returned for a "latest value" request:
//! `{"data":{"name":"sensor1","t":"1699999997","value":"21.5"}}`.

use super::sensor::{Sample, SensorName, Timestamp};
use serde::{Deserialize, Serialize};

/// The latest reading of one series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// The series that was read.
    pub name: SensorName,
    /// When the reading was recorded.
    pub t: Timestamp,
    /// The reading, or `None` (serialized as `null`) when the store has no
    /// known value at that instant.
    pub value: Option<String>,
}

impl Reading {
    /// Builds a reading from a sample of the named series.
    #[must_use]
    pub fn from_sample(name: SensorName, sample: &Sample) -> Self {
        Self {
            name,
            t: sample.timestamp,
            value: sample.value_string(),
        }
    }

    /// Builds a reading with no value at the given instant.
    #[must_use]
    pub fn empty(name: SensorName, t: Timestamp) -> Self {
        Self { name, t, value: None }
    }
}

/// Response envelope wrapping a [`Reading`] under `data`.
///
/// # Example
///
/// ```
/// use shared::models::{Reading, ReadingDocument, Sample, SensorName, Timestamp};
///
/// let sample = Sample::new(Timestamp::from_secs(1_699_999_997), Some(21.5));
/// let doc = ReadingDocument::from(Reading::from_sample(SensorName::default(), &sample));
///
/// assert_eq!(
///     serde_json::to_string(&doc).unwrap(),
///     r#"{"data":{"name":"sensor1","t":"1699999997","value":"21.5"}}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingDocument {
    /// The reading.
    pub data: Reading,
}

impl From<Reading> for ReadingDocument {
    fn from(data: Reading) -> Self {
        Self { data }
    }
}
