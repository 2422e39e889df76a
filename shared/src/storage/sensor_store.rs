//! Sensor store trait and request types.
//!
//! Provides the `SensorStore` trait for abstracting reads from a round-robin
//! time-series database, plus the export request the trait accepts.

use crate::models::{SensorName, Timestamp};
use crate::xport::{Export, XportError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during sensor store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to acquire lock on the store.
    #[error("Failed to acquire lock on sensor store")]
    LockError,

    /// The store could not be reached or failed to answer.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer in time.
    #[error("Store did not answer within {0:?}")]
    Timeout(Duration),

    /// The requested series does not exist in the store.
    #[error("Unknown series: '{0}'")]
    SeriesNotFound(String),

    /// The store answered with something that could not be parsed.
    #[error("Malformed store response: {0}")]
    Malformed(String),

    /// The store refused the request (bad range, out-of-order update).
    #[error("Store rejected the request: {0}")]
    Rejected(String),
}

impl From<XportError> for StoreError {
    fn from(err: XportError) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Consolidation function applied when several samples fall in one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsolidationFunction {
    /// Mean of the samples.
    #[default]
    Average,
    /// Smallest sample.
    Min,
    /// Largest sample.
    Max,
    /// Most recent sample.
    Last,
}

impl ConsolidationFunction {
    /// Applies the function to samples ordered oldest first.
    ///
    /// Returns `None` when there are no samples.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn apply(self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(match self {
            Self::Average => values.iter().sum::<f64>() / values.len() as f64,
            Self::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Last => values[values.len() - 1],
        })
    }
}

impl fmt::Display for ConsolidationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Average => write!(f, "AVERAGE"),
            Self::Min => write!(f, "MIN"),
            Self::Max => write!(f, "MAX"),
            Self::Last => write!(f, "LAST"),
        }
    }
}

/// Error returned for an unrecognised consolidation function name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown consolidation function: '{0}'. Expected 'average', 'min', 'max', or 'last'")]
pub struct UnknownConsolidation(pub String);

impl FromStr for ConsolidationFunction {
    type Err = UnknownConsolidation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "average" | "avg" => Ok(Self::Average),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "last" => Ok(Self::Last),
            _ => Err(UnknownConsolidation(s.to_string())),
        }
    }
}

/// One exported column: a series and how to consolidate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSpec {
    /// The series to read.
    pub name: SensorName,
    /// The consolidation function.
    pub function: ConsolidationFunction,
}

/// A windowed export request.
///
/// `start` and `end` are inclusive; a request with `start == end` asks for
/// the single row covering that instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// First instant of the window.
    pub start: Timestamp,
    /// Last instant of the window.
    pub end: Timestamp,
    /// Seconds between rows, or the store's native resolution if `None`.
    pub step: Option<u64>,
    /// Columns to export, in order.
    pub series: Vec<SeriesSpec>,
}

impl ExportRequest {
    /// Creates a request for the given window with no columns.
    #[must_use]
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self {
            start,
            end,
            step: None,
            series: Vec::new(),
        }
    }

    /// Creates a zero-width request for one series at one instant.
    #[must_use]
    pub fn instant(at: Timestamp, name: SensorName, function: ConsolidationFunction) -> Self {
        Self::new(at, at).with_series(name, function)
    }

    /// Adds a column.
    #[must_use]
    pub fn with_series(mut self, name: SensorName, function: ConsolidationFunction) -> Self {
        self.series.push(SeriesSpec { name, function });
        self
    }

    /// Sets the row step.
    #[must_use]
    pub fn with_step(mut self, step: u64) -> Self {
        self.step = Some(step);
        self
    }
}

/// Trait for round-robin sensor store implementations.
///
/// This trait defines the two reads the service needs. Implementations must
/// be thread-safe (Send + Sync).
#[async_trait]
pub trait SensorStore: Send + Sync {
    /// Returns the timestamp of the most recent update to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn last_update(&self) -> Result<Timestamp, StoreError>;

    /// Exports consolidated rows for the requested series and window.
    ///
    /// # Errors
    ///
    /// Returns an error if a series does not exist, the store cannot be read,
    /// or its answer cannot be parsed.
    async fn export(&self, request: &ExportRequest) -> Result<Export, StoreError>;
}
