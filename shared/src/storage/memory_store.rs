//! In-memory round-robin sensor store.
//!
//! Mirrors the behavior of an RRD file closely enough for development and
//! testing: a fixed set of series, a fixed native step, a bounded number of
//! retained samples per series, and monotonic updates.

use super::sensor_store::{ExportRequest, SensorStore, StoreError};
use crate::models::{SensorName, Timestamp};
use crate::xport::{Export, ExportMeta, ExportRow};
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, RwLock};

/// Upper bound on rows a single export may produce.
const MAX_EXPORT_ROWS: usize = 10_000;

#[derive(Debug, Default)]
struct StoreState {
    last_update: Option<Timestamp>,
    series: BTreeMap<SensorName, VecDeque<(Timestamp, f64)>>,
}

/// In-memory sensor store implementation.
///
/// # Example
///
/// ```
/// use shared::models::Timestamp;
/// use shared::storage::InMemorySensorStore;
///
/// let store = InMemorySensorStore::with_series(["sensor1", "sensor2"]);
/// store.record("sensor1", Timestamp::from_secs(1_699_999_997), 21.5).unwrap();
/// assert_eq!(store.sample_count("sensor1").unwrap(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct InMemorySensorStore {
    step: u64,
    capacity: usize,
    state: Arc<RwLock<StoreState>>,
}

impl InMemorySensorStore {
    /// Default native step, in seconds.
    pub const DEFAULT_STEP: u64 = 1;

    /// Default number of samples retained per series.
    pub const DEFAULT_CAPACITY: usize = 3600;

    /// Creates an empty store with the given native step (seconds) and
    /// per-series capacity.
    #[must_use]
    pub fn new(step: u64, capacity: usize) -> Self {
        Self {
            step: step.max(1),
            capacity: capacity.max(1),
            state: Arc::new(RwLock::new(StoreState::default())),
        }
    }

    /// Creates a store with default step and capacity holding the given series.
    #[must_use]
    pub fn with_series<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SensorName>,
    {
        let store = Self::default();
        if let Ok(mut state) = store.state.write() {
            for name in names {
                state.series.entry(name.into()).or_default();
            }
        }
        store
    }

    /// Adds a series. Adding an existing series is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired.
    pub fn define_series(&self, name: impl Into<SensorName>) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::LockError)?;
        state.series.entry(name.into()).or_default();
        Ok(())
    }

    /// Records a sample for one series.
    ///
    /// Once `capacity` samples are held, the oldest one is overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The series was never defined
    /// - `t` is not later than the series' previous sample
    /// - The lock cannot be acquired
    pub fn record(&self, name: &str, t: Timestamp, value: f64) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::LockError)?;

        let samples = state
            .series
            .get_mut(&SensorName::new(name))
            .ok_or_else(|| StoreError::SeriesNotFound(name.to_string()))?;

        if let Some((previous, _)) = samples.back() {
            if t <= *previous {
                return Err(StoreError::Rejected(format!(
                    "update for '{name}' at {t} is not after last update at {previous}"
                )));
            }
        }

        if samples.len() == self.capacity {
            samples.pop_front();
        }
        samples.push_back((t, value));

        state.last_update = Some(state.last_update.map_or(t, |last| last.max(t)));
        Ok(())
    }

    /// Returns how many samples are retained for a series.
    ///
    /// # Errors
    ///
    /// Returns an error if the series does not exist or the lock cannot be acquired.
    pub fn sample_count(&self, name: &str) -> Result<usize, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::LockError)?;
        state
            .series
            .get(&SensorName::new(name))
            .map(VecDeque::len)
            .ok_or_else(|| StoreError::SeriesNotFound(name.to_string()))
    }

    /// Row step for a request: the native step, or the requested one rounded
    /// up to a multiple of it.
    fn effective_step(&self, requested: Option<u64>) -> u64 {
        match requested {
            Some(step) if step > self.step => step.div_ceil(self.step).saturating_mul(self.step),
            _ => self.step,
        }
    }
}

/// End of the `step`-aligned bucket `(end - step, end]` holding `t`.
fn bucket_end(t: i64, step: i64) -> Option<i64> {
    let floor = t.div_euclid(step).checked_mul(step)?;
    if floor == t {
        Some(floor)
    } else {
        floor.checked_add(step)
    }
}

impl Default for InMemorySensorStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP, Self::DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl SensorStore for InMemorySensorStore {
    async fn last_update(&self) -> Result<Timestamp, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::LockError)?;
        state
            .last_update
            .ok_or_else(|| StoreError::Unavailable("store holds no samples".to_string()))
    }

    async fn export(&self, request: &ExportRequest) -> Result<Export, StoreError> {
        if request.start > request.end {
            return Err(StoreError::Rejected(format!(
                "start {} is after end {}",
                request.start, request.end
            )));
        }

        let step = self.effective_step(request.step);
        let step_secs = i64::try_from(step)
            .map_err(|_| StoreError::Rejected(format!("step {step} is too large")))?;

        let too_large = || {
            StoreError::Rejected(format!(
                "export from {} to {} exceeds the limit of {MAX_EXPORT_ROWS} rows",
                request.start, request.end
            ))
        };

        let first = bucket_end(request.start.as_secs(), step_secs).ok_or_else(too_large)?;
        let last = bucket_end(request.end.as_secs(), step_secs).ok_or_else(too_large)?;
        let row_count = last
            .checked_sub(first)
            .and_then(|span| usize::try_from(span / step_secs).ok())
            .and_then(|rows| rows.checked_add(1))
            .filter(|rows| *rows <= MAX_EXPORT_ROWS)
            .ok_or_else(too_large)?;

        let state = self.state.read().map_err(|_| StoreError::LockError)?;

        let columns = request
            .series
            .iter()
            .map(|spec| {
                state
                    .series
                    .get(&spec.name)
                    .map(|samples| (spec, samples))
                    .ok_or_else(|| StoreError::SeriesNotFound(spec.name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rows: Vec<ExportRow> = (0..row_count)
            .map(|i| {
                #[allow(clippy::cast_possible_wrap)]
                let t = first + step_secs * i as i64;
                let values = columns
                    .iter()
                    .map(|(spec, samples)| {
                        let bucket: Vec<f64> = samples
                            .iter()
                            .filter(|(ts, v)| {
                                ts.as_secs() > t.saturating_sub(step_secs)
                                    && ts.as_secs() <= t
                                    && !v.is_nan()
                            })
                            .map(|(_, v)| *v)
                            .collect();
                        spec.function.apply(&bucket)
                    })
                    .collect();
                ExportRow {
                    t: Timestamp::from_secs(t),
                    values,
                }
            })
            .collect();

        tracing::debug!(
            start = %request.start,
            end = %request.end,
            step,
            rows = rows.len(),
            "In-memory export"
        );

        Ok(Export {
            meta: ExportMeta {
                start: Timestamp::from_secs(first),
                step,
                end: Timestamp::from_secs(last),
                rows: rows.len(),
                columns: columns.len(),
                legend: request.series.iter().map(|s| s.name.to_string()).collect(),
            },
            rows,
        })
    }
}
