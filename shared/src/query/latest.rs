//! Latest-value reads.

use super::ReadingError;
use crate::models::{Reading, SensorName};
use crate::storage::{ConsolidationFunction, ExportRequest, SensorStore};

/// Reads the most recent value of one series.
///
/// Asks the store for its last update, then exports the single averaged row
/// at `last_update - offset_secs`. The first row recorded no later than the
/// last update is used; if there is none, the reading carries the queried
/// instant and no value.
///
/// # Errors
///
/// Returns an error if the store is unavailable, the series does not exist,
/// or the store's answer is malformed.
///
/// # Example
///
/// ```
/// use shared::models::{SensorName, Timestamp};
/// use shared::query::latest_reading;
/// use shared::storage::InMemorySensorStore;
///
/// # tokio_test::block_on(async {
/// let store = InMemorySensorStore::with_series(["sensor1", "sensor2"]);
/// store.record("sensor1", Timestamp::from_secs(1_699_999_997), 21.5).unwrap();
/// store.record("sensor2", Timestamp::from_secs(1_700_000_000), 0.0).unwrap();
///
/// let reading = latest_reading(&store, &SensorName::default(), 3).await.unwrap();
/// assert_eq!(reading.t, Timestamp::from_secs(1_699_999_997));
/// assert_eq!(reading.value.as_deref(), Some("21.5"));
/// # });
/// ```
pub async fn latest_reading(
    store: &dyn SensorStore,
    name: &SensorName,
    offset_secs: u64,
) -> Result<Reading, ReadingError> {
    let latest = store.last_update().await?;
    let instant = latest.saturating_sub_secs(offset_secs);

    let request = ExportRequest::instant(instant, name.clone(), ConsolidationFunction::Average);
    let export = store.export(&request).await?;

    let reading = match export.first_sample(0, latest) {
        Some(sample) => Reading::from_sample(name.clone(), &sample),
        None => {
            tracing::debug!(%name, %instant, "Store returned no rows");
            Reading::empty(name.clone(), instant)
        }
    };

    tracing::debug!(%name, %latest, t = %reading.t, value = ?reading.value, "Read latest value");
    Ok(reading)
}
