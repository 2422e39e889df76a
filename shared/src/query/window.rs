//! Windowed reads for status board graphs.

use super::ReadingError;
use crate::models::{DataSequence, GraphDocument, Sample, SensorName};
use crate::storage::{ConsolidationFunction, ExportRequest, SensorStore};

/// A windowed read over one or more series, ending at the store's last update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowQuery {
    /// Series to read, in column order.
    pub series: Vec<SensorName>,
    /// Length of the window, in seconds.
    pub window_secs: u64,
    /// Seconds between rows, or the store's native step if `None`.
    pub step_secs: Option<u64>,
    /// Consolidation applied to every series.
    pub function: ConsolidationFunction,
}

impl WindowQuery {
    /// Creates a query averaging the given series over the last `window_secs`.
    #[must_use]
    pub fn new(series: Vec<SensorName>, window_secs: u64) -> Self {
        Self {
            series,
            window_secs,
            step_secs: None,
            function: ConsolidationFunction::Average,
        }
    }

    /// Sets the row step.
    #[must_use]
    pub fn with_step(mut self, step_secs: u64) -> Self {
        self.step_secs = Some(step_secs);
        self
    }

    /// Sets the consolidation function.
    #[must_use]
    pub fn with_function(mut self, function: ConsolidationFunction) -> Self {
        self.function = function;
        self
    }
}

/// Samples of one series over a window.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesWindow {
    /// Series title, taken from the export legend.
    pub title: String,
    /// Samples, oldest first; unknown values are kept as `None`.
    pub samples: Vec<Sample>,
}

/// Reads every requested series over the window ending at the store's last update.
///
/// # Errors
///
/// Returns an error if:
/// - No series or a zero-length window is requested
/// - The store is unavailable, a series does not exist, or the answer is malformed
pub async fn series_window(
    store: &dyn SensorStore,
    query: &WindowQuery,
) -> Result<Vec<SeriesWindow>, ReadingError> {
    if query.series.is_empty() {
        return Err(ReadingError::NoSeries);
    }
    if query.window_secs == 0 {
        return Err(ReadingError::InvalidWindow(
            "window must be at least one second".to_string(),
        ));
    }

    let end = store.last_update().await?;
    let start = end.saturating_sub_secs(query.window_secs);

    let mut request = query
        .series
        .iter()
        .fold(ExportRequest::new(start, end), |request, name| {
            request.with_series(name.clone(), query.function)
        });
    if let Some(step) = query.step_secs {
        request = request.with_step(step);
    }

    let export = store.export(&request).await?;
    tracing::debug!(%start, %end, rows = export.rows.len(), "Read series window");

    Ok(query
        .series
        .iter()
        .enumerate()
        .map(|(index, name)| SeriesWindow {
            title: export
                .meta
                .legend
                .get(index)
                .filter(|title| !title.is_empty())
                .cloned()
                .unwrap_or_else(|| name.to_string()),
            samples: export.column(index),
        })
        .collect())
}

/// Renders series windows as a line graph.
#[must_use]
pub fn graph_document(title: &str, refresh_secs: u64, windows: &[SeriesWindow]) -> GraphDocument {
    let sequences = windows
        .iter()
        .map(|window| DataSequence::from_samples(window.title.clone(), refresh_secs, &window.samples))
        .collect();
    GraphDocument::line(title, sequences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timestamp;
    use crate::storage::{InMemorySensorStore, StoreError};

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    fn store() -> InMemorySensorStore {
        let store = InMemorySensorStore::with_series(["sensor1", "sensor2"]);
        for t in 1..=9 {
            #[allow(clippy::cast_precision_loss)]
            let v = t as f64;
            store.record("sensor1", ts(t), v).unwrap();
            if t % 3 == 0 {
                store.record("sensor2", ts(t), v * 10.0).unwrap();
            }
        }
        store
    }

    #[tokio::test]
    async fn test_series_window_reads_all_series() {
        let query = WindowQuery::new(
            vec![SensorName::new("sensor1"), SensorName::new("sensor2")],
            6,
        )
        .with_step(3);

        let windows = series_window(&store(), &query).await.unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].title, "sensor1");
        assert_eq!(windows[1].title, "sensor2");

        let times: Vec<i64> = windows[0].samples.iter().map(|s| s.timestamp.as_secs()).collect();
        assert_eq!(times, vec![3, 6, 9]);
        assert_eq!(windows[0].samples[1].value, Some(5.0));
        assert_eq!(windows[1].samples[2].value, Some(90.0));
    }

    #[tokio::test]
    async fn test_series_window_with_max() {
        let query = WindowQuery::new(vec![SensorName::new("sensor1")], 3)
            .with_step(3)
            .with_function(ConsolidationFunction::Max);

        let windows = series_window(&store(), &query).await.unwrap();
        assert_eq!(windows[0].samples.last().unwrap().value, Some(9.0));
    }

    #[tokio::test]
    async fn test_series_window_rejects_empty_series() {
        let query = WindowQuery::new(Vec::new(), 60);
        let err = series_window(&store(), &query).await.unwrap_err();
        assert!(matches!(err, ReadingError::NoSeries));
    }

    #[tokio::test]
    async fn test_series_window_rejects_zero_window() {
        let query = WindowQuery::new(vec![SensorName::default()], 0);
        let err = series_window(&store(), &query).await.unwrap_err();
        assert!(matches!(err, ReadingError::InvalidWindow(_)));
    }

    #[tokio::test]
    async fn test_series_window_unknown_series() {
        let query = WindowQuery::new(vec![SensorName::new("sensor7")], 60);
        let err = series_window(&store(), &query).await.unwrap_err();
        assert!(matches!(
            err,
            ReadingError::Store(StoreError::SeriesNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_graph_document_skips_unknown_samples() {
        let query = WindowQuery::new(
            vec![SensorName::new("sensor1"), SensorName::new("sensor2")],
            8,
        );
        let windows = series_window(&store(), &query).await.unwrap();
        let doc = graph_document("Clarice", 15, &windows);

        assert_eq!(doc.graph.title, "Clarice");
        assert_eq!(doc.graph.datasequences.len(), 2);
        // sensor1 has a sample every second, sensor2 only every third
        assert_eq!(doc.graph.datasequences[0].datapoints.len(), 9);
        assert_eq!(doc.graph.datasequences[1].datapoints.len(), 3);
        assert_eq!(doc.graph.datasequences[1].refresh_every_n_seconds, "15");
    }
}
