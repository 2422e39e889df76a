//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use crate::config::Config;
use shared::config::{GraphConfig, ReadingConfig};
use shared::storage::{InMemorySensorStore, RrdtoolStore, SensorStore};
use std::sync::Arc;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The sensor store backend.
    store: Arc<dyn SensorStore>,
    /// Latest-value read settings.
    reading: ReadingConfig,
    /// Status board defaults.
    graph: GraphConfig,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(store: Arc<dyn SensorStore>, reading: ReadingConfig, graph: GraphConfig) -> Self {
        Self {
            store,
            reading,
            graph,
        }
    }

    /// Creates application state over the given store with default settings.
    pub fn with_store(store: Arc<dyn SensorStore>) -> Self {
        Self::new(store, ReadingConfig::default(), GraphConfig::default())
    }

    /// Creates application state reading the configured RRD file through `rrdtool`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(RrdtoolStore::from_config(&config.store)),
            config.reading.clone(),
            GraphConfig::default(),
        )
    }

    /// Creates a new application state with an empty in-memory store
    /// holding `sensor1` and `sensor2`.
    ///
    /// This is useful for development and testing.
    #[must_use]
    pub fn with_in_memory_store() -> Self {
        Self::with_store(Arc::new(InMemorySensorStore::with_series([
            "sensor1", "sensor2",
        ])))
    }

    /// Returns a reference to the sensor store.
    #[must_use]
    pub fn store(&self) -> &dyn SensorStore {
        self.store.as_ref()
    }

    /// Returns the latest-value read settings.
    #[must_use]
    pub fn reading_config(&self) -> &ReadingConfig {
        &self.reading
    }

    /// Returns the status board defaults.
    #[must_use]
    pub fn graph_config(&self) -> &GraphConfig {
        &self.graph
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory_store()
    }
}
