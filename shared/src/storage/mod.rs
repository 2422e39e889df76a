//! Storage traits and implementations.
//!
//! This module provides abstractions for reading sensor series from a
//! round-robin time-series store. The `SensorStore` trait defines the
//! interface, allowing different implementations (rrdtool, in-memory).

pub mod memory_store;
pub mod rrdtool_store;
pub mod sensor_store;

pub use memory_store::InMemorySensorStore;
pub use rrdtool_store::RrdtoolStore;
pub use sensor_store::{
    ConsolidationFunction, ExportRequest, SensorStore, SeriesSpec, StoreError,
    UnknownConsolidation,
};
