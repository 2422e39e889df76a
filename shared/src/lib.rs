//! Clarice Shared Library
//!
//! This crate contains the types, store clients, and reads shared by the
//! Clarice API server and CLI.
//!
//! # Modules
//!
//! - [`models`] - Sensor names, samples, and the JSON documents served to dashboards
//! - [`storage`] - The sensor store trait with rrdtool and in-memory implementations
//! - [`xport`] - Parser for rrdtool's XML export format
//! - [`query`] - Latest-value and windowed reads
//! - [`config`] - Store, reading, and graph configuration
//!
//! # Example
//!
//! ```
//! use shared::models::{ReadingDocument, SensorName, Timestamp};
//! use shared::query::latest_reading;
//! use shared::storage::InMemorySensorStore;
//!
//! # tokio_test::block_on(async {
//! let store = InMemorySensorStore::with_series(["sensor1"]);
//! store.record("sensor1", Timestamp::from_secs(1_699_999_997), 21.5).unwrap();
//! store.record("sensor1", Timestamp::from_secs(1_700_000_000), 21.7).unwrap();
//!
//! let reading = latest_reading(&store, &SensorName::default(), 3).await.unwrap();
//! let json = serde_json::to_string(&ReadingDocument::from(reading)).unwrap();
//! assert_eq!(json, r#"{"data":{"name":"sensor1","t":"1699999997","value":"21.5"}}"#);
//! # });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod models;
pub mod query;
pub mod storage;
pub mod xport;

/// Re-export common dependencies for convenience.
pub use serde;
pub use serde_json;
pub use validator;
