//! Configuration module for Clarice.
//!
//! This module contains configuration structures for the store client,
//! latest-value reads, and status board graphs.

pub mod reading;
pub mod store;

pub use reading::{GraphConfig, ReadingConfig, DEFAULT_SAMPLE_OFFSET_SECS};
pub use store::{StoreConfig, DEFAULT_RRDTOOL_BIN, DEFAULT_RRD_PATH, DEFAULT_STORE_TIMEOUT_MS};
