//! Data models for the Clarice sensor service.
//!
//! This module contains sensor identifiers, samples, and the JSON documents
//! served to dashboards.

pub mod graph;
pub mod reading;
pub mod sensor;

pub use graph::{DataPoint, DataSequence, Graph, GraphDocument, GraphType};
pub use reading::{Reading, ReadingDocument};
pub use sensor::{format_value, Sample, SensorName, Timestamp, TimestampParseError};
