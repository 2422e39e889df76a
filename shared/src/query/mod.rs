//! Reads against the sensor store.
//!
//! - [`latest_reading`]: the most recent value of one series
//! - [`series_window`]: every value of several series over a trailing window,
//!   renderable as a status board graph with [`graph_document`]

mod latest;
mod window;

pub use latest::latest_reading;
pub use window::{graph_document, series_window, SeriesWindow, WindowQuery};

use crate::storage::StoreError;
use thiserror::Error;

/// Errors that can occur while reading from the store.
#[derive(Debug, Error)]
pub enum ReadingError {
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A window read named no series.
    #[error("At least one series is required")]
    NoSeries,

    /// A window read asked for an unusable window.
    #[error("Invalid window: {0}")]
    InvalidWindow(String),
}
