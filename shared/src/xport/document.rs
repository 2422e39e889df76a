//! Typed form of an rrdtool export.

use crate::models::{Sample, Timestamp};

/// Header of an export: the resolved time range and column legend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportMeta {
    /// First row timestamp.
    pub start: Timestamp,
    /// Seconds between rows.
    pub step: u64,
    /// Last row timestamp.
    pub end: Timestamp,
    /// Number of rows the store reported.
    pub rows: usize,
    /// Number of value columns per row.
    pub columns: usize,
    /// Column titles, in column order.
    pub legend: Vec<String>,
}

/// One exported row: a timestamp and a value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    /// Row timestamp.
    pub t: Timestamp,
    /// One value per column; `None` where the store reported unknown.
    pub values: Vec<Option<f64>>,
}

/// A parsed export.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    /// Export header.
    pub meta: ExportMeta,
    /// Data rows, oldest first.
    pub rows: Vec<ExportRow>,
}

impl Export {
    /// Returns true if the export has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns every sample of one column, oldest first.
    ///
    /// Rows that lack the column yield an unknown value.
    #[must_use]
    pub fn column(&self, index: usize) -> Vec<Sample> {
        self.rows
            .iter()
            .map(|row| Sample::new(row.t, row.values.get(index).copied().flatten()))
            .collect()
    }

    /// Returns the first sample of a column recorded no later than `not_after`.
    #[must_use]
    pub fn first_sample(&self, index: usize, not_after: Timestamp) -> Option<Sample> {
        self.rows
            .iter()
            .find(|row| row.t <= not_after)
            .map(|row| Sample::new(row.t, row.values.get(index).copied().flatten()))
    }
}
