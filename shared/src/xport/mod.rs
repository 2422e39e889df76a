//! rrdtool export documents.
//!
//! `rrdtool xport` prints the consolidated rows of one or more series as XML.
//! This module parses that output into typed rows.

mod document;
mod parser;

pub use document::{Export, ExportMeta, ExportRow};
pub use parser::{parse_xport, XportError};
