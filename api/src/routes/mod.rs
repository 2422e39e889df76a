//! API route definitions.
//!
//! This module organizes all HTTP routes for the Clarice API server.

mod error;
mod graph;
mod health;
mod update;

pub use graph::graph_routes;
pub use health::health_routes;
pub use update::update_routes;
