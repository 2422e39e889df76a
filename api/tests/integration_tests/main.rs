//! Integration tests for the Clarice API.
//!
//! These tests drive the full router over an in-memory sensor store and check
//! the JSON documents and status codes a dashboard would see.

mod common;
mod graph_tests;
mod health_tests;
mod update_tests;
