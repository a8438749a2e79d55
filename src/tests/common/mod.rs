//! Common Test Utilities
//!
//! Shared sheet fixtures and row builders used across test modules.

pub mod fixtures;

pub use fixtures::*;
