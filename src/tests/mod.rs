//! Crate-internal test suites.

mod common;
mod property;
mod unit;
