//! Property-based tests for briefing resolution
//!
//! ## Test Modules
//!
//! - `csv_props`: CSV reader
//!   - Encoding then parsing restores every field
//!   - Short rows are padded, long rows truncated to the header
//!   - Blank lines never produce records
//!
//! - `ordering_props`: Visibility & ordering engine
//!   - Primary documents always precede normal ones
//!   - Dates descend within a priority level
//!   - Grouping keeps the sorted order inside each kind
//!   - Everyone sees only documents addressed to everyone
//!
//! By default, proptest runs 256 cases per property. Override with
//! `PROPTEST_CASES`.

mod csv_props;
mod ordering_props;
