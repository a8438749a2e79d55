//! Property-based tests for the CSV reader
//!
//! Tests invariants:
//! - Encoding then parsing restores every field
//! - Short rows are padded, long rows truncated to the header
//! - Blank lines never produce records

use proptest::prelude::*;

use crate::core::briefing::csv::{encode_record, parse_records, split_fields};

// ============================================================================
// Strategies
// ============================================================================

/// Cell text: anything on one line, including quotes, commas and edge spaces.
fn arb_cell() -> impl Strategy<Value = String> {
    "[^\r\n]{0,24}"
}

/// Distinct, simple header names.
fn arb_headers() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z][a-z_]{0,8}", 1..6)
        .prop_map(|set| set.into_iter().collect())
}

// ============================================================================
// Round Trip
// ============================================================================

proptest! {
    #[test]
    fn prop_encoded_line_splits_back(fields in prop::collection::vec(arb_cell(), 1..8)) {
        prop_assert_eq!(split_fields(&encode_record(&fields)), fields);
    }

    #[test]
    fn prop_encoded_table_parses_back(
        (headers, rows) in arb_headers().prop_flat_map(|headers| {
            let width = headers.len();
            (
                Just(headers),
                prop::collection::vec(prop::collection::vec(arb_cell(), width), 0..6),
            )
        })
    ) {
        let mut text = encode_record(&headers);
        for row in &rows {
            text.push('\n');
            text.push_str(&encode_record(row));
        }

        let records = parse_records(&text);
        prop_assert_eq!(records.len(), rows.len());
        for (record, row) in records.iter().zip(&rows) {
            let values: Vec<&String> = record.values().collect();
            let expected: Vec<&String> = row.iter().collect();
            prop_assert_eq!(values, expected);
            let keys: Vec<&String> = record.keys().collect();
            let header_refs: Vec<&String> = headers.iter().collect();
            prop_assert_eq!(keys, header_refs);
        }
    }
}

// ============================================================================
// Row Width
// ============================================================================

proptest! {
    #[test]
    fn prop_records_always_match_header_width(
        headers in arb_headers(),
        row in prop::collection::vec("[a-z0-9 ]{0,6}", 1..10),
    ) {
        let text = format!("{}\n{}", encode_record(&headers), encode_record(&row));
        let records = parse_records(&text);
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(records[0].len(), headers.len());
        for (i, value) in records[0].values().enumerate() {
            let expected = row.get(i).cloned().unwrap_or_default();
            prop_assert_eq!(value, &expected);
        }
    }

    #[test]
    fn prop_blank_lines_are_ignored(blank_lines in prop::collection::vec("[ \t\r]{0,4}", 0..5)) {
        let mut text = String::from("a,b\n");
        for blank in &blank_lines {
            text.push_str(blank);
            text.push('\n');
        }
        text.push_str("1,2\n");
        let records = parse_records(&text);
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(records[0]["a"].as_str(), "1");
    }
}
