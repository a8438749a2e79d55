//! Property-based tests for visibility and ordering
//!
//! Tests invariants:
//! - Primary documents always precede normal ones
//! - Dates descend within a priority level
//! - Grouping keeps the sorted order inside each kind
//! - Everyone sees only documents addressed to everyone

use proptest::prelude::*;

use crate::core::briefing::model::{DocumentKind, DocumentRow, Priority, Recipient};
use crate::core::briefing::visibility::{
    group_by_kind, parse_published_at, sort_documents, visible_documents, Viewer,
};
use crate::tests::common::document;

// ============================================================================
// Strategies
// ============================================================================

fn arb_kind() -> impl Strategy<Value = DocumentKind> {
    prop_oneof![
        Just(DocumentKind::Organizational),
        Just(DocumentKind::InGame),
        Just(DocumentKind::CharacterPrivate),
        Just(DocumentKind::ProfileBlurb),
    ]
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::Primary), Just(Priority::Normal)]
}

/// Past timestamps in both accepted spellings, so "now" never ties.
fn arb_published_at() -> impl Strategy<Value = String> {
    (2000i32..2024, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60).prop_flat_map(
        |(y, mo, d, h, mi)| {
            prop_oneof![
                Just(format!("{y:04}-{mo:02}-{d:02} {h:02}:{mi:02}:00")),
                Just(format!("{d}.{mo}.{y} {h}:{mi:02}")),
            ]
        },
    )
}

fn arb_recipient() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("everyone".to_string()),
        Just("vsichni".to_string()),
        "[a-z]{1,6}",
    ]
}

fn arb_document() -> impl Strategy<Value = DocumentRow> {
    (
        "[A-Za-z ]{1,12}",
        arb_kind(),
        arb_recipient(),
        arb_published_at(),
        arb_priority(),
    )
        .prop_map(|(title, kind, to, at, priority)| document(&title, kind, &to, &at, priority))
}

// ============================================================================
// Ordering
// ============================================================================

proptest! {
    #[test]
    fn prop_primary_precedes_normal(mut docs in prop::collection::vec(arb_document(), 0..20)) {
        sort_documents(&mut docs);
        let first_normal = docs.iter().position(|d| d.priority == Priority::Normal);
        if let Some(idx) = first_normal {
            prop_assert!(docs[idx..].iter().all(|d| d.priority == Priority::Normal));
        }
    }

    #[test]
    fn prop_dates_descend_within_priority(mut docs in prop::collection::vec(arb_document(), 0..20)) {
        sort_documents(&mut docs);
        for pair in docs.windows(2) {
            if pair[0].priority == pair[1].priority {
                let a = parse_published_at(&pair[0].published_at);
                let b = parse_published_at(&pair[1].published_at);
                prop_assert!(a.is_some() && b.is_some());
                prop_assert!(a >= b);
            }
        }
    }

    #[test]
    fn prop_unparseable_dates_lead_their_level(
        mut docs in prop::collection::vec(arb_document(), 0..10),
        priority in arb_priority(),
    ) {
        docs.push(document("Undated-0", DocumentKind::InGame, "everyone", "soon", priority));
        sort_documents(&mut docs);
        let undated = docs.iter().position(|d| d.title == "Undated-0");
        let first_of_level = docs.iter().position(|d| d.priority == priority);
        prop_assert_eq!(undated, first_of_level);
    }

    #[test]
    fn prop_grouping_preserves_order(mut docs in prop::collection::vec(arb_document(), 0..20)) {
        sort_documents(&mut docs);
        let grouped = group_by_kind(docs.clone());

        let total: usize = grouped.values().map(Vec::len).sum();
        prop_assert_eq!(total, docs.len());
        for (kind, members) in &grouped {
            let expected: Vec<&DocumentRow> = docs.iter().filter(|d| &d.kind == kind).collect();
            let actual: Vec<&DocumentRow> = members.iter().collect();
            prop_assert_eq!(actual, expected);
        }
    }
}

// ============================================================================
// Visibility
// ============================================================================

proptest! {
    #[test]
    fn prop_everyone_sees_only_broadcasts(docs in prop::collection::vec(arb_document(), 0..20)) {
        let visible = visible_documents(&docs, &Viewer::Everyone, &[]);
        let expected = docs.iter().filter(|d| d.recipient == Recipient::Everyone).count();
        prop_assert_eq!(visible.len(), expected);
        prop_assert!(visible.iter().all(|d| d.recipient == Recipient::Everyone));
    }

    #[test]
    fn prop_unknown_character_sees_only_broadcasts(
        docs in prop::collection::vec(arb_document(), 0..20),
    ) {
        // Digits never appear in generated recipients.
        let viewer = Viewer::Character("ghost-7".to_string());
        let visible = visible_documents(&docs, &viewer, &[]);
        prop_assert!(visible.iter().all(|d| d.recipient == Recipient::Everyone));
    }
}
