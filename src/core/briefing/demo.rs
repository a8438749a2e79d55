//! Demonstration dataset shown until (and unless) real sheet data arrives.
//!
//! Everything here is obviously fake so nobody mistakes it for a live event.

use super::model::{DocumentKind, DocumentRow, OrgKind, OrganizationRow, Priority, Recipient};
use super::resilience::EntitySnapshot;

/// Number of demo characters, spread round-robin over the demo groups.
pub const DEMO_CHARACTER_COUNT: usize = 99;

const DEMO_GROUPS: [&str; 3] = ["DEMO GROUP A", "DEMO GROUP B", "DEMO GROUP C"];

fn org(kind: OrgKind, name: &str, slug: &str, group: &str, description: &str) -> OrganizationRow {
    OrganizationRow {
        kind,
        name: name.to_string(),
        slug: slug.to_string(),
        group: group.to_string(),
        description: description.to_string(),
    }
}

fn doc(
    kind: DocumentKind,
    recipient: &str,
    title: &str,
    body: &str,
    published_at: &str,
    priority: Priority,
) -> DocumentRow {
    DocumentRow {
        kind,
        recipient: Recipient::parse(recipient),
        title: title.to_string(),
        body: body.to_string(),
        published_at: published_at.to_string(),
        priority,
    }
}

/// Organization rows: config entries, groups, then characters.
pub fn demo_organization() -> Vec<OrganizationRow> {
    let config = [
        ("title", "DEMO EVENT - TEST DATA"),
        ("organizer", "DEMO ORGANIZER"),
        ("contact", "demo@example.org"),
        ("footer", "DEMO - FOR TESTING ONLY"),
        ("run-number", "999"),
        ("run-date", "1. 1. 2099"),
        ("run-venue", "DEMO VENUE"),
        ("run-address", "DEMO ADDRESS 999"),
    ];

    let mut rows: Vec<OrganizationRow> = config
        .iter()
        .map(|(key, value)| org(OrgKind::ConfigEntry, key, "", value, ""))
        .collect();

    rows.extend(DEMO_GROUPS.iter().map(|g| org(OrgKind::Group, g, "", "", "")));

    rows.extend((1..=DEMO_CHARACTER_COUNT).map(|i| {
        org(
            OrgKind::Character,
            &format!("DEMO CHARACTER {i}"),
            &format!("demo-{i}"),
            DEMO_GROUPS[(i - 1) % DEMO_GROUPS.len()],
            &format!("Demo character number {i}. Used only to try the application out."),
        )
    }));

    rows
}

/// A handful of documents covering every kind, priority and addressing mode.
pub fn demo_documents() -> Vec<DocumentRow> {
    vec![
        doc(
            DocumentKind::ProfileBlurb,
            "demo-1",
            "DEMO PROFILE - TEST DATA",
            "<p>This is a demo profile. It exists only for development.</p>",
            "2025-07-26 18:33:42",
            Priority::Primary,
        ),
        doc(
            DocumentKind::Organizational,
            "everyone",
            "Event rules",
            "<p>Basic rules for all participants.</p><p>Safety first, immersion second.</p>",
            "2025-07-26 18:33:44",
            Priority::Primary,
        ),
        doc(
            DocumentKind::InGame,
            "everyone",
            "Area map",
            "<p>The operation takes place in the old town.</p>",
            "2025-07-26 18:33:45",
            Priority::Normal,
        ),
        doc(
            DocumentKind::Organizational,
            "everyone",
            "Safety procedures",
            "<p>Use the safe word if you need to stop a scene.</p>",
            "2025-07-26 18:33:47",
            Priority::Primary,
        ),
        doc(
            DocumentKind::InGame,
            "everyone",
            "Operation timeline",
            "<p>The operation starts at 09:00 and ends at 18:00.</p>",
            "2025-07-26 18:33:48",
            Priority::Normal,
        ),
        doc(
            DocumentKind::InGame,
            DEMO_GROUPS[0],
            "Group A briefing",
            "<p>Group A holds the north gate.</p>",
            "26.7.2025 18:33:49",
            Priority::Normal,
        ),
        doc(
            DocumentKind::CharacterPrivate,
            "demo-1",
            "Secret instructions",
            "<p>Coordinate with the other groups and keep your cover.</p>",
            "2025-07-26 18:33:50",
            Priority::Primary,
        ),
        doc(
            DocumentKind::CharacterPrivate,
            "demo-2",
            "Patrol duty",
            "<p>Watch the square and report anything unusual.</p>",
            "2025-07-26 18:33:51",
            Priority::Normal,
        ),
    ]
}

/// Both demo collections as one snapshot.
pub fn demo_snapshot() -> EntitySnapshot {
    EntitySnapshot::new(demo_organization(), demo_documents())
}
