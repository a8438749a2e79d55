//! Visibility & Ordering Engine
//!
//! Decides which documents a viewer sees, orders them (primary first, then
//! newest first) and groups them by kind for display.

use std::cmp::Reverse;
use std::sync::OnceLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use super::model::{DocumentKind, DocumentRow, OrganizationRow, Recipient, EVERYONE};

/// Ordered mapping from kind to its documents, in display order.
pub type GroupedDocuments = IndexMap<DocumentKind, Vec<DocumentRow>>;

/// Who is asking for documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Viewer {
    /// Administrative broadcast view: only documents addressed to everyone.
    Everyone,
    /// A character, by slug.
    Character(String),
}

impl Viewer {
    /// Map a route/CLI argument onto a viewer; the sentinel selects `Everyone`.
    pub fn parse(raw: &str) -> Self {
        match Recipient::parse(raw) {
            Recipient::Everyone => Self::Everyone,
            Recipient::Named(slug) => Self::Character(slug),
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Self::Everyone => EVERYONE,
            Self::Character(slug) => slug,
        }
    }
}

/// Locate the character row with the given slug.
pub fn find_character<'a>(
    organization: &'a [OrganizationRow],
    slug: &str,
) -> Option<&'a OrganizationRow> {
    organization
        .iter()
        .find(|row| row.is_character() && row.slug == slug)
}

/// Whether `viewer` may read `doc`.
///
/// `group` is the viewer's resolved group name. An empty group never matches,
/// so a document with a blank recipient stays hidden from characters that
/// have no group instead of reaching all of them.
fn is_visible(doc: &DocumentRow, viewer: &Viewer, group: &str) -> bool {
    match (&doc.recipient, viewer) {
        (Recipient::Everyone, _) => true,
        (Recipient::Named(_), Viewer::Everyone) => false,
        (Recipient::Named(name), Viewer::Character(slug)) => {
            name == slug || (!group.is_empty() && name == group)
        }
    }
}

/// Documents the viewer may see, in source order.
pub fn visible_documents(
    documents: &[DocumentRow],
    viewer: &Viewer,
    organization: &[OrganizationRow],
) -> Vec<DocumentRow> {
    let group = match viewer {
        Viewer::Everyone => "",
        Viewer::Character(slug) => find_character(organization, slug)
            .map(|c| c.group.as_str())
            .unwrap_or(""),
    };

    let visible: Vec<DocumentRow> = documents
        .iter()
        .filter(|doc| is_visible(doc, viewer, group))
        .cloned()
        .collect();
    debug!(viewer = viewer.slug(), group, count = visible.len(), "Filtered documents");
    visible
}

static LOCAL_DATE: OnceLock<Regex> = OnceLock::new();

fn local_date_pattern() -> &'static Regex {
    LOCAL_DATE.get_or_init(|| {
        Regex::new(
            r"^(\d{1,2})\.\s*(\d{1,2})\.\s*(\d{4})\b(?:,?\s+(\d{1,2}):(\d{1,2})(?::(\d{1,2}))?)?",
        )
        .expect("static regex is valid")
    })
}

const ISO_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a publication timestamp as typed into the sheet.
///
/// Accepts RFC 3339, ISO-like `YYYY-MM-DD[ HH:MM[:SS[.fff]]]` and the localized
/// `D.M.YYYY[, H:M[:S]]` form (spaces after the dots allowed). Anything after
/// a localized timestamp, such as a zone name, is ignored.
pub fn parse_published_at(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Some(dt) = ISO_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    let caps = local_date_pattern().captures(raw)?;
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let year = caps.get(3)?.as_str().parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, num(2)?, num(1)?)?.and_hms_opt(
        num(4).unwrap_or(0),
        num(5).unwrap_or(0),
        num(6).unwrap_or(0),
    )
}

/// Order documents in place: primary before normal, then newest first.
///
/// Unparseable dates sort as "now". Equal keys keep their relative order.
pub fn sort_documents(documents: &mut [DocumentRow]) {
    let now = Local::now().naive_local();
    documents.sort_by_cached_key(|doc| {
        (
            doc.priority,
            Reverse(parse_published_at(&doc.published_at).unwrap_or(now)),
        )
    });
}

/// Partition ordered documents by kind, keeping first-seen kind order.
pub fn group_by_kind(documents: Vec<DocumentRow>) -> GroupedDocuments {
    let mut grouped = GroupedDocuments::new();
    for doc in documents {
        grouped.entry(doc.kind.clone()).or_default().push(doc);
    }
    grouped
}

/// Visible documents for `viewer`, ordered and grouped for display.
pub fn documents_for(
    documents: &[DocumentRow],
    viewer: &Viewer,
    organization: &[OrganizationRow],
) -> GroupedDocuments {
    let mut visible = visible_documents(documents, viewer, organization);
    sort_documents(&mut visible);
    group_by_kind(visible)
}
