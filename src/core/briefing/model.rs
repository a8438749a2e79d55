//! Entity Normalizer
//!
//! Typed rows for the two spreadsheet tables. Raw strings from the sheet are
//! mapped onto closed enumerations here so downstream code can match
//! exhaustively. Nothing is rejected: unknown kinds are kept verbatim and
//! missing cells become empty strings.

use serde::{Deserialize, Serialize};

use super::csv::Record;

/// Sentinel recipient addressing every viewer.
pub const EVERYONE: &str = "everyone";

/// Lowercase, trim and fold `_` into `-` so sheet vocabulary compares loosely.
pub(crate) fn fold_key(raw: &str) -> String {
    raw.trim().to_lowercase().replace('_', "-")
}

/// Look up the first present column among `aliases`.
fn field(record: &Record, aliases: &[&str]) -> String {
    record
        .iter()
        .find(|(header, _)| aliases.contains(&fold_key(header).as_str()))
        .map(|(_, value)| value.clone())
        .unwrap_or_default()
}

// ============================================================================
// Organization table
// ============================================================================

/// What an organization row describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrgKind {
    Group,
    Character,
    ConfigEntry,
    /// Anything the sheet editors typed that we don't recognize.
    Unknown(String),
}

impl OrgKind {
    pub fn parse(raw: &str) -> Self {
        match fold_key(raw).as_str() {
            "group" | "skupina" => Self::Group,
            "character" | "postava" => Self::Character,
            "config" | "config-entry" | "konfigurace" => Self::ConfigEntry,
            _ => Self::Unknown(raw.to_string()),
        }
    }
}

/// One row of the `organizace` table: a group, a character, or a config entry.
///
/// Config entries reuse `name` as the key and `group` as the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRow {
    pub kind: OrgKind,
    pub name: String,
    pub slug: String,
    pub group: String,
    #[serde(default)]
    pub description: String,
}

impl OrganizationRow {
    pub fn from_record(record: &Record) -> Self {
        Self {
            kind: OrgKind::parse(&field(record, &["kind", "typ"])),
            name: field(record, &["name", "jmeno"]),
            slug: field(record, &["slug"]),
            group: field(record, &["group", "skupina"]),
            description: field(record, &["description", "popis"]),
        }
    }

    pub fn is_character(&self) -> bool {
        self.kind == OrgKind::Character
    }
}

/// Normalize parsed `organizace` records.
pub fn normalize_organization(records: &[Record]) -> Vec<OrganizationRow> {
    records.iter().map(OrganizationRow::from_record).collect()
}

// ============================================================================
// Document table
// ============================================================================

/// Document category, also the grouping key for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Organizational,
    InGame,
    CharacterPrivate,
    ProfileBlurb,
    Unknown(String),
}

impl DocumentKind {
    pub fn parse(raw: &str) -> Self {
        match fold_key(raw).as_str() {
            "organizational" | "organizacni" => Self::Organizational,
            "in-game" | "herni" => Self::InGame,
            "character-private" | "character" | "postava" => Self::CharacterPrivate,
            "profile-blurb" | "profile" | "medailonek" => Self::ProfileBlurb,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    /// Human label for section headings.
    pub fn label(&self) -> &str {
        match self {
            Self::Organizational => "Organizational",
            Self::InGame => "In-game",
            Self::CharacterPrivate => "Your character",
            Self::ProfileBlurb => "Profile",
            Self::Unknown(raw) => raw,
        }
    }
}

/// Who a document is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recipient {
    Everyone,
    /// A character slug or a group name.
    Named(String),
}

impl Recipient {
    pub fn parse(raw: &str) -> Self {
        match fold_key(raw).as_str() {
            EVERYONE | "vsichni" => Self::Everyone,
            _ => Self::Named(raw.trim().to_string()),
        }
    }
}

/// Two-level display precedence, independent of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Primary,
    Normal,
}

impl Priority {
    /// Anything other than the primary marker counts as normal.
    pub fn parse(raw: &str) -> Self {
        match fold_key(raw).as_str() {
            "primary" | "hlavni" => Self::Primary,
            _ => Self::Normal,
        }
    }
}

/// One row of the `dokumenty` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRow {
    pub kind: DocumentKind,
    pub recipient: Recipient,
    pub title: String,
    /// Rich text (HTML) exactly as authored. Consumers sanitize.
    pub body: String,
    /// Raw publication timestamp; format varies with the sheet locale.
    pub published_at: String,
    pub priority: Priority,
}

impl DocumentRow {
    pub fn from_record(record: &Record) -> Self {
        Self {
            kind: DocumentKind::parse(&field(record, &["kind", "typ"])),
            recipient: Recipient::parse(&field(record, &["recipient", "komu"])),
            title: field(record, &["title", "nadpis"]),
            body: field(record, &["body", "obsah"]),
            published_at: field(
                record,
                &["publishedat", "published-at", "datum-zverejneni"],
            ),
            priority: Priority::parse(&field(record, &["priority", "priorita"])),
        }
    }
}

/// Normalize parsed `dokumenty` records.
pub fn normalize_documents(records: &[Record]) -> Vec<DocumentRow> {
    records.iter().map(DocumentRow::from_record).collect()
}
