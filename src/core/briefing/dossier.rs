//! Page-level assembly for the two views: a character's dossier and the
//! organizers' overview. Pure functions over a [`BriefingState`].

use chrono::{Local, NaiveDateTime};
use indexmap::IndexMap;
use serde::Serialize;

use super::event_config::EventConfig;
use super::model::{DocumentKind, DocumentRow, OrganizationRow};
use super::resilience::{Advisory, BriefingState};
use super::visibility::{
    find_character, group_by_kind, parse_published_at, sort_documents, visible_documents,
    GroupedDocuments, Viewer,
};

/// Everything a character's page shows.
#[derive(Debug, Clone)]
pub struct Dossier {
    pub character: OrganizationRow,
    /// The character's profile blurb, pulled out of the document list.
    pub profile: Option<DocumentRow>,
    pub documents: GroupedDocuments,
    pub config: EventConfig,
    pub advisory: Option<Advisory>,
}

/// Result of looking up a character page.
#[derive(Debug, Clone)]
pub enum CharacterBriefing {
    Found(Box<Dossier>),
    /// No character row carries this slug.
    NotFound { slug: String },
}

/// Build the dossier for `slug`, or report that the character doesn't exist.
pub fn character_briefing(
    state: &BriefingState,
    bootstrap: &EventConfig,
    slug: &str,
) -> CharacterBriefing {
    let snapshot = &state.snapshot;
    let Some(character) = find_character(&snapshot.organization, slug) else {
        return CharacterBriefing::NotFound {
            slug: slug.to_string(),
        };
    };

    let viewer = Viewer::Character(character.slug.clone());
    let mut visible = visible_documents(&snapshot.documents, &viewer, &snapshot.organization);
    let profile = visible
        .iter()
        .position(|doc| doc.kind == DocumentKind::ProfileBlurb)
        .map(|idx| visible.remove(idx));
    sort_documents(&mut visible);

    CharacterBriefing::Found(Box::new(Dossier {
        character: character.clone(),
        profile,
        documents: group_by_kind(visible),
        config: state.config(bootstrap),
        advisory: state.advisory,
    }))
}

/// Counters for the organizers' dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_characters: usize,
    pub total_documents: usize,
    /// Latest publication time, `dd.mm.yyyy HH:MM`.
    pub last_update: String,
    pub run_info: String,
}

/// The organizers' overview page.
#[derive(Debug, Clone)]
pub struct AdminOverview {
    pub stats: AdminStats,
    /// Characters by group name, groups in first-seen order.
    pub roster: IndexMap<String, Vec<OrganizationRow>>,
    /// What the broadcast ("everyone") view shows.
    pub broadcast: GroupedDocuments,
    pub config: EventConfig,
    pub advisory: Option<Advisory>,
    /// The stored sheet URL still points nowhere.
    pub needs_setup: bool,
}

const STATS_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";

fn latest_publication(documents: &[DocumentRow], now: NaiveDateTime) -> NaiveDateTime {
    documents
        .iter()
        .map(|doc| parse_published_at(&doc.published_at).unwrap_or(now))
        .max()
        .unwrap_or(now)
}

pub fn admin_stats(state: &BriefingState, config: &EventConfig) -> AdminStats {
    let snapshot = &state.snapshot;
    let now = Local::now().naive_local();
    AdminStats {
        total_characters: snapshot.characters().count(),
        total_documents: snapshot.documents.len(),
        last_update: latest_publication(&snapshot.documents, now)
            .format(STATS_TIME_FORMAT)
            .to_string(),
        run_info: config.run_info(),
    }
}

pub fn admin_overview(state: &BriefingState, bootstrap: &EventConfig) -> AdminOverview {
    let config = state.config(bootstrap);

    let mut roster: IndexMap<String, Vec<OrganizationRow>> = IndexMap::new();
    for character in state.snapshot.characters() {
        roster
            .entry(character.group.clone())
            .or_default()
            .push(character.clone());
    }

    AdminOverview {
        stats: admin_stats(state, &config),
        roster,
        broadcast: state.documents_for(&Viewer::Everyone),
        needs_setup: !bootstrap.is_source_configured(),
        config,
        advisory: state.advisory,
    }
}
