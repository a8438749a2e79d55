//! Resilience Policy
//!
//! The viewer always has a usable snapshot: it starts from the demonstration
//! dataset and a background refresh swaps in sheet data only when both tables
//! arrived. Anything less keeps the fallback and raises an advisory.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::csv::parse_records;
use super::event_config::{resolve_event_config, EventConfig};
use super::model::{normalize_documents, normalize_organization, DocumentRow, OrganizationRow};
use super::source::{needs_url_fix, SheetTable, TableSource};
use super::visibility::{documents_for, GroupedDocuments, Viewer};

/// Delay before the first background load, so the initial render lands first.
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_millis(500);

/// Both entity collections, always replaced together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitySnapshot {
    pub organization: Vec<OrganizationRow>,
    pub documents: Vec<DocumentRow>,
}

impl EntitySnapshot {
    pub fn new(organization: Vec<OrganizationRow>, documents: Vec<DocumentRow>) -> Self {
        Self {
            organization,
            documents,
        }
    }

    pub fn characters(&self) -> impl Iterator<Item = &OrganizationRow> {
        self.organization.iter().filter(|row| row.is_character())
    }
}

/// Non-fatal notice shown above content rendered from fallback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// No sheet data at all; the demo dataset is in use.
    DemoData,
    /// Only one table came back; the demo dataset is in use for consistency.
    PartialData,
    /// The stored sheet URL is in a form that needs fixing.
    UrlNeedsFix,
}

impl Advisory {
    pub fn message(self) -> &'static str {
        match self {
            Self::DemoData => {
                "Using demo data: the remote spreadsheet is not configured or could not be loaded."
            }
            Self::PartialData => "Partial data from the spreadsheet; using demo data for consistency.",
            Self::UrlNeedsFix => {
                "The spreadsheet URL has the wrong format. Ask the organizers to fix the settings."
            }
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// What the presentation layer renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriefingState {
    pub snapshot: Arc<EntitySnapshot>,
    pub advisory: Option<Advisory>,
}

impl BriefingState {
    /// Configuration derived from the currently held organization rows.
    pub fn config(&self, bootstrap: &EventConfig) -> EventConfig {
        resolve_event_config(&self.snapshot.organization, bootstrap)
    }

    pub fn documents_for(&self, viewer: &Viewer) -> GroupedDocuments {
        documents_for(&self.snapshot.documents, viewer, &self.snapshot.organization)
    }
}

/// The combined load failed outright (e.g. the load task panicked).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("background load task failed: {0}")]
    Task(String),
}

/// Decide between fetched data and the fallback.
///
/// Both tables non-empty: fetched data, no advisory. Both empty: fallback with
/// [`Advisory::DemoData`]. Exactly one empty: fallback with
/// [`Advisory::PartialData`]; sources are never mixed.
pub fn resolve_snapshot(initial: &Arc<EntitySnapshot>, fetched: EntitySnapshot) -> BriefingState {
    match (fetched.organization.is_empty(), fetched.documents.is_empty()) {
        (false, false) => BriefingState {
            snapshot: Arc::new(fetched),
            advisory: None,
        },
        (true, true) => BriefingState {
            snapshot: Arc::clone(initial),
            advisory: Some(Advisory::DemoData),
        },
        _ => BriefingState {
            snapshot: Arc::clone(initial),
            advisory: Some(Advisory::PartialData),
        },
    }
}

/// [`resolve_snapshot`] over a load that may have failed as a whole.
///
/// A failed load is treated exactly like two empty tables.
pub fn apply_load(
    initial: &Arc<EntitySnapshot>,
    outcome: Result<EntitySnapshot, LoadError>,
) -> BriefingState {
    match outcome {
        Ok(fetched) => resolve_snapshot(initial, fetched),
        Err(e) => {
            warn!(error = %e, "Sheet load failed, keeping fallback data");
            resolve_snapshot(initial, EntitySnapshot::default())
        }
    }
}

/// Fetch both tables concurrently and normalize whatever came back.
pub async fn load_remote<S: TableSource + ?Sized>(source: &S) -> EntitySnapshot {
    let (organization, documents) = tokio::join!(
        source.fetch_table(SheetTable::Organization),
        source.fetch_table(SheetTable::Documents),
    );

    let organization = organization
        .map(|text| normalize_organization(&parse_records(&text)))
        .unwrap_or_default();
    let documents = documents
        .map(|text| normalize_documents(&parse_records(&text)))
        .unwrap_or_default();

    info!(
        organization = organization.len(),
        documents = documents.len(),
        "Fetched sheet data"
    );
    EntitySnapshot::new(organization, documents)
}

/// Holds the current [`BriefingState`] and refreshes it from a [`TableSource`].
///
/// The state lives in a watch channel; each refresh publishes a whole new
/// state, so readers never observe a half-updated snapshot.
pub struct BriefingService<S: TableSource + 'static> {
    source: Arc<S>,
    fallback: Arc<EntitySnapshot>,
    state: Arc<watch::Sender<BriefingState>>,
}

impl<S: TableSource + 'static> BriefingService<S> {
    pub fn new(source: S, fallback: EntitySnapshot, advisory: Option<Advisory>) -> Self {
        let fallback = Arc::new(fallback);
        let (state, _) = watch::channel(BriefingState {
            snapshot: Arc::clone(&fallback),
            advisory,
        });
        Self {
            source: Arc::new(source),
            fallback,
            state: Arc::new(state),
        }
    }

    /// Start from the demonstration dataset with the matching advisory.
    pub fn with_demo_data(source: S, bootstrap: &EventConfig) -> Self {
        let advisory = if needs_url_fix(&bootstrap.sheets_url) && bootstrap.is_source_configured() {
            Advisory::UrlNeedsFix
        } else {
            Advisory::DemoData
        };
        Self::new(source, super::demo::demo_snapshot(), Some(advisory))
    }

    pub fn current(&self) -> BriefingState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BriefingState> {
        self.state.subscribe()
    }

    /// Load now and publish the outcome.
    pub async fn refresh(&self) -> BriefingState {
        run_refresh(
            Arc::clone(&self.source),
            Arc::clone(&self.fallback),
            &self.state,
        )
        .await
    }

    /// Fire-and-forget refresh after `delay`. Also the manual reload path.
    pub fn spawn_refresh(&self, delay: Duration) -> JoinHandle<BriefingState> {
        let source = Arc::clone(&self.source);
        let fallback = Arc::clone(&self.fallback);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            run_refresh(source, fallback, &state).await
        })
    }
}

async fn run_refresh<S: TableSource + 'static>(
    source: Arc<S>,
    fallback: Arc<EntitySnapshot>,
    state: &watch::Sender<BriefingState>,
) -> BriefingState {
    // Own task so a panic inside the source is contained like any other failure.
    let outcome = tokio::spawn(async move { load_remote(source.as_ref()).await })
        .await
        .map_err(|e| LoadError::Task(e.to_string()));

    let next = apply_load(&fallback, outcome);
    match next.advisory {
        None => info!("Using live sheet data"),
        Some(advisory) => info!(?advisory, "Keeping fallback data"),
    }
    state.send_replace(next.clone());
    next
}
