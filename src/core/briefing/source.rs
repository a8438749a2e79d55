//! Tabular Fetcher
//!
//! Pulls raw CSV for one table from the published spreadsheet. Every failure
//! is contained here: callers only ever see `Some(text)` or `None`.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Marker present in the shipped placeholder URL.
pub const PLACEHOLDER_MARKER: &str = "EXAMPLE";

/// Bounded wait for a single table request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const EDIT_FRAGMENT: &str = "/edit";
const GID_FRAGMENT: &str = "#gid=";

static SPREADSHEET_ID: OnceLock<Regex> = OnceLock::new();

fn spreadsheet_id_pattern() -> &'static Regex {
    SPREADSHEET_ID.get_or_init(|| {
        Regex::new(r"/spreadsheets/d/([a-zA-Z0-9\-_]+)").expect("static regex is valid")
    })
}

/// The two tables the spreadsheet publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetTable {
    /// Groups, characters and config entries.
    Organization,
    Documents,
}

impl SheetTable {
    /// Sheet name as it appears in the export URL.
    pub fn sheet_name(self) -> &'static str {
        match self {
            Self::Organization => "organizace",
            Self::Documents => "dokumenty",
        }
    }
}

impl std::fmt::Display for SheetTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// Why a fetch produced nothing. Logged, never propagated.
#[derive(Error, Debug)]
pub enum FetchFailure {
    #[error("no spreadsheet configured")]
    NotConfigured,

    #[error("could not extract a spreadsheet id from the configured URL")]
    UnrecognizedUrl,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("empty response body")]
    EmptyBody,
}

/// Outcome of turning a user-supplied sheet URL into an export endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointResolution {
    NotConfigured,
    /// Edit-form URL without a recognizable spreadsheet id.
    Unrecognized,
    /// Endpoint to which the table name is appended.
    Ready(String),
}

/// CSV export endpoint for a spreadsheet id.
pub fn export_endpoint(spreadsheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{spreadsheet_id}/gviz/tq?tqx=out:csv&sheet=")
}

fn extract_spreadsheet_id(url: &str) -> Option<&str> {
    spreadsheet_id_pattern()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolve the configured sheet URL into a fetchable endpoint.
pub fn resolve_endpoint(raw: &str) -> EndpointResolution {
    let url = raw.trim();
    if url.is_empty() || url.contains(PLACEHOLDER_MARKER) {
        return EndpointResolution::NotConfigured;
    }
    if url.contains(EDIT_FRAGMENT) {
        return match extract_spreadsheet_id(url) {
            Some(id) => EndpointResolution::Ready(export_endpoint(id)),
            None => EndpointResolution::Unrecognized,
        };
    }
    EndpointResolution::Ready(url.to_string())
}

/// Whether the stored URL should be shown to the user as needing a fix.
pub fn needs_url_fix(raw: &str) -> bool {
    raw.contains(EDIT_FRAGMENT) || raw.contains(GID_FRAGMENT) || raw.contains(PLACEHOLDER_MARKER)
}

/// Rewrite any shareable spreadsheet link into the export form.
///
/// Returns `None` when no spreadsheet id can be found.
pub fn normalize_sheets_url(raw: &str) -> Option<String> {
    extract_spreadsheet_id(raw.trim()).map(export_endpoint)
}

/// Anything that can hand out raw table text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Raw CSV for `table`, or `None` when nothing usable was obtained.
    async fn fetch_table(&self, table: SheetTable) -> Option<String>;
}

/// HTTP fetcher for the published spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetSource {
    client: Client,
    endpoint: EndpointResolution,
    timeout: Duration,
}

impl SheetSource {
    /// Build a fetcher for the configured sheet URL.
    pub fn new(sheets_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
                Client::new()
            });
        Self {
            client,
            endpoint: resolve_endpoint(sheets_url),
            timeout,
        }
    }

    /// Fetch with the failure category kept, for logging and diagnostics.
    #[instrument(skip(self))]
    pub async fn try_fetch(&self, table: SheetTable) -> Result<String, FetchFailure> {
        let base = match &self.endpoint {
            EndpointResolution::Ready(base) => base,
            EndpointResolution::NotConfigured => return Err(FetchFailure::NotConfigured),
            EndpointResolution::Unrecognized => return Err(FetchFailure::UnrecognizedUrl),
        };
        let url = format!("{base}{}", table.sheet_name());
        debug!(%url, "Fetching sheet");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let text = response.text().await.map_err(|e| self.classify(e))?;
        if text.trim().is_empty() {
            return Err(FetchFailure::EmptyBody);
        }
        Ok(text)
    }

    fn classify(&self, error: reqwest::Error) -> FetchFailure {
        if error.is_timeout() {
            FetchFailure::Timeout(self.timeout)
        } else {
            FetchFailure::Network(error.to_string())
        }
    }
}

#[async_trait]
impl TableSource for SheetSource {
    async fn fetch_table(&self, table: SheetTable) -> Option<String> {
        match self.try_fetch(table).await {
            Ok(text) => {
                info!(%table, bytes = text.len(), "Loaded sheet");
                Some(text)
            }
            Err(FetchFailure::NotConfigured) => {
                debug!(%table, "No spreadsheet configured, skipping fetch");
                None
            }
            Err(failure) => {
                warn!(%table, %failure, "Could not load sheet, falling back");
                None
            }
        }
    }
}
