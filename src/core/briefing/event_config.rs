//! Configuration Resolver
//!
//! Event-wide settings travel inside the organization table as config-entry
//! rows (`name` is the key, `group` the value). The sheet URL is the exception:
//! it can't come from the sheet it points at, so it is carried over from the
//! local bootstrap store.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::model::{fold_key, OrgKind, OrganizationRow};
use super::settings::{self, SettingsStore};
use super::source::PLACEHOLDER_MARKER;

/// Store key holding the JSON-encoded [`EventConfig`].
pub const BOOTSTRAP_KEY: &str = "event-config";

/// Sheet URL shipped with a fresh install; it deliberately resolves to nothing.
pub const DEFAULT_SHEETS_URL: &str =
    "https://docs.google.com/spreadsheets/d/EXAMPLE/gviz/tq?tqx=out:csv&sheet=";

/// Per-run logistics shown on every briefing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunInfo {
    pub number: String,
    pub date: String,
    pub venue: String,
    pub address: String,
}

impl Default for RunInfo {
    fn default() -> Self {
        Self {
            number: "1".to_string(),
            date: String::new(),
            venue: String::new(),
            address: String::new(),
        }
    }
}

/// Event configuration, derived on every render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventConfig {
    pub title: String,
    pub organizer: String,
    pub contact: String,
    pub footer: String,
    pub run: RunInfo,
    /// Spreadsheet endpoint; table names are appended to it.
    pub sheets_url: String,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            title: "Untitled Event".to_string(),
            organizer: "Organizers".to_string(),
            contact: String::new(),
            footer: "Confidential - authorized persons only".to_string(),
            run: RunInfo::default(),
            sheets_url: DEFAULT_SHEETS_URL.to_string(),
        }
    }
}

impl EventConfig {
    /// False until someone has pointed the app at a real spreadsheet.
    pub fn is_source_configured(&self) -> bool {
        let url = self.sheets_url.trim();
        !url.is_empty() && !url.contains(PLACEHOLDER_MARKER)
    }

    /// Short run summary, e.g. `"3 | 30. 8. 2025"`.
    pub fn run_info(&self) -> String {
        format!("{} | {}", self.run.number, self.run.date)
    }

    fn assign(&mut self, key: ConfigKey, value: &str) {
        let slot = match key {
            ConfigKey::Title => &mut self.title,
            ConfigKey::Organizer => &mut self.organizer,
            ConfigKey::Contact => &mut self.contact,
            ConfigKey::Footer => &mut self.footer,
            ConfigKey::RunNumber => &mut self.run.number,
            ConfigKey::RunDate => &mut self.run.date,
            ConfigKey::RunVenue => &mut self.run.venue,
            ConfigKey::RunAddress => &mut self.run.address,
        };
        *slot = value.to_string();
    }
}

/// Keys a config-entry row may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Title,
    Organizer,
    Contact,
    Footer,
    RunNumber,
    RunDate,
    RunVenue,
    RunAddress,
}

impl ConfigKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match fold_key(raw).as_str() {
            "title" | "nazev" => Some(Self::Title),
            "organizer" | "organizator" => Some(Self::Organizer),
            "contact" | "kontakt" => Some(Self::Contact),
            "footer" | "zapati" => Some(Self::Footer),
            "run-number" | "beh-cislo" => Some(Self::RunNumber),
            "run-date" | "beh-datum" => Some(Self::RunDate),
            "run-venue" | "beh-misto" => Some(Self::RunVenue),
            "run-address" | "beh-adresa" => Some(Self::RunAddress),
            _ => None,
        }
    }
}

/// Derive the event configuration from organization rows.
///
/// Without any config-entry row the hard-coded default is returned as is.
/// Otherwise defaults fill whatever the sheet leaves unset, the sheet URL comes
/// from `bootstrap`, and later rows overwrite earlier ones.
pub fn resolve_event_config(rows: &[OrganizationRow], bootstrap: &EventConfig) -> EventConfig {
    let mut entries = rows
        .iter()
        .filter(|row| row.kind == OrgKind::ConfigEntry)
        .peekable();

    if entries.peek().is_none() {
        debug!("No config entries in organization data, using default config");
        return EventConfig::default();
    }

    let mut config = EventConfig {
        sheets_url: bootstrap.sheets_url.clone(),
        ..EventConfig::default()
    };

    for row in entries {
        match ConfigKey::parse(&row.name) {
            Some(key) => config.assign(key, &row.group),
            None => debug!(key = %row.name, "Ignoring unknown config key"),
        }
    }

    config
}

/// Read the bootstrap config, seeding the store with defaults when absent.
///
/// Never fails: an unreadable store or malformed value falls back to defaults.
pub fn load_bootstrap_config(store: &dyn SettingsStore) -> EventConfig {
    match store.get(BOOTSTRAP_KEY) {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Stored event config is malformed, using defaults");
                EventConfig::default()
            }
        },
        Ok(None) => {
            let config = EventConfig::default();
            if let Err(e) = save_bootstrap_config(store, &config) {
                warn!(error = %e, "Failed to seed default event config");
            }
            config
        }
        Err(e) => {
            warn!(error = %e, "Settings store unavailable, using default config");
            EventConfig::default()
        }
    }
}

/// Persist the bootstrap config. Only explicit user actions call this.
pub fn save_bootstrap_config(store: &dyn SettingsStore, config: &EventConfig) -> settings::Result<()> {
    store.put(BOOTSTRAP_KEY, serde_json::to_value(config)?)?;
    info!(sheets_url = %config.sheets_url, "Event config saved");
    Ok(())
}
