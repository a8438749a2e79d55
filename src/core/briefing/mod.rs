//! Briefing content resolution.
//!
//! Fetches the two spreadsheet tables, normalizes them into typed rows,
//! derives the event configuration and decides which documents each viewer
//! sees. Presentation lives elsewhere and only consumes what is exported here.

pub mod csv;
pub mod demo;
pub mod dossier;
pub mod event_config;
pub mod model;
pub mod resilience;
pub mod settings;
pub mod source;
pub mod visibility;

pub use dossier::{admin_overview, character_briefing, AdminOverview, AdminStats, CharacterBriefing, Dossier};
pub use event_config::{load_bootstrap_config, resolve_event_config, save_bootstrap_config, EventConfig, RunInfo};
pub use model::{DocumentKind, DocumentRow, OrgKind, OrganizationRow, Priority, Recipient};
pub use resilience::{Advisory, BriefingService, BriefingState, EntitySnapshot};
pub use settings::{FileSettingsStore, MemorySettingsStore, SettingsStore};
pub use source::{SheetSource, SheetTable, TableSource};
pub use visibility::{documents_for, GroupedDocuments, Viewer};
