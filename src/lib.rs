/// Dossier - LARP briefing viewer (TUI Edition)
///
/// Core library that loads character and document tables from a published
/// spreadsheet, decides who sees what, and falls back to demo data when the
/// sheet can't be reached.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
