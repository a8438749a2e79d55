//! Terminal viewer for briefings.

pub mod app;
pub mod events;
pub mod layout;
pub mod text;
pub mod theme;
