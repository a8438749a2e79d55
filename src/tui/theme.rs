//! Dossier color theme: aged paper, ink and rubber-stamp red.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::core::briefing::DocumentKind;

// ── Primary palette ─────────────────────────────────────────────────────────

/// Sepia ink: headings, focused borders.
pub const PRIMARY: Color = Color::Rgb(0x8B, 0x5A, 0x2B);
/// Stamp red: titles, the selected item.
pub const ACCENT: Color = Color::Rgb(0xB2, 0x22, 0x22);

// ── Backgrounds ─────────────────────────────────────────────────────────────

/// Dark paper.
pub const BG_BASE: Color = Color::Rgb(0x1E, 0x1A, 0x14);

// ── Text ────────────────────────────────────────────────────────────────────

pub const TEXT: Color = Color::Rgb(0xE8, 0xDF, 0xC8);
pub const TEXT_MUTED: Color = Color::Rgb(0x9A, 0x8F, 0x7A);
pub const TEXT_DIM: Color = Color::Rgb(0x5C, 0x54, 0x46);

// ── Semantic ────────────────────────────────────────────────────────────────

pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);
pub const ERROR: Color = Color::Rgb(0xEF, 0x53, 0x50);

// ── Domain ──────────────────────────────────────────────────────────────────

/// Stamp color per document kind.
pub fn kind_color(kind: &DocumentKind) -> Color {
    match kind {
        DocumentKind::Organizational => Color::Rgb(0x2E, 0x7D, 0x32),
        DocumentKind::InGame => Color::Rgb(0x15, 0x65, 0xC0),
        DocumentKind::CharacterPrivate => ACCENT,
        DocumentKind::ProfileBlurb => PRIMARY,
        DocumentKind::Unknown(_) => TEXT_MUTED,
    }
}

// ── Style helpers ───────────────────────────────────────────────────────────

/// Accent bold text (titles, active items).
pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Section header style.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default().fg(BG_BASE).bg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn body() -> Style {
    Style::default().fg(TEXT)
}

/// Muted label text.
pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

/// Key hint style (e.g., "[q]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Advisory banner over fallback data.
pub fn advisory() -> Style {
    Style::default().fg(WARNING).add_modifier(Modifier::BOLD)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

/// A bordered block with focused styling.
pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(PRIMARY))
}

/// A bordered block with default (unfocused) styling.
pub fn block_default(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(TEXT_DIM))
}
