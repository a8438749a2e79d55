//! Root layout: header, optional advisory banner, content, status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Height of the bordered header (event title + run line).
pub const HEADER_HEIGHT: u16 = 4;
/// Below this width the content splits vertically instead of side by side.
pub const NARROW_THRESHOLD: u16 = 80;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    pub header: Rect,
    /// Advisory banner (None when live data is shown).
    pub advisory: Option<Rect>,
    /// Left/top pane: document list or roster.
    pub list: Rect,
    /// Right/bottom pane: the open document or profile.
    pub detail: Rect,
    /// Status bar (bottom row).
    pub status: Rect,
}

impl AppLayout {
    pub fn compute(area: Rect, with_advisory: bool) -> Self {
        let rows = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(u16::from(with_advisory)),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

        let panes = if area.width < NARROW_THRESHOLD {
            Layout::vertical([Constraint::Percentage(40), Constraint::Percentage(60)]).split(rows[2])
        } else {
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(rows[2])
        };

        Self {
            header: rows[0],
            advisory: with_advisory.then_some(rows[1]),
            list: panes[0],
            detail: panes[1],
            status: rows[3],
        }
    }
}
