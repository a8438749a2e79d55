use std::collections::HashSet;
use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::watch;
use tracing::{debug, info};

use super::events::{Action, AppEvent};
use super::layout::AppLayout;
use super::text::plain_lines;
use super::theme;
use crate::core::briefing::{
    admin_overview, character_briefing, AdminOverview, BriefingService, BriefingState,
    CharacterBriefing, Dossier, DocumentRow, EventConfig, GroupedDocuments, TableSource, Viewer,
};

/// What the content area currently shows.
#[derive(Debug, Clone)]
pub enum Page {
    Dossier(Box<Dossier>),
    Missing { slug: String },
    Overview(Box<AdminOverview>),
}

impl Page {
    pub fn build(viewer: &Viewer, state: &BriefingState, bootstrap: &EventConfig) -> Self {
        match viewer {
            Viewer::Everyone => Self::Overview(Box::new(admin_overview(state, bootstrap))),
            Viewer::Character(slug) => match character_briefing(state, bootstrap, slug) {
                CharacterBriefing::Found(dossier) => Self::Dossier(dossier),
                CharacterBriefing::NotFound { slug } => Self::Missing { slug },
            },
        }
    }

    fn documents(&self) -> Option<&GroupedDocuments> {
        match self {
            Self::Dossier(dossier) => Some(&dossier.documents),
            Self::Overview(overview) => Some(&overview.broadcast),
            Self::Missing { .. } => None,
        }
    }

    /// Documents in display order, one per selectable row.
    pub fn entries(&self) -> Vec<&DocumentRow> {
        self.documents()
            .map(|grouped| grouped.values().flatten().collect())
            .unwrap_or_default()
    }

    fn config(&self) -> Option<&EventConfig> {
        match self {
            Self::Dossier(dossier) => Some(&dossier.config),
            Self::Overview(overview) => Some(&overview.config),
            Self::Missing { .. } => None,
        }
    }
}

/// Central application state (Elm architecture).
pub struct AppState<S: TableSource + 'static> {
    /// Whether the app is still running.
    pub running: bool,
    viewer: Viewer,
    bootstrap: EventConfig,
    service: BriefingService<S>,
    state_rx: watch::Receiver<BriefingState>,
    state: BriefingState,
    page: Page,
    /// Index into `page.entries()`.
    selected: usize,
    /// Titles of expanded documents.
    open: HashSet<String>,
    reloading: bool,
}

impl<S: TableSource + 'static> AppState<S> {
    pub fn new(viewer: Viewer, bootstrap: EventConfig, service: BriefingService<S>) -> Self {
        let state_rx = service.subscribe();
        let state = service.current();
        let page = Page::build(&viewer, &state, &bootstrap);
        Self {
            running: true,
            viewer,
            bootstrap,
            service,
            state_rx,
            state,
            page,
            selected: 0,
            open: HashSet::new(),
            reloading: false,
        }
    }

    /// Schedule a reload after `delay`. The receiver already exists, so the
    /// published result always reaches [`AppEvent::StateChanged`].
    pub fn refresh_after(&mut self, delay: Duration) {
        self.reloading = true;
        self.service.spawn_refresh(delay);
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_open(&self, title: &str) -> bool {
        self.open.contains(title)
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.handle_event(AppEvent::Tick);
                }
                Ok(()) = self.state_rx.changed() => {
                    self.handle_event(AppEvent::StateChanged);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => {}
            AppEvent::StateChanged => {
                let state = self.state_rx.borrow_and_update().clone();
                self.apply_state(state);
            }
            AppEvent::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if let Some(action) = Action::from_key(key.code) {
                    self.handle_action(action);
                }
            }
            AppEvent::Input(_) => {}
        }
    }

    fn apply_state(&mut self, state: BriefingState) {
        debug!(advisory = ?state.advisory, "Briefing state changed");
        self.reloading = false;
        self.page = Page::build(&self.viewer, &state, &self.bootstrap);
        self.state = state;
        let len = self.page.entries().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::SelectNext => {
                let len = self.page.entries().len();
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            Action::SelectPrev => {
                self.selected = self.selected.saturating_sub(1);
            }
            Action::Toggle => {
                let Some(title) = self.page.entries().get(self.selected).map(|d| d.title.clone())
                else {
                    return;
                };
                if !self.open.remove(&title) {
                    self.open.insert(title);
                }
            }
            Action::Reload => {
                if !self.reloading {
                    info!("Manual reload requested");
                    self.refresh_after(Duration::ZERO);
                }
            }
            Action::Quit => {
                self.running = false;
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = AppLayout::compute(area, self.state.advisory.is_some());

        self.render_header(frame, layout.header);
        if let (Some(rect), Some(advisory)) = (layout.advisory, self.state.advisory) {
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" ! {advisory}"), theme::advisory())),
                rect,
            );
        }

        match &self.page {
            Page::Dossier(dossier) => {
                self.render_profile(frame, layout.list, dossier);
                self.render_documents(frame, layout.detail, "Documents", &dossier.documents);
            }
            Page::Overview(overview) => {
                self.render_roster(frame, layout.list, overview);
                self.render_documents(frame, layout.detail, "Broadcast", &overview.broadcast);
            }
            Page::Missing { slug } => {
                let lines = vec![
                    Line::raw(""),
                    Line::from(Span::styled("Character not found", theme::title())),
                    Line::raw(""),
                    Line::from(Span::styled(
                        format!("No character uses the code \"{slug}\"."),
                        theme::muted(),
                    )),
                ];
                frame.render_widget(
                    Paragraph::new(lines)
                        .alignment(Alignment::Center)
                        .block(theme::block_default("Dossier")),
                    layout.list,
                );
            }
        }

        self.render_status_bar(frame, layout.status);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let config = self.page.config().unwrap_or(&self.bootstrap);
        let mut run = format!("Run {}", config.run_info());
        if !config.run.venue.is_empty() {
            run.push_str(&format!(" · {}", config.run.venue));
        }
        let lines = vec![
            Line::from(vec![
                Span::styled(config.title.clone(), theme::title()),
                Span::raw("  "),
                Span::styled(config.organizer.clone(), theme::muted()),
            ]),
            Line::from(Span::styled(run, theme::muted())),
        ];
        frame.render_widget(
            Paragraph::new(lines).block(theme::block_default(&config.footer)),
            area,
        );
    }

    fn render_profile(&self, frame: &mut Frame, area: Rect, dossier: &Dossier) {
        let character = &dossier.character;
        let mut lines = vec![
            Line::from(Span::styled(character.name.clone(), theme::heading())),
            Line::from(Span::styled(character.group.clone(), theme::muted())),
            Line::raw(""),
        ];
        if !character.description.is_empty() {
            lines.push(Line::from(Span::styled(
                character.description.clone(),
                theme::body(),
            )));
            lines.push(Line::raw(""));
        }
        if let Some(profile) = &dossier.profile {
            lines.push(Line::from(Span::styled(
                profile.title.clone(),
                Style::default().fg(theme::kind_color(&profile.kind)),
            )));
            lines.extend(
                plain_lines(&profile.body, usize::from(area.width.saturating_sub(2)))
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l, theme::body()))),
            );
        }
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(theme::block_default("Dossier")),
            area,
        );
    }

    fn render_roster(&self, frame: &mut Frame, area: Rect, overview: &AdminOverview) {
        let stats = &overview.stats;
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Characters ", theme::muted()),
                Span::styled(stats.total_characters.to_string(), theme::heading()),
                Span::styled("  Documents ", theme::muted()),
                Span::styled(stats.total_documents.to_string(), theme::heading()),
            ]),
            Line::from(vec![
                Span::styled("Last update ", theme::muted()),
                Span::styled(stats.last_update.clone(), theme::body()),
            ]),
        ];
        if overview.needs_setup {
            lines.push(Line::from(Span::styled(
                "No spreadsheet configured. Run `dossier set-url <url>`.",
                theme::advisory(),
            )));
        }
        for (group, characters) in &overview.roster {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                format!("{group} ({})", characters.len()),
                theme::heading(),
            )));
            for character in characters {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(character.name.clone(), theme::body()),
                    Span::styled(format!("  {}", character.slug), theme::key_hint()),
                ]));
            }
        }
        frame.render_widget(
            Paragraph::new(lines).block(theme::block_default("Roster")),
            area,
        );
    }

    fn render_documents(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        documents: &GroupedDocuments,
    ) {
        let block = theme::block_focused(title);
        let inner = block.inner(area);

        let mut lines: Vec<Line> = Vec::new();
        let mut selected_line = 0usize;
        let mut index = 0usize;
        for (kind, docs) in documents {
            if !lines.is_empty() {
                lines.push(Line::raw(""));
            }
            lines.push(Line::from(Span::styled(
                kind.label().to_uppercase(),
                Style::default()
                    .fg(theme::kind_color(kind))
                    .add_modifier(Modifier::BOLD),
            )));
            for doc in docs {
                let open = self.is_open(&doc.title);
                let marker = if open { "▾" } else { "▸" };
                let style = if index == self.selected {
                    selected_line = lines.len();
                    theme::highlight()
                } else {
                    theme::body()
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{marker} {}", doc.title), style),
                    Span::styled(format!("  {}", doc.published_at), theme::key_hint()),
                ]));
                if open {
                    lines.extend(
                        plain_lines(&doc.body, usize::from(inner.width.saturating_sub(4)))
                            .into_iter()
                            .map(|l| Line::from(Span::styled(format!("    {l}"), theme::muted()))),
                    );
                }
                index += 1;
            }
        }
        if lines.is_empty() {
            lines.push(Line::from(Span::styled("No documents.", theme::muted())));
        }

        let visible = usize::from(inner.height.max(1));
        let scroll = selected_line.saturating_sub(visible - 1);
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
            area,
        );
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let source = if self.reloading {
            Span::styled("loading", Style::default().fg(theme::WARNING))
        } else if self.state.advisory.is_some() {
            Span::styled("fallback", Style::default().fg(theme::ERROR))
        } else {
            Span::styled("live", theme::muted())
        };

        let status = Line::from(vec![
            Span::styled(" DOSSIER ", theme::brand_badge()),
            Span::raw(" "),
            Span::styled(self.viewer.slug().to_string(), theme::heading()),
            Span::raw(" │ "),
            Span::styled("Data:", theme::key_hint()),
            Span::raw(" "),
            source,
            Span::raw(" │ "),
            Span::styled("↑↓", theme::key_hint()),
            Span::raw(":select "),
            Span::styled("Enter", theme::key_hint()),
            Span::raw(":open "),
            Span::styled("r", theme::key_hint()),
            Span::raw(":reload "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }
}
