/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for redraws.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// The briefing service published a new state.
    StateChanged,
}

/// High-level actions resolved from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectNext,
    SelectPrev,
    /// Open or close the selected document.
    Toggle,
    /// Re-run the sheet load.
    Reload,
    Quit,
}

impl Action {
    pub fn from_key(code: crossterm::event::KeyCode) -> Option<Self> {
        use crossterm::event::KeyCode;
        match code {
            KeyCode::Down | KeyCode::Char('j') => Some(Self::SelectNext),
            KeyCode::Up | KeyCode::Char('k') => Some(Self::SelectPrev),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Self::Toggle),
            KeyCode::Char('r') => Some(Self::Reload),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            _ => None,
        }
    }
}
