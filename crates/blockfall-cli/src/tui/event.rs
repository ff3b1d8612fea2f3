use crossterm::event::Event as CrosstermEvent;

/// Events processed by TUI applications.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// Input application and rendering (based on `frame_interval`).
    Frame,
    /// Game logic step (based on `cycle_interval`).
    Cycle,
    /// Terminal events such as key input, mouse, and resize.
    Crossterm(CrosstermEvent),
}
