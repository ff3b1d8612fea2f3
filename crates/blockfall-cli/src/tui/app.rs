use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Trait for TUI applications.
///
/// Applications executed by `Tui::run()` must implement this trait.
pub trait App {
    /// Initializes the application.
    ///
    /// Called at the start of `Tui::run()`. Use this to configure the frame
    /// rate and the cycle interval.
    fn init(&mut self, tui: &mut Tui);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    /// Applies the input gathered since the previous frame.
    ///
    /// Called on each `TuiEvent::Frame`, right before `draw`.
    fn update_frame(&mut self, tui: &mut Tui);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);

    /// Advances the game logic (called on each `TuiEvent::Cycle`).
    fn update_cycle(&mut self, tui: &mut Tui) -> anyhow::Result<()>;
}
