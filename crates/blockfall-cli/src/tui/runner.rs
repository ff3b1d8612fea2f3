use std::time::Duration;

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop};

/// TUI application runtime.
///
/// Manages the event loop and executes applications that implement the `App` trait.
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
}

impl Tui {
    /// Creates a new Tui.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time between two frames.
    pub fn set_frame_interval(&mut self, interval: Duration) {
        self.events.set_frame_interval(Some(interval));
    }

    /// Sets the cycle interval.
    ///
    /// Pass `None` to stop generating cycles.
    pub fn set_cycle_interval(&mut self, interval: Option<Duration>) {
        self.events.set_cycle_interval(interval);
    }

    /// Delays the next cycle by a full interval from now.
    pub fn restart_cycle_clock(&mut self) {
        self.events.restart_cycle_clock();
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()` for initialization
    /// 2. Runs the event loop until `app.should_exit()` returns true
    ///    - `TuiEvent::Frame`: calls `app.update_frame()` then `app.draw()`
    ///    - `TuiEvent::Cycle`: calls `app.update_cycle()`
    ///    - `TuiEvent::Crossterm`: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Frame => {
                        app.update_frame(&mut self);
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Cycle => {
                        app.update_cycle(&mut self)?;
                    }
                    TuiEvent::Crossterm(event) => {
                        app.handle_event(&mut self, event);
                    }
                }
            }
            Ok(())
        })
    }
}
