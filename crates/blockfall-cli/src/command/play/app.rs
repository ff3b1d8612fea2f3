use std::time::Duration;

use anyhow::Context as _;
use blockfall_engine::{Button, Controls, GameStatus};
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    record::{RecordingGame, SessionHistory},
    tui::{App, Tui},
    view::widgets::{GameDisplay, KeyBinding, KeyBindingDisplay},
};

/// Points awarded per destroyed row.
const POINTS_PER_ROW: u64 = 1;

const RUNNING_KEYS: &[KeyBinding] = &[
    (&["←", "→", "↓"], "Move"),
    (&["↑", "x"], "Rotate"),
    (&["p"], "Pause"),
    (&["r"], "Stop"),
    (&["q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding] = &[
    (&["p", "Enter"], "Resume"),
    (&["r"], "Stop"),
    (&["q"], "Quit"),
];
const STOPPED_KEYS: &[KeyBinding] = &[(&["Enter", "s"], "Play"), (&["q"], "Quit")];

#[derive(Debug)]
pub struct PlayApp {
    game: RecordingGame,
    controls: Controls,
    frame_interval: Duration,
    cycle_interval: Duration,
    /// The last game ended by reaching the top rather than by a stop key.
    game_over: bool,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(game: RecordingGame, frame_interval: Duration, cycle_interval: Duration) -> Self {
        Self {
            game,
            controls: Controls::new(),
            frame_interval,
            cycle_interval,
            game_over: false,
            is_exiting: false,
        }
    }

    pub fn into_history(self) -> SessionHistory {
        self.game.into_history()
    }

    fn handle_key(&mut self, tui: &mut Tui, code: KeyCode) {
        let status = self.game.status();
        match code {
            KeyCode::Left => self.controls.press(Button::Left),
            KeyCode::Right => self.controls.press(Button::Right),
            KeyCode::Down => self.controls.press(Button::Down),
            KeyCode::Up | KeyCode::Char('x') => self.controls.press(Button::Rotate),
            KeyCode::Enter | KeyCode::Char('s') if !status.is_running() => {
                self.game.play();
                self.game_over = false;
                tui.restart_cycle_clock();
            }
            KeyCode::Char('p') if !status.is_stopped() => {
                self.game.toggle_pause();
                tui.restart_cycle_clock();
            }
            KeyCode::Char('r') => {
                self.controls.release_all();
                self.game.stop();
                self.game_over = false;
            }
            KeyCode::Char('q') => self.is_exiting = true,
            _ => {}
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_frame_interval(self.frame_interval);
        tui.set_cycle_interval(Some(self.cycle_interval));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) {
        if let Some(event) = event.as_key_press_event() {
            self.handle_key(tui, event.code);
        }
    }

    fn update_frame(&mut self, _tui: &mut Tui) {
        self.game.apply_controls(&self.controls);
        // Terminals rarely report key releases, so every press lasts one frame.
        self.controls.release_all();
    }

    fn draw(&self, frame: &mut Frame) {
        let bindings = match self.game.status() {
            GameStatus::Running => RUNNING_KEYS,
            GameStatus::Paused => PAUSED_KEYS,
            GameStatus::Stopped => STOPPED_KEYS,
        };

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(
            GameDisplay::new(&self.game).game_over(self.game_over),
            main_area,
        );
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }

    fn update_cycle(&mut self, _tui: &mut Tui) -> anyhow::Result<()> {
        let report = self
            .game
            .cycle()
            .context("Failed to merge the stuck piece into the board")?;
        let Some(report) = report else {
            return Ok(());
        };
        if report.game_over {
            self.game_over = true;
        } else {
            let rows = report.cleared_rows.len() as u64;
            self.game.add_score(rows * POINTS_PER_ROW);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{GameConfig, GameSeed};

    use super::*;

    fn app() -> PlayApp {
        let game = RecordingGame::new(GameConfig::default(), Some(GameSeed::from_bytes([9; 16])), 10);
        PlayApp::new(game, Duration::from_millis(16), Duration::from_millis(800))
    }

    #[test]
    fn test_status_keys() {
        let mut app = app();
        let mut tui = Tui::new();

        app.handle_key(&mut tui, KeyCode::Char('p'));
        assert!(app.game.status().is_stopped());

        app.handle_key(&mut tui, KeyCode::Enter);
        assert!(app.game.status().is_running());

        app.handle_key(&mut tui, KeyCode::Char('p'));
        assert!(app.game.status().is_paused());
        app.handle_key(&mut tui, KeyCode::Char('p'));
        assert!(app.game.status().is_running());

        app.handle_key(&mut tui, KeyCode::Char('r'));
        assert!(app.game.status().is_stopped());
        assert_eq!(app.game.games_finished(), 1);

        app.handle_key(&mut tui, KeyCode::Char('s'));
        assert!(app.game.status().is_running());

        assert!(!app.should_exit());
        app.handle_key(&mut tui, KeyCode::Char('q'));
        assert!(app.should_exit());
    }

    #[test]
    fn test_move_keys_apply_on_next_frame() {
        let mut app = app();
        let mut tui = Tui::new();
        app.handle_key(&mut tui, KeyCode::Enter);
        let start = app.game.falling_piece().pivot();

        app.handle_key(&mut tui, KeyCode::Left);
        app.handle_key(&mut tui, KeyCode::Down);
        assert_eq!(app.game.falling_piece().pivot(), start);

        app.update_frame(&mut tui);
        assert_eq!(app.game.falling_piece().pivot().x, start.x - 1);
        assert_eq!(app.game.falling_piece().pivot().y, start.y + 1);
        assert_eq!(app.controls, Controls::new());

        // Nothing pressed: the next frame leaves the piece alone.
        app.update_frame(&mut tui);
        assert_eq!(app.game.falling_piece().pivot().x, start.x - 1);
    }

    #[test]
    fn test_cycle_advances_only_while_running() {
        let mut app = app();
        let mut tui = Tui::new();

        app.update_cycle(&mut tui).unwrap();
        assert_eq!(app.game.stats().cycles(), 0);

        app.handle_key(&mut tui, KeyCode::Enter);
        app.update_cycle(&mut tui).unwrap();
        assert_eq!(app.game.stats().cycles(), 1);
    }

    #[test]
    fn test_game_over_flag() {
        let mut app = app();
        let mut tui = Tui::new();
        app.handle_key(&mut tui, KeyCode::Enter);

        // Pieces drop straight down the middle, so no row ever fills.
        for _ in 0..100_000 {
            app.update_cycle(&mut tui).unwrap();
            if app.game_over {
                break;
            }
        }
        assert!(app.game_over);
        assert!(app.game.status().is_stopped());

        app.handle_key(&mut tui, KeyCode::Enter);
        assert!(!app.game_over);

        app.handle_key(&mut tui, KeyCode::Char('r'));
        assert!(!app.game_over);
        assert!(app.game.status().is_stopped());
    }
}
