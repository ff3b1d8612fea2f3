//! Game driving logic built on top of [`crate::core`].
//!
//! - [`Game`] - Owns the board, the falling piece and the piece generator and
//!   advances them one [`Game::cycle`] at a time
//! - [`GameStatus`] - Stopped / running / paused state machine
//! - [`Controls`] - Button states applied to the falling piece once per frame
//! - [`PieceGenerator`] - Seeded random source for shape, rotation and color
//! - [`GameStats`] - Counters for the current game
//! - [`GameConfig`] - Board size, color theme and rotation policy
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Game, GameConfig};
//!
//! let mut game = Game::new(GameConfig::default());
//! assert!(game.cycle().unwrap().is_none()); // stopped games do nothing
//!
//! game.play();
//! let report = game.cycle().unwrap().unwrap();
//! assert!(!report.game_over);
//! ```

pub use self::{config::*, controls::*, game::*, game_stats::*, piece_generator::*};

mod config;
mod controls;
mod game;
mod game_stats;
mod piece_generator;
