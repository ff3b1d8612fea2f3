use blockfall_engine::{Cell, GameConfig, GameSeed, GameStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recorded play session with the metadata needed to reproduce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedSession {
    /// Timestamp when recording was created (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Seed used for piece generation
    pub seed: GameSeed,
    /// Board size, theme and rotation policy of the session
    pub config: GameConfig,
    /// Statistics of the game in progress when the session ended
    pub final_stats: GameStats,
    /// Statistics of the last finished game, if any
    pub last_game_stats: Option<GameStats>,
    /// Most recent eventful cycles, oldest first
    pub cycles: Vec<CycleRecord>,
}

/// One cycle that absorbed a piece, cleared rows or ended a game.
///
/// The board and falling piece are captured right before the cycle ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    /// Index of the game within the session (0-indexed)
    pub game: usize,
    /// Cycle number within that game (1-indexed)
    pub cycle: u64,
    pub board: Vec<Cell>,
    pub falling_piece: Vec<Cell>,
    pub absorbed: bool,
    pub cleared_rows: Vec<i32>,
    pub game_over: bool,
}
