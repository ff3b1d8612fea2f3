use serde::{Deserialize, Serialize};

use super::CycleReport;

/// Counters for one game.
///
/// The score is never derived from the other counters: only the front end
/// decides what a cleared row is worth, through [`Game::add_score`](super::Game::add_score).
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.add_score(3);
/// assert_eq!(stats.score(), 3);
/// assert_eq!(stats.cleared_rows(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameStats {
    score: u64,
    cycles: u64,
    absorbed_pieces: u64,
    cleared_rows: u64,
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            cycles: 0,
            absorbed_pieces: 0,
            cleared_rows: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Number of cycles run.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Number of stuck pieces merged into the board.
    #[must_use]
    pub const fn absorbed_pieces(&self) -> u64 {
        self.absorbed_pieces
    }

    #[must_use]
    pub const fn cleared_rows(&self) -> u64 {
        self.cleared_rows
    }

    pub const fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Folds the outcome of one cycle into the counters.
    pub fn record_cycle(&mut self, report: &CycleReport) {
        self.cycles += 1;
        if report.absorbed {
            self.absorbed_pieces += 1;
        }
        self.cleared_rows += report.cleared_rows.len() as u64;
    }
}
