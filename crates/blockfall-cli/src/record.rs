use std::{
    collections::VecDeque,
    fs::{self, File},
    io::{BufWriter, Write as _},
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::Context;
use blockfall_engine::{
    AddCellsError, CellSource as _, Controls, CycleReport, Game, GameConfig, GameSeed, GameStats,
};
use chrono::Utc;
use rand::Rng as _;

use crate::schema::record::{CycleRecord, RecordedSession};

/// A wrapper around [`Game`] that records eventful cycles.
///
/// Before every cycle the board and the falling piece are captured. If the
/// cycle absorbed a piece, cleared rows or ended the game, the snapshot is
/// kept together with the outcome. Use [`into_history`](Self::into_history)
/// to extract the recorded history when the session ends.
#[derive(Debug)]
pub struct RecordingGame {
    game: Game,
    history: SessionHistory,
    game_index: usize,
}

/// Provides read-only access to the underlying `Game`.
///
/// `DerefMut` is not implemented: cycles must go through
/// [`RecordingGame::cycle`] to be recorded.
impl Deref for RecordingGame {
    type Target = Game;

    fn deref(&self) -> &Self::Target {
        &self.game
    }
}

impl RecordingGame {
    /// Creates a stopped game.
    ///
    /// A random seed is drawn when `seed` is `None`. `history_size` is the
    /// maximum number of cycle records kept in memory.
    pub fn new(config: GameConfig, seed: Option<GameSeed>, history_size: usize) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        let history = SessionHistory::new(seed, config.clone(), history_size);
        let game = Game::with_seed(config, seed);
        Self {
            game,
            history,
            game_index: 0,
        }
    }

    /// Number of games that ended, by game over or by [`Self::stop`].
    pub fn games_finished(&self) -> usize {
        self.game_index
    }

    /// Consumes the game and returns the recorded history with the final
    /// statistics filled in.
    pub fn into_history(mut self) -> SessionHistory {
        self.history.set_stats(
            self.game.stats().clone(),
            self.game.last_game_stats().cloned(),
        );
        self.history
    }

    pub fn play(&mut self) {
        self.game.play();
    }

    pub fn toggle_pause(&mut self) {
        self.game.toggle_pause();
    }

    pub fn stop(&mut self) {
        if !self.game.status().is_stopped() {
            self.game_index += 1;
        }
        self.game.stop();
    }

    pub fn apply_controls(&mut self, controls: &Controls) {
        self.game.apply_controls(controls);
    }

    pub fn add_score(&mut self, points: u64) {
        self.game.add_score(points);
    }

    pub fn cycle(&mut self) -> Result<Option<CycleReport>, AddCellsError> {
        let board = self.game.board().snapshot();
        let falling_piece = self.game.falling_piece().snapshot();

        let report = self.game.cycle()?;

        if let Some(report) = &report
            && (report.absorbed || !report.cleared_rows.is_empty() || report.game_over)
        {
            let cycle = if report.game_over {
                self.game.last_game_stats().map_or(0, GameStats::cycles)
            } else {
                self.game.stats().cycles()
            };
            self.history.record(CycleRecord {
                game: self.game_index,
                cycle,
                board,
                falling_piece,
                absorbed: report.absorbed,
                cleared_rows: report.cleared_rows.to_vec(),
                game_over: report.game_over,
            });
            if report.game_over {
                self.game_index += 1;
            }
        }

        Ok(report)
    }
}

/// Recorded history of a play session.
///
/// Contains the seed and configuration needed to replay the session, the
/// statistics at the end and a ring buffer of recent cycle records.
///
/// This type is created by [`RecordingGame::into_history`] and can be saved
/// to a file using [`save`](Self::save).
#[derive(Debug)]
pub struct SessionHistory {
    seed: GameSeed,
    config: GameConfig,
    final_stats: GameStats,
    last_game_stats: Option<GameStats>,
    buffer: RingBuffer<CycleRecord>,
}

impl SessionHistory {
    fn new(seed: GameSeed, config: GameConfig, capacity: usize) -> Self {
        Self {
            seed,
            config,
            final_stats: GameStats::new(),
            last_game_stats: None,
            buffer: RingBuffer::with_capacity(capacity),
        }
    }

    fn record(&mut self, record: CycleRecord) {
        self.buffer.push(record);
    }

    fn set_stats(&mut self, final_stats: GameStats, last_game_stats: Option<GameStats>) {
        self.final_stats = final_stats;
        self.last_game_stats = last_game_stats;
    }

    pub fn to_recorded_session(&self) -> RecordedSession {
        RecordedSession {
            recorded_at: Utc::now(),
            seed: self.seed,
            config: self.config.clone(),
            final_stats: self.final_stats.clone(),
            last_game_stats: self.last_game_stats.clone(),
            cycles: self.buffer.to_vec(),
        }
    }

    /// Saves the recorded session to a JSON file.
    ///
    /// The filename is generated from the current timestamp:
    /// `session_{YYYYMMDD_HHMMSS}.json`. The directory is created if it does
    /// not exist. Returns the path of the written file.
    pub fn save(&self, record_dir: &Path) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(record_dir)
            .with_context(|| format!("Failed to create directory {}", record_dir.display()))?;

        let data = self.to_recorded_session();
        let filename = format!("session_{}.json", data.recorded_at.format("%Y%m%d_%H%M%S"));
        let filepath = record_dir.join(filename);

        let file = File::create(&filepath)
            .with_context(|| format!("Failed to create file: {}", filepath.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &data)
            .with_context(|| format!("Failed to write JSON to {}", filepath.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush output to {}", filepath.display()))?;

        Ok(filepath)
    }
}

/// A fixed-capacity ring buffer that overwrites oldest entries when full.
#[derive(Debug)]
struct RingBuffer<T> {
    capacity: usize,
    buf: VecDeque<T>,
}

impl<T> RingBuffer<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            buf: VecDeque::with_capacity(capacity),
        }
    }

    fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.buf.len() >= self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(item);
    }

    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.buf.iter().cloned().collect()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.buf.len()
    }
}
