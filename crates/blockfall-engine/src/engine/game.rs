use std::mem;

use arrayvec::ArrayVec;
use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::{AddCellsError, Board, Tetromino};

use super::{Controls, GameConfig, GameSeed, GameStats, PieceGenerator};

/// Whether cycles and controls currently have any effect.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// Outcome of one [`Game::cycle`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// The previously stuck piece was merged into the board and a new piece
    /// spawned.
    pub absorbed: bool,
    /// Rows destroyed during this cycle, in the order they were removed.
    ///
    /// A single piece can complete at most four rows.
    pub cleared_rows: ArrayVec<i32, 4>,
    /// The falling piece could not move down.
    pub stuck: bool,
    /// The falling piece got stuck above the board. The game has been stopped.
    pub game_over: bool,
}

/// One game: the board, the falling piece and everything needed to make new
/// pieces.
///
/// `Game` owns all of its state; the falling piece only borrows the board for
/// the duration of each move.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Button, Controls, Game, GameConfig};
///
/// let mut game = Game::new(GameConfig::default());
/// game.play();
///
/// let mut controls = Controls::new();
/// controls.press(Button::Left);
/// game.apply_controls(&controls);
///
/// let report = game.cycle().unwrap().unwrap();
/// assert!(report.cleared_rows.is_empty());
/// assert_eq!(game.stats().cycles(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    seed: GameSeed,
    generator: PieceGenerator,
    board: Board,
    falling_piece: Tetromino,
    status: GameStatus,
    stats: GameStats,
    last_game_stats: Option<GameStats>,
}

impl Game {
    /// Creates a stopped game with a random seed.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a reproducible piece
    /// sequence.
    #[must_use]
    pub fn with_seed(config: GameConfig, seed: GameSeed) -> Self {
        let mut generator = PieceGenerator::with_seed(seed);
        let board = Board::new(config.board_size);
        let falling_piece = spawn_piece(&mut generator, &config);
        Self {
            config,
            seed,
            generator,
            board,
            falling_piece,
            status: GameStatus::Stopped,
            stats: GameStats::new(),
            last_game_stats: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> GameSeed {
        self.seed
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Tetromino {
        &self.falling_piece
    }

    /// Replaces the falling piece without any legality check.
    pub fn set_falling_piece(&mut self, piece: Tetromino) {
        self.falling_piece = piece;
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Statistics of the most recently finished game, if any.
    #[must_use]
    pub fn last_game_stats(&self) -> Option<&GameStats> {
        self.last_game_stats.as_ref()
    }

    pub fn add_score(&mut self, points: u64) {
        self.stats.add_score(points);
    }

    pub fn play(&mut self) {
        self.status = GameStatus::Running;
    }

    pub fn pause(&mut self) {
        if self.status.is_running() {
            self.status = GameStatus::Paused;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            GameStatus::Running => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Running,
            GameStatus::Stopped => GameStatus::Stopped,
        };
    }

    /// Ends the current game and prepares a fresh one.
    ///
    /// The board is cleared, a new piece is spawned and the statistics are
    /// reset. If a game was in progress its statistics become
    /// [`Self::last_game_stats`].
    pub fn stop(&mut self) {
        let finished = mem::take(&mut self.stats);
        if !self.status.is_stopped() {
            self.last_game_stats = Some(finished);
        }
        self.board.clear();
        self.falling_piece = spawn_piece(&mut self.generator, &self.config);
        self.status = GameStatus::Stopped;
    }

    /// Applies the pressed buttons to the falling piece: left, right, down,
    /// then rotate.
    ///
    /// Does nothing unless the game is running.
    pub fn apply_controls(&mut self, controls: &Controls) {
        if !self.status.is_running() {
            return;
        }
        let board = &self.board;
        let piece = &mut self.falling_piece;
        if controls.left {
            piece.move_left(board);
        }
        if controls.right {
            piece.move_right(board);
        }
        if controls.down {
            piece.move_down(board);
        }
        if controls.rotate {
            piece.rotate(board, self.config.rotation_check);
        }
    }

    /// Advances the game by one tick.
    ///
    /// 1. A stuck piece is merged into the board and a new one spawns. Cells
    ///    above the visible area are merged too.
    /// 2. The falling piece moves down one row, or becomes stuck.
    /// 3. Every full row is destroyed, topmost first.
    /// 4. If the current piece is stuck and still above the board, the game is
    ///    over and stops.
    ///
    /// Returns `Ok(None)` when the game is not running. An error means the
    /// stuck piece could not be merged; the board is left unchanged.
    pub fn cycle(&mut self) -> Result<Option<CycleReport>, AddCellsError> {
        if !self.status.is_running() {
            return Ok(None);
        }

        let mut report = CycleReport::default();

        if self.falling_piece.is_stuck() {
            self.board.add_cells(self.falling_piece.cells())?;
            self.falling_piece = spawn_piece(&mut self.generator, &self.config);
            report.absorbed = true;
        }

        self.falling_piece.move_down(&self.board);

        while let Some(row) = self.board.row_to_destroy() {
            self.board.destroy_row(row);
            report.cleared_rows.push(row);
        }

        report.stuck = self.falling_piece.is_stuck();
        report.game_over = report.stuck && self.falling_piece.is_out_of_board();
        self.stats.record_cycle(&report);

        if report.game_over {
            self.stop();
        }

        Ok(Some(report))
    }
}

fn spawn_piece(generator: &mut PieceGenerator, config: &GameConfig) -> Tetromino {
    generator
        .draw(&config.theme)
        .spawn_at(config.board_size.spawn_point())
}
