//! Falling-block game engine.
//!
//! The [`core`] module holds the data model (grid geometry, the settled
//! [`Board`] and the falling [`Tetromino`]); the [`engine`] module drives it
//! with the per-tick [`Game::cycle`], piece generation and statistics.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Why [`Board::add_cells`] refused a batch of cells.
///
/// Both variants point at a bug in the caller; the board is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AddCellsError {
    #[display("cell at {position} overlaps a settled cell")]
    Overlap { position: Point },
    #[display("cell at {position} is outside the board")]
    OutsideBoard { position: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("board size {width}x{height} is too small (each side must be at least 4)")]
pub struct BoardSizeError {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid color: expected '#rrggbb'")]
pub struct ParseColorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed: expected 32 hex digits")]
pub struct ParseSeedError;
