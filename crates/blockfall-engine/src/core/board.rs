use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{AddCellsError, BoardSizeError};

use super::{geometry::Point, theme::Color};

/// One block on the grid: a position plus the color it is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Cell {
    pub position: Point,
    pub color: Color,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32, color: Color) -> Self {
        Self {
            position: Point::new(x, y),
            color,
        }
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.position.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.position.y
    }

    #[must_use]
    pub const fn moved_to(self, position: Point) -> Self {
        Self { position, ..self }
    }
}

/// Something that can hand out a snapshot of its cells for drawing.
///
/// Implemented by [`Board`] (settled cells) and
/// [`Tetromino`](super::tetromino::Tetromino) (falling cells).
pub trait CellSource {
    fn snapshot(&self) -> Vec<Cell>;
}

/// Board dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RawBoardSize")]
pub struct BoardSize {
    width: u16,
    height: u16,
}

#[derive(Deserialize)]
struct RawBoardSize {
    width: u16,
    height: u16,
}

impl TryFrom<RawBoardSize> for BoardSize {
    type Error = BoardSizeError;

    fn try_from(raw: RawBoardSize) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BoardSize {
    /// Smallest accepted width and height.
    pub const MIN_SIDE: u16 = 4;

    pub const DEFAULT: Self = Self {
        width: 12,
        height: 22,
    };

    pub fn new(width: u16, height: u16) -> Result<Self, BoardSizeError> {
        if width < Self::MIN_SIDE || height < Self::MIN_SIDE {
            return Err(BoardSizeError { width, height });
        }
        Ok(Self { width, height })
    }

    #[must_use]
    pub fn width(self) -> i32 {
        i32::from(self.width)
    }

    #[must_use]
    pub fn height(self) -> i32 {
        i32::from(self.height)
    }

    /// Where new pieces appear: horizontally centered, three rows above the board.
    #[must_use]
    pub fn spawn_point(self) -> Point {
        Point::new(self.width() / 2, -3)
    }
}

/// Storage key ordering cells row by row, top to bottom, then left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct RowMajorKey {
    y: i32,
    x: i32,
}

impl From<Point> for RowMajorKey {
    fn from(Point { x, y }: Point) -> Self {
        Self { y, x }
    }
}

impl RowMajorKey {
    const fn row_start(y: i32) -> Self {
        Self { y, x: i32::MIN }
    }

    const fn position(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// The grid of settled cells.
///
/// No two cells share a position, and every stored cell has `0 <= x < width`
/// and `y < height`. Cells above the visible area (`y < 0`) are allowed; they
/// come from a piece that got stuck while still spawning.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, BoardSize, Cell, Color, Point};
///
/// let mut board = Board::new(BoardSize::DEFAULT);
/// board.add_cells([Cell::new(3, 21, Color::default())]).unwrap();
///
/// assert!(board.is_position_filled(Point::new(3, 21)));
/// assert!(board.add_cells([Cell::new(3, 21, Color::default())]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: BoardSize,
    cells: BTreeMap<RowMajorKey, Color>,
}

impl Board {
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            cells: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn size(&self) -> BoardSize {
        self.size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Removes every cell.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Iterates over the settled cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().map(|(key, color)| Cell {
            position: key.position(),
            color: *color,
        })
    }

    /// Inserts all cells, or none of them.
    ///
    /// Fails if a position is already occupied, appears twice in `cells`, or
    /// lies outside the columns or below the floor. The board is left
    /// untouched on failure.
    pub fn add_cells<I>(&mut self, cells: I) -> Result<(), AddCellsError>
    where
        I: IntoIterator<Item = Cell>,
    {
        let cells = cells.into_iter().collect::<Vec<_>>();

        let mut incoming = BTreeSet::new();
        for cell in &cells {
            let position = cell.position;
            if !self.is_position_inside_or_above(position) {
                return Err(AddCellsError::OutsideBoard { position });
            }
            if self.is_position_filled(position) || !incoming.insert(RowMajorKey::from(position)) {
                return Err(AddCellsError::Overlap { position });
            }
        }

        self.cells.extend(
            cells
                .into_iter()
                .map(|cell| (RowMajorKey::from(cell.position), cell.color)),
        );
        Ok(())
    }

    #[must_use]
    pub fn is_position_filled(&self, position: Point) -> bool {
        self.cells.contains_key(&RowMajorKey::from(position))
    }

    /// Strict containment: inside the columns and inside the visible rows.
    #[must_use]
    pub fn is_position_inside(&self, position: Point) -> bool {
        self.is_position_inside_or_above(position) && position.y >= 0
    }

    /// Relaxed containment for falling pieces: inside the columns and not
    /// below the floor, but possibly above the top edge.
    #[must_use]
    pub fn is_position_inside_or_above(&self, position: Point) -> bool {
        (0..self.size.width()).contains(&position.x) && position.y < self.size.height()
    }

    /// Returns the topmost row whose occupied cell count reaches the board width.
    #[must_use]
    pub fn row_to_destroy(&self) -> Option<i32> {
        let width = usize::from(self.size.width);
        let mut current_row = None;
        let mut count = 0;
        for key in self.cells.keys() {
            if current_row == Some(key.y) {
                count += 1;
            } else {
                current_row = Some(key.y);
                count = 1;
            }
            if count >= width {
                return current_row;
            }
        }
        None
    }

    /// Removes every cell of `row` and moves each cell above it one row down.
    ///
    /// Cells below `row` stay where they are.
    pub fn destroy_row(&mut self, row: i32) {
        let mut at_or_below = self.cells.split_off(&RowMajorKey::row_start(row));
        at_or_below.retain(|key, _| key.y != row);
        let above = std::mem::replace(&mut self.cells, at_or_below);
        self.cells.extend(
            above
                .into_iter()
                .map(|(key, color)| (RowMajorKey { y: key.y + 1, ..key }, color)),
        );
    }
}

impl CellSource for Board {
    fn snapshot(&self) -> Vec<Cell> {
        self.cells().collect()
    }
}
