use std::f64::consts::FRAC_PI_2;

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use super::{
    board::{Board, Cell, CellSource},
    geometry::{AffineMatrix, Point, translate_point},
    theme::Color,
};

/// Angle of a single `rotate` step.
pub const ROTATION_STEP: f64 = FRAC_PI_2;

/// Shape of a piece.
///
/// The discriminant is the shape index used by the reference templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum TetrominoKind {
    /// Four in a row.
    I = 0,
    /// 2×2 square.
    O = 1,
    /// Vertical bar with a foot to the right.
    S = 2,
    /// Staggered pair of columns.
    J = 3,
    /// Three in a row with a stem below the middle.
    T = 4,
}

impl Distribution<TetrominoKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TetrominoKind {
        match rng.random_range(0..TetrominoKind::LEN) {
            0 => TetrominoKind::I,
            1 => TetrominoKind::O,
            2 => TetrominoKind::S,
            3 => TetrominoKind::J,
            _ => TetrominoKind::T,
        }
    }
}

impl TetrominoKind {
    /// Number of piece kinds (5).
    pub const LEN: usize = 5;

    /// Cell offsets relative to the pivot, before any rotation.
    #[must_use]
    pub const fn offsets(self) -> [(i32, i32); Tetromino::CELL_COUNT] {
        match self {
            Self::I => [(-2, 0), (-1, 0), (0, 0), (1, 0)],
            Self::O => [(-1, 0), (0, 0), (-1, 1), (0, 1)],
            Self::S => [(0, -1), (0, 0), (0, 1), (1, 1)],
            Self::J => [(-1, -1), (-1, 0), (0, 0), (0, 1)],
            Self::T => [(-1, 0), (0, 0), (1, 0), (0, 1)],
        }
    }

    /// Cells of this shape anchored at `pivot`.
    #[must_use]
    pub fn template(self, pivot: Point, color: Color) -> [Cell; Tetromino::CELL_COUNT] {
        self.offsets()
            .map(|(dx, dy)| Cell::new(pivot.x + dx, pivot.y + dy, color))
    }
}

/// Direction a piece can be shifted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
        }
    }
}

/// Legality rule applied to rotations.
///
/// Moves always check both the board edges and the settled cells. Rotations
/// only check the edges by default, so a rotated piece may end up on top of
/// settled cells. `BoundsAndCollision` makes rotations follow the same rule as
/// moves.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum RotationCheck {
    #[default]
    BoundsOnly,
    BoundsAndCollision,
}

impl RotationCheck {
    fn allows(self, board: &Board, position: Point) -> bool {
        board.is_position_inside_or_above(position)
            && match self {
                Self::BoundsOnly => true,
                Self::BoundsAndCollision => !board.is_position_filled(position),
            }
    }
}

/// The falling piece.
///
/// A piece owns its four cells and the pivot it rotates around. It reads the
/// board to decide whether a move is legal but never writes to it; once a
/// downward move is refused the piece is stuck and stays where it is.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, BoardSize, Color, Point, Tetromino, TetrominoKind};
///
/// let board = Board::new(BoardSize::DEFAULT);
/// let mut piece = Tetromino::new(TetrominoKind::O, Point::new(6, 19), 0.0, Color::default());
///
/// assert!(piece.move_down(&board));
/// assert!(!piece.move_down(&board));
/// assert!(piece.is_stuck());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tetromino {
    kind: TetrominoKind,
    pivot: Point,
    cells: [Cell; Tetromino::CELL_COUNT],
    stuck: bool,
}

impl Tetromino {
    pub const CELL_COUNT: usize = 4;

    /// Builds the shape around `pivot` and applies `initial_rotation` without
    /// any legality check.
    #[must_use]
    pub fn new(kind: TetrominoKind, pivot: Point, initial_rotation: f64, color: Color) -> Self {
        let cells = kind.template(pivot, color);
        Self {
            kind,
            pivot,
            cells: rotated_cells(&cells, pivot, initial_rotation),
            stuck: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> TetrominoKind {
        self.kind
    }

    #[must_use]
    pub fn pivot(&self) -> Point {
        self.pivot
    }

    /// Returns a copy of the current cells.
    #[must_use]
    pub fn cells(&self) -> [Cell; Self::CELL_COUNT] {
        self.cells
    }

    #[must_use]
    pub fn is_stuck(&self) -> bool {
        self.stuck
    }

    /// Whether any cell is above the visible board.
    #[must_use]
    pub fn is_out_of_board(&self) -> bool {
        self.cells.iter().any(|cell| cell.y() < 0)
    }

    pub fn move_left(&mut self, board: &Board) -> bool {
        self.shift(Direction::Left, board)
    }

    pub fn move_right(&mut self, board: &Board) -> bool {
        self.shift(Direction::Right, board)
    }

    /// Moves one row down, or marks the piece as stuck if it cannot.
    pub fn move_down(&mut self, board: &Board) -> bool {
        self.shift(Direction::Down, board)
    }

    /// Moves the piece one cell in `direction`.
    ///
    /// Returns `false` and leaves the piece unchanged if any moved cell would
    /// leave the board (above the top is fine) or land on a settled cell. A
    /// refused downward move makes the piece stuck.
    pub fn shift(&mut self, direction: Direction, board: &Board) -> bool {
        if self.stuck {
            return false;
        }

        let (dx, dy) = direction.offset();
        let moved = self
            .cells
            .map(|cell| cell.moved_to(translate_point(cell.position, dx, dy)));
        let is_free = moved.iter().all(|cell| {
            board.is_position_inside_or_above(cell.position)
                && !board.is_position_filled(cell.position)
        });

        if !is_free {
            if direction.is_down() {
                self.stuck = true;
            }
            return false;
        }

        self.cells = moved;
        self.pivot = translate_point(self.pivot, dx, dy);
        true
    }

    /// Turns the piece a quarter turn clockwise around its pivot.
    ///
    /// The rotated cells are validated with `check`; a refused rotation
    /// changes nothing.
    pub fn rotate(&mut self, board: &Board, check: RotationCheck) -> bool {
        if self.stuck {
            return false;
        }

        let rotated = rotated_cells(&self.cells, self.pivot, ROTATION_STEP);
        if !rotated.iter().all(|cell| check.allows(board, cell.position)) {
            return false;
        }

        self.cells = rotated;
        true
    }
}

impl CellSource for Tetromino {
    fn snapshot(&self) -> Vec<Cell> {
        self.cells.to_vec()
    }
}

fn rotated_cells(
    cells: &[Cell; Tetromino::CELL_COUNT],
    pivot: Point,
    angle: f64,
) -> [Cell; Tetromino::CELL_COUNT] {
    let matrix = AffineMatrix::rotation_about(angle, pivot);
    cells.map(|cell| cell.moved_to(matrix.apply_to_point(cell.position)))
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        f64::consts::{FRAC_PI_2, PI},
    };

    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::BoardSize;

    const COLOR: Color = Color::rgb(0xF1, 0x59, 0x46);

    fn positions(piece: &Tetromino) -> HashSet<(i32, i32)> {
        piece.cells().iter().map(|cell| (cell.x(), cell.y())).collect()
    }

    fn set<const N: usize>(points: [(i32, i32); N]) -> HashSet<(i32, i32)> {
        points.into_iter().collect()
    }

    fn empty_board() -> Board {
        Board::new(BoardSize::DEFAULT)
    }

    #[test]
    fn test_templates() {
        let pivot = Point::new(6, 5);
        let expected = [
            (TetrominoKind::I, set([(4, 5), (5, 5), (6, 5), (7, 5)])),
            (TetrominoKind::O, set([(5, 5), (6, 5), (5, 6), (6, 6)])),
            (TetrominoKind::S, set([(6, 4), (6, 5), (6, 6), (7, 6)])),
            (TetrominoKind::J, set([(5, 4), (5, 5), (6, 5), (6, 6)])),
            (TetrominoKind::T, set([(5, 5), (6, 5), (7, 5), (6, 6)])),
        ];
        for (kind, cells) in expected {
            let piece = Tetromino::new(kind, pivot, 0.0, COLOR);
            assert_eq!(positions(&piece), cells, "{kind:?}");
            assert_eq!(piece.pivot(), pivot);
            assert!(piece.cells().iter().all(|cell| cell.color == COLOR));
        }
    }

    #[test]
    fn test_random_kinds_cover_all_shapes() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen = (0..200)
            .map(|_| rng.random::<TetrominoKind>())
            .collect::<HashSet<_>>();
        assert_eq!(seen.len(), TetrominoKind::LEN);
    }

    #[test]
    fn test_initial_rotation_is_applied() {
        let pivot = Point::new(6, 5);
        let quarter = Tetromino::new(TetrominoKind::I, pivot, FRAC_PI_2, COLOR);
        assert_eq!(positions(&quarter), set([(6, 3), (6, 4), (6, 5), (6, 6)]));

        let half = Tetromino::new(TetrominoKind::I, pivot, PI, COLOR);
        assert_eq!(positions(&half), set([(8, 5), (7, 5), (6, 5), (5, 5)]));

        let back = Tetromino::new(TetrominoKind::I, pivot, -FRAC_PI_2, COLOR);
        assert_eq!(positions(&back), set([(6, 7), (6, 6), (6, 5), (6, 4)]));
    }

    #[test]
    fn test_initial_rotation_is_unchecked() {
        let pivot = Point::new(0, 5);
        let piece = Tetromino::new(TetrominoKind::I, pivot, PI, COLOR);
        assert_eq!(positions(&piece), set([(2, 5), (1, 5), (0, 5), (-1, 5)]));
    }

    #[test]
    fn test_move_left_right_down() {
        let board = empty_board();
        let mut piece = Tetromino::new(TetrominoKind::O, Point::new(6, 5), 0.0, COLOR);

        assert!(piece.move_left(&board));
        assert_eq!(positions(&piece), set([(4, 5), (5, 5), (4, 6), (5, 6)]));
        assert_eq!(piece.pivot(), Point::new(5, 5));

        assert!(piece.move_right(&board));
        assert!(piece.move_right(&board));
        assert_eq!(positions(&piece), set([(6, 5), (7, 5), (6, 6), (7, 6)]));
        assert_eq!(piece.pivot(), Point::new(7, 5));

        assert!(piece.move_down(&board));
        assert_eq!(positions(&piece), set([(6, 6), (7, 6), (6, 7), (7, 7)]));
        assert_eq!(piece.pivot(), Point::new(7, 6));
        assert!(!piece.is_stuck());
    }

    #[test]
    fn test_move_against_walls_is_ignored() {
        let board = empty_board();
        let mut piece = Tetromino::new(TetrominoKind::I, Point::new(2, 5), 0.0, COLOR);
        let before = piece.clone();
        assert!(!piece.move_left(&board));
        assert_eq!(piece, before);

        let mut piece = Tetromino::new(TetrominoKind::I, Point::new(10, 5), 0.0, COLOR);
        let before = piece.clone();
        assert!(!piece.move_right(&board));
        assert_eq!(piece, before);
        assert!(!piece.is_stuck());
    }

    #[test]
    fn test_move_into_settled_cell_is_ignored() {
        let mut board = empty_board();
        board.add_cells([Cell::new(4, 5, COLOR)]).unwrap();
        let mut piece = Tetromino::new(TetrominoKind::O, Point::new(6, 5), 0.0, COLOR);
        let before = piece.clone();

        assert!(!piece.move_left(&board));
        assert_eq!(piece, before);
        assert!(!piece.is_stuck());
    }

    #[test]
    fn test_moves_above_board_are_allowed() {
        let board = empty_board();
        let mut piece = Tetromino::new(TetrominoKind::T, Point::new(6, -3), 0.0, COLOR);
        assert!(piece.is_out_of_board());
        assert!(piece.move_left(&board));
        assert!(piece.move_down(&board));
        assert_eq!(positions(&piece), set([(4, -2), (5, -2), (6, -2), (5, -1)]));
    }

    #[test]
    fn test_blocked_move_down_sticks_piece() {
        let board = empty_board();
        let mut piece = Tetromino::new(TetrominoKind::O, Point::new(6, 18), 0.0, COLOR);

        assert!(piece.move_down(&board));
        assert!(piece.move_down(&board));
        assert!(!piece.is_stuck());
        let landed = positions(&piece);
        assert_eq!(landed, set([(5, 20), (6, 20), (5, 21), (6, 21)]));

        assert!(!piece.move_down(&board));
        assert!(piece.is_stuck());
        assert_eq!(positions(&piece), landed);

        for _ in 0..3 {
            assert!(!piece.move_down(&board));
        }
        assert!(!piece.move_left(&board));
        assert!(!piece.rotate(&board, RotationCheck::BoundsOnly));
        assert_eq!(positions(&piece), landed);
        assert!(!piece.is_out_of_board());
    }

    #[test]
    fn test_sticks_on_settled_cells() {
        let mut board = empty_board();
        board.add_cells([Cell::new(6, 10, COLOR)]).unwrap();
        let mut piece = Tetromino::new(TetrominoKind::S, Point::new(6, 7), 0.0, COLOR);

        assert!(piece.move_down(&board));
        assert!(!piece.move_down(&board));
        assert!(piece.is_stuck());
        assert_eq!(positions(&piece), set([(6, 7), (6, 8), (6, 9), (7, 9)]));
    }

    #[test]
    fn test_stuck_above_board_is_out_of_board() {
        let mut board = empty_board();
        board.add_cells((0..12).map(|x| Cell::new(x, 0, COLOR))).unwrap();
        let mut piece = Tetromino::new(TetrominoKind::O, Point::new(6, -3), 0.0, COLOR);

        assert!(piece.move_down(&board));
        assert!(!piece.move_down(&board));
        assert!(piece.is_stuck());
        assert!(piece.is_out_of_board());
    }

    #[test]
    fn test_rotate_around_pivot() {
        let board = empty_board();
        let mut piece = Tetromino::new(TetrominoKind::T, Point::new(6, 5), 0.0, COLOR);

        assert!(piece.rotate(&board, RotationCheck::BoundsOnly));
        assert_eq!(positions(&piece), set([(6, 4), (6, 5), (6, 6), (5, 5)]));
        assert_eq!(piece.pivot(), Point::new(6, 5));

        for _ in 0..3 {
            assert!(piece.rotate(&board, RotationCheck::BoundsOnly));
        }
        assert_eq!(positions(&piece), set([(5, 5), (6, 5), (7, 5), (6, 6)]));
    }

    #[test]
    fn test_rotate_follows_moved_pivot() {
        let board = empty_board();
        let mut piece = Tetromino::new(TetrominoKind::I, Point::new(6, 5), 0.0, COLOR);
        assert!(piece.move_right(&board));
        assert!(piece.move_down(&board));

        assert!(piece.rotate(&board, RotationCheck::BoundsOnly));
        assert_eq!(positions(&piece), set([(7, 4), (7, 5), (7, 6), (7, 7)]));
    }

    #[test]
    fn test_rotate_out_of_bounds_is_rejected() {
        let board = empty_board();
        // Vertical I against the left wall: the next quarter turn reaches x = -1.
        let mut piece = Tetromino::new(TetrominoKind::I, Point::new(1, 5), -FRAC_PI_2, COLOR);
        assert_eq!(positions(&piece), set([(1, 4), (1, 5), (1, 6), (1, 7)]));
        let before = piece.clone();

        assert!(!piece.rotate(&board, RotationCheck::BoundsOnly));
        assert_eq!(piece, before);

        // Below the floor is rejected as well.
        let mut piece = Tetromino::new(TetrominoKind::I, Point::new(6, 21), 0.0, COLOR);
        assert!(!piece.rotate(&board, RotationCheck::BoundsOnly));
    }

    #[test]
    fn test_rotate_above_board_is_allowed() {
        let board = empty_board();
        let mut piece = Tetromino::new(TetrominoKind::I, Point::new(6, -3), 0.0, COLOR);
        assert!(piece.rotate(&board, RotationCheck::BoundsOnly));
        assert_eq!(positions(&piece), set([(6, -5), (6, -4), (6, -3), (6, -2)]));
    }

    #[test]
    fn test_rotation_check_policies_differ_on_settled_cells() {
        let mut board = empty_board();
        board.add_cells([Cell::new(6, 4, COLOR)]).unwrap();
        let piece = Tetromino::new(TetrominoKind::T, Point::new(6, 5), 0.0, COLOR);

        let mut bounds_only = piece.clone();
        assert!(bounds_only.rotate(&board, RotationCheck::BoundsOnly));
        assert!(
            bounds_only
                .cells()
                .iter()
                .any(|cell| board.is_position_filled(cell.position))
        );

        let mut strict = piece.clone();
        assert!(!strict.rotate(&board, RotationCheck::BoundsAndCollision));
        assert_eq!(strict, piece);
    }

    #[test]
    fn test_cells_is_a_copy() {
        let board = empty_board();
        let mut piece = Tetromino::new(TetrominoKind::O, Point::new(6, 5), 0.0, COLOR);
        let cells = piece.cells();
        assert!(piece.move_down(&board));
        assert_ne!(piece.cells(), cells);
        assert_eq!(piece.snapshot(), piece.cells().to_vec());
    }
}
