use blockfall_engine::{Board, Cell, CellSource as _, Color as EngineColor, Tetromino};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::{color, style};

/// Terminal columns used by one board cell.
const CELL_WIDTH: u16 = 2;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling_piece: Option<&'a Tetromino>,
    background: EngineColor,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board, background: EngineColor) -> Self {
        Self {
            board,
            falling_piece: None,
            background,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: &'a Tetromino) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn columns(&self) -> u16 {
        u16::try_from(self.board.size().width()).unwrap_or(u16::MAX)
    }

    fn rows(&self) -> u16 {
        u16::try_from(self.board.size().height()).unwrap_or(u16::MAX)
    }

    fn grid_width(&self) -> u16 {
        self.columns().saturating_mul(CELL_WIDTH)
    }

    pub fn width(&self) -> u16 {
        self.grid_width()
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        self.rows()
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }

    /// Settled and falling cells that lie on the visible board.
    fn visible_cells(&self) -> impl Iterator<Item = Cell> {
        let board = self.board;
        let piece_cells = self
            .falling_piece
            .map(|piece| piece.snapshot())
            .unwrap_or_default();
        board
            .snapshot()
            .into_iter()
            .chain(piece_cells)
            .filter(move |cell| board.is_position_inside(cell.position))
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let grid = Rect::new(area.x, area.y, self.grid_width(), self.rows());
        buf.set_style(
            area.intersection(grid),
            style::bg_only(color::from_engine(self.background)),
        );

        for cell in self.visible_cells() {
            // Both coordinates are non-negative and inside the board here.
            let (Ok(x), Ok(y)) = (u16::try_from(cell.x()), u16::try_from(cell.y())) else {
                continue;
            };
            let rect = Rect::new(
                area.x.saturating_add(x.saturating_mul(CELL_WIDTH)),
                area.y.saturating_add(y),
                CELL_WIDTH,
                1,
            );
            buf.set_style(
                area.intersection(rect),
                style::bg_only(color::from_engine(cell.color)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{BoardSize, Point, TetrominoKind};
    use ratatui::style::Color;

    use super::*;

    const BACKGROUND: EngineColor = EngineColor::rgb(0xFF, 0xFF, 0xFF);
    const SETTLED: EngineColor = EngineColor::rgb(0x25, 0x4E, 0x70);
    const FALLING: EngineColor = EngineColor::rgb(0xF1, 0x59, 0x46);

    fn bg_at(buf: &Buffer, x: u16, y: u16) -> Option<Color> {
        buf.cell((x, y)).map(|cell| cell.bg)
    }

    #[test]
    fn test_render_cells_and_background() {
        let mut board = Board::new(BoardSize::new(4, 4).unwrap());
        board.add_cells([Cell::new(0, 3, SETTLED)]).unwrap();
        // A T piece around (2, 0) with its top row on the board.
        let piece = Tetromino::new(TetrominoKind::T, Point::new(2, 0), 0.0, FALLING);

        let display = BoardDisplay::new(&board, BACKGROUND).falling_piece(&piece);
        assert_eq!(display.width(), 8);
        assert_eq!(display.height(), 4);

        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);

        assert_eq!(bg_at(&buf, 0, 3), Some(color::from_engine(SETTLED)));
        assert_eq!(bg_at(&buf, 1, 3), Some(color::from_engine(SETTLED)));
        assert_eq!(bg_at(&buf, 2, 0), Some(color::from_engine(FALLING)));
        assert_eq!(bg_at(&buf, 4, 1), Some(color::from_engine(FALLING)));
        assert_eq!(bg_at(&buf, 0, 0), Some(color::from_engine(BACKGROUND)));
        assert_eq!(bg_at(&buf, 7, 3), Some(color::from_engine(BACKGROUND)));
    }

    #[test]
    fn test_cells_above_board_are_hidden() {
        let board = Board::new(BoardSize::new(4, 4).unwrap());
        let piece = Tetromino::new(TetrominoKind::I, Point::new(2, -3), 0.0, FALLING);
        let display = BoardDisplay::new(&board, BACKGROUND).falling_piece(&piece);
        assert_eq!(display.visible_cells().count(), 0);

        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        assert!(buf.content().iter().all(|c| c.bg == color::from_engine(BACKGROUND)));
    }

    #[test]
    fn test_very_wide_board_saturates() {
        let mut board = Board::new(BoardSize::new(40_000, 4).unwrap());
        board.add_cells([Cell::new(39_999, 3, SETTLED)]).unwrap();
        let display = BoardDisplay::new(&board, BACKGROUND).block(BlockWidget::bordered());
        assert_eq!(display.width(), u16::MAX);
        assert_eq!(display.height(), 6);

        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        assert_eq!(bg_at(&buf, 1, 1), Some(color::from_engine(BACKGROUND)));
    }
}
