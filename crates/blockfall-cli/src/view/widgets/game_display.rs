use blockfall_engine::{Game, GameStats, GameStatus};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::view::widgets::{BoardDisplay, StatsDisplay, color, style};

/// Board, statistics and the start / pause overlays of one game.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    game: &'a Game,
    game_over: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> GameDisplay<'a> {
    pub fn new(game: &'a Game) -> Self {
        Self {
            game,
            game_over: false,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    /// Shows the game-over overlay while the game is stopped.
    pub fn game_over(self, game_over: bool) -> Self {
        Self { game_over, ..self }
    }

    fn popup(&self) -> Option<(Vec<Line<'static>>, Style)> {
        match self.game.status() {
            GameStatus::Running => None,
            GameStatus::Paused => Some((
                vec![Line::from("PAUSED"), Line::from("P to resume")],
                style::PAUSED_POPUP,
            )),
            GameStatus::Stopped if self.game_over => {
                let score = self.game.last_game_stats().map_or(0, GameStats::score);
                Some((
                    vec![
                        Line::from("GAME OVER"),
                        Line::from(format!("SCORE {score}")),
                        Line::from("ENTER to play again"),
                    ],
                    style::GAME_OVER_POPUP,
                ))
            }
            GameStatus::Stopped => Some((
                vec![Line::from("BLOCKFALL"), Line::from("ENTER to start")],
                style::START_POPUP,
            )),
        }
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.game.status() {
            GameStatus::Running => color::WHITE,
            GameStatus::Paused => color::YELLOW,
            GameStatus::Stopped => color::GRAY,
        };

        let game_board = BoardDisplay::new(self.game.board(), self.game.config().theme.background)
            .falling_piece(self.game.falling_piece())
            .block(
                Block::bordered()
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let stats = StatsDisplay::new(self.game).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [left_column, center_column] = Layout::horizontal([
            Constraint::Length(stats.width()),
            Constraint::Length(game_board.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] = Layout::vertical([Constraint::Length(stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);

        let game_board_width = game_board.width();
        stats.render(stats_area, buf);
        game_board.render(board_area, buf);

        if let Some((lines, style)) = self.popup() {
            let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
            let block = Block::new().style(style);
            let text = Text::from(lines).style(style).centered();
            let area = board_area.centered(
                Constraint::Length(game_board_width),
                Constraint::Length(height),
            );
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(
                inner.centered_vertically(Constraint::Length(height - 2)),
                buf,
            );
        }
    }
}
