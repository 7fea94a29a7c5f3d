mod direction;
mod engine;
mod snake;
mod speed;
mod state;
pub(crate) use self::direction::Direction;
use self::engine::GameEngine;
use self::state::{GameState, RunStatus};
use crate::app::Screen;
use crate::command::Command;
use crate::config::DisplayConfig;
use crate::consts;
use crate::util::{center_rect, get_display_area};
use crossterm::event::{poll, read, Event};
use log::debug;
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Position, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
    Frame,
};
use std::time::Instant;

/// The game screen: a [`GameState`] plus the engine that drives it, the
/// display settings, and the deadline for the next tick
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Game<R> {
    state: GameState,
    engine: GameEngine<R>,
    display: DisplayConfig,
    next_tick: Option<Instant>,
}

impl<R: Rng> Game<R> {
    pub(crate) fn new(display: DisplayConfig, rng: R) -> Game<R> {
        Game::with_bounds(consts::GRID_SIZE, display, rng)
    }

    fn with_bounds(bounds: Size, display: DisplayConfig, rng: R) -> Game<R> {
        let mut engine = GameEngine::new(rng);
        let state = engine.new_game(bounds);
        Game {
            state,
            engine,
            display,
            next_tick: None,
        }
    }

    /// Wait for either an input event or the next tick, whichever comes
    /// first, and handle it.
    ///
    /// Ticks are spaced by the current tick interval while the game is
    /// running and by [`IDLE_POLL`][consts::IDLE_POLL] otherwise.  Input and
    /// ticks are both handled on the calling thread, so a step never observes
    /// a half-applied input.
    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen<R>>> {
        let now = Instant::now();
        let wait = self.deadline(now).saturating_duration_since(now);
        if wait.is_zero() || !poll(wait)? {
            self.tick();
            Ok(None)
        } else {
            Ok(self.handle_event(read()?))
        }
    }

    /// Return the time of the next tick, scheduling it relative to `now` if
    /// none is pending
    fn deadline(&mut self, now: Instant) -> Instant {
        *self
            .next_tick
            .get_or_insert_with(|| now + self.state.poll_interval())
    }

    fn tick(&mut self) {
        let _ = self.engine.step(&mut self.state);
        self.next_tick = None;
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen<R>> {
        match Command::from_key_event(event.as_key_press_event()?)? {
            Command::Quit => return Some(Screen::Quit),
            Command::Turn(direction) => {
                if self.engine.turn(&mut self.state, direction) {
                    debug!("Next move: {}", self.state.pending_direction());
                } else {
                    debug!(
                        "Ignoring turn to {direction} while moving {}",
                        self.state.direction()
                    );
                }
            }
            Command::Toggle => self.engine.toggle(&mut self.state),
        }
        None
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = &self.state;
        let display = get_display_area(area);
        let [score_area, board_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(display);
        Line::styled(
            format!(
                " Score: {}  Speed: {:.1} tps",
                state.score(),
                state.speed().steps_per_second()
            ),
            consts::SCORE_BAR_STYLE,
        )
        .render(score_area, buf);

        let bounds = state.bounds();
        let block_size = Size {
            width: bounds
                .width
                .saturating_mul(consts::CELL_WIDTH)
                .saturating_add(2),
            height: bounds.height.saturating_add(2),
        };
        let block_area = center_rect(board_area, block_size);
        Block::bordered().render(block_area, buf);

        let level_area = block_area.inner(Margin::new(1, 1));
        let mut level = Canvas {
            area: level_area,
            buf,
        };
        if self.display.grid {
            for pos in Rect::from((Position::ORIGIN, bounds)).positions() {
                level.draw_cell(pos, consts::GRID_SYMBOL, consts::GRID_STYLE);
            }
        }
        if let Some(pos) = state.apple() {
            level.draw_cell(pos, consts::APPLE_SYMBOL, consts::APPLE_STYLE);
        }
        for &p in state.snake().cells() {
            level.draw_cell(p, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_BODY_STYLE);
        }
        // Draw the head last so that it replaces the body glyph drawn above
        let head = state.snake().head();
        match state.status() {
            RunStatus::Running => {
                level.draw_cell(head, consts::SNAKE_HEAD_SYMBOL, consts::SNAKE_HEAD_STYLE);
            }
            RunStatus::Paused => {
                level.draw_cell(head, consts::SNAKE_HEAD_SYMBOL, consts::SNAKE_HEAD_STYLE);
                level.overlay(&["Paused", "Press Space to resume"]);
            }
            RunStatus::Dead => {
                level.draw_cell(head, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
                let msg = format!("Game Over, Score: {}", state.score());
                level.overlay(&[msg.as_str(), "Press Space to restart"]);
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    /// Draw a grid cell, which spans [`CELL_WIDTH`][consts::CELL_WIDTH]
    /// columns; each column gets one character of `symbol`.
    fn draw_cell(&mut self, pos: Position, symbol: &str, style: Style) {
        let Some(x) = pos
            .x
            .checked_mul(consts::CELL_WIDTH)
            .and_then(|x| self.area.x.checked_add(x))
        else {
            return;
        };
        let Some(y) = self.area.y.checked_add(pos.y) else {
            return;
        };
        for (dx, ch) in (0..consts::CELL_WIDTH).zip(symbol.chars()) {
            let Some(x) = x.checked_add(dx) else {
                return;
            };
            if let Some(cell) = self.buf.cell_mut((x, y)) {
                cell.set_char(ch);
                cell.set_style(style);
            }
        }
    }

    /// Draw `lines` centered on the canvas, each padded with a space on
    /// either side
    fn overlay(&mut self, lines: &[&str]) {
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let mut y = self
            .area
            .y
            .saturating_add(self.area.height.saturating_sub(height) / 2);
        for &text in lines {
            let span = Span::styled(format!(" {text} "), consts::OVERLAY_STYLE);
            let width = u16::try_from(span.width())
                .unwrap_or(u16::MAX)
                .min(self.area.width);
            let x = self.area.x.saturating_add((self.area.width - width) / 2);
            span.render(
                Rect {
                    x,
                    y,
                    width,
                    height: 1,
                },
                self.buf,
            );
            y = y.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::collections::VecDeque;
    use std::time::Duration;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    const BOUNDS: Size = Size {
        width: 12,
        height: 6,
    };

    fn small_game(grid: bool) -> Game<ChaCha12Rng> {
        let mut game = Game::with_bounds(
            BOUNDS,
            DisplayConfig { grid },
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        );
        game.state.apple = Some(Position::new(2, 1));
        game
    }

    fn render(game: &Game<ChaCha12Rng>) -> Buffer {
        let area = Rect::new(0, 0, 26, 9);
        let mut buffer = Buffer::empty(area);
        game.render(area, &mut buffer);
        buffer
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(code.into())
    }

    #[test]
    fn new_game() {
        let game = small_game(false);
        let mut expected = Buffer::with_lines([
            " Score: 0  Speed: 7.1 tps",
            "┌────────────────────────┐",
            "│                        │",
            "│    ●                   │",
            "│                        │",
            "│          ██▓▓          │",
            "│                        │",
            "│                        │",
            "└────────────────────────┘",
        ]);
        expected.set_style(Rect::new(0, 0, 26, 1), consts::SCORE_BAR_STYLE);
        expected.set_style(Rect::new(5, 3, 2, 1), consts::APPLE_STYLE);
        expected.set_style(Rect::new(11, 5, 2, 1), consts::SNAKE_BODY_STYLE);
        expected.set_style(Rect::new(13, 5, 2, 1), consts::SNAKE_HEAD_STYLE);
        pretty_assertions::assert_eq!(render(&game), expected);
    }

    #[test]
    fn new_game_with_grid() {
        let game = small_game(true);
        let mut expected = Buffer::with_lines([
            " Score: 0  Speed: 7.1 tps",
            "┌────────────────────────┐",
            "│· · · · · · · · · · · · │",
            "│· · ● · · · · · · · · · │",
            "│· · · · · · · · · · · · │",
            "│· · · · · ██▓▓· · · · · │",
            "│· · · · · · · · · · · · │",
            "│· · · · · · · · · · · · │",
            "└────────────────────────┘",
        ]);
        expected.set_style(Rect::new(0, 0, 26, 1), consts::SCORE_BAR_STYLE);
        expected.set_style(Rect::new(1, 2, 24, 6), consts::GRID_STYLE);
        expected.set_style(Rect::new(5, 3, 2, 1), consts::APPLE_STYLE);
        expected.set_style(Rect::new(11, 5, 2, 1), consts::SNAKE_BODY_STYLE);
        expected.set_style(Rect::new(13, 5, 2, 1), consts::SNAKE_HEAD_STYLE);
        pretty_assertions::assert_eq!(render(&game), expected);
    }

    #[test]
    fn paused() {
        let mut game = small_game(false);
        assert!(game.handle_event(key(KeyCode::Char(' '))).is_none());
        assert_eq!(game.state.status(), RunStatus::Paused);
        let mut expected = Buffer::with_lines([
            " Score: 0  Speed: 7.1 tps",
            "┌────────────────────────┐",
            "│                        │",
            "│    ●                   │",
            "│         Paused         │",
            "│ Press Space to resume  │",
            "│                        │",
            "│                        │",
            "└────────────────────────┘",
        ]);
        expected.set_style(Rect::new(0, 0, 26, 1), consts::SCORE_BAR_STYLE);
        expected.set_style(Rect::new(5, 3, 2, 1), consts::APPLE_STYLE);
        expected.set_style(Rect::new(11, 5, 2, 1), consts::SNAKE_BODY_STYLE);
        expected.set_style(Rect::new(13, 5, 2, 1), consts::SNAKE_HEAD_STYLE);
        expected.set_style(Rect::new(9, 4, 8, 1), consts::OVERLAY_STYLE);
        expected.set_style(Rect::new(1, 5, 23, 1), consts::OVERLAY_STYLE);
        pretty_assertions::assert_eq!(render(&game), expected);
    }

    #[test]
    fn game_over() {
        let mut game = small_game(false);
        game.state.snake.cells = VecDeque::from([Position::new(1, 0), Position::new(0, 0)]);
        game.state.direction = Direction::Left;
        game.state.pending = Direction::Left;
        game.state.apple = Some(Position::new(8, 5));
        game.state.score = 3;
        let _ = game.engine.step(&mut game.state);
        assert_eq!(game.state.status(), RunStatus::Dead);
        let mut expected = Buffer::with_lines([
            " Score: 3  Speed: 7.1 tps",
            "┌────────────────────────┐",
            "│××██                    │",
            "│                        │",
            "│  Game Over, Score: 3   │",
            "│ Press Space to restart │",
            "│                        │",
            "│                ●       │",
            "└────────────────────────┘",
        ]);
        expected.set_style(Rect::new(0, 0, 26, 1), consts::SCORE_BAR_STYLE);
        expected.set_style(Rect::new(1, 2, 2, 1), consts::COLLISION_STYLE);
        expected.set_style(Rect::new(3, 2, 2, 1), consts::SNAKE_BODY_STYLE);
        expected.set_style(Rect::new(17, 7, 2, 1), consts::APPLE_STYLE);
        expected.set_style(Rect::new(2, 4, 21, 1), consts::OVERLAY_STYLE);
        expected.set_style(Rect::new(1, 5, 24, 1), consts::OVERLAY_STYLE);
        pretty_assertions::assert_eq!(render(&game), expected);
    }

    #[test]
    fn keys_drive_the_engine() {
        let mut game = small_game(false);
        assert!(game.handle_event(key(KeyCode::Up)).is_none());
        assert_eq!(game.state.pending_direction(), Direction::Up);
        assert!(game.handle_event(key(KeyCode::Left)).is_none());
        assert_eq!(game.state.pending_direction(), Direction::Up);
        assert!(game.handle_event(key(KeyCode::Char('x'))).is_none());
        assert!(game.handle_event(Event::FocusLost).is_none());
        assert_eq!(game.state.status(), RunStatus::Running);
        assert_eq!(
            game.handle_event(key(KeyCode::Char('q'))),
            Some(Screen::Quit)
        );
    }

    #[test]
    fn score_bar_sits_on_board() {
        let game = Game::new(
            DisplayConfig { grid: false },
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        );
        let area = Rect::new(0, 0, 100, 41);
        let mut buffer = Buffer::empty(area);
        game.render(area, &mut buffer);
        let row = |y: u16, xs: std::ops::Range<u16>| {
            xs.map(|x| buffer[(x, y)].symbol()).collect::<String>()
        };
        assert_eq!(row(6, 0..100).trim(), "");
        assert_eq!(row(7, 0..25).trim(), "");
        assert_eq!(row(7, 25..50), " Score: 0  Speed: 7.1 tps");
        assert_eq!(buffer[(25, 8)].symbol(), "┌");
        assert_eq!(buffer[(74, 8)].symbol(), "┐");
        assert_eq!(buffer[(25, 33)].symbol(), "└");
        assert_eq!(row(34, 0..100).trim(), "");
    }

    #[test]
    fn tick_schedule() {
        let mut game = small_game(false);
        let now = Instant::now();
        assert_eq!(game.deadline(now), now + consts::TICK_START);
        let later = now + Duration::from_millis(50);
        assert_eq!(game.deadline(later), now + consts::TICK_START);

        let _ = game.state.speed.speed_up();
        game.tick();
        assert_eq!(game.state.snake().head(), Position::new(7, 3));
        assert_eq!(game.deadline(later), later + Duration::from_millis(130));

        assert!(game.handle_event(key(KeyCode::Char(' '))).is_none());
        game.tick();
        assert_eq!(game.state.snake().head(), Position::new(7, 3));
        assert_eq!(game.deadline(now), now + consts::IDLE_POLL);
    }

    #[test]
    fn restart_after_game_over() {
        let mut game = small_game(false);
        game.state.status = RunStatus::Dead;
        game.state.score = 12;
        assert!(game.handle_event(key(KeyCode::Char(' '))).is_none());
        assert_eq!(game.state.status(), RunStatus::Running);
        assert_eq!(game.state.score(), 0);
        assert_eq!(game.state.bounds(), BOUNDS);
        assert_eq!(
            game.state.snake().cells(),
            &VecDeque::from([Position::new(5, 3), Position::new(6, 3)])
        );
    }
}
