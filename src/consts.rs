//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Width & height of the playing field, in grid cells
pub(crate) const GRID_SIZE: Size = Size {
    width: 24,
    height: 24,
};

/// Number of terminal columns used to draw a single grid cell, so that cells
/// come out roughly square
pub(crate) const CELL_WIDTH: u16 = 2;

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window: one row for the score bar plus the bordered board.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: GRID_SIZE.width * CELL_WIDTH + 2,
    height: GRID_SIZE.height + 3,
};

/// Time between movements of the snake at the start of a game
pub(crate) const TICK_START: Duration = Duration::from_millis(140);

/// The tick interval never drops below this
pub(crate) const TICK_MIN: Duration = Duration::from_millis(70);

/// How much the tick interval shrinks at each speed-up
pub(crate) const TICK_DECREMENT: Duration = Duration::from_millis(10);

/// The snake speeds up each time the score reaches a multiple of this
pub(crate) const SPEEDUP_EVERY: u32 = 4;

/// How often to wake up while the game is paused or over
pub(crate) const IDLE_POLL: Duration = Duration::from_millis(100);

/// Glyphs for an empty cell when the grid is shown
pub(crate) const GRID_SYMBOL: &str = "· ";

/// Glyphs for the snake's head
pub(crate) const SNAKE_HEAD_SYMBOL: &str = "▓▓";

/// Glyphs for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: &str = "██";

/// Glyphs for the apple
pub(crate) const APPLE_SYMBOL: &str = "● ";

/// Glyphs for the snake's head once it has hit a wall or itself
pub(crate) const COLLISION_SYMBOL: &str = "××";

/// Style for the grid dots
pub(crate) const GRID_STYLE: Style = Style::new().fg(Color::DarkGray);

/// Style for the snake's head
pub(crate) const SNAKE_HEAD_STYLE: Style = Style::new()
    .fg(Color::Magenta)
    .add_modifier(Modifier::BOLD);

/// Style for the snake's body
pub(crate) const SNAKE_BODY_STYLE: Style = Style::new().fg(Color::LightBlue);

/// Style for the apple
pub(crate) const APPLE_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the pause & game-over messages drawn over the board
pub(crate) const OVERLAY_STYLE: Style = Style::new()
    .fg(Color::White)
    .bg(Color::Black)
    .add_modifier(Modifier::BOLD);
