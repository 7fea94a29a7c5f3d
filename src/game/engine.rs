use super::direction::Direction;
use super::state::{GameState, RunStatus};
use crate::consts;
use log::{debug, info, warn};
use rand::Rng;
use ratatui::layout::Size;

/// The rules of the game.
///
/// The engine owns nothing but its random source; all game data lives in the
/// [`GameState`] passed to each operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GameEngine<R> {
    rng: R,
}

impl<R: Rng> GameEngine<R> {
    pub(crate) fn new(rng: R) -> GameEngine<R> {
        GameEngine { rng }
    }

    pub(crate) fn new_game(&mut self, bounds: Size) -> GameState {
        GameState::new(bounds, &mut self.rng)
    }

    pub(crate) fn reset(&mut self, state: &mut GameState) {
        state.reset(&mut self.rng);
        info!("New game started");
    }

    /// Advance the game by one tick.  Does nothing unless the game is
    /// running.
    ///
    /// A candidate head is tested for collisions against the whole body as it
    /// stood before the move, so moving onto the cell the tail is about to
    /// vacate still counts as biting oneself.
    pub(crate) fn step(&mut self, state: &mut GameState) -> StepOutcome {
        if !state.running() {
            return StepOutcome::Idle;
        }
        state.direction = state.pending;
        let Some(head) = state.direction.advance(state.snake.head(), state.bounds) else {
            return crash(state, Collision::Wall);
        };
        if state.snake.contains(head) {
            return crash(state, Collision::SelfBite);
        }
        state.snake.push_head(head);
        if state.apple == Some(head) {
            state.score += 1;
            debug!("Apple eaten; score is now {}", state.score);
            state.place_apple(&mut self.rng);
            if state.apple.is_none() {
                warn!("No free cells left to place an apple in");
            }
            if state.score % consts::SPEEDUP_EVERY == 0 && state.speed.speed_up() {
                info!(
                    "Tick interval lowered to {}ms",
                    state.speed.interval().as_millis()
                );
            }
            StepOutcome::Ate
        } else {
            state.snake.pop_tail();
            StepOutcome::Moved
        }
    }

    /// Handle the toggle input: pause a running game, resume a paused one,
    /// or start over after dying.
    pub(crate) fn toggle(&mut self, state: &mut GameState) {
        match state.status {
            RunStatus::Running => {
                state.status = RunStatus::Paused;
                debug!("Game paused");
            }
            RunStatus::Paused => {
                state.status = RunStatus::Running;
                debug!("Game resumed");
            }
            RunStatus::Dead => self.reset(state),
        }
    }
}

impl<R> GameEngine<R> {
    /// Request a turn for the next step.  The request is dropped if the game
    /// is over or if `direction` is the exact reverse of the direction the
    /// snake is currently moving in.  A later accepted request replaces an
    /// earlier one.  Returns `true` if the request was accepted.
    pub(crate) fn turn(&self, state: &mut GameState, direction: Direction) -> bool {
        if state.status == RunStatus::Dead || direction == state.direction.reverse() {
            return false;
        }
        state.pending = direction;
        true
    }
}

fn crash(state: &mut GameState, collision: Collision) -> StepOutcome {
    state.status = RunStatus::Dead;
    info!(
        "Game over ({collision:?}) with score {} and length {}",
        state.score,
        state.snake.len()
    );
    StepOutcome::Crashed(collision)
}

/// What happened during a call to [`GameEngine::step()`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum StepOutcome {
    /// The game was not running, so nothing happened
    Idle,
    /// The snake moved one cell
    Moved,
    /// The snake moved onto the apple and grew by one cell
    Ate,
    /// The snake died
    Crashed(Collision),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Collision {
    Wall,
    SelfBite,
}
