use super::direction::Direction;
use super::snake::Snake;
use super::speed::Speed;
use crate::consts;
use rand::{seq::IteratorRandom, Rng};
use ratatui::layout::{Position, Rect, Size};
use std::time::Duration;

/// Everything there is to know about a game in progress.
///
/// A `GameState` is only ever mutated through [`GameEngine`][super::engine::GameEngine]
/// operations; everyone else gets read access.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GameState {
    pub(super) bounds: Size,
    pub(super) snake: Snake,
    pub(super) apple: Option<Position>,
    pub(super) score: u32,
    pub(super) speed: Speed,
    /// The direction applied by the most recent step
    pub(super) direction: Direction,
    /// The latest accepted turn, applied at the start of the next step
    pub(super) pending: Direction,
    pub(super) status: RunStatus,
}

impl GameState {
    /// Start a new game on a grid of size `bounds`, which must be at least
    /// two cells wide and one cell tall.
    pub(crate) fn new<R: Rng + ?Sized>(bounds: Size, rng: &mut R) -> GameState {
        let head = Position::new(bounds.width / 2, bounds.height / 2);
        let tail = Position::new(head.x.saturating_sub(1), head.y);
        let mut state = GameState {
            bounds,
            snake: Snake::new(tail, head),
            apple: None,
            score: 0,
            speed: Speed::new(),
            direction: Direction::Right,
            pending: Direction::Right,
            status: RunStatus::Running,
        };
        state.place_apple(rng);
        state
    }

    /// Restore every field to its initial value, including a fresh apple
    pub(crate) fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = GameState::new(self.bounds, rng);
    }

    /// Put the apple on a cell chosen uniformly at random from all cells not
    /// occupied by the snake.  If there are no such cells, there is no apple.
    pub(super) fn place_apple<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.apple = Rect::from((Position::ORIGIN, self.bounds))
            .positions()
            .filter(|&p| !self.snake.contains(p))
            .choose(rng);
    }

    pub(crate) fn bounds(&self) -> Size {
        self.bounds
    }

    pub(crate) fn snake(&self) -> &Snake {
        &self.snake
    }

    pub(crate) fn apple(&self) -> Option<Position> {
        self.apple
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn speed(&self) -> Speed {
        self.speed
    }

    pub(crate) fn tick_interval(&self) -> Duration {
        self.speed.interval()
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn pending_direction(&self) -> Direction {
        self.pending
    }

    pub(crate) fn status(&self) -> RunStatus {
        self.status
    }

    pub(crate) fn running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// How long the scheduler should wait before the next call to
    /// [`GameEngine::step()`][super::engine::GameEngine::step]
    pub(crate) fn poll_interval(&self) -> Duration {
        if self.running() {
            self.tick_interval()
        } else {
            consts::IDLE_POLL
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RunStatus {
    Running,
    Paused,
    /// The snake has hit a wall or itself.  Only a restart leaves this state.
    Dead,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::collections::VecDeque;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    #[test]
    fn new_state() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let state = GameState::new(consts::GRID_SIZE, &mut rng);
        assert_eq!(
            state.snake().cells(),
            &VecDeque::from([Position::new(11, 12), Position::new(12, 12)])
        );
        assert_eq!(state.direction(), Direction::Right);
        assert_eq!(state.pending_direction(), Direction::Right);
        assert_eq!(state.score(), 0);
        assert_eq!(state.tick_interval(), consts::TICK_START);
        assert_eq!(state.status(), RunStatus::Running);
        let apple = state.apple().expect("a fresh board should have an apple");
        assert!(apple.x < 24 && apple.y < 24);
        assert!(!state.snake().contains(apple));
    }

    #[test]
    fn only_free_cell_gets_the_apple() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let state = GameState::new(
            Size {
                width: 3,
                height: 1,
            },
            &mut rng,
        );
        assert_eq!(state.apple(), Some(Position::new(2, 0)));
    }

    #[test]
    fn full_board_has_no_apple() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut state = GameState::new(
            Size {
                width: 2,
                height: 1,
            },
            &mut rng,
        );
        assert_eq!(state.apple(), None);
        state.place_apple(&mut rng);
        assert_eq!(state.apple(), None);
    }

    #[test]
    fn reset_twice() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut state = GameState::new(consts::GRID_SIZE, &mut rng);
        state.score = 9;
        state.status = RunStatus::Dead;
        state.direction = Direction::Up;
        state.pending = Direction::Left;
        let _ = state.speed.speed_up();
        state.snake.push_head(Position::new(12, 11));

        state.reset(&mut rng);
        let first = state.clone();
        state.reset(&mut rng);
        let second = state.clone();
        for st in [&first, &second] {
            assert_eq!(
                st.snake().cells(),
                &VecDeque::from([Position::new(11, 12), Position::new(12, 12)])
            );
            assert_eq!(st.score(), 0);
            assert_eq!(st.status(), RunStatus::Running);
            assert_eq!(st.direction(), Direction::Right);
            assert_eq!(st.pending_direction(), Direction::Right);
            assert_eq!(st.tick_interval(), consts::TICK_START);
            let apple = st.apple().expect("a fresh board should have an apple");
            assert!(!st.snake().contains(apple));
        }
        assert_eq!(
            GameState {
                apple: None,
                ..first
            },
            GameState {
                apple: None,
                ..second
            }
        );
    }

    #[test]
    fn poll_interval() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut state = GameState::new(consts::GRID_SIZE, &mut rng);
        assert_eq!(state.poll_interval(), consts::TICK_START);
        let _ = state.speed.speed_up();
        assert_eq!(state.poll_interval(), Duration::from_millis(130));
        state.status = RunStatus::Paused;
        assert_eq!(state.poll_interval(), consts::IDLE_POLL);
        state.status = RunStatus::Dead;
        assert_eq!(state.poll_interval(), consts::IDLE_POLL);
    }
}
