use ratatui::layout::Position;
use std::collections::VecDeque;

/// The snake's body
///
/// The cells are stored oldest first: the tail is at the front of the deque
/// and the head is at the back.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    pub(super) cells: VecDeque<Position>,
}

impl Snake {
    /// Create a two-cell snake
    pub(super) fn new(tail: Position, head: Position) -> Snake {
        Snake {
            cells: VecDeque::from([tail, head]),
        }
    }

    /// Return the position of the snake's head
    pub(crate) fn head(&self) -> Position {
        // Only a hand-built empty snake has no head
        self.cells.back().copied().unwrap_or(Position::ORIGIN)
    }

    /// Return the snake's cells, tail first
    pub(crate) fn cells(&self) -> &VecDeque<Position> {
        &self.cells
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    pub(super) fn push_head(&mut self, pos: Position) {
        self.cells.push_back(pos);
    }

    pub(super) fn pop_tail(&mut self) {
        let _ = self.cells.pop_front();
    }
}
