use crate::{Cell, Px, Velocity};

pub const INITIAL_SNAKE_LENGTH: usize = 4;

/// Returns true when `candidate` is the exact reverse of `current` on the
/// same axis. Applying it would drive the head straight into the neck.
pub fn is_reverse(current: Velocity, candidate: Velocity) -> bool {
    current.0 + candidate.0 == 0 && current.1 + candidate.1 == 0
}

pub struct Snake {
    body: Vec<Cell>,
}

impl Snake {
    /// Starting layout: four segments in a row at the top-left corner,
    /// head first, facing in the positive x direction.
    pub fn new(unit: Px) -> Self {
        let body = (0..INITIAL_SNAKE_LENGTH as Px).rev()
            .map(|i| (unit * i, 0))
            .collect();
        Snake { body }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Moves one step: the new head is committed unconditionally, even when
    /// it lands out of bounds or on the body. Returns true if it landed on
    /// `food`, in which case the tail stays put and the snake grows by one.
    /// Fatal positions are detected afterwards by `collided`.
    pub fn advance(&mut self, velocity: Velocity, food: Cell) -> bool {
        let (hx, hy) = self.head();
        let new_head = (hx + velocity.0, hy + velocity.1);

        self.body.insert(0, new_head);

        if new_head == food {
            true
        } else {
            self.body.pop();
            false
        }
    }

    /// Checks the post-move body for a fatal head position: outside the
    /// board on any side, or overlapping any non-head segment.
    pub fn collided(&self, width: Px, height: Px) -> bool {
        let (hx, hy) = self.head();

        hx < 0 || hx >= width || hy < 0 || hy >= height
            || self.body[1..].contains(&self.head())
    }
}
