use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use rand::Rng;

use crate::config::GameConfig;
use crate::grid::{Cell, GridSpace};
use crate::input::Direction;

/// Outcome of one [`SnakeState::try_step`] call.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StepResult {
    /// The step gate has not elapsed yet.
    Pending,
    /// The next head cell is part of the body; nothing moved.
    Collided,
    Advanced,
}

/// Snake body, heading, score and step timing for one round.
#[derive(Debug, Clone)]
pub struct SnakeState {
    positions: VecDeque<Cell>,
    length: usize,
    direction: Direction,
    score: u32,
    move_delay: Duration,
    last_move_at: Duration,
}

impl SnakeState {
    /// Creates a one-cell snake at the grid center heading in a random
    /// direction. The first step is due one move delay after `now`.
    #[must_use]
    pub fn new<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R, now: Duration) -> Self {
        let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        let mut positions = VecDeque::new();
        positions.push_front(config.grid().center());

        Self {
            positions,
            length: 1,
            direction,
            score: 0,
            move_delay: config.initial_move_delay(),
            last_move_at: now,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// The target length equals the segment count.
    #[must_use]
    pub fn from_segments(
        segments: Vec<Cell>,
        direction: Direction,
        move_delay: Duration,
        now: Duration,
    ) -> Self {
        assert!(!segments.is_empty(), "snake needs at least a head segment");

        Self {
            length: segments.len(),
            positions: VecDeque::from(segments),
            direction,
            score: 0,
            move_delay,
            last_move_at: now,
        }
    }

    /// Reinitializes every field to round-start values.
    pub fn reset<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R, now: Duration) {
        *self = Self::new(config, rng, now);
    }

    /// Requests a new heading. Reversals are ignored once the snake has a
    /// body; the last accepted request before a step wins.
    pub fn set_direction(&mut self, requested: Direction) {
        if self.length > 1 && requested == self.direction.opposite() {
            return;
        }
        self.direction = requested;
    }

    /// Moves the head one cell if the move delay has elapsed since the last
    /// step.
    ///
    /// The self-collision check runs against the body before the tail is
    /// trimmed, so the head may not enter the cell the tail is about to leave.
    pub fn try_step(&mut self, now: Duration, grid: GridSpace) -> StepResult {
        if now.saturating_sub(self.last_move_at) < self.move_delay {
            return StepResult::Pending;
        }

        let new_head = grid.wrap(self.head(), self.direction);
        if self.positions.iter().skip(1).any(|segment| *segment == new_head) {
            return StepResult::Collided;
        }

        self.positions.push_front(new_head);
        while self.positions.len() > self.length {
            let _ = self.positions.pop_back();
        }
        self.last_move_at = now;

        StepResult::Advanced
    }

    /// Extends the target length; the extra segment appears on the next step.
    pub fn grow(&mut self) {
        self.length += 1;
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Multiplies the move delay by `factor`, never going below `floor`.
    pub fn shorten_move_delay(&mut self, factor: f64, floor: Duration) {
        self.move_delay = self.move_delay.mul_f64(factor).max(floor);
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Cell {
        *self
            .positions
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Body segments from head to tail.
    #[must_use]
    pub fn positions(&self) -> &VecDeque<Cell> {
        &self.positions
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.positions.contains(&cell)
    }

    /// Cells currently covered by the snake.
    #[must_use]
    pub fn occupied(&self) -> HashSet<Cell> {
        self.positions.iter().copied().collect()
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Target length the body grows towards.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn move_delay(&self) -> Duration {
        self.move_delay
    }
}
