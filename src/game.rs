use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::food::FoodState;
use crate::grid::{Cell, GridSpace};
use crate::input::{Command, Direction};
use crate::snake::{SnakeState, StepResult};

/// Current high-level round state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RoundStatus {
    Playing,
    Paused,
    GameOver,
}

/// Side effects produced by a simulation tick, voiced by the audio notifier.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RoundEvent {
    Eaten,
    Crashed,
}

/// Whether the driving loop should keep running after a command.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Read-only view handed to the renderer each frame.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub positions: &'a VecDeque<Cell>,
    pub direction: Direction,
    pub food: Cell,
    pub score: u32,
    pub status: RoundStatus,
    /// Segments currently on the board.
    pub size: usize,
    pub speed: f64,
    pub move_delay: Duration,
    pub grid: GridSpace,
    /// The round ended because the snake covered every cell.
    pub board_cleared: bool,
}

/// Owns one round's snake and food and applies the game rules to them.
#[derive(Debug, Clone)]
pub struct RoundController<R = StdRng> {
    config: GameConfig,
    grid: GridSpace,
    snake: SnakeState,
    food: FoodState,
    speed: f64,
    status: RoundStatus,
    board_cleared: bool,
    rng: R,
}

impl RoundController<StdRng> {
    /// Creates a deterministic round for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(config: GameConfig, seed: u64, now: Duration) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed), now)
    }
}

impl<R: Rng> RoundController<R> {
    /// Starts a round in the `Playing` state.
    #[must_use]
    pub fn new(config: GameConfig, mut rng: R, now: Duration) -> Self {
        let grid = config.grid();
        let snake = SnakeState::new(&config, &mut rng, now);
        let food = FoodState::spawn(&mut rng, grid, &snake.occupied());
        let speed = config.initial_speed;

        info!(
            "round started on {}x{} grid heading {:?}",
            grid.width(),
            grid.height(),
            snake.direction()
        );

        Self {
            config,
            grid,
            snake,
            food,
            speed,
            status: RoundStatus::Playing,
            board_cleared: false,
            rng,
        }
    }

    /// Applies one external command.
    pub fn handle_input(&mut self, command: Command, now: Duration) -> Flow {
        match (self.status, command) {
            (_, Command::Quit) => {
                info!("quit requested with score {}", self.snake.score());
                return Flow::Quit;
            }
            (RoundStatus::Playing, Command::Direction(direction)) => {
                self.snake.set_direction(direction);
            }
            (RoundStatus::Playing, Command::TogglePause) => {
                info!("paused");
                self.status = RoundStatus::Paused;
            }
            (RoundStatus::Paused, Command::TogglePause) => {
                info!("resumed");
                self.status = RoundStatus::Playing;
            }
            (RoundStatus::GameOver, Command::Restart) => self.restart(now),
            _ => {}
        }

        Flow::Continue
    }

    /// Advances the simulation if the snake's step gate has elapsed.
    ///
    /// Returns at most one event per call.
    pub fn advance(&mut self, now: Duration) -> Option<RoundEvent> {
        if self.status != RoundStatus::Playing {
            return None;
        }

        match self.snake.try_step(now, self.grid) {
            StepResult::Pending => None,
            StepResult::Collided => {
                self.status = RoundStatus::GameOver;
                info!(
                    "game over: score {} length {}",
                    self.snake.score(),
                    self.snake.len()
                );
                Some(RoundEvent::Crashed)
            }
            StepResult::Advanced if self.snake.head() == self.food.position() => {
                self.eat();
                Some(RoundEvent::Eaten)
            }
            StepResult::Advanced => None,
        }
    }

    fn eat(&mut self) {
        self.snake.grow();
        self.snake.add_score(self.config.points_per_food);

        // Frame cadence and step gate speed up independently.
        self.speed = (self.speed + self.config.speed_increment).min(self.config.max_speed);
        self.snake
            .shorten_move_delay(self.config.move_delay_factor, self.config.min_move_delay());

        // No cell is left for the next food: the round ends in a win.
        if self.snake.len() >= self.grid.total_cells() {
            self.status = RoundStatus::GameOver;
            self.board_cleared = true;
            info!("board cleared: score {}", self.snake.score());
            return;
        }

        self.food
            .randomize(&mut self.rng, self.grid, &self.snake.occupied());

        debug!(
            "ate food: score {} speed {:.1} move delay {:?}, next food at ({}, {})",
            self.snake.score(),
            self.speed,
            self.snake.move_delay(),
            self.food.position().x,
            self.food.position().y
        );
    }

    fn restart(&mut self, now: Duration) {
        self.snake = SnakeState::new(&self.config, &mut self.rng, now);
        self.food = FoodState::spawn(&mut self.rng, self.grid, &self.snake.occupied());
        self.speed = self.config.initial_speed;
        self.status = RoundStatus::Playing;
        self.board_cleared = false;
        info!("round restarted heading {:?}", self.snake.direction());
    }

    /// Replaces the snake and food, for scripted scenarios.
    pub fn place(&mut self, snake: SnakeState, food: FoodState) {
        debug_assert!(
            !snake.occupies(food.position()),
            "food must not be placed on the snake"
        );
        self.snake = snake;
        self.food = food;
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            positions: self.snake.positions(),
            direction: self.snake.direction(),
            food: self.food.position(),
            score: self.snake.score(),
            status: self.status,
            size: self.snake.len(),
            speed: self.speed,
            move_delay: self.snake.move_delay(),
            grid: self.grid,
            board_cleared: self.board_cleared,
        }
    }

    #[must_use]
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// True once the snake has covered every cell of the grid.
    #[must_use]
    pub fn board_cleared(&self) -> bool {
        self.board_cleared
    }

    /// Frames per second for the render/input cadence.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[must_use]
    pub fn snake(&self) -> &SnakeState {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> &FoodState {
        &self.food
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::GameConfig;
    use crate::food::FoodState;
    use crate::grid::Cell;
    use crate::input::{Command, Direction};
    use crate::snake::SnakeState;

    use super::{Flow, RoundController, RoundEvent, RoundStatus};

    const STEP: Duration = Duration::from_millis(100);

    fn round() -> RoundController {
        RoundController::new_with_seed(GameConfig::default(), 1, Duration::ZERO)
    }

    fn lone_head(cell: Cell, direction: Direction) -> SnakeState {
        SnakeState::from_segments(vec![cell], direction, STEP, Duration::ZERO)
    }

    #[test]
    fn new_round_is_playing_with_food_off_the_snake() {
        let round = round();

        assert_eq!(round.status(), RoundStatus::Playing);
        assert_eq!(round.speed(), 10.0);
        assert!(!round.snake().occupies(round.food().position()));
    }

    #[test]
    fn eating_grows_scores_and_speeds_up() {
        let mut round = round();
        round.place(
            lone_head(Cell::new(5, 5), Direction::Right),
            FoodState::at(Cell::new(6, 5)),
        );

        assert_eq!(round.advance(STEP), Some(RoundEvent::Eaten));

        assert_eq!(round.snake().score(), 10);
        assert_eq!(round.snake().length(), 2);
        assert_eq!(round.speed(), 10.5);
        assert_eq!(round.snake().move_delay(), Duration::from_millis(95));
        assert!(!round.snake().occupies(round.food().position()));

        // The extra segment shows up on the following step.
        assert_eq!(round.snake().len(), 1);
        let _ = round.advance(STEP * 2);
        assert_eq!(round.snake().len(), 2);
    }

    #[test]
    fn pending_step_changes_nothing() {
        let mut round = round();
        round.place(
            lone_head(Cell::new(5, 5), Direction::Right),
            FoodState::at(Cell::new(6, 5)),
        );

        assert_eq!(round.advance(Duration::from_millis(50)), None);

        assert_eq!(round.snake().head(), Cell::new(5, 5));
        assert_eq!(round.snake().score(), 0);
    }

    #[test]
    fn pacing_is_capped_at_both_ends() {
        let mut round = round();
        let mut now = Duration::ZERO;
        round.place(lone_head(Cell::new(0, 0), Direction::Right), FoodState::at(Cell::new(1, 0)));

        for _ in 0..60 {
            now += round.snake().move_delay();
            let head = round.snake().head();
            let next = round.config().grid().wrap(head, round.snake().direction());
            let snake = SnakeState::from_segments(
                vec![head],
                Direction::Right,
                round.snake().move_delay(),
                now - round.snake().move_delay(),
            );
            round.place(snake, FoodState::at(next));

            assert_eq!(round.advance(now), Some(RoundEvent::Eaten));
            assert!(round.speed() <= 25.0);
            assert!(round.snake().move_delay() >= Duration::from_millis(40));
        }

        assert_eq!(round.speed(), 25.0);
        assert_eq!(round.snake().move_delay(), Duration::from_millis(40));
    }

    #[test]
    fn self_collision_ends_the_round() {
        let mut round = round();
        round.place(
            SnakeState::from_segments(
                vec![
                    Cell::new(2, 2),
                    Cell::new(2, 3),
                    Cell::new(1, 3),
                    Cell::new(1, 2),
                    Cell::new(0, 2),
                ],
                Direction::Left,
                STEP,
                Duration::ZERO,
            ),
            FoodState::at(Cell::new(9, 9)),
        );

        assert_eq!(round.advance(STEP), Some(RoundEvent::Crashed));
        assert_eq!(round.status(), RoundStatus::GameOver);

        // Nothing moves after game over.
        assert_eq!(round.advance(STEP * 5), None);
        assert_eq!(round.snake().head(), Cell::new(2, 2));
    }

    #[test]
    fn filling_the_board_ends_the_round_without_replacing_food() {
        let config = GameConfig {
            grid_width: 2,
            grid_height: 1,
            ..GameConfig::default()
        };
        let mut round = RoundController::new_with_seed(config, 4, Duration::ZERO);
        round.place(lone_head(Cell::new(1, 0), Direction::Right), FoodState::at(Cell::new(0, 0)));

        assert_eq!(round.advance(STEP), Some(RoundEvent::Eaten));
        assert_eq!(round.status(), RoundStatus::Playing);
        // Only one free cell is left, so the food must land there.
        assert_eq!(round.food().position(), Cell::new(1, 0));

        assert_eq!(round.advance(STEP * 2), Some(RoundEvent::Eaten));
        assert_eq!(round.status(), RoundStatus::GameOver);
        assert!(round.board_cleared());
        assert!(round.snapshot().board_cleared);
        assert_eq!(round.snake().score(), 20);
        assert_eq!(round.snake().len(), 2);

        assert_eq!(round.advance(STEP * 3), None);

        let _ = round.handle_input(Command::Restart, STEP * 3);
        assert_eq!(round.status(), RoundStatus::Playing);
        assert!(!round.board_cleared());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "food must not be placed on the snake")]
    fn placing_food_on_the_snake_is_rejected() {
        let mut round = round();
        round.place(lone_head(Cell::new(5, 5), Direction::Right), FoodState::at(Cell::new(5, 5)));
    }

    #[test]
    fn pause_toggles_and_freezes_simulation() {
        let mut round = round();
        round.place(lone_head(Cell::new(5, 5), Direction::Right), FoodState::at(Cell::new(9, 9)));

        assert_eq!(round.handle_input(Command::TogglePause, STEP), Flow::Continue);
        assert_eq!(round.status(), RoundStatus::Paused);
        assert_eq!(round.advance(STEP * 3), None);
        assert_eq!(round.snake().head(), Cell::new(5, 5));

        // Direction changes are ignored while paused.
        let _ = round.handle_input(Command::Direction(Direction::Down), STEP * 3);
        assert_eq!(round.snake().direction(), Direction::Right);

        let _ = round.handle_input(Command::TogglePause, STEP * 3);
        assert_eq!(round.status(), RoundStatus::Playing);
        let _ = round.advance(STEP * 4);
        assert_eq!(round.snake().head(), Cell::new(6, 5));
    }

    #[test]
    fn restart_only_applies_after_game_over() {
        let mut round = round();
        round.place(lone_head(Cell::new(5, 5), Direction::Right), FoodState::at(Cell::new(9, 9)));

        let _ = round.handle_input(Command::Restart, STEP);
        assert_eq!(round.snake().head(), Cell::new(5, 5));
        assert_eq!(round.status(), RoundStatus::Playing);
    }

    #[test]
    fn restart_recreates_round_state() {
        let mut round = round();
        round.place(
            lone_head(Cell::new(5, 5), Direction::Right),
            FoodState::at(Cell::new(6, 5)),
        );
        let _ = round.advance(STEP);
        round.place(
            SnakeState::from_segments(
                vec![Cell::new(1, 1), Cell::new(2, 1), Cell::new(2, 2), Cell::new(1, 2)],
                Direction::Down,
                STEP,
                Duration::ZERO,
            ),
            FoodState::at(Cell::new(9, 9)),
        );
        assert_eq!(round.advance(STEP), Some(RoundEvent::Crashed));

        // Only restart and quit mean anything after game over.
        let _ = round.handle_input(Command::TogglePause, STEP);
        assert_eq!(round.status(), RoundStatus::GameOver);

        assert_eq!(round.handle_input(Command::Restart, STEP * 2), Flow::Continue);

        let config = GameConfig::default();
        assert_eq!(round.status(), RoundStatus::Playing);
        assert_eq!(round.snake().score(), 0);
        assert_eq!(round.snake().len(), 1);
        assert_eq!(round.snake().head(), config.grid().center());
        assert_eq!(round.snake().move_delay(), config.initial_move_delay());
        assert_eq!(round.speed(), config.initial_speed);
        assert!(!round.snake().occupies(round.food().position()));
    }

    #[test]
    fn quit_is_honored_in_every_state() {
        let mut round = round();
        assert_eq!(round.handle_input(Command::Quit, STEP), Flow::Quit);

        let _ = round.handle_input(Command::TogglePause, STEP);
        assert_eq!(round.handle_input(Command::Quit, STEP), Flow::Quit);
    }

    #[test]
    fn snapshot_exposes_render_fields() {
        let mut round = round();
        round.place(
            SnakeState::from_segments(
                vec![Cell::new(4, 4), Cell::new(3, 4)],
                Direction::Right,
                STEP,
                Duration::ZERO,
            ),
            FoodState::at(Cell::new(8, 8)),
        );

        let snapshot = round.snapshot();

        assert_eq!(snapshot.positions.front(), Some(&Cell::new(4, 4)));
        assert_eq!(snapshot.direction, Direction::Right);
        assert_eq!(snapshot.food, Cell::new(8, 8));
        assert_eq!(snapshot.size, 2);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.status, RoundStatus::Playing);
        assert_eq!(snapshot.grid.width(), 30);
    }
}
