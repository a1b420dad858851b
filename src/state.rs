use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::snake::{is_reverse, Snake};
use crate::{Cell, Px, Velocity};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RunState {
    Idle,
    Running,
    GameOver,
}

/// What a single simulation step did.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    Stepped,
    Ate,
    Died,
    /// The snake filled the whole board; nowhere left to place food.
    Won,
}

/// The whole mutable game state, owned in one place and advanced one tick
/// at a time. Rendering and input live elsewhere and only observe or steer.
pub struct GameState {
    width: Px,
    height: Px,
    unit: Px,
    snake: Snake,
    velocity: Velocity,
    food: Cell,
    score: u32,
    high_score: u32,
    run_state: RunState,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic food placement for tests.
    pub fn with_seed(config: &GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Self {
        let mut state = GameState {
            width: config.board_width,
            height: config.board_height,
            unit: config.unit,
            snake: Snake::new(config.unit),
            velocity: (config.unit, 0),
            food: (0, 0),
            score: 0,
            high_score: 0,
            run_state: RunState::Idle,
            rng,
        };
        state.food = state.place_food().unwrap_or((0, 0));
        state
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Reinitializes the round and enters Running: 4-segment snake at the
    /// start position, velocity towards positive x, score 0, fresh food.
    /// The high score is kept for the lifetime of the process.
    pub fn start(&mut self) {
        self.snake = Snake::new(self.unit);
        self.velocity = (self.unit, 0);
        self.score = 0;
        self.run_state = RunState::Running;
        self.food = match self.place_food() {
            Some(cell) => cell,
            // Degenerate board with no free cell, nothing to play
            None => {
                self.run_state = RunState::GameOver;
                (0, 0)
            }
        };
    }

    /// Applies a direction change for the next tick. A change that exactly
    /// reverses the current velocity is ignored; anything else, including
    /// re-pressing the current direction, is taken as-is.
    pub fn steer(&mut self, candidate: Velocity) {
        if !is_reverse(self.velocity, candidate) {
            self.velocity = candidate;
        }
    }

    /// Advances the simulation by one step: move, then food, then the
    /// collision check on the already-committed head position.
    pub fn tick(&mut self) -> TickOutcome {
        if self.run_state != RunState::Running {
            return TickOutcome::Stepped;
        }

        let ate = self.snake.advance(self.velocity, self.food);
        if ate {
            self.score += 1;
            if self.score > self.high_score {
                self.high_score = self.score;
            }
        }

        if self.snake.collided(self.width, self.height) {
            self.run_state = RunState::GameOver;
            return TickOutcome::Died;
        }

        if ate {
            match self.place_food() {
                Some(cell) => {
                    self.food = cell;
                    TickOutcome::Ate
                }
                None => {
                    self.run_state = RunState::GameOver;
                    TickOutcome::Won
                }
            }
        } else {
            TickOutcome::Stepped
        }
    }

    /// Picks a uniformly random unit-aligned cell not occupied by the
    /// snake. Sampling from the complement set rather than redrawing on
    /// hits, so it terminates even on a nearly full board.
    fn place_food(&mut self) -> Option<Cell> {
        let body = self.snake.body();
        let mut free: Vec<Cell> = Vec::new();

        for y in 0..self.height / self.unit {
            for x in 0..self.width / self.unit {
                let cell = (x * self.unit, y * self.unit);
                if !body.contains(&cell) {
                    free.push(cell);
                }
            }
        }

        free.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    fn running_state() -> GameState {
        let mut state = GameState::with_seed(&config(), 7);
        state.start();
        state
    }

    #[test]
    fn starts_idle_and_enters_running_on_start() {
        let mut state = GameState::with_seed(&config(), 1);
        assert_eq!(state.run_state(), RunState::Idle);

        state.start();
        assert_eq!(state.run_state(), RunState::Running);
        assert_eq!(state.score(), 0);
        assert_eq!(state.snake().body(), &[(75, 0), (50, 0), (25, 0), (0, 0)]);
    }

    #[test]
    fn one_tick_moves_the_reference_snake_right() {
        let mut state = running_state();
        state.food = (475, 475); // away from the snake's path

        let outcome = state.tick();

        assert_eq!(outcome, TickOutcome::Stepped);
        assert_eq!(state.snake().body(), &[(100, 0), (75, 0), (50, 0), (25, 0)]);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn eating_food_grows_scores_and_replaces_the_food() {
        let mut state = running_state();
        state.food = (100, 0); // right in front of the head

        let outcome = state.tick();

        assert_eq!(outcome, TickOutcome::Ate);
        assert_eq!(state.score(), 1);
        assert_eq!(state.high_score(), 1);
        assert_eq!(state.snake().len(), 5);

        let food = state.food();
        assert!(!state.snake().body().contains(&food));
        assert!(food.0 >= 0 && food.0 < 500 && food.1 >= 0 && food.1 < 500);
        assert_eq!(food.0 % 25, 0);
        assert_eq!(food.1 % 25, 0);
    }

    #[test]
    fn hitting_a_wall_ends_the_game() {
        let mut state = running_state();
        state.food = (475, 475);
        state.steer((0, -25));

        assert_eq!(state.tick(), TickOutcome::Died);
        assert_eq!(state.run_state(), RunState::GameOver);
        assert_eq!(state.snake().head(), (75, -25));

        // Ticks are inert once the game is over
        assert_eq!(state.tick(), TickOutcome::Stepped);
        assert_eq!(state.snake().head(), (75, -25));
    }

    #[test]
    fn reversal_is_ignored_but_other_turns_apply() {
        let mut state = running_state();
        state.food = (475, 475);

        state.steer((-25, 0)); // exact reverse of (25, 0)
        state.tick();
        assert_eq!(state.snake().head(), (100, 0));

        state.steer((0, 25));
        state.tick();
        assert_eq!(state.snake().head(), (100, 25));

        state.steer((0, -25)); // now the reverse of (0, 25)
        state.tick();
        assert_eq!(state.snake().head(), (100, 50));
    }

    #[test]
    fn reset_reinitializes_but_keeps_the_high_score() {
        let mut state = running_state();
        state.food = (100, 0);
        state.tick(); // score 1
        state.food = (475, 475);
        state.steer((0, -25));
        state.tick(); // dead
        assert_eq!(state.run_state(), RunState::GameOver);

        state.start();

        assert_eq!(state.run_state(), RunState::Running);
        assert_eq!(state.score(), 0);
        assert_eq!(state.high_score(), 1);
        assert_eq!(state.snake().body(), &[(75, 0), (50, 0), (25, 0), (0, 0)]);
        assert!(!state.snake().body().contains(&state.food()));
    }

    #[test]
    fn food_placement_on_a_full_board_reports_a_win() {
        // 4x1 grid, exactly covered by the starting snake
        let tiny = GameConfig {
            board_width: 100,
            board_height: 25,
            ..GameConfig::default()
        };
        let mut state = GameState::with_seed(&tiny, 3);
        assert_eq!(state.place_food(), None);
    }

    #[test]
    fn eating_the_last_free_cell_wins_and_ends_the_game() {
        // 5x1 grid: the starting snake covers four cells, so the food can
        // only land on the fifth, right in front of the head
        let narrow = GameConfig {
            board_width: 125,
            board_height: 25,
            ..GameConfig::default()
        };
        let mut state = GameState::with_seed(&narrow, 11);
        state.start();
        assert_eq!(state.food(), (100, 0));

        assert_eq!(state.tick(), TickOutcome::Won);
        assert_eq!(state.run_state(), RunState::GameOver);
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake().len(), 5);
    }
}
