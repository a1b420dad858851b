use std::{process::exit, thread::sleep, time::{Duration, Instant}};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::Color;

use crate::config::GameConfig;
use crate::leaderboard::{Leaderboard, LeaderboardError};
use crate::state::{GameState, TickOutcome};
use crate::term::{ScreenPos, TermManager};
use crate::{Cell, Px, Velocity};

const INPUT_POLL_MS: u64 = 5;
const MAX_NAME_LEN: usize = 16;

// The score line is padded to this width, and the widest centered message
// box (the name prompt) is 38 columns; the terminal must fit both even when
// the board itself is narrower.
const SCORE_LINE_LEN: usize = 30;
const MIN_TERM_COLS: u16 = 40;
const MIN_TERM_ROWS: u16 = 14;

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

const SNAKE_COLOR: Color = Color::Green;
const FOOD_COLOR: Color = Color::Red;

pub struct SnakeApp {
    config: GameConfig,
    term: TermManager,
    state: GameState,
    leaderboard: Leaderboard,
}

impl SnakeApp {
    pub fn new(config: GameConfig) -> Self {
        let leaderboard = Leaderboard::load(&config.leaderboard_path);
        let state = GameState::new(&config);

        SnakeApp { config, term: TermManager::new(), state, leaderboard }
    }

    pub fn initialize(&mut self) {
        let needed = required_terminal_size(&self.config);
        let (w, h) = self.term.size();

        if w < needed.0 || h < needed.1 {
            eprintln!("Terminal too small: need at least {}x{} characters.", needed.0, needed.1);
            exit(1);
        }

        self.term.setup();
    }

    pub fn show_intro(&mut self) {
        let lines = &[
            "Arrow keys or WASD to move",
            "CTRL+C to quit",
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines);

        if is_ctrl_c(&self.term.read_key_blocking()) {
            self.clean_exit()
        }

        self.term.hide_message();
    }

    /// Runs one round from reset to game over, then the score submission
    /// flow. Returns when the player asks for another round.
    pub fn play(&mut self) {
        self.term.clear();
        self.term.draw_borders(self.config.columns() as u16, self.config.rows() as u16);
        self.term.hide_message();

        self.state.start();
        paint_board(&mut self.term, &self.config, &self.state);

        let step_delay = Duration::from_millis(self.config.tick_ms);
        let mut next_step = Instant::now() + step_delay;

        loop {
            sleep(Duration::from_millis(INPUT_POLL_MS));

            for key_ev in self.term.read_key_events_queue() {
                if is_ctrl_c(&key_ev) {
                    self.clean_exit();
                }
                if let Some(velocity) = direction_for(&key_ev, self.config.unit) {
                    self.state.steer(velocity);
                }
            }

            if Instant::now() < next_step {
                continue;
            }

            let outcome = self.state.tick();
            match outcome {
                TickOutcome::Stepped | TickOutcome::Ate => {
                    paint_board(&mut self.term, &self.config, &self.state);
                }
                TickOutcome::Died | TickOutcome::Won => {
                    self.game_over(outcome == TickOutcome::Won);
                    break;
                }
            }

            // Fixed delay, rearmed only after the step has been drawn
            next_step = Instant::now() + step_delay;
        }

        // Any key starts the next round, CTRL+C quits
        if is_ctrl_c(&self.term.read_key_blocking()) {
            self.clean_exit()
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn clean_exit(&mut self) {
        self.term.restore();
        exit(0);
    }

    fn game_over(&mut self, win: bool) {
        if !win {
            paint_death(&mut self.term, &self.config, &self.state);
        }

        let save_failed = self.submit_score(win);
        self.show_final_screen(win, save_failed);
    }

    /// Name-entry prompt feeding the leaderboard. An empty name is rejected
    /// with a prompt to re-enter; Esc dismisses without submitting.
    /// Returns true if persisting the leaderboard failed.
    fn submit_score(&mut self, win: bool) -> bool {
        let score = self.state.score();
        let title = if win { "You won!" } else { "Game over!" };
        let score_line = format!("Score: {}", score);
        let mut name = String::new();
        let mut complaint = "";

        loop {
            let input_line = format!("> {}_", name);
            let lines = [
                title,
                score_line.as_str(),
                "",
                "Enter your name for the leaderboard:",
                input_line.as_str(),
                complaint,
                "",
                "Enter to submit, Esc to skip",
            ];
            self.term.show_message(&lines);

            let ev = self.term.read_key_blocking();
            match ev.code {
                _ if is_ctrl_c(&ev) => self.clean_exit(),
                KeyCode::Esc => return false,
                KeyCode::Enter => match self.leaderboard.submit(&name, score) {
                    Ok(()) => return false,
                    Err(LeaderboardError::EmptyName) => {
                        complaint = "Please enter your name.";
                    }
                    Err(_) => return true,
                },
                KeyCode::Backspace => {
                    name.pop();
                }
                KeyCode::Char(c) => {
                    if !c.is_control() && name.chars().count() < MAX_NAME_LEN {
                        name.push(c);
                    }
                }
                _ => {}
            }
        }
    }

    fn show_final_screen(&mut self, win: bool, save_failed: bool) {
        let mut lines: Vec<String> = vec![
            (if win { "You won!" } else { "Game over!" }).to_owned(),
            format!("Score: {}", self.state.score()),
            String::new(),
        ];

        if save_failed {
            lines.push("Could not save the leaderboard.".to_owned());
        } else if !self.leaderboard.entries().is_empty() {
            lines.push("Top scores:".to_owned());
            for (i, entry) in self.leaderboard.top().iter().enumerate() {
                lines.push(format!("{}. {} - {}", i + 1, entry.name, entry.score));
            }
        }

        lines.push(String::new());
        lines.push("Press any key to play again,".to_owned());
        lines.push("or CTRL+C to quit.".to_owned());

        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        self.term.show_message(&refs);
    }
}

/// Smallest terminal the game fits on: the bordered board plus the score
/// line under it, but never narrower than the message boxes need.
fn required_terminal_size(config: &GameConfig) -> (u16, u16) {
    let cols = (config.columns() as u16 + 2).max(MIN_TERM_COLS);
    let rows = (config.rows() as u16 + 3).max(MIN_TERM_ROWS);
    (cols, rows)
}

/// Repaints the board interior: empty cells, food, then the snake.
fn paint_board(term: &mut TermManager, config: &GameConfig, state: &GameState) {
    clear_interior(term, config);

    let food = cell_to_screen(config, state.food());
    term.print_at_colored(food, FOOD_CHAR, FOOD_COLOR);

    let head = state.snake().head();
    let head_ch = head_char(state.velocity());
    for &cell in state.snake().body() {
        let ch = if cell == head { head_ch } else { SNAKE_BODY_CHAR };
        term.print_at_colored(cell_to_screen(config, cell), ch, SNAKE_COLOR);
    }

    paint_score_line(term, config, state);
    term.flush();
}

/// Death frame: repainted from scratch so the cell the tail vacated on the
/// fatal move does not linger, then the corpse is marked. The fatal head
/// may be off the board; only what is on it gets painted.
fn paint_death(term: &mut TermManager, config: &GameConfig, state: &GameState) {
    clear_interior(term, config);

    let food = cell_to_screen(config, state.food());
    term.print_at_colored(food, FOOD_CHAR, FOOD_COLOR);

    for &cell in state.snake().body() {
        if cell_in_bounds(config, cell) {
            term.print_at(cell_to_screen(config, cell), DEAD_SNAKE_CHAR);
        }
    }

    paint_score_line(term, config, state);
    term.flush();
}

fn clear_interior(term: &mut TermManager, config: &GameConfig) {
    for y in 1..=config.rows() as u16 {
        for x in 1..=config.columns() as u16 {
            term.print_at((x, y), ' ');
        }
    }
}

fn paint_score_line(term: &mut TermManager, config: &GameConfig, state: &GameState) {
    let y = config.rows() as u16 + 2;
    let text = format!("Score: {}   Highscore: {}", state.score(), state.high_score());
    term.print_text((0, y), &text, SCORE_LINE_LEN);
}

// Shifted by one for the border
fn cell_to_screen(config: &GameConfig, cell: Cell) -> ScreenPos {
    ((cell.0 / config.unit + 1) as u16, (cell.1 / config.unit + 1) as u16)
}

fn cell_in_bounds(config: &GameConfig, cell: Cell) -> bool {
    cell.0 >= 0 && cell.0 < config.board_width
        && cell.1 >= 0 && cell.1 < config.board_height
}

/// Maps a directional key to its unit velocity; anything else is a no-op.
fn direction_for(ev: &KeyEvent, unit: Px) -> Option<Velocity> {
    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some((0, -unit)),
        KeyCode::Char('s') | KeyCode::Down => Some((0, unit)),
        KeyCode::Char('a') | KeyCode::Left => Some((-unit, 0)),
        KeyCode::Char('d') | KeyCode::Right => Some((unit, 0)),
        _ => None,
    }
}

fn head_char(velocity: Velocity) -> char {
    if velocity.0 > 0 {
        '>'
    } else if velocity.0 < 0 {
        '<'
    } else if velocity.1 > 0 {
        'v'
    } else {
        '^'
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_requirement_covers_score_line_and_messages() {
        // 20x20 board: the board dictates the height, the messages the width
        assert_eq!(required_terminal_size(&GameConfig::default()), (40, 23));

        // 4x2 board: both floors kick in
        let tiny = GameConfig {
            board_width: 100,
            board_height: 50,
            ..GameConfig::default()
        };
        assert_eq!(required_terminal_size(&tiny), (40, 14));

        let needed = required_terminal_size(&GameConfig::default());
        assert!(needed.0 as usize >= SCORE_LINE_LEN);
    }

    #[test]
    fn death_frame_clears_the_cell_vacated_by_the_fatal_move() {
        let config = GameConfig::default();
        let mut term = TermManager::with_size(40, 24);
        let mut state = GameState::with_seed(&config, 5);

        state.start();
        paint_board(&mut term, &config, &state);
        // Tail segment (0, 0) sits at screen cell (1, 1)
        assert_eq!(term.char_at((1, 1)), SNAKE_BODY_CHAR);

        state.steer((0, -25));
        assert_eq!(state.tick(), TickOutcome::Died);
        paint_death(&mut term, &config, &state);

        // The fatal step moved the tail off (0, 0); nothing of the snake
        // may remain there
        assert_eq!(term.char_at((1, 1)), ' ');
        // The in-bounds body is marked dead; the head itself is off-board
        assert_eq!(term.char_at((4, 1)), DEAD_SNAKE_CHAR);
        assert_eq!(term.char_at((3, 1)), DEAD_SNAKE_CHAR);
        assert_eq!(term.char_at((2, 1)), DEAD_SNAKE_CHAR);
    }
}
