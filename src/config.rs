use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Px;

/// Game configuration. The defaults match the reference board: a 500x500
/// pixel canvas divided into 25-pixel cells, stepping every 75 ms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board width in pixels; must be a multiple of `unit`.
    pub board_width: Px,
    /// Board height in pixels; must be a multiple of `unit`.
    pub board_height: Px,
    /// Edge length of one grid cell in pixels.
    pub unit: Px,
    /// Fixed delay between simulation steps, in milliseconds.
    pub tick_ms: u64,
    /// Where the leaderboard JSON file lives.
    pub leaderboard_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_width: 500,
            board_height: 500,
            unit: 25,
            tick_ms: 75,
            leaderboard_path: PathBuf::from("leaderboard.json"),
        }
    }
}

impl GameConfig {
    /// Board width in whole cells.
    pub fn columns(&self) -> Px {
        self.board_width / self.unit
    }

    /// Board height in whole cells.
    pub fn rows(&self) -> Px {
        self.board_height / self.unit
    }
}
