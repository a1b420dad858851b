use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bound on the persisted list; anything past the top 10 is dropped.
pub const MAX_ENTRIES: usize = 10;
/// How many entries the post-game screen shows.
pub const DISPLAY_ENTRIES: usize = 5;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("player name must not be empty")]
    EmptyName,
    #[error("could not access the leaderboard file: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub score: u32,
}

/// Locally persisted top-score list. Kept sorted descending by score and
/// truncated to `MAX_ENTRIES`; each submission rewrites the whole file.
pub struct Leaderboard {
    path: PathBuf,
    entries: Vec<Entry>,
}

impl Leaderboard {
    /// Loads the list from `path`. A missing or unreadable file is an
    /// empty leaderboard; the next submission rewrites it.
    pub fn load(path: &Path) -> Self {
        let entries = fs::read_to_string(path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();

        Leaderboard { path: path.to_path_buf(), entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The slice shown on the post-game screen.
    pub fn top(&self) -> &[Entry] {
        &self.entries[..self.entries.len().min(DISPLAY_ENTRIES)]
    }

    /// Records a finished game: validates the name, inserts the entry,
    /// re-sorts descending by score, truncates to the bound and persists.
    pub fn submit(&mut self, name: &str, score: u32) -> Result<(), LeaderboardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeaderboardError::EmptyName);
        }

        self.entries.push(Entry { name: name.to_owned(), score });
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);

        self.save()
    }

    fn save(&self) -> Result<(), LeaderboardError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    // Unique file per test so they can run in parallel
    fn temp_path() -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("gridsnake-lb-{}-{}.json", std::process::id(), n))
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let board = Leaderboard::load(&temp_path());
        assert!(board.entries().is_empty());
    }

    #[test]
    fn unreadable_file_loads_as_empty() {
        let path = temp_path();
        fs::write(&path, "not json {{{").unwrap();

        let board = Leaderboard::load(&path);
        assert!(board.entries().is_empty());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn submissions_are_sorted_descending_and_persisted() {
        let path = temp_path();

        let mut board = Leaderboard::load(&path);
        board.submit("Alice", 10).unwrap();
        board.submit("Bob", 20).unwrap();

        let reloaded = Leaderboard::load(&path);
        let entries = reloaded.entries();
        assert_eq!(entries[0], Entry { name: "Bob".into(), score: 20 });
        assert_eq!(entries[1], Entry { name: "Alice".into(), score: 10 });

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn list_never_exceeds_the_bound() {
        let path = temp_path();

        let mut board = Leaderboard::load(&path);
        for i in 0..25 {
            board.submit(&format!("p{}", i), i).unwrap();
        }

        assert_eq!(board.entries().len(), MAX_ENTRIES);
        // The ten best survive
        assert_eq!(board.entries()[0].score, 24);
        assert_eq!(board.entries()[MAX_ENTRIES - 1].score, 15);
        assert_eq!(board.top().len(), DISPLAY_ENTRIES);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn empty_or_blank_names_are_rejected() {
        let path = temp_path();

        let mut board = Leaderboard::load(&path);
        assert!(matches!(board.submit("", 5), Err(LeaderboardError::EmptyName)));
        assert!(matches!(board.submit("   ", 5), Err(LeaderboardError::EmptyName)));
        assert!(board.entries().is_empty());
    }
}
