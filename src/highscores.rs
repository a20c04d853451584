//! High score ledger
//!
//! Scores are kept per player identity, best first. Persisted as a JSON file;
//! the game only ever submits, ranking and display belong to the ledger.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Maximum number of high scores kept per player. Older, lower games fall off.
pub const MAX_HIGH_SCORES: usize = 10;

/// Receives final scores. Implementations own persistence and ranking.
pub trait ScoreStore {
    /// Record a finished game. `timestamp` is unix milliseconds.
    fn submit(&mut self, identity: &str, score: u64, timestamp: u64);
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, one list per player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScores {
    pub players: BTreeMap<String, Vec<HighScoreEntry>>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// A player's scores, best first
    pub fn entries(&self, identity: &str) -> &[HighScoreEntry] {
        self.players.get(identity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Add a score to a player's list.
    /// Returns the rank achieved (1-indexed) or None if it fell off the list.
    pub fn add_score(&mut self, identity: &str, score: u64, timestamp: u64) -> Option<usize> {
        let entries = self.players.entry(identity.to_string()).or_default();

        // Sorted descending; equal scores keep insertion order
        let pos = entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(entries.len());
        if pos >= MAX_HIGH_SCORES {
            return None;
        }
        entries.insert(pos, HighScoreEntry { score, timestamp });
        entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    /// Get a player's top score (if any)
    pub fn top_score(&self, identity: &str) -> Option<u64> {
        self.entries(identity).first().map(|e| e.score)
    }

    pub fn is_empty(&self) -> bool {
        self.players.values().all(Vec::is_empty)
    }

    /// Load high scores from a JSON file
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let json = std::fs::read_to_string(path)?;
        let scores: HighScores = serde_json::from_str(&json)?;
        log::info!("Loaded high scores for {} players", scores.players.len());
        Ok(scores)
    }

    /// Load high scores, starting fresh when the file is missing or corrupt
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(scores) => scores,
            Err(StorageError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Discarding unreadable high scores {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Save high scores to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} players)", self.players.len());
        Ok(())
    }
}

impl ScoreStore for HighScores {
    fn submit(&mut self, identity: &str, score: u64, timestamp: u64) {
        match self.add_score(identity, score, timestamp) {
            Some(rank) => log::info!("{} scored {} (rank {})", identity, score, rank),
            None => log::info!("{} scored {}", identity, score),
        }
    }
}

/// Ledger that writes through to a file on every submission
#[derive(Debug)]
pub struct FileScoreStore {
    path: std::path::PathBuf,
    scores: HighScores,
}

impl FileScoreStore {
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let scores = HighScores::load_or_default(&path);
        Self { path, scores }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }
}

impl ScoreStore for FileScoreStore {
    fn submit(&mut self, identity: &str, score: u64, timestamp: u64) {
        self.scores.submit(identity, score, timestamp);
        if let Err(e) = self.scores.save(&self.path) {
            log::warn!("Failed to save high scores: {}", e);
        }
    }
}
