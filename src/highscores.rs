//! High score leaderboard system
//!
//! Persisted as JSON, tracks top 10 runs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Gates cleared
    pub score: u32,
    /// Frames the run lasted
    pub frames: u64,
    /// Seed that reproduces the run
    pub seed: u64,
}

impl HighScoreEntry {
    /// Board order: more gates first, then the longer flight
    fn ranks_above(&self, other: &HighScoreEntry) -> bool {
        (self.score, self.frames) > (other.score, other.frames)
    }
}

/// High score leaderboard, best run first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run. Runs without a cleared gate never make the
    /// board; equal runs keep the older entry ahead. Returns the 1-based rank.
    pub fn add_score(&mut self, score: u32, frames: u64, seed: u64) -> Option<usize> {
        let entry = HighScoreEntry {
            score,
            frames,
            seed,
        };
        if score == 0 {
            return None;
        }
        let idx = self.entries.partition_point(|e| !entry.ranks_above(e));
        if idx >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(idx, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(idx + 1)
    }

    pub fn best(&self) -> Option<&HighScoreEntry> {
        self.entries.first()
    }

    /// Load high scores from a JSON file. A missing file is an empty board.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No high scores at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read high scores {}", path.display()))?;
        let mut scores: HighScores = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse high scores {}", path.display()))?;
        scores
            .entries
            .sort_by(|a, b| (b.score, b.frames).cmp(&(a.score, a.frames)));
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    /// Save high scores as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize high scores")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
