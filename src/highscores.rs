//! High score leaderboard
//!
//! Kept in session storage next to the per-player scores; tracks the top 10.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Resolved player name
    pub name: String,
    pub score: i64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: i64) -> bool {
        if score <= 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: i64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, name: impl Into<String>, score: i64, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                name: name.into(),
                score,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Re-sort and re-cap a list read from storage
    pub fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_insertion() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score("a", 100, 0.0), Some(1));
        assert_eq!(scores.add_score("b", 300, 0.0), Some(1));
        assert_eq!(scores.add_score("c", 200, 0.0), Some(2));
        // Ties rank below the existing entry
        assert_eq!(scores.add_score("d", 200, 0.0), Some(3));
        let names: Vec<&str> = scores.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "d", "a"]);
        assert_eq!(scores.top_score(), Some(300));
    }

    #[test]
    fn test_cap_is_enforced() {
        let mut scores = HighScores::new();
        for i in 1..=25 {
            scores.add_score(format!("p{}", i), i * 10, 0.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(250));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(160));
        assert!(!scores.qualifies(160));
        assert!(scores.qualifies(161));
    }

    #[test]
    fn test_zero_and_negative_do_not_qualify() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score("z", 0, 0.0), None);
        assert_eq!(scores.add_score("n", -5, 0.0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_normalize_untrusted_list() {
        let mut scores = HighScores {
            entries: (0..15)
                .map(|i| HighScoreEntry {
                    name: format!("p{}", i),
                    score: i,
                    timestamp: 0.0,
                })
                .collect(),
        };
        scores.normalize();
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(14));
    }
}
