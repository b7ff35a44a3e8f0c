//! Session-scoped persistence
//!
//! Features:
//! - Last score per player, with the `-42` "no score" sentinel on the wire
//! - Resolved player names
//! - Ranked highscore list (top 10)
//! - The two-player game-over handshake
//!
//! Everything is best-effort: unreadable values fall back to defaults.

pub mod handshake;
pub mod store;

pub use handshake::{Handshake, HandshakeOutcome};
#[cfg(target_arch = "wasm32")]
pub use store::WebSessionStore;
pub use store::{KeyValueStore, MemoryStore};

use crate::highscores::HighScores;
use crate::session::PlayerSlot;

/// Stored in place of a score to mean "nothing recorded"
pub const NO_SCORE_SENTINEL: i64 = -42;

const KEY_PREFIX: &str = "grade_catch";
const HIGHSCORES_KEY: &str = "grade_catch_highscores";
const HANDSHAKE_KEY: &str = "grade_catch_handshake";

fn score_key(slot: PlayerSlot) -> String {
    format!("{}_score_p{}", KEY_PREFIX, slot.number())
}

fn name_key(slot: PlayerSlot) -> String {
    format!("{}_name_p{}", KEY_PREFIX, slot.number())
}

/// Typed access to the session store
pub struct SessionData {
    store: Box<dyn KeyValueStore>,
}

impl SessionData {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Session storage on web, memory elsewhere
    pub fn for_platform() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            Self::new(WebSessionStore::new())
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::in_memory()
        }
    }

    // === Scores ===

    pub fn persist_score(&mut self, slot: PlayerSlot, score: i64) {
        if score == NO_SCORE_SENTINEL {
            log::warn!("Score {} collides with the no-score sentinel", score);
        }
        self.store.set_item(&score_key(slot), &score.to_string());
    }

    pub fn clear_score(&mut self, slot: PlayerSlot) {
        self.store
            .set_item(&score_key(slot), &NO_SCORE_SENTINEL.to_string());
    }

    /// Last recorded score; `None` when absent, unreadable or the sentinel
    pub fn read_persisted_score(&self, slot: PlayerSlot) -> Option<i64> {
        self.store
            .get_item(&score_key(slot))
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|&score| score != NO_SCORE_SENTINEL)
    }

    // === Names ===

    pub fn player_name(&self, slot: PlayerSlot) -> Option<String> {
        self.store
            .get_item(&name_key(slot))
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    pub fn set_player_name(&mut self, slot: PlayerSlot, name: &str) {
        self.store.set_item(&name_key(slot), name.trim());
    }

    /// Stored name, else whatever `prompt` returns (stored for next time),
    /// else "Player N"
    pub fn resolve_player_name(
        &mut self,
        slot: PlayerSlot,
        prompt: impl FnOnce() -> Option<String>,
    ) -> String {
        if let Some(name) = self.player_name(slot) {
            return name;
        }
        match prompt().map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            Some(name) => {
                self.set_player_name(slot, &name);
                log::info!("Player {} is '{}'", slot.number(), name);
                name
            }
            None => slot.default_name(),
        }
    }

    // === Highscores ===

    pub fn highscores(&self) -> HighScores {
        let Some(json) = self.store.get_item(HIGHSCORES_KEY) else {
            return HighScores::new();
        };
        match serde_json::from_str::<HighScores>(&json) {
            Ok(mut scores) => {
                scores.normalize();
                scores
            }
            Err(e) => {
                log::warn!("Discarding unreadable highscores: {}", e);
                HighScores::new()
            }
        }
    }

    pub fn save_highscores(&mut self, scores: &HighScores) {
        if let Ok(json) = serde_json::to_string(scores) {
            self.store.set_item(HIGHSCORES_KEY, &json);
            log::info!("High scores saved ({} entries)", scores.entries.len());
        }
    }

    /// Insert a finishing score; returns the rank if it made the list
    pub fn record_highscore(&mut self, name: &str, score: i64, timestamp: f64) -> Option<usize> {
        let mut scores = self.highscores();
        let rank = scores.add_score(name, score, timestamp)?;
        self.save_highscores(&scores);
        Some(rank)
    }

    // === Handshake ===

    pub fn handshake(&self) -> Handshake {
        self.store
            .get_item(HANDSHAKE_KEY)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn write_handshake(&mut self, handshake: &Handshake) {
        if let Ok(json) = serde_json::to_string(handshake) {
            self.store.set_item(HANDSHAKE_KEY, &json);
        }
    }

    pub fn release_handshake(&mut self) {
        self.store.remove_item(HANDSHAKE_KEY);
    }

    /// Read the handshake, write it back as ours, and report what was read
    ///
    /// Read and write happen in one call so the pair can never be split
    /// across frames.
    pub fn claim_handshake(&mut self, me: PlayerSlot, score: i64) -> HandshakeOutcome {
        let (written, outcome) = self.handshake().claim(me, score);
        self.write_handshake(&written);
        outcome
    }
}

impl Default for SessionData {
    fn default() -> Self {
        Self::in_memory()
    }
}
