//! Two-player game-over handshake
//!
//! Both players' engines run on the same page. Whichever finishes first
//! records itself as owner; the second finisher sees the owner and is the one
//! that leaves for the results page, carrying both scores.

use serde::{Deserialize, Serialize};

use crate::session::PlayerSlot;

/// Shared flag stored in the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Handshake {
    pub active: bool,
    pub owner: Option<PlayerSlot>,
    pub owner_score: i64,
}

/// What a finishing player should do after claiming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// First to finish: wait for the other player, do not navigate
    Claimed,
    /// Second to finish: navigate with the owner's result
    Completed { owner: PlayerSlot, owner_score: i64 },
}

impl Handshake {
    pub fn owned_by(owner: PlayerSlot, owner_score: i64) -> Self {
        Self {
            active: true,
            owner: Some(owner),
            owner_score,
        }
    }

    /// Decide the outcome from the value read, and the value to write back
    ///
    /// The write is unconditional (always active, always this player). A stale
    /// claim by the same player counts as a fresh claim.
    pub fn claim(self, me: PlayerSlot, score: i64) -> (Handshake, HandshakeOutcome) {
        let outcome = match (self.active, self.owner) {
            (true, Some(owner)) if owner != me => HandshakeOutcome::Completed {
                owner,
                owner_score: self.owner_score,
            },
            _ => HandshakeOutcome::Claimed,
        };
        (Handshake::owned_by(me, score), outcome)
    }
}
