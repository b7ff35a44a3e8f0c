//! Session context shared by the players of one page load
//!
//! The app shell owns the `SessionContext` and is the only one mutating it;
//! engines borrow it read-only each frame.

use serde::{Deserialize, Serialize};

/// Which player an engine belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    /// 1-based player number
    pub fn number(self) -> u8 {
        match self {
            PlayerSlot::One => 1,
            PlayerSlot::Two => 2,
        }
    }

    pub fn default_name(self) -> String {
        format!("Player {}", self.number())
    }
}

/// One or two players sharing the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerMode {
    #[default]
    Single,
    Two,
}

impl PlayerMode {
    pub fn player_count(self) -> u8 {
        match self {
            PlayerMode::Single => 1,
            PlayerMode::Two => 2,
        }
    }

    pub fn slots(self) -> &'static [PlayerSlot] {
        match self {
            PlayerMode::Single => &[PlayerSlot::One],
            PlayerMode::Two => &[PlayerSlot::One, PlayerSlot::Two],
        }
    }
}

/// A resolved player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub slot: PlayerSlot,
    pub name: String,
}

/// Who is playing on this page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub mode: PlayerMode,
    pub players: Vec<PlayerProfile>,
}

impl SessionContext {
    pub fn new(mode: PlayerMode) -> Self {
        let players = mode
            .slots()
            .iter()
            .map(|&slot| PlayerProfile {
                slot,
                name: slot.default_name(),
            })
            .collect();
        Self { mode, players }
    }

    pub fn is_two_player(&self) -> bool {
        self.mode == PlayerMode::Two
    }

    pub fn name(&self, slot: PlayerSlot) -> String {
        self.players
            .iter()
            .find(|p| p.slot == slot)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| slot.default_name())
    }

    pub fn set_name(&mut self, slot: PlayerSlot, name: impl Into<String>) {
        if let Some(player) = self.players.iter_mut().find(|p| p.slot == slot) {
            player.name = name.into();
        }
    }
}

/// Everything the results page needs to know about a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsRoute {
    pub player_count: u8,
    /// The finishing score earned a place on the highscore list
    pub update_leaderboard: bool,
    /// The run was ended by a concede command
    pub is_direct: bool,
    /// Player who finished first (the only player in single mode)
    pub owner: PlayerSlot,
    pub owner_score: i64,
    /// Second finisher in two-player mode
    pub other: Option<(PlayerSlot, i64)>,
}

impl ResultsRoute {
    /// Query string appended to the results URL
    pub fn query_string(&self) -> String {
        let mut query = format!(
            "players={}&leaderboard={}&direct={}&owner={}&ownerScore={}",
            self.player_count,
            u8::from(self.update_leaderboard),
            u8::from(self.is_direct),
            self.owner.number(),
            self.owner_score
        );
        if let Some((slot, score)) = self.other {
            query.push_str(&format!("&other={}&otherScore={}", slot.number(), score));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_defaults() {
        let ctx = SessionContext::new(PlayerMode::Two);
        assert_eq!(ctx.players.len(), 2);
        assert_eq!(ctx.name(PlayerSlot::Two), "Player 2");
        assert!(ctx.is_two_player());

        let mut single = SessionContext::new(PlayerMode::Single);
        single.set_name(PlayerSlot::Two, "ignored");
        single.set_name(PlayerSlot::One, "Ada");
        assert_eq!(single.name(PlayerSlot::One), "Ada");
        assert_eq!(single.players.len(), 1);
    }

    #[test]
    fn test_route_query() {
        let route = ResultsRoute {
            player_count: 2,
            update_leaderboard: true,
            is_direct: false,
            owner: PlayerSlot::One,
            owner_score: 350,
            other: Some((PlayerSlot::Two, 125)),
        };
        assert_eq!(
            route.query_string(),
            "players=2&leaderboard=1&direct=0&owner=1&ownerScore=350&other=2&otherScore=125"
        );
    }
}
