//! The two sides of a game and what each has taken from the other.

use serde::{Deserialize, Serialize};

use crate::turn::Turn;
use crate::types::{Color, Piece};

/// Default rating for a new account.
pub const DEFAULT_RATING: u32 = 1200;

/// Account data shown next to a player. Read-only for the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub nickname: String,
    pub rating: u32,
}

impl PlayerProfile {
    pub fn new(nickname: impl Into<String>, rating: u32) -> Self {
        Self {
            nickname: nickname.into(),
            rating,
        }
    }
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self::new("Player", DEFAULT_RATING)
    }
}

/// Who controls a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameRole {
    /// Created the networked game.
    Host,
    /// Joined a networked game.
    Guest,
    /// Both sides share one device.
    Local,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub profile: PlayerProfile,
    pub color: Color,
    pub role: GameRole,
    pub remaining_secs: u64,
    /// Opposing pieces taken by this player, in capture order.
    #[serde(default)]
    pub captured: Vec<Piece>,
    pub points: u32,
}

impl Player {
    pub fn new(profile: PlayerProfile, color: Color, role: GameRole, remaining_secs: u64) -> Self {
        Self {
            profile,
            color,
            role,
            remaining_secs,
            captured: Vec::new(),
            points: 0,
        }
    }

    pub fn record_capture(&mut self, piece: Piece) {
        self.points += piece.kind.points();
        self.captured.push(piece);
    }

    /// Rebuild captures and points from the turns leading to the current position.
    pub fn recount_captures(&mut self, played: &[Turn]) {
        self.captured.clear();
        self.points = 0;
        let color = self.color;
        for turn in played.iter().filter(|t| t.color() == color) {
            if let Some(piece) = turn.captured() {
                self.record_capture(piece);
            }
        }
    }

    pub fn is_flagged(&self) -> bool {
        self.remaining_secs == 0
    }
}

#[cfg(test)]
#[path = "player_tests.rs"]
mod player_tests;
