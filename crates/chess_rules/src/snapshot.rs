//! Serializable views of a game: the payloads exchanged between two devices
//! and a full snapshot for saving and resuming a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::{Board, Square};
use crate::config::SessionConfig;
use crate::error::SnapshotError;
use crate::player::Player;
use crate::session::GameStatus;
use crate::turn::Turn;

/// A completed turn sent to the other device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnPayload {
    pub game_id: Uuid,
    pub turn: Turn,
}

impl TurnPayload {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// The promotion square with its new piece, and the mover's clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquarePayload {
    pub game_id: Uuid,
    pub square: Square,
    pub remaining_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub game_id: Uuid,
    pub board: Board,
    pub players: Vec<Player>,
    #[serde(default)]
    pub turns: Vec<Turn>,
    pub config: SessionConfig,
    pub started_at: DateTime<Utc>,
    pub current_turn: Option<usize>,
    pub is_first_turn: bool,
    pub is_last_turn: bool,
    pub status: GameStatus,
    /// A pawn move on the board still waiting for its promotion piece.
    #[serde(default)]
    pub pending_promotion: Option<Turn>,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(s)?)
    }
}
