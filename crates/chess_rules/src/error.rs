//! Errors raised at the data boundary: board setup, configuration and
//! snapshot loading. Gameplay never errors; illegal input is ignored.

use thiserror::Error;

use crate::types::Color;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("invalid piece placement: {0}")]
    InvalidPlacement(String),
    #[error("board must hold 64 squares, found {0}")]
    SquareCount(usize),
    #[error("duplicate or out-of-range square {0}")]
    DuplicateSquare(u8),
    #[error("more than one {0} king")]
    DuplicateKing(Color),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse config")]
    Toml(#[from] toml::de::Error),
    #[error("increment set on an untimed game")]
    IncrementWithoutClock,
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to (de)serialize snapshot")]
    Json(#[from] serde_json::Error),
    #[error("invalid board")]
    Board(#[from] BoardError),
    #[error("current turn {current} outside history of {len} turns")]
    CurrentTurnOutOfRange { current: usize, len: usize },
    #[error("turn {0} has no piece on its source square")]
    InvalidTurn(usize),
    #[error("snapshot must hold one player per color")]
    PlayerColors,
    #[error("invalid config")]
    Config(#[from] ConfigError),
}
