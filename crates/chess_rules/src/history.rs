//! Linear turn log with a movable "current turn" pointer.
//!
//! The pointer is `None` before the first turn. Stepping backward and forward
//! moves it and replays the board; recording a new turn while rewound drops
//! everything after the pointer, so the log never branches.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Board;
use crate::turn::Turn;
use crate::types::Piece;

/// Where the viewer stands relative to the end of the log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayMode {
    /// Pointer at the last recorded turn.
    #[default]
    Live,
    /// Rewound, last step went backward.
    SteppingBackward,
    /// Rewound, last step went forward.
    SteppingForward,
}

/// Whether `piece` has left its origin square at any point in `played`.
///
/// A linear scan; games are a few hundred turns at most.
pub fn has_piece_moved(played: &[Turn], piece: &Piece) -> bool {
    played.iter().any(|t| t.source.index == piece.origin)
}

#[derive(Clone, Debug, Default)]
pub struct TurnHistory {
    turns: Vec<Turn>,
    current: Option<usize>,
    mode: ReplayMode,
}

impl TurnHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from stored turns and a pointer.
    /// Returns None when the pointer lies outside the turns.
    pub fn from_parts(turns: Vec<Turn>, current: Option<usize>) -> Option<Self> {
        if current.is_some_and(|i| i >= turns.len()) {
            return None;
        }
        let mode = if current.map_or(0, |i| i + 1) == turns.len() {
            ReplayMode::Live
        } else {
            ReplayMode::SteppingBackward
        };
        Some(Self {
            turns,
            current,
            mode,
        })
    }

    /// Append a turn after the pointer, discarding any turns beyond it first.
    pub fn record(&mut self, turn: Turn) {
        let keep = self.played_len();
        if keep < self.turns.len() {
            debug!(
                dropped = self.turns.len() - keep,
                "history diverges, truncating"
            );
            self.turns.truncate(keep);
        }
        self.turns.push(turn);
        self.current = Some(self.turns.len() - 1);
        self.mode = ReplayMode::Live;
    }

    /// Undo the current turn on `board` and move the pointer back one.
    /// Returns the backward motion for animation, or None before the first turn.
    pub fn step_backward(&mut self, board: &mut Board) -> Option<Turn> {
        let idx = self.current?;
        let turn = &self.turns[idx];
        turn.revert(board);
        let inverse = turn.inverse();
        self.current = idx.checked_sub(1);
        self.mode = ReplayMode::SteppingBackward;
        debug!(turn = idx, "stepped backward");
        Some(inverse)
    }

    /// Replay the next turn on `board` and advance the pointer.
    /// Returns the replayed turn, or None at the end of the log.
    pub fn step_forward(&mut self, board: &mut Board) -> Option<Turn> {
        let next = self.played_len();
        let turn = self.turns.get(next)?;
        turn.apply(board);
        self.current = Some(next);
        self.mode = if self.is_last_turn() {
            ReplayMode::Live
        } else {
            ReplayMode::SteppingForward
        };
        debug!(turn = next, "stepped forward");
        Some(turn.clone())
    }

    /// Step until the pointer reaches `target`. A castle is one step.
    /// Targets past the end stop at the last turn.
    pub fn jump_to(&mut self, board: &mut Board, target: Option<usize>) -> Vec<Turn> {
        let target_len = target.map_or(0, |i| i + 1).min(self.turns.len());
        let mut steps = Vec::new();
        while self.played_len() > target_len {
            match self.step_backward(board) {
                Some(t) => steps.push(t),
                None => break,
            }
        }
        while self.played_len() < target_len {
            match self.step_forward(board) {
                Some(t) => steps.push(t),
                None => break,
            }
        }
        steps
    }

    /// Turns leading to the current position.
    pub fn played(&self) -> &[Turn] {
        &self.turns[..self.played_len()]
    }

    /// Every recorded turn, including ones ahead of the pointer.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    fn played_len(&self) -> usize {
        self.current.map_or(0, |i| i + 1)
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_turn(&self) -> Option<&Turn> {
        self.current.map(|i| &self.turns[i])
    }

    /// The current turn, for amending while it is being finalized.
    pub fn current_turn_mut(&mut self) -> Option<&mut Turn> {
        self.current.map(|i| &mut self.turns[i])
    }

    pub fn mode(&self) -> ReplayMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn is_before_first(&self) -> bool {
        self.current.is_none()
    }

    pub fn is_first_turn(&self) -> bool {
        self.current == Some(0)
    }

    pub fn is_last_turn(&self) -> bool {
        self.played_len() == self.turns.len()
    }

    pub fn has_piece_moved(&self, piece: &Piece) -> bool {
        has_piece_moved(self.played(), piece)
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod history_tests;
