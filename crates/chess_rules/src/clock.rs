//! Per-turn clock accounting.
//!
//! The clock does not keep time itself. An outside scheduler calls
//! [`Clock::tick`] once a second for the side to move; the clock moves that
//! second from the player's remaining time into the current turn.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::endgame::{EndReason, has_mating_material};
use crate::player::Player;
use crate::types::Color;

/// Time control settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeControl {
    /// Initial time in seconds, 0 for an untimed game
    pub initial_secs: u64,
    /// Increment per move in seconds
    pub increment_secs: u64,
}

impl TimeControl {
    pub fn new(minutes: u64, increment_secs: u64) -> Self {
        Self {
            initial_secs: minutes * 60,
            increment_secs,
        }
    }

    pub fn untimed() -> Self {
        Self {
            initial_secs: 0,
            increment_secs: 0,
        }
    }

    pub fn is_untimed(&self) -> bool {
        self.initial_secs == 0
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(10, 5) // Rapid 10+5
    }
}

impl std::fmt::Display for TimeControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_untimed() {
            write!(f, "Untimed")
        } else {
            write!(f, "{}+{}", self.initial_secs / 60, self.increment_secs)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Clock {
    time_control: TimeControl,
    /// Seconds spent on the turn in progress.
    elapsed_secs: u64,
}

impl Clock {
    pub fn new(time_control: TimeControl) -> Self {
        Self {
            time_control,
            elapsed_secs: 0,
        }
    }

    pub fn time_control(&self) -> TimeControl {
        self.time_control
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// One second passes for `player`. Returns true when their time runs out.
    ///
    /// Untimed games count the turn's duration but never run out.
    pub fn tick(&mut self, player: &mut Player) -> bool {
        self.elapsed_secs += 1;
        if self.time_control.is_untimed() {
            return false;
        }
        player.remaining_secs = player.remaining_secs.saturating_sub(1);
        player.is_flagged()
    }

    /// Close the turn for `player`: add the increment and return the seconds it took.
    pub fn complete_turn(&mut self, player: &mut Player) -> u64 {
        if !self.time_control.is_untimed() {
            player.remaining_secs += self.time_control.increment_secs;
        }
        std::mem::take(&mut self.elapsed_secs)
    }

    /// Drop the turn in progress, e.g. after a rewind.
    pub fn reset_turn(&mut self) {
        self.elapsed_secs = 0;
    }

    /// Format time as M:SS
    pub fn format_time(secs: u64) -> String {
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

/// Result of `flagged` running out of time: a draw when the opponent could
/// never mate, otherwise a win for the opponent.
pub fn timeout_outcome(board: &Board, flagged: Color) -> (Option<Color>, EndReason) {
    let opponent = flagged.other();
    if has_mating_material(board, opponent) {
        (Some(opponent), EndReason::Timeout)
    } else {
        (None, EndReason::TimeoutVsInsufficientMaterial)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod clock_tests;
