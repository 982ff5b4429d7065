//! Session settings, loadable from TOML.
//!
//! ```toml
//! clock_secs = 300
//! increment_secs = 3
//! rewind_enabled = false
//! starting_color = "White"
//! mode = "Networked"
//! ```
//!
//! Missing keys fall back to a 10+5 single-device game with rewind enabled
//! and a random color for the host.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clock::TimeControl;
use crate::error::ConfigError;
use crate::types::Color;

/// Which color the first player (the host, or the first local player) takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorAssignment {
    White,
    Black,
    #[default]
    Random,
}

impl ColorAssignment {
    pub fn resolve<R: Rng>(self, rng: &mut R) -> Color {
        match self {
            ColorAssignment::White => Color::White,
            ColorAssignment::Black => Color::Black,
            ColorAssignment::Random => {
                if rng.gen_bool(0.5) {
                    Color::White
                } else {
                    Color::Black
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    SingleDevice,
    Networked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Starting time per player, 0 for an untimed game
    pub clock_secs: u64,
    pub increment_secs: u64,
    pub rewind_enabled: bool,
    pub starting_color: ColorAssignment,
    pub mode: GameMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let tc = TimeControl::default();
        Self {
            clock_secs: tc.initial_secs,
            increment_secs: tc.increment_secs,
            rewind_enabled: true,
            starting_color: ColorAssignment::default(),
            mode: GameMode::default(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_secs == 0 && self.increment_secs > 0 {
            return Err(ConfigError::IncrementWithoutClock);
        }
        Ok(())
    }

    pub fn time_control(&self) -> TimeControl {
        TimeControl {
            initial_secs: self.clock_secs,
            increment_secs: self.increment_secs,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
