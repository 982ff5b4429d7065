//! Rating points moved between the two players when a game ends.

use serde::{Deserialize, Serialize};

use crate::types::Color;

/// K-factor before it is scaled down for stronger players
pub const K_FACTOR: f64 = 32.0;

/// Bounds on the points moved by a decisive game
pub const MIN_TRANSFER: u32 = 1;
pub const MAX_TRANSFER: u32 = 32;

/// Games shorter than this many turns are not rated
pub const MIN_RATED_TURNS: usize = 10;

/// Expected score of a player rated `rating` against `opponent`
pub fn expected_score(rating: u32, opponent: u32) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent as f64 - rating as f64) / 400.0))
}

/// K-factor for a player: every 400 points of rating divides it further.
pub fn k_factor(rating: u32) -> f64 {
    let tier = rating / 400 + 1;
    K_FACTOR / tier as f64
}

/// Points the winner takes from the loser.
pub fn decisive_transfer(winner: u32, loser: u32) -> u32 {
    let k = k_factor(winner);
    let points = (k * (1.0 - expected_score(winner, loser))).round() as u32;
    points.clamp(MIN_TRANSFER, MAX_TRANSFER)
}

/// Points the lower-rated player takes from the higher-rated one on a draw.
pub fn draw_transfer(lower: u32, higher: u32) -> u32 {
    let k = k_factor(lower);
    let points = (k * (0.5 - expected_score(lower, higher))).round().max(0.0) as u32;
    points.min(MAX_TRANSFER)
}

/// Signed rating change for both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingChange {
    pub white: i32,
    pub black: i32,
}

impl RatingChange {
    /// Change for a finished game; `winner` is None for a draw.
    pub fn for_result(white_rating: u32, black_rating: u32, winner: Option<Color>) -> Self {
        let rating = |c: Color| match c {
            Color::White => white_rating,
            Color::Black => black_rating,
        };
        let (gainer, points) = match winner {
            Some(w) => (w, decisive_transfer(rating(w), rating(w.other()))),
            None => {
                let lower = if white_rating <= black_rating {
                    Color::White
                } else {
                    Color::Black
                };
                (lower, draw_transfer(rating(lower), rating(lower.other())))
            }
        };
        let mut change = Self::default();
        change.set(gainer, points as i32);
        change.set(gainer.other(), -(points as i32));
        change
    }

    pub fn get(&self, c: Color) -> i32 {
        match c {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    fn set(&mut self, c: Color, delta: i32) {
        match c {
            Color::White => self.white = delta,
            Color::Black => self.black = delta,
        }
    }
}

#[cfg(test)]
#[path = "rating_tests.rs"]
mod rating_tests;
