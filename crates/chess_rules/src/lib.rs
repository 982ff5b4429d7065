//! Chess rules for two-player games: legal move generation, check and draw
//! detection, a rewindable turn history, clocks and rating transfer.
//!
//! [`GameSession`] ties the pieces together and is driven one square of input
//! at a time. The lower layers are usable on their own.

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod clock;
pub mod config;
pub mod endgame;
pub mod error;
pub mod history;
pub mod movegen;
pub mod perft;
pub mod player;
pub mod rating;
pub mod session;
pub mod snapshot;
pub mod turn;
pub mod types;

pub use attacks::{attacked_squares, in_check, is_square_attacked};
pub use bitboard::*;
pub use board::*;
pub use clock::*;
pub use config::*;
pub use endgame::*;
pub use error::*;
pub use history::*;
pub use movegen::*;
pub use perft::perft;
pub use player::*;
pub use rating::RatingChange;
pub use session::*;
pub use snapshot::*;
pub use turn::*;
pub use types::*;
