//! The record of one half-move and how to play it onto, or take it back off, a board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Square};
use crate::types::{Color, Piece};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastleSide {
    Short,
    Long,
}

impl CastleSide {
    /// Rook (from, to) squares for a castle of this side by `color`.
    pub fn rook_squares(self, color: Color) -> (u8, u8) {
        let rank = color.home_rank() as u8 * 8;
        match self {
            CastleSide::Short => (rank + 7, rank + 5),
            CastleSide::Long => (rank, rank + 3),
        }
    }

    /// King destination for a castle of this side by `color`.
    pub fn king_destination(self, color: Color) -> u8 {
        let rank = color.home_rank() as u8 * 8;
        match self {
            CastleSide::Short => rank + 6,
            CastleSide::Long => rank + 2,
        }
    }
}

/// Remaining seconds on both clocks, as shown after a turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub white: u64,
    pub black: u64,
}

impl ClockSnapshot {
    pub fn get(&self, c: Color) -> u64 {
        match c {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    pub fn set(&mut self, c: Color, secs: u64) {
        match c {
            Color::White => self.white = secs,
            Color::Black => self.black = secs,
        }
    }
}

/// One completed half-move.
///
/// `source` holds the moving piece and `destination` holds whatever stood
/// there before the move, so the turn carries everything needed to undo it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub source: Square,
    pub destination: Square,
    /// Seconds the mover spent on this turn.
    pub duration: u64,
    pub castle: Option<CastleSide>,
    pub check: bool,
    pub check_mate: bool,
    pub promotion: Option<Piece>,
    /// Square of a pawn taken en passant, with that pawn on it.
    pub en_passant: Option<Square>,
    pub checked_king: Option<u8>,
    pub timestamp: DateTime<Utc>,
    pub clocks: ClockSnapshot,
}

impl Turn {
    /// A bare turn moving the occupant of `from` to `to` on `board`.
    pub fn new(board: &Board, from: u8, to: u8) -> Self {
        Self {
            source: *board.square(from),
            destination: *board.square(to),
            duration: 0,
            castle: None,
            check: false,
            check_mate: false,
            promotion: None,
            en_passant: None,
            checked_king: None,
            timestamp: DateTime::<Utc>::default(),
            clocks: ClockSnapshot::default(),
        }
    }

    /// The piece that made the move, as it was before moving.
    pub fn mover(&self) -> Piece {
        self.source
            .piece
            .expect("turn recorded without a piece on its source square")
    }

    pub fn color(&self) -> Color {
        self.mover().color
    }

    /// Piece taken by this turn, either on the destination or en passant.
    pub fn captured(&self) -> Option<Piece> {
        self.destination
            .piece
            .or_else(|| self.en_passant.and_then(|s| s.piece))
    }

    pub fn is_short_castle(&self) -> bool {
        self.castle == Some(CastleSide::Short)
    }

    pub fn is_long_castle(&self) -> bool {
        self.castle == Some(CastleSide::Long)
    }

    /// Same source and destination squares. Castles compare as one unit.
    pub fn same_squares(&self, other: &Turn) -> bool {
        self.source == other.source && self.destination == other.destination
    }

    /// Play this turn onto `board`, including the castling rook, the en
    /// passant capture and the promotion if one has been chosen.
    pub fn apply(&self, board: &mut Board) {
        let mover = self.mover();
        board.set_occupant(self.source.index, None);
        board.set_occupant(
            self.destination.index,
            Some(self.promotion.unwrap_or(mover)),
        );
        if let Some(ep) = self.en_passant {
            board.set_occupant(ep.index, None);
        }
        if let Some(side) = self.castle {
            let (rook_from, rook_to) = side.rook_squares(mover.color);
            board.move_occupant(rook_from, rook_to);
        }
    }

    /// Take this turn back off `board`, restoring every piece it moved or captured.
    pub fn revert(&self, board: &mut Board) {
        if let Some(side) = self.castle {
            let (rook_from, rook_to) = side.rook_squares(self.mover().color);
            board.move_occupant(rook_to, rook_from);
        }
        board.set_occupant(self.source.index, self.source.piece);
        board.set_occupant(self.destination.index, self.destination.piece);
        if let Some(ep) = self.en_passant {
            board.set_occupant(ep.index, ep.piece);
        }
    }

    /// The backward motion of this turn: the piece travels from the
    /// destination back to the source.
    pub fn inverse(&self) -> Turn {
        let arrived = self.promotion.or(self.source.piece);
        Turn {
            source: Square::with_piece(self.destination.index, arrived),
            destination: Square::with_piece(self.source.index, None),
            en_passant: None,
            promotion: None,
            check: false,
            check_mate: false,
            checked_king: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[path = "turn_tests.rs"]
mod turn_tests;
