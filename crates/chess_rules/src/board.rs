use serde::{Deserialize, Serialize};

use crate::bitboard::Bitboard;
use crate::error::BoardError;
use crate::types::*;

/// One cell of the board: a fixed coordinate and display color plus its occupant.
///
/// Two squares are equal when their coordinates are, whatever stands on them.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Square {
    pub index: u8,
    pub color: SquareColor,
    pub piece: Option<Piece>,
}

impl Square {
    pub fn new(index: u8) -> Self {
        Self {
            index,
            color: SquareColor::of(index),
            piece: None,
        }
    }

    pub fn with_piece(index: u8, piece: Option<Piece>) -> Self {
        Self {
            piece,
            ..Self::new(index)
        }
    }

    pub fn file(&self) -> i8 {
        file_of(self.index)
    }

    pub fn rank(&self) -> i8 {
        rank_of(self.index)
    }

    pub fn coord(&self) -> String {
        sq_to_coord(self.index)
    }
}

impl PartialEq for Square {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Square {}

/// The 64-square grid.
///
/// Pure data container: no legality checks happen here.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<Square>", into = "Vec<Square>")]
pub struct Board {
    squares: [Square; 64],
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    pub fn empty() -> Self {
        let mut squares = [Square::new(0); 64];
        for (i, s) in squares.iter_mut().enumerate() {
            *s = Square::new(i as u8);
        }
        Board { squares }
    }

    pub fn startpos() -> Self {
        let mut b = Board::empty();
        for f in 0..8u8 {
            b.place(Color::White, PieceKind::Pawn, 8 + f);
            b.place(Color::Black, PieceKind::Pawn, 48 + f);
        }
        for (f, &kind) in BACK_RANK.iter().enumerate() {
            b.place(Color::White, kind, f as u8);
            b.place(Color::Black, kind, 56 + f as u8);
        }
        b
    }

    /// Build a board from the piece-placement field of a FEN string.
    ///
    /// Only the first field is read; anything after a space is ignored. Every
    /// piece gets its current square as origin.
    pub fn from_placement(placement: &str) -> Result<Self, BoardError> {
        let board_part = placement.split_whitespace().next().unwrap_or("");
        let ranks: Vec<&str> = board_part.split('/').collect();
        if ranks.len() != 8 {
            return Err(BoardError::InvalidPlacement(format!(
                "expected 8 ranks, found {}",
                ranks.len()
            )));
        }

        let mut b = Board::empty();
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let mut file: i8 = 0;
            let rank: i8 = 7 - rank_idx as i8; // FEN lists rank 8 .. 1
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as i8;
                } else {
                    let color = if ch.is_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let kind = match ch.to_ascii_lowercase() {
                        'p' => PieceKind::Pawn,
                        'n' => PieceKind::Knight,
                        'b' => PieceKind::Bishop,
                        'r' => PieceKind::Rook,
                        'q' => PieceKind::Queen,
                        'k' => PieceKind::King,
                        _ => {
                            return Err(BoardError::InvalidPlacement(format!(
                                "invalid piece char {ch:?}"
                            )));
                        }
                    };
                    let s = sq(file, rank).ok_or_else(|| {
                        BoardError::InvalidPlacement(format!("too many files in rank {}", rank + 1))
                    })?;
                    b.place(color, kind, s);
                    file += 1;
                }
                if file > 8 {
                    return Err(BoardError::InvalidPlacement(format!(
                        "too many files in rank {}",
                        rank + 1
                    )));
                }
            }
            if file != 8 {
                return Err(BoardError::InvalidPlacement(format!(
                    "not enough files in rank {}",
                    rank + 1
                )));
            }
        }

        for c in [Color::White, Color::Black] {
            if b.count(c, PieceKind::King) > 1 {
                return Err(BoardError::DuplicateKing(c));
            }
        }
        Ok(b)
    }

    fn place(&mut self, color: Color, kind: PieceKind, s: u8) {
        self.set_occupant(s, Some(Piece::new(color, kind, s)));
    }

    pub fn square(&self, sq: u8) -> &Square {
        &self.squares[sq as usize]
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.squares[sq as usize].piece
    }

    pub fn set_occupant(&mut self, sq: u8, pc: Option<Piece>) {
        self.squares[sq as usize].piece = pc;
    }

    /// Copy the occupant of `from` onto `to` and clear `from`.
    /// Returns whatever stood on `to` before.
    pub fn move_occupant(&mut self, from: u8, to: u8) -> Option<Piece> {
        let moving = self.piece_at(from);
        let displaced = self.piece_at(to);
        self.set_occupant(to, moving);
        self.set_occupant(from, None);
        displaced
    }

    /// Occupied squares with their pieces, for one color.
    pub fn pieces(&self, c: Color) -> impl Iterator<Item = (u8, Piece)> + '_ {
        self.squares
            .iter()
            .filter_map(move |s| s.piece.filter(|p| p.color == c).map(|p| (s.index, p)))
    }

    pub fn count(&self, c: Color, kind: PieceKind) -> usize {
        self.pieces(c).filter(|(_, p)| p.kind == kind).count()
    }

    /// Square of the given color's king.
    ///
    /// Panics if two kings of one color stand on the board; move generation
    /// never produces that, so it means the game state is corrupt.
    pub fn king_square(&self, c: Color) -> Option<u8> {
        let mut found = None;
        for (s, p) in self.pieces(c) {
            if p.kind == PieceKind::King {
                assert!(found.is_none(), "more than one {c} king on the board");
                found = Some(s);
            }
        }
        found
    }

    pub fn occupied(&self) -> Bitboard {
        self.squares
            .iter()
            .filter(|s| s.piece.is_some())
            .map(|s| s.index)
            .collect()
    }

    pub fn occupied_by(&self, c: Color) -> Bitboard {
        self.pieces(c).map(|(s, _)| s).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

/// Boards compare by what stands where.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.squares
            .iter()
            .zip(other.squares.iter())
            .all(|(a, b)| a.piece == b.piece)
    }
}

impl Eq for Board {}

impl From<Board> for Vec<Square> {
    fn from(board: Board) -> Self {
        board.squares.to_vec()
    }
}

impl TryFrom<Vec<Square>> for Board {
    type Error = BoardError;

    fn try_from(list: Vec<Square>) -> Result<Self, Self::Error> {
        if list.len() != 64 {
            return Err(BoardError::SquareCount(list.len()));
        }
        let mut seen = Bitboard::EMPTY;
        let mut board = Board::empty();
        for s in list {
            if s.index >= 64 || seen.contains(s.index) {
                return Err(BoardError::DuplicateSquare(s.index));
            }
            seen.set(s.index);
            board.set_occupant(s.index, s.piece);
        }
        Ok(board)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let ch = match sq(file, rank).and_then(|s| self.piece_at(s)) {
                    None => '.',
                    Some(p) => {
                        let ch = match p.kind {
                            PieceKind::Pawn => 'p',
                            PieceKind::Knight => 'n',
                            PieceKind::Bishop => 'b',
                            PieceKind::Rook => 'r',
                            PieceKind::Queen => 'q',
                            PieceKind::King => 'k',
                        };
                        if p.color == Color::White {
                            ch.to_ascii_uppercase()
                        } else {
                            ch
                        }
                    }
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
