//! Attack tables and attacked-square queries.
//!
//! This module contains:
//! - Knight, king and pawn attack tables (constant)
//! - Ray tables for sliding pieces, resolved against an occupancy mask
//! - Attacked-square sets and check detection for a whole board

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::types::{Color, Piece, PieceKind};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Ray directions as (file, rank) steps: 0=N, 1=NE, 2=E, 3=SE, 4=S, 5=SW, 6=W, 7=NW.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const ORTHOGONAL: [usize; 4] = [0, 2, 4, 6];
const DIAGONAL: [usize; 4] = [1, 3, 5, 7];

const fn on_board(f: i8, r: i8) -> bool {
    f >= 0 && f < 8 && r >= 0 && r < 8
}

const fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut s = 0;
    while s < 64 {
        let f = (s % 8) as i8;
        let r = (s / 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < deltas.len() {
            let (df, dr) = deltas[i];
            if on_board(f + df, r + dr) {
                bits |= 1u64 << ((r + dr) * 8 + f + df) as u32;
            }
            i += 1;
        }
        table[s] = Bitboard(bits);
        s += 1;
    }
    table
}

/// Pre-computed knight attacks for each square.
pub static KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_DELTAS);

/// Pre-computed king attacks for each square.
pub static KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_DELTAS);

/// Squares a white pawn attacks (north-east and north-west).
pub static WHITE_PAWN_ATTACKS: [Bitboard; 64] = leaper_table(&[(1, 1), (-1, 1)]);

/// Squares a black pawn attacks (south-east and south-west).
pub static BLACK_PAWN_ATTACKS: [Bitboard; 64] = leaper_table(&[(1, -1), (-1, -1)]);

/// RAYS[direction][square] gives all squares in that direction from sq (not including sq).
pub static RAYS: [[Bitboard; 64]; 8] = {
    let mut rays = [[Bitboard::EMPTY; 64]; 8];
    let mut d = 0;
    while d < 8 {
        let (df, dr) = DIRECTIONS[d];
        let mut s = 0;
        while s < 64 {
            let mut f = (s % 8) as i8 + df;
            let mut r = (s / 8) as i8 + dr;
            let mut bits = 0u64;
            while on_board(f, r) {
                bits |= 1u64 << (r * 8 + f) as u32;
                f += df;
                r += dr;
            }
            rays[d][s] = Bitboard(bits);
            s += 1;
        }
        d += 1;
    }
    rays
};

#[inline(always)]
pub fn pawn_attacks(sq: u8, color: Color) -> Bitboard {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[sq as usize],
        Color::Black => BLACK_PAWN_ATTACKS[sq as usize],
    }
}

#[inline(always)]
pub fn knight_attacks(sq: u8) -> Bitboard {
    KNIGHT_ATTACKS[sq as usize]
}

#[inline(always)]
pub fn king_attacks(sq: u8) -> Bitboard {
    KING_ATTACKS[sq as usize]
}

/// Squares along one ray up to and including the first occupied square.
fn ray_attacks(sq: u8, dir: usize, occupied: Bitboard) -> Bitboard {
    let ray = RAYS[dir][sq as usize];
    let (df, dr) = DIRECTIONS[dir];
    // Rays pointing toward higher indices meet their first blocker at the LSB.
    let ascending = dr > 0 || (dr == 0 && df > 0);
    let blocker = if ascending {
        (ray & occupied).lsb()
    } else {
        (ray & occupied).msb()
    };
    match blocker {
        Some(b) => ray & !RAYS[dir][b as usize],
        None => ray,
    }
}

pub fn bishop_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    DIAGONAL
        .iter()
        .fold(Bitboard::EMPTY, |acc, &d| acc | ray_attacks(sq, d, occupied))
}

pub fn rook_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    ORTHOGONAL
        .iter()
        .fold(Bitboard::EMPTY, |acc, &d| acc | ray_attacks(sq, d, occupied))
}

pub fn queen_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Squares a piece standing on `sq` threatens, including squares held by its
/// own side (those count as defended). Pawns threaten their diagonals only.
pub fn piece_attacks(sq: u8, piece: Piece, occupied: Bitboard) -> Bitboard {
    match piece.kind {
        PieceKind::Pawn => pawn_attacks(sq, piece.color),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupied),
        PieceKind::Rook => rook_attacks(sq, occupied),
        PieceKind::Queen => queen_attacks(sq, occupied),
        PieceKind::King => king_attacks(sq),
    }
}

/// Union of the attack sets of every piece of color `by`.
pub fn attacked_squares(board: &Board, by: Color) -> Bitboard {
    let occupied = board.occupied();
    board
        .pieces(by)
        .fold(Bitboard::EMPTY, |acc, (s, p)| acc | piece_attacks(s, p, occupied))
}

/// Whether any piece of color `by` attacks `target`.
pub fn is_square_attacked(board: &Board, target: u8, by: Color) -> bool {
    let occupied = board.occupied();
    let of_kind = |kind: PieceKind| -> Bitboard {
        board
            .pieces(by)
            .filter(|(_, p)| p.kind == kind)
            .map(|(s, _)| s)
            .collect()
    };
    let queens = of_kind(PieceKind::Queen);

    // A pawn of `by` attacks target when a pawn of the other color on target would attack it back.
    !(pawn_attacks(target, by.other()) & of_kind(PieceKind::Pawn)).is_empty()
        || !(knight_attacks(target) & of_kind(PieceKind::Knight)).is_empty()
        || !(king_attacks(target) & of_kind(PieceKind::King)).is_empty()
        || !(bishop_attacks(target, occupied) & (of_kind(PieceKind::Bishop) | queens)).is_empty()
        || !(rook_attacks(target, occupied) & (of_kind(PieceKind::Rook) | queens)).is_empty()
}

/// Whether the king of color `c` stands on a square the opponent attacks.
pub fn in_check(board: &Board, c: Color) -> bool {
    match board.king_square(c) {
        Some(k) => is_square_attacked(board, k, c.other()),
        None => false,
    }
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
