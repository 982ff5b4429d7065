//! Destination generation per piece, plus the check/pin filter.
//!
//! Generation ignores whose turn it is: any occupied square can be asked for
//! its destinations. `played` is always the slice of turns leading to the
//! board as it stands, which is what en passant and castling look at.

use crate::attacks::{
    attacked_squares, bishop_attacks, in_check, is_square_attacked, king_attacks, knight_attacks,
    pawn_attacks, queen_attacks, rook_attacks,
};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::history::has_piece_moved;
use crate::turn::{CastleSide, Turn};
use crate::types::*;

/// Destinations for the piece on `from` before the check filter.
pub fn pseudo_destinations(board: &Board, played: &[Turn], from: u8) -> Bitboard {
    let pc = match board.piece_at(from) {
        Some(p) => p,
        None => return Bitboard::EMPTY,
    };
    let own = board.occupied_by(pc.color);
    let occupied = board.occupied();
    match pc.kind {
        PieceKind::Pawn => gen_pawn(board, played, from, pc),
        PieceKind::Knight => knight_attacks(from) & !own,
        PieceKind::Bishop => bishop_attacks(from, occupied) & !own,
        PieceKind::Rook => rook_attacks(from, occupied) & !own,
        PieceKind::Queen => queen_attacks(from, occupied) & !own,
        PieceKind::King => gen_king(board, played, from, pc),
    }
}

/// Destinations for the piece on `from` that do not leave its own king attacked.
///
/// Each candidate is probed on a scratch board: the move is played, the
/// opponent's attacks are looked up, and the move is taken back. This keeps
/// pinned pieces on their pin line and, when in check, leaves only blocks,
/// captures of the checker and king escapes.
pub fn legal_destinations(board: &Board, played: &[Turn], from: u8) -> Bitboard {
    let pc = match board.piece_at(from) {
        Some(p) => p,
        None => return Bitboard::EMPTY,
    };
    let mut scratch = board.clone();
    pseudo_destinations(board, played, from)
        .filter(|&to| {
            let probe = build_turn(board, played, from, to);
            probe.apply(&mut scratch);
            let safe = !in_check(&scratch, pc.color);
            probe.revert(&mut scratch);
            safe
        })
        .collect()
}

/// Every legal (from, to) pair for `color`.
pub fn legal_moves(board: &Board, played: &[Turn], color: Color) -> Vec<(u8, u8)> {
    let mut out = Vec::with_capacity(64);
    for (from, _) in board.pieces(color) {
        out.extend(legal_destinations(board, played, from).map(|to| (from, to)));
    }
    out
}

/// Whether `color` has at least one legal move.
pub fn has_legal_move(board: &Board, played: &[Turn], color: Color) -> bool {
    board
        .pieces(color)
        .any(|(from, _)| !legal_destinations(board, played, from).is_empty())
}

/// A turn moving `from` to `to`, with the castle and en passant details
/// filled in from the position. Clock, check and promotion fields are left
/// for the caller.
pub fn build_turn(board: &Board, played: &[Turn], from: u8, to: u8) -> Turn {
    let mut turn = Turn::new(board, from, to);
    if let Some(pc) = board.piece_at(from) {
        turn.castle = castle_side(pc, from, to);
        turn.en_passant = en_passant_square(board, played, from, to).map(|s| *board.square(s));
    }
    turn
}

/// The castle a king move from `from` to `to` performs, if it is one.
pub fn castle_side(pc: Piece, from: u8, to: u8) -> Option<CastleSide> {
    if pc.kind != PieceKind::King || !on_castling_square(pc.color, from) {
        return None;
    }
    [CastleSide::Short, CastleSide::Long]
        .into_iter()
        .find(|side| side.king_destination(pc.color) == to)
}

fn on_castling_square(c: Color, s: u8) -> bool {
    file_of(s) == 4 && rank_of(s) == c.home_rank()
}

/// For a pawn on `from`, the en passant (destination, captured pawn square)
/// available right now. Only a double step on the immediately preceding turn
/// opens the window.
pub fn en_passant_target(board: &Board, played: &[Turn], from: u8) -> Option<(u8, u8)> {
    let pc = board.piece_at(from)?;
    if pc.kind != PieceKind::Pawn {
        return None;
    }
    let last = played.last()?;
    let last_mover = last.source.piece?;
    if last_mover.kind != PieceKind::Pawn || last_mover.color == pc.color {
        return None;
    }
    if (last.source.rank() - last.destination.rank()).abs() != 2 {
        return None;
    }
    let passed = last.destination.index;
    if rank_of(passed) != rank_of(from) || (file_of(passed) - file_of(from)).abs() != 1 {
        return None;
    }
    if !board
        .piece_at(passed)
        .is_some_and(|p| p.is(pc.color.other(), PieceKind::Pawn))
    {
        return None;
    }
    let target = sq(file_of(passed), rank_of(from) + pc.color.forward())?;
    if board.piece_at(target).is_some() {
        return None;
    }
    Some((target, passed))
}

/// Square of the pawn captured when the pawn on `from` moves to `to`
/// en passant, or None if that move is not an en passant capture.
pub fn en_passant_square(board: &Board, played: &[Turn], from: u8, to: u8) -> Option<u8> {
    en_passant_target(board, played, from)
        .filter(|&(target, _)| target == to)
        .map(|(_, captured)| captured)
}

fn gen_pawn(board: &Board, played: &[Turn], from: u8, pc: Piece) -> Bitboard {
    let mut out = Bitboard::EMPTY;
    let f = file_of(from);
    let r = rank_of(from);
    let dir = pc.color.forward();

    // forward 1, then forward 2 from the starting rank
    if let Some(one) = sq(f, r + dir)
        && board.piece_at(one).is_none()
    {
        out.set(one);
        if r == pc.color.pawn_rank()
            && let Some(two) = sq(f, r + 2 * dir)
            && board.piece_at(two).is_none()
        {
            out.set(two);
        }
    }

    out |= pawn_attacks(from, pc.color) & board.occupied_by(pc.color.other());

    if let Some((target, _)) = en_passant_target(board, played, from) {
        out.set(target);
    }
    out
}

fn gen_king(board: &Board, played: &[Turn], from: u8, pc: Piece) -> Bitboard {
    let enemy = pc.color.other();
    let mut out = king_attacks(from) & !board.occupied_by(pc.color) & !attacked_squares(board, enemy);
    out |= gen_castle(board, played, from, pc);
    out
}

fn gen_castle(board: &Board, played: &[Turn], from: u8, king: Piece) -> Bitboard {
    let mut out = Bitboard::EMPTY;
    let c = king.color;
    if king.origin != from || !on_castling_square(c, from) || has_piece_moved(played, &king) {
        return out;
    }

    // Can't castle out of check
    let enemy = c.other();
    if is_square_attacked(board, from, enemy) {
        return out;
    }

    for side in [CastleSide::Short, CastleSide::Long] {
        let (rook_sq, _) = side.rook_squares(c);
        let rook = match board.piece_at(rook_sq) {
            Some(p) if p.is(c, PieceKind::Rook) && p.origin == rook_sq => p,
            _ => continue,
        };
        if has_piece_moved(played, &rook) {
            continue;
        }

        let (lo, hi) = (from.min(rook_sq), from.max(rook_sq));
        if (lo + 1..hi).any(|s| board.piece_at(s).is_some()) {
            continue;
        }

        // The king may not pass through or land on an attacked square
        let dest = side.king_destination(c);
        let passing = (from + dest) / 2;
        if is_square_attacked(board, passing, enemy) || is_square_attacked(board, dest, enemy) {
            continue;
        }
        out.set(dest);
    }
    out
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
