//! Check, mate and draw detection.
//!
//! Everything here is evaluated for the side about to move, after a
//! half-move has been played and recorded.

use serde::{Deserialize, Serialize};

use crate::attacks::{attacked_squares, in_check, king_attacks, piece_attacks};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::movegen::{has_legal_move, pseudo_destinations};
use crate::turn::Turn;
use crate::types::*;

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Checkmate,
    Stalemate,
    ThreefoldRepetition,
    InsufficientMaterial,
    DeadPosition,
    Timeout,
    /// The flag fell but the opponent could never have mated.
    TimeoutVsInsufficientMaterial,
    Surrender,
    DrawAgreed,
}

impl EndReason {
    pub fn is_draw(self) -> bool {
        !matches!(
            self,
            EndReason::Checkmate | EndReason::Timeout | EndReason::Surrender
        )
    }
}

pub fn is_checkmate(board: &Board, played: &[Turn], c: Color) -> bool {
    in_check(board, c) && !has_legal_move(board, played, c)
}

pub fn is_stalemate(board: &Board, played: &[Turn], c: Color) -> bool {
    !in_check(board, c) && !has_legal_move(board, played, c)
}

/// The latest turn's squares have come up three times among its player's own turns.
pub fn is_threefold_repetition(played: &[Turn]) -> bool {
    let latest = match played.last() {
        Some(t) => t,
        None => return false,
    };
    played
        .iter()
        .rev()
        .step_by(2)
        .filter(|t| t.same_squares(latest))
        .count()
        >= 3
}

/// Non-king pieces of one color.
fn material(board: &Board, c: Color) -> Vec<(u8, Piece)> {
    board
        .pieces(c)
        .filter(|(_, p)| p.kind != PieceKind::King)
        .collect()
}

/// Neither side can ever mate with what is left.
pub fn is_insufficient_material(board: &Board) -> bool {
    let white = material(board, Color::White);
    let black = material(board, Color::Black);

    match (white.as_slice(), black.as_slice()) {
        // King vs King
        ([], []) => true,
        // King + minor vs King
        ([(_, p)], []) | ([], [(_, p)]) => p.kind.is_minor(),
        // One minor each
        ([(ws, wp)], [(bs, bp)]) => match (wp.kind, bp.kind) {
            (PieceKind::Bishop, PieceKind::Bishop) => {
                SquareColor::of(*ws) == SquareColor::of(*bs)
            }
            (PieceKind::Knight, PieceKind::Knight)
            | (PieceKind::Bishop, PieceKind::Knight)
            | (PieceKind::Knight, PieceKind::Bishop) => true,
            _ => false,
        },
        _ => false,
    }
}

/// Whether `c` keeps enough material to mate a lone king: anything beyond a
/// bare king or a king with a single minor piece.
pub fn has_mating_material(board: &Board, c: Color) -> bool {
    match material(board, c).as_slice() {
        [] => false,
        [(_, p)] => !p.kind.is_minor(),
        _ => true,
    }
}

/// A piece that can never move again unless something else moves first.
///
/// Pawns blocked by a king are not frozen, nor are pieces whose only way out
/// is through their own king; the king may step aside.
fn is_frozen(board: &Board, played: &[Turn], s: u8, p: Piece) -> bool {
    if p.kind == PieceKind::Pawn
        && let Some(front) = sq(file_of(s), rank_of(s) + p.color.forward())
        && board.piece_at(front).is_some_and(|q| q.kind == PieceKind::King)
    {
        return false;
    }
    if p.kind != PieceKind::Pawn
        && let Some(king) = board.king_square(p.color)
        && piece_attacks(s, p, board.occupied()).contains(king)
    {
        return false;
    }
    pseudo_destinations(board, played, s).is_empty()
}

/// Squares the king of `c` can walk to through squares the frozen enemy
/// pieces do not cover, and whether it can capture anything on the way.
fn king_can_capture(board: &Board, c: Color) -> bool {
    let Some(start) = board.king_square(c) else {
        return false;
    };
    let enemy = c.other();
    let occupied = board.occupied();
    let own = board.occupied_by(c);
    let covered = material(board, enemy)
        .into_iter()
        .fold(Bitboard::EMPTY, |acc, (s, p)| acc | piece_attacks(s, p, occupied));
    let enemy_pieces: Bitboard = material(board, enemy).into_iter().map(|(s, _)| s).collect();

    let mut seen = Bitboard::from_square(start);
    let mut frontier = vec![start];
    while let Some(s) = frontier.pop() {
        for next in king_attacks(s) & !own & !covered & !seen {
            if enemy_pieces.contains(next) {
                return true;
            }
            seen.set(next);
            frontier.push(next);
        }
    }
    false
}

/// No sequence of legal moves can lead to mate: every non-king piece is
/// locked in place and neither king can reach anything to capture.
pub fn is_dead_position(board: &Board, played: &[Turn]) -> bool {
    for c in [Color::White, Color::Black] {
        if !material(board, c)
            .into_iter()
            .all(|(s, p)| is_frozen(board, played, s, p))
        {
            return false;
        }
    }
    !king_can_capture(board, Color::White) && !king_can_capture(board, Color::Black)
}

/// Whether the side to move is in check, and where its king stands.
pub fn checked_king(board: &Board, c: Color) -> Option<u8> {
    board
        .king_square(c)
        .filter(|&k| attacked_squares(board, c.other()).contains(k))
}

/// End condition reached with `to_move` to play, checked in order:
/// mate, stalemate, repetition, insufficient material, dead position.
pub fn evaluate(board: &Board, played: &[Turn], to_move: Color) -> Option<EndReason> {
    if !has_legal_move(board, played, to_move) {
        return Some(if in_check(board, to_move) {
            EndReason::Checkmate
        } else {
            EndReason::Stalemate
        });
    }
    if is_threefold_repetition(played) {
        return Some(EndReason::ThreefoldRepetition);
    }
    if is_insufficient_material(board) {
        return Some(EndReason::InsufficientMaterial);
    }
    if is_dead_position(board, played) {
        return Some(EndReason::DeadPosition);
    }
    None
}

#[cfg(test)]
#[path = "endgame_tests.rs"]
mod endgame_tests;
