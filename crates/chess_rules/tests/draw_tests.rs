//! Tests for draw detection in chess
//!
//! This module tests all draw conditions:
//! - Stalemate
//! - Threefold repetition
//! - Insufficient material
//! - Dead position

mod common;

use chess_rules::{
    Board, Color, EndReason, GameStatus, Submission, evaluate, is_dead_position,
    is_insufficient_material, is_stalemate, legal_moves,
};
use common::*;

fn board(placement: &str) -> Board {
    Board::from_placement(placement).unwrap()
}

fn ended_with(status: &GameStatus) -> Option<(Option<Color>, EndReason)> {
    match status {
        GameStatus::Ended(outcome) => Some((outcome.winner, outcome.reason)),
        GameStatus::InProgress => None,
    }
}

// =============================================================================
// Stalemate Tests
// =============================================================================

#[test]
fn test_stalemate_king_and_pawn_endgame() {
    // White king on g6, white pawn on g7, black king on g8
    let pos = board("6k1/6P1/6K1/8/8/8/8/8");
    assert!(legal_moves(&pos, &[], Color::Black).is_empty());
    assert!(is_stalemate(&pos, &[], Color::Black));
}

#[test]
fn test_stalemate_ends_session_as_draw() {
    // Qb6 leaves the cornered king without a move
    let mut session = session_from("k7/2K5/8/1Q6/8/8/8/8");
    let result = play(&mut session, "b5", "b6");
    assert!(matches!(result, Submission::Moved(_)));
    assert_eq!(
        ended_with(session.status()),
        Some((None, EndReason::Stalemate))
    );
}

// =============================================================================
// Threefold Repetition Tests
// =============================================================================

#[test]
fn test_threefold_repetition_by_knight_shuffle() {
    let mut session = session();
    let shuffle = [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")];

    play_all(&mut session, &shuffle);
    play_all(&mut session, &shuffle);
    assert_eq!(session.status(), &GameStatus::InProgress);

    // The third Ng1-f3 repeats
    play_all(&mut session, &shuffle[..1]);
    assert_eq!(
        ended_with(session.status()),
        Some((None, EndReason::ThreefoldRepetition))
    );
    assert_eq!(session.history().len(), 9);
}

#[test]
fn test_repetition_needs_the_same_player() {
    let mut session = session();
    // Both sides shuffle knights, but no single move comes up three times
    play_all(
        &mut session,
        &[
            ("g1", "f3"),
            ("b8", "c6"),
            ("f3", "g1"),
            ("c6", "b8"),
            ("b1", "c3"),
            ("g8", "f6"),
            ("c3", "b1"),
            ("f6", "g8"),
            ("g1", "h3"),
        ],
    );
    assert_eq!(session.status(), &GameStatus::InProgress);
}

// =============================================================================
// Insufficient Material Tests
// =============================================================================

#[test]
fn test_insufficient_material_king_vs_king() {
    assert!(is_insufficient_material(&board("8/8/4k3/8/8/4K3/8/8")));
}

#[test]
fn test_insufficient_material_same_color_bishops() {
    // Bishops on c1 and h6 are both dark-squared
    assert!(is_insufficient_material(&board("8/8/4k2b/8/8/4K3/8/2B5")));
}

#[test]
fn test_sufficient_material_opposite_color_bishops() {
    assert!(!is_insufficient_material(&board("8/8/4k3/7b/8/4K3/8/2B5")));
}

#[test]
fn test_sufficient_material_two_knights() {
    assert!(!is_insufficient_material(&board("8/8/4k3/8/8/4K3/8/1N4N1")));
}

#[test]
fn test_capture_into_bare_kings_ends_session() {
    let mut session = session_from("8/8/4k3/8/8/4K3/4r3/8");
    play(&mut session, "e3", "e2");
    assert_eq!(
        ended_with(session.status()),
        Some((None, EndReason::InsufficientMaterial))
    );
    assert_eq!(session.player(Color::White).points, 5);
}

// =============================================================================
// Dead Position Tests
// =============================================================================

#[test]
fn test_dead_position_locked_pawns() {
    let pos = board("8/8/2k5/p1p1p1p1/P1P1P1P1/8/5K2/8");
    assert!(is_dead_position(&pos, &[]));
    assert_eq!(evaluate(&pos, &[], Color::White), Some(EndReason::DeadPosition));
}

#[test]
fn test_rook_pawn_blocked_by_king_is_not_dead() {
    let pos = board("k7/P7/1K6/8/8/8/8/8");
    assert!(!is_dead_position(&pos, &[]));
}

#[test]
fn test_locking_the_last_pawns_ends_session() {
    // After g3-g4 every pawn is blocked and neither king gets through
    let mut session = session_from("8/8/2k5/p1p1p1p1/P1P1P3/6P1/5K2/8");
    play(&mut session, "g3", "g4");
    assert_eq!(
        ended_with(session.status()),
        Some((None, EndReason::DeadPosition))
    );
}

// =============================================================================
// Mate vs Stalemate
// =============================================================================

#[test]
fn test_checkmate_is_not_stalemate() {
    let pos = board("R5k1/5ppp/8/8/8/8/8/6K1");
    assert!(!is_stalemate(&pos, &[], Color::Black));
    assert_eq!(evaluate(&pos, &[], Color::Black), Some(EndReason::Checkmate));
}
