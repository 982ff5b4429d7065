use super::*;
use crate::types::PieceKind;

#[test]
fn test_castle_squares() {
    assert_eq!(CastleSide::Short.rook_squares(Color::White), (7, 5));
    assert_eq!(CastleSide::Long.rook_squares(Color::White), (0, 3));
    assert_eq!(CastleSide::Short.rook_squares(Color::Black), (63, 61));
    assert_eq!(CastleSide::Long.king_destination(Color::Black), 58);
}

#[test]
fn test_apply_and_revert_capture() {
    let mut board = Board::from_placement("4k3/8/8/3p4/4P3/8/8/4K3").unwrap();
    let before = board.clone();
    let turn = Turn::new(&board, 28, 35); // e4xd5
    assert_eq!(turn.captured().map(|p| p.kind), Some(PieceKind::Pawn));

    turn.apply(&mut board);
    assert!(board.piece_at(28).is_none());
    assert_eq!(board.piece_at(35).map(|p| p.color), Some(Color::White));

    turn.revert(&mut board);
    assert_eq!(board, before);
}

#[test]
fn test_apply_and_revert_castle() {
    let mut board = Board::from_placement("4k3/8/8/8/8/8/8/R3K2R").unwrap();
    let before = board.clone();
    let mut turn = Turn::new(&board, 4, 2);
    turn.castle = Some(CastleSide::Long);

    turn.apply(&mut board);
    assert_eq!(board.piece_at(2).map(|p| p.kind), Some(PieceKind::King));
    assert_eq!(board.piece_at(3).map(|p| p.kind), Some(PieceKind::Rook));
    assert!(board.piece_at(0).is_none());

    turn.revert(&mut board);
    assert_eq!(board, before);
}

#[test]
fn test_apply_and_revert_en_passant_and_promotion() {
    let mut board = Board::from_placement("4k3/P7/8/3pP3/8/8/8/4K3").unwrap();
    let before = board.clone();

    let mut ep = Turn::new(&board, 36, 43); // e5xd6 en passant
    ep.en_passant = Some(*board.square(35));
    assert_eq!(ep.captured().map(|p| p.origin), Some(35));
    ep.apply(&mut board);
    assert!(board.piece_at(35).is_none());

    let mut promo = Turn::new(&board, 48, 56); // a7-a8=N
    promo.promotion = Some(Piece::new(Color::White, PieceKind::Knight, 56));
    promo.apply(&mut board);
    assert_eq!(board.piece_at(56).map(|p| p.kind), Some(PieceKind::Knight));

    promo.revert(&mut board);
    ep.revert(&mut board);
    assert_eq!(board, before);
}

#[test]
fn test_inverse_moves_piece_back() {
    let board = Board::startpos();
    let turn = Turn::new(&board, 12, 28);
    let inv = turn.inverse();
    assert_eq!(inv.source.index, 28);
    assert_eq!(inv.destination.index, 12);
    assert_eq!(inv.source.piece.map(|p| p.kind), Some(PieceKind::Pawn));
}
