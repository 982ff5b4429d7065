use crate::board::Board;
use crate::movegen::{build_turn, legal_moves};
use crate::turn::Turn;
use crate::types::{Color, Piece, PieceKind, rank_of};

/// Pure perft node count.
/// Counts all legal positions from the current one down to `depth`, with
/// `to_move` playing first. A pawn reaching the last rank counts once per
/// promotion piece.
pub fn perft(board: &mut Board, played: &mut Vec<Turn>, to_move: Color, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0u64;
    for (from, to) in legal_moves(board, played, to_move) {
        let turn = build_turn(board, played, from, to);
        let mover = turn.mover();
        let promotes = mover.kind == PieceKind::Pawn && rank_of(to) == mover.color.promotion_rank();
        let variants: Vec<Turn> = if promotes {
            PieceKind::PROMOTIONS
                .iter()
                .map(|&kind| Turn {
                    promotion: Some(Piece::new(mover.color, kind, to)),
                    ..turn.clone()
                })
                .collect()
        } else {
            vec![turn]
        };

        for turn in variants {
            turn.apply(board);
            played.push(turn);
            nodes += perft(board, played, to_move.other(), depth - 1);
            if let Some(turn) = played.pop() {
                turn.revert(board);
            }
        }
    }
    nodes
}

#[cfg(test)]
#[path = "perft_tests.rs"]
mod perft_tests;
