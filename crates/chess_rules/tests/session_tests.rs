mod common;

use chess_rules::{
    Color, EndReason, GameMode, GameRole, GameSession, GameStatus, PieceKind, PlayerProfile,
    RatingChange, SelectionState, SessionConfig, Submission,
};
use common::*;

fn outcome(session: &GameSession) -> (Option<Color>, EndReason, Option<RatingChange>) {
    let o = session.outcome().expect("game should be over");
    (o.winner, o.reason, o.rating)
}

#[test]
fn test_opening_moves() {
    let mut session = session();
    assert_eq!(session.side_to_move(), Color::White);
    assert_eq!(session.legal_moves().len(), 20);

    let Submission::Selected(dests) = session.submit_move(c("e2")) else {
        panic!("e2 should be selectable");
    };
    assert_eq!(dests.squares(), vec![c("e3"), c("e4")]);

    let Submission::Moved(turn) = session.submit_move(c("e4")) else {
        panic!("e2e4 should be played");
    };
    assert_eq!(turn.source.index, c("e2"));
    assert_eq!(turn.destination.index, c("e4"));
    assert_eq!(turn.timestamp, fixed_now());
    assert!(!turn.check);
    assert_eq!(session.side_to_move(), Color::Black);
    assert_eq!(session.selection(), &SelectionState::Idle);

    play_all(&mut session, &[("e7", "e5")]);
    assert_eq!(session.history().len(), 2);
    assert!(session.board().piece_at(c("e5")).is_some());
    assert!(session.board().piece_at(c("e7")).is_none());
}

#[test]
fn test_selection_rules() {
    let mut session = session();
    // Opponent pieces and empty squares do nothing
    assert_eq!(session.submit_move(c("e7")), Submission::Ignored);
    assert_eq!(session.submit_move(c("e4")), Submission::Ignored);
    assert_eq!(session.submit_move(64), Submission::Ignored);

    assert!(matches!(session.submit_move(c("e2")), Submission::Selected(_)));
    assert_eq!(session.submit_move(c("e2")), Submission::Deselected);
    assert_eq!(session.selection(), &SelectionState::Idle);

    // An unreachable square keeps the selection
    session.submit_move(c("e2"));
    assert_eq!(session.submit_move(c("e5")), Submission::Ignored);
    assert!(matches!(
        session.selection(),
        SelectionState::OneSelected { square, .. } if *square == c("e2")
    ));

    // Another own piece takes over the selection
    assert!(matches!(session.submit_move(c("g1")), Submission::Selected(_)));
    assert!(matches!(session.submit_move(c("f3")), Submission::Moved(_)));
    assert!(session.board().piece_at(c("e2")).is_some());
}

#[test]
fn test_fools_mate() {
    let mut session = session();
    play_all(&mut session, &[("f2", "f3"), ("e7", "e5"), ("g2", "g4")]);
    let Submission::Moved(turn) = play(&mut session, "d8", "h4") else {
        panic!("Qh4 should be played");
    };
    assert!(turn.check);
    assert!(turn.check_mate);
    assert_eq!(turn.checked_king, Some(c("e1")));
    assert!(session.history().current_turn().unwrap().check_mate);

    // Four turns are too few for a rating change
    assert_eq!(outcome(&session), (Some(Color::Black), EndReason::Checkmate, None));

    // Nothing is accepted once the game is over
    assert_eq!(session.submit_move(c("a2")), Submission::Ignored);
    assert!(session.legal_moves().is_empty());
    assert!(!session.surrender(Color::White));
    assert!(!session.tick());
}

#[test]
fn test_check_flag_without_mate() {
    let mut session = session();
    play_all(&mut session, &[("e2", "e4"), ("f7", "f6")]);
    let Submission::Moved(turn) = play(&mut session, "d1", "h5") else {
        panic!("Qh5 should be played");
    };
    assert!(turn.check);
    assert!(!turn.check_mate);
    assert_eq!(turn.checked_king, Some(c("e8")));
    assert_eq!(session.status(), &GameStatus::InProgress);

    // Only answers to the check are offered
    let Submission::Selected(dests) = session.submit_move(c("g7")) else {
        panic!("g7 should be selectable");
    };
    assert_eq!(dests.squares(), vec![c("g6")]);
}

#[test]
fn test_promotion_flow() {
    let mut session = session_from("4k3/P7/8/8/8/8/8/4K3");
    assert_eq!(play(&mut session, "a7", "a8"), Submission::AwaitingPromotion);

    // The pawn stands on a8 but nothing is recorded yet
    assert!(session.history().is_empty());
    assert_eq!(session.side_to_move(), Color::White);
    assert_eq!(session.submit_move(c("e1")), Submission::Ignored);
    assert!(session.step_backward().is_none());
    assert_eq!(session.promote(PieceKind::King), Submission::Ignored);
    assert_eq!(session.promote(PieceKind::Pawn), Submission::Ignored);

    let Submission::Moved(turn) = session.promote(PieceKind::Queen) else {
        panic!("promotion should complete the turn");
    };
    let queen = turn.promotion.unwrap();
    assert_eq!(queen.kind, PieceKind::Queen);
    assert_eq!(queen.origin, c("a8"));
    assert!(turn.check);
    assert_eq!(session.board().piece_at(c("a8")), Some(queen));
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.side_to_move(), Color::Black);

    let payload = session.promotion_payload().unwrap();
    assert_eq!(payload.game_id, session.id());
    assert_eq!(payload.square.index, c("a8"));
    assert_eq!(payload.square.piece, Some(queen));

    // Promotion is over
    assert_eq!(session.promote(PieceKind::Rook), Submission::Ignored);
}

#[test]
fn test_underpromotion_to_bare_knight_is_a_draw() {
    let mut session = session_from("4k3/P7/8/8/8/8/8/4K3");
    play(&mut session, "a7", "a8");
    assert!(matches!(session.promote(PieceKind::Knight), Submission::Moved(_)));
    assert_eq!(
        outcome(&session),
        (None, EndReason::InsufficientMaterial, None)
    );
}

#[test]
fn test_castling_moves_rook() {
    let mut session = session_from("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R");
    let Submission::Moved(turn) = play(&mut session, "e1", "g1") else {
        panic!("short castle should be played");
    };
    assert!(turn.is_short_castle());
    let rook = session.board().piece_at(c("f1")).unwrap();
    assert_eq!(rook.origin, c("h1"));
    assert!(session.board().piece_at(c("h1")).is_none());
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_en_passant_capture_scores() {
    let mut session = session();
    play_all(
        &mut session,
        &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")],
    );
    let Submission::Moved(turn) = play(&mut session, "e5", "d6") else {
        panic!("en passant should be played");
    };
    assert_eq!(turn.en_passant.map(|s| s.index), Some(c("d5")));
    assert!(session.board().piece_at(c("d5")).is_none());
    let white = session.player(Color::White);
    assert_eq!(white.points, 1);
    assert_eq!(white.captured[0].origin, c("d7"));
}

#[test]
fn test_clock_increment_and_timeout() {
    let mut session = session_with(SessionConfig {
        clock_secs: 10,
        increment_secs: 2,
        ..config()
    });
    for _ in 0..4 {
        assert!(!session.tick());
    }
    let Submission::Moved(turn) = play(&mut session, "e2", "e4") else {
        panic!("e2e4 should be played");
    };
    assert_eq!(turn.duration, 4);
    assert_eq!(session.player(Color::White).remaining_secs, 8);
    assert_eq!(turn.clocks.white, 8);
    assert_eq!(turn.clocks.black, 10);

    // Black lets the flag fall; White still has mating material
    for _ in 0..9 {
        assert!(!session.tick());
    }
    assert!(session.tick());
    assert_eq!(outcome(&session), (Some(Color::White), EndReason::Timeout, None));
}

#[test]
fn test_timeout_against_bare_king_is_drawn() {
    let mut session = session_with(SessionConfig {
        clock_secs: 2,
        increment_secs: 0,
        ..config()
    })
    .with_board(chess_rules::Board::from_placement("4k3/8/8/8/8/8/4P3/4K3").unwrap())
    .with_first_mover(Color::Black);
    assert_eq!(session.side_to_move(), Color::Black);
    session.tick();
    assert!(session.tick());
    // Black ran out but White's lone pawn could still promote and mate
    assert_eq!(outcome(&session).1, EndReason::Timeout);

    let mut session = session_with(SessionConfig {
        clock_secs: 2,
        increment_secs: 0,
        ..config()
    })
    .with_board(chess_rules::Board::from_placement("4k3/8/8/8/8/8/8/2B1K3").unwrap())
    .with_first_mover(Color::Black);
    session.tick();
    assert!(session.tick());
    assert_eq!(
        outcome(&session),
        (None, EndReason::TimeoutVsInsufficientMaterial, None)
    );
}

const TEN_TURNS: [(&str, &str); 10] = [
    ("e2", "e4"),
    ("e7", "e5"),
    ("g1", "f3"),
    ("b8", "c6"),
    ("f1", "c4"),
    ("g8", "f6"),
    ("d2", "d3"),
    ("f8", "c5"),
    ("b1", "c3"),
    ("d7", "d6"),
];

#[test]
fn test_surrender_transfers_rating() {
    let mut session = session();
    play_all(&mut session, &TEN_TURNS);
    assert!(session.surrender(Color::White));
    let (winner, reason, rating) = outcome(&session);
    assert_eq!(winner, Some(Color::Black));
    assert_eq!(reason, EndReason::Surrender);
    assert_eq!(rating, Some(RatingChange { white: -4, black: 4 }));
    assert!(!session.force_draw());
}

#[test]
fn test_draw_by_agreement_between_equals_moves_nothing() {
    let mut session = session();
    play_all(&mut session, &TEN_TURNS);
    assert!(session.force_draw());
    assert_eq!(
        outcome(&session),
        (None, EndReason::DrawAgreed, Some(RatingChange::default()))
    );
}

#[test]
fn test_networked_roles_and_color_assignment() {
    let config = SessionConfig {
        mode: GameMode::Networked,
        starting_color: chess_rules::ColorAssignment::Black,
        ..SessionConfig::default()
    };
    let session = GameSession::new(
        config,
        PlayerProfile::new("host", 1500),
        PlayerProfile::new("guest", 1400),
    );
    let black = session.player(Color::Black);
    assert_eq!(black.profile.nickname, "host");
    assert_eq!(black.role, GameRole::Host);
    let white = session.player(Color::White);
    assert_eq!(white.role, GameRole::Guest);
    assert_eq!(white.remaining_secs, 600);
}

#[test]
fn test_replay_remote_turn() {
    let mut local = session();
    let mut remote = session();

    let Submission::Moved(mut turn) = play(&mut remote, "e2", "e4") else {
        panic!("e2e4 should be played");
    };
    turn.clocks.white = 590;
    turn.duration = 15;

    let Submission::Moved(replayed) = local.replay_turn(&turn) else {
        panic!("remote turn should replay");
    };
    assert_eq!(replayed.clocks.white, 590);
    assert_eq!(local.player(Color::White).remaining_secs, 590);
    assert_eq!(local.history().current_turn().unwrap().duration, 15);
    assert_eq!(local.board(), remote.board());

    // The same turn again is not legal for Black
    assert_eq!(local.replay_turn(&turn), Submission::Ignored);
    assert_eq!(local.selection(), &SelectionState::Idle);
}

#[test]
fn test_replay_remote_promotion() {
    let mut local = session_from("4k3/P7/8/8/8/8/8/4K3");
    let mut remote = session_from("4k3/P7/8/8/8/8/8/4K3");
    play(&mut remote, "a7", "a8");
    let Submission::Moved(turn) = remote.promote(PieceKind::Rook) else {
        panic!("promotion should complete");
    };
    assert!(matches!(local.replay_turn(&turn), Submission::Moved(_)));
    assert_eq!(
        local.board().piece_at(c("a8")).map(|p| p.kind),
        Some(PieceKind::Rook)
    );
}

#[test]
fn test_rating_counts_only_turns_up_to_the_pointer() {
    let mut session = session();
    play_all(&mut session, &TEN_TURNS);
    session.jump_to(Some(1));
    assert_eq!(session.history().played().len(), 2);
    assert_eq!(session.history().len(), 10);

    assert!(session.surrender(Color::White));
    assert_eq!(outcome(&session), (Some(Color::Black), EndReason::Surrender, None));
}

#[test]
fn test_remote_turn_waits_for_local_promotion() {
    let mut local = session_from("4k3/P7/8/8/8/8/8/4K3");
    let mut remote = session_from("4k3/P7/8/8/8/8/8/4K3");
    let Submission::Moved(turn) = play(&mut remote, "e1", "d1") else {
        panic!("Kd1 should be played");
    };

    assert_eq!(play(&mut local, "a7", "a8"), Submission::AwaitingPromotion);
    assert_eq!(local.replay_turn(&turn), Submission::Ignored);
    assert!(local.pending_promotion().is_some());
    assert_eq!(local.side_to_move(), Color::White);

    assert!(matches!(local.promote(PieceKind::Queen), Submission::Moved(_)));
    assert_eq!(local.history().len(), 1);
    assert_eq!(
        local.board().piece_at(c("a8")).map(|p| p.kind),
        Some(PieceKind::Queen)
    );
}
