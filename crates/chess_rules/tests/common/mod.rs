#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use chess_rules::{
    Board, ColorAssignment, GameSession, PlayerProfile, SessionConfig, Submission, coord_to_sq,
};

pub fn c(coord: &str) -> u8 {
    coord_to_sq(coord).unwrap()
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn config() -> SessionConfig {
    SessionConfig {
        starting_color: ColorAssignment::White,
        ..SessionConfig::default()
    }
}

/// A session where "ann" plays White, with a fixed clock and seeded RNG.
pub fn session_with(config: SessionConfig) -> GameSession {
    GameSession::with_rng(
        config,
        PlayerProfile::new("ann", 1200),
        PlayerProfile::new("bob", 1200),
        &mut StdRng::seed_from_u64(42),
    )
    .with_time_source(fixed_now)
}

pub fn session() -> GameSession {
    session_with(config())
}

pub fn session_from(placement: &str) -> GameSession {
    session().with_board(Board::from_placement(placement).unwrap())
}

/// Submit from and to; returns the answer to the second square.
pub fn play(session: &mut GameSession, from: &str, to: &str) -> Submission {
    assert!(
        matches!(session.submit_move(c(from)), Submission::Selected(_)),
        "could not select {from}"
    );
    session.submit_move(c(to))
}

pub fn play_all(session: &mut GameSession, moves: &[(&str, &str)]) {
    for (from, to) in moves {
        let result = play(session, from, to);
        assert!(
            matches!(result, Submission::Moved(_)),
            "{from}{to} was not played: {result:?}"
        );
    }
}
