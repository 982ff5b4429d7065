//! Perft benchmark for profiling with cargo-flamegraph.
//!
//! Usage:
//!   cargo flamegraph --example perft_bench -p chess_rules -- [depth] [placement] [w|b]
//!
//! Examples:
//!   # Default: depth 3 over the test positions
//!   cargo flamegraph --example perft_bench -p chess_rules
//!
//!   # Custom depth and position (Kiwipete - complex middlegame)
//!   cargo flamegraph --example perft_bench -p chess_rules -- 3 "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R" w

use chess_rules::{Board, Color, perft};
use std::env;
use std::time::Instant;

/// Positions whose castling rights follow from the piece placement alone
const TEST_POSITIONS: &[(&str, &str)] = &[
    (
        "Starting position",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
    ),
    (
        "Kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R",
    ),
    ("Position 3", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8"),
];

fn main() {
    let args: Vec<String> = env::args().collect();

    let depth: u8 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(3);

    if let Some(placement) = args.get(2) {
        let to_move = match args.get(3).map(String::as_str) {
            Some("b") => Color::Black,
            _ => Color::White,
        };
        run("Custom", placement, to_move, depth);
    } else {
        for (name, placement) in TEST_POSITIONS {
            run(name, placement, Color::White, depth);
        }
    }
}

fn run(name: &str, placement: &str, to_move: Color, depth: u8) {
    let mut board = match Board::from_placement(placement) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{name}: {e}");
            return;
        }
    };

    let start = Instant::now();
    let nodes = perft(&mut board, &mut Vec::new(), to_move, depth);
    let elapsed = start.elapsed();

    let nps = if elapsed.as_secs_f64() > 0.0 {
        nodes as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    println!(
        "{name:<20} depth {depth}: {nodes:>10} nodes in {elapsed:>10.3?} ({:.2} Mn/s)",
        nps / 1_000_000.0
    );
}
