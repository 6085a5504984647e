//! Perft runner for checking and timing the move generator.
//!
//! Usage:
//! `cargo run --release --bin perft_runner -- --depth 5`
//! `cargo run --release --bin perft_runner -- --fen "<fen>" --depth 3 --divide`

use std::time::Instant;

use log::info;

use mailbox_chess::errors::EngineError;
use mailbox_chess::game_state::chess_rules::STARTING_POSITION_FEN;
use mailbox_chess::game_state::chess_types::GameState;
use mailbox_chess::move_generation::perft::{perft_detailed, perft_divide};
use mailbox_chess::search::zobrist;

fn arg_value(flag: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

fn has_flag(flag: &str) -> bool {
    std::env::args().any(|arg| arg == flag)
}

fn parse_arg_u8(flag: &str, default: u8) -> u8 {
    arg_value(flag)
        .and_then(|v| v.parse::<u8>().ok())
        .map_or(default, |v| v.max(1))
}

fn main() -> Result<(), EngineError> {
    env_logger::init();
    zobrist::initialize();

    let depth = parse_arg_u8("--depth", 4);
    let fen = arg_value("--fen").unwrap_or_else(|| STARTING_POSITION_FEN.to_owned());
    let mut game = GameState::from_fen(&fen)?;
    info!("perft depth {depth} on {fen}");

    if has_flag("--divide") {
        let mut total = 0u64;
        for (mv, nodes) in perft_divide(&mut game, depth) {
            println!("{mv}: {nodes}");
            total += nodes;
        }
        println!("total: {total}");
        return Ok(());
    }

    for d in 1..=depth {
        let started = Instant::now();
        let counts = perft_detailed(&mut game, d);
        let elapsed = started.elapsed();
        let nps = (counts.nodes as f64 / elapsed.as_secs_f64().max(1e-9)) as u64;
        println!(
            "depth={d} nodes={} captures={} ep={} castles={} promotions={} checks={} mates={} elapsed_ms={} nps={nps}",
            counts.nodes,
            counts.captures,
            counts.en_passant,
            counts.castles,
            counts.promotions,
            counts.checks,
            counts.checkmates,
            elapsed.as_millis(),
        );
    }
    Ok(())
}
