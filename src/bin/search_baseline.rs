//! Search baseline runner over a small position suite.
//!
//! Usage:
//! `cargo run --release --bin search_baseline`
//! `cargo run --release --bin search_baseline -- --depth 7 --movetime 2000`
//! `cargo run --release --bin search_baseline -- --fen "<fen>" --nullmove`

use std::time::Duration;

use mailbox_chess::errors::EngineError;
use mailbox_chess::game_state::chess_rules::STARTING_POSITION_FEN;
use mailbox_chess::game_state::chess_types::GameState;
use mailbox_chess::search::board_scoring::PieceSquareScorer;
use mailbox_chess::search::iterative_deepening::{iterative_deepening_search, SearchConfig};
use mailbox_chess::search::zobrist;

fn arg_value(flag: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

fn parse_arg_u8(flag: &str, default: u8) -> u8 {
    arg_value(flag)
        .and_then(|v| v.parse::<u8>().ok())
        .map_or(default, |v| v.max(1))
}

fn parse_arg_u64(flag: &str) -> Option<u64> {
    arg_value(flag).and_then(|v| v.parse::<u64>().ok())
}

fn run_case(name: &str, fen: &str, config: &SearchConfig) -> Result<(), EngineError> {
    let mut game = GameState::from_fen(fen)?;
    let result = iterative_deepening_search(&mut game, PieceSquareScorer, config);
    let pv: Vec<String> = result
        .principal_variation
        .iter()
        .map(|mv| mv.to_string())
        .collect();
    println!(
        "{name}: depth={} score={} best={} nodes={} elapsed_ms={} null_cuts={} ordering={:.2} stopped={} pv={}",
        result.reached_depth,
        result.best_score,
        result
            .best_move
            .map_or_else(|| "none".to_owned(), |mv| mv.to_string()),
        result.nodes,
        result.elapsed_ms,
        result.null_cuts,
        result.ordering_ratio(),
        result.stopped,
        pv.join(" ")
    );
    Ok(())
}

fn main() -> Result<(), EngineError> {
    env_logger::init();
    zobrist::initialize();

    let config = SearchConfig {
        max_depth: parse_arg_u8("--depth", 5),
        time_budget: parse_arg_u64("--movetime")
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis),
        use_null_move_cut: std::env::args().any(|arg| arg == "--nullmove"),
        stop_flag: None,
    };

    if let Some(fen) = arg_value("--fen") {
        return run_case("custom", &fen, &config);
    }

    let suite = [
        ("startpos", STARTING_POSITION_FEN),
        (
            "classical_mid",
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        ),
        (
            "tactical",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        ),
        ("back_rank", "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1"),
        ("end_kpk", "8/8/8/8/8/4k3/4P3/4K3 w - - 0 1"),
    ];
    println!(
        "search baseline: depth={} movetime={:?} nullmove={}",
        config.max_depth, config.time_budget, config.use_null_move_cut
    );
    for (name, fen) in suite {
        run_case(name, fen, &config)?;
    }
    Ok(())
}
