//! Terminal-oriented ASCII board renderer.
//!
//! Creates a human-readable board view from the mailbox for debugging, tests,
//! and diagnostics in text environments.

use crate::game_state::chess_types::*;
use crate::game_state::squares::square_from_file_rank;
use crate::utils::algebraic::square_to_algebraic;

/// Render the board followed by side, en-passant, castling and key lines.
pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        for file in 0..8u8 {
            let piece = game_state.piece_at(square_from_file_rank(file, rank));
            out.push(' ');
            out.push(piece.to_fen_char());
            out.push(' ');
        }

        out.push('\n');
    }

    out.push_str("   a  b  c  d  e  f  g  h\n");

    let side = match game_state.side_to_move {
        Color::Light => 'w',
        Color::Dark => 'b',
    };
    let en_passant = game_state
        .en_passant_square
        .and_then(|sq| square_to_algebraic(sq).ok())
        .unwrap_or_else(|| "-".to_owned());
    let castling: String = [
        (CASTLE_LIGHT_KINGSIDE, 'K'),
        (CASTLE_LIGHT_QUEENSIDE, 'Q'),
        (CASTLE_DARK_KINGSIDE, 'k'),
        (CASTLE_DARK_QUEENSIDE, 'q'),
    ]
    .iter()
    .map(|(flag, ch)| {
        if game_state.castling_rights & flag != 0 {
            *ch
        } else {
            '-'
        }
    })
    .collect();

    out.push_str(&format!("side: {side}\n"));
    out.push_str(&format!("en passant: {en_passant}\n"));
    out.push_str(&format!("castling: {castling}\n"));
    out.push_str(&format!("key: {:016X}", game_state.position_key));

    out
}
