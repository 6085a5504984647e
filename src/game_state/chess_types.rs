//! Core piece, side, and castling vocabulary for the mailbox board.
//!
//! Pieces are plain ids into a static capability table. Move generation and
//! attack detection branch on the table's flags instead of dispatching on
//! piece behaviour, so everything here is data.

pub use crate::game_state::game_state::GameState;
pub use crate::game_state::undo_state::UndoState;

/// Padded (10x12) board index. Playable squares are `21..=98`.
pub type Square = u8;

/// Number of playable squares.
pub const BOARD_SQUARES: usize = 64;

/// Size of the padded board including the off-board guard ring.
pub const PADDED_BOARD_SQUARES: usize = 120;

/// Number of piece ids that can occupy a playable square (empty + 12 pieces).
pub const PIECE_COUNT: usize = 13;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }
}

/// Piece kind without color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Lowercase notation letter (`p`, `n`, `b`, `r`, `q`, `k`).
    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// Content of one padded-board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Piece {
    #[default]
    Empty = 0,
    LightPawn,
    LightKnight,
    LightBishop,
    LightRook,
    LightQueen,
    LightKing,
    DarkPawn,
    DarkKnight,
    DarkBishop,
    DarkRook,
    DarkQueen,
    DarkKing,
    OffBoard,
}

impl Piece {
    /// Every real piece, light first, in id order.
    pub const ALL: [Piece; 12] = [
        Piece::LightPawn,
        Piece::LightKnight,
        Piece::LightBishop,
        Piece::LightRook,
        Piece::LightQueen,
        Piece::LightKing,
        Piece::DarkPawn,
        Piece::DarkKnight,
        Piece::DarkBishop,
        Piece::DarkRook,
        Piece::DarkQueen,
        Piece::DarkKing,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Piece::index`] for the 13 ids that fit a move encoding.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Piece::Empty),
            1..=12 => Some(Piece::ALL[index - 1]),
            _ => None,
        }
    }

    pub const fn from_parts(color: Color, kind: PieceKind) -> Self {
        let base = match color {
            Color::Light => 1,
            Color::Dark => 7,
        };
        Piece::ALL[base + kind.index() - 1]
    }

    #[inline]
    pub fn info(self) -> &'static PieceInfo {
        &PIECE_INFO[self.index()]
    }

    #[inline]
    pub fn color(self) -> Option<Color> {
        self.info().color
    }

    pub const fn kind(self) -> Option<PieceKind> {
        match self {
            Piece::LightPawn | Piece::DarkPawn => Some(PieceKind::Pawn),
            Piece::LightKnight | Piece::DarkKnight => Some(PieceKind::Knight),
            Piece::LightBishop | Piece::DarkBishop => Some(PieceKind::Bishop),
            Piece::LightRook | Piece::DarkRook => Some(PieceKind::Rook),
            Piece::LightQueen | Piece::DarkQueen => Some(PieceKind::Queen),
            Piece::LightKing | Piece::DarkKing => Some(PieceKind::King),
            Piece::Empty | Piece::OffBoard => None,
        }
    }

    /// True for the twelve real pieces.
    #[inline]
    pub const fn is_piece(self) -> bool {
        !matches!(self, Piece::Empty | Piece::OffBoard)
    }

    /// Notation letter: uppercase for light, lowercase for dark, `.` otherwise.
    pub fn to_fen_char(self) -> char {
        match (self.color(), self.kind()) {
            (Some(Color::Light), Some(kind)) => kind.to_char().to_ascii_uppercase(),
            (Some(Color::Dark), Some(kind)) => kind.to_char(),
            _ => '.',
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let color = if ch.is_ascii_uppercase() {
            Color::Light
        } else if ch.is_ascii_lowercase() {
            Color::Dark
        } else {
            return None;
        };
        PieceKind::from_char(ch).map(|kind| Piece::from_parts(color, kind))
    }
}

/// Static capabilities of a piece id.
#[derive(Debug)]
pub struct PieceInfo {
    pub value: i32,
    pub color: Option<Color>,
    pub is_big: bool,
    pub is_major: bool,
    pub is_minor: bool,
    pub is_pawn: bool,
    pub is_knight: bool,
    pub is_king: bool,
    pub is_rook_or_queen: bool,
    pub is_bishop_or_queen: bool,
    pub is_sliding: bool,
    /// Padded-board step deltas; empty for pawns, which move by bespoke rules.
    pub directions: &'static [i8],
}

pub const KNIGHT_DIRECTIONS: [i8; 8] = [-8, -19, -21, -12, 8, 19, 21, 12];
pub const ROOK_DIRECTIONS: [i8; 4] = [-1, -10, 1, 10];
pub const BISHOP_DIRECTIONS: [i8; 4] = [-9, -11, 11, 9];
pub const KING_DIRECTIONS: [i8; 8] = [-1, -10, 1, 10, -9, -11, 11, 9];

const fn piece_info(color: Option<Color>, kind: Option<PieceKind>) -> PieceInfo {
    let (value, directions): (i32, &'static [i8]) = match kind {
        Some(PieceKind::Pawn) => (100, &[]),
        Some(PieceKind::Knight) => (325, &KNIGHT_DIRECTIONS),
        Some(PieceKind::Bishop) => (325, &BISHOP_DIRECTIONS),
        Some(PieceKind::Rook) => (550, &ROOK_DIRECTIONS),
        Some(PieceKind::Queen) => (1000, &KING_DIRECTIONS),
        Some(PieceKind::King) => (50000, &KING_DIRECTIONS),
        None => (0, &[]),
    };
    let is_pawn = matches!(kind, Some(PieceKind::Pawn));
    let is_knight = matches!(kind, Some(PieceKind::Knight));
    let is_king = matches!(kind, Some(PieceKind::King));
    let is_rook_or_queen = matches!(kind, Some(PieceKind::Rook | PieceKind::Queen));
    let is_bishop_or_queen = matches!(kind, Some(PieceKind::Bishop | PieceKind::Queen));
    let is_real = kind.is_some();

    PieceInfo {
        value,
        color,
        is_big: is_real && !is_pawn,
        is_major: is_rook_or_queen || is_king,
        is_minor: is_knight || (is_bishop_or_queen && !is_rook_or_queen),
        is_pawn,
        is_knight,
        is_king,
        is_rook_or_queen,
        is_bishop_or_queen,
        is_sliding: is_real && !is_pawn && !is_knight && !is_king,
        directions,
    }
}

static PIECE_INFO: [PieceInfo; 14] = [
    piece_info(None, None),
    piece_info(Some(Color::Light), Some(PieceKind::Pawn)),
    piece_info(Some(Color::Light), Some(PieceKind::Knight)),
    piece_info(Some(Color::Light), Some(PieceKind::Bishop)),
    piece_info(Some(Color::Light), Some(PieceKind::Rook)),
    piece_info(Some(Color::Light), Some(PieceKind::Queen)),
    piece_info(Some(Color::Light), Some(PieceKind::King)),
    piece_info(Some(Color::Dark), Some(PieceKind::Pawn)),
    piece_info(Some(Color::Dark), Some(PieceKind::Knight)),
    piece_info(Some(Color::Dark), Some(PieceKind::Bishop)),
    piece_info(Some(Color::Dark), Some(PieceKind::Rook)),
    piece_info(Some(Color::Dark), Some(PieceKind::Queen)),
    piece_info(Some(Color::Dark), Some(PieceKind::King)),
    piece_info(None, None),
];

/// Compact castling rights bitmask.
pub type CastlingRights = u8;

pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_ids_round_trip_through_parts_and_chars() {
        for piece in Piece::ALL {
            let color = piece.color().expect("real piece has a color");
            let kind = piece.kind().expect("real piece has a kind");
            assert_eq!(Piece::from_parts(color, kind), piece);
            assert_eq!(Piece::from_fen_char(piece.to_fen_char()), Some(piece));
            assert_eq!(Piece::from_index(piece.index()), Some(piece));
        }
        assert_eq!(Piece::from_fen_char('x'), None);
        assert_eq!(Piece::from_index(13), None);
    }

    #[test]
    fn capability_flags_match_piece_roles() {
        let queen = Piece::DarkQueen.info();
        assert!(queen.is_rook_or_queen && queen.is_bishop_or_queen && queen.is_sliding);
        assert!(queen.is_major && !queen.is_minor);

        let knight = Piece::LightKnight.info();
        assert!(knight.is_minor && knight.is_big && !knight.is_sliding);

        let pawn = Piece::LightPawn.info();
        assert!(pawn.is_pawn && !pawn.is_big && pawn.directions.is_empty());

        let off = Piece::OffBoard.info();
        assert!(off.color.is_none() && !off.is_big && !off.is_king);
    }
}
