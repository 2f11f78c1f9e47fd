//! Board position representation.
//!
//! `Position` is the central value of the rules engine. It stores piece
//! bitboards, occupancy caches, side-to-move, castling/en-passant flags and
//! clocks. A position is never mutated in place by the session: every ply
//! produces a fresh successor, so the previous value can be kept for undo.

use crate::chess_errors::ChessResult;
use crate::position::chess_rules::STARTING_POSITION_FEN;
use crate::position::chess_types::*;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// A complete chess position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    // Occupancy caches.
    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

/// The part of a position that identifies it for repetition purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepetitionKey {
    pub pieces: [[u64; 6]; 2],
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl Position {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// The standard initial position.
    pub fn new_game() -> Self {
        let mut position = Self::new_empty();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, kind) in back_rank.into_iter().enumerate() {
            let file = file as u8;
            position.put(square_at(file, 0), Color::White, kind);
            position.put(square_at(file, 1), Color::White, PieceKind::Pawn);
            position.put(square_at(file, 6), Color::Black, PieceKind::Pawn);
            position.put(square_at(file, 7), Color::Black, kind);
        }
        position.castling_rights = CASTLE_ALL;
        position.recalc_occupancy();
        debug_assert_eq!(position.to_fen(), STARTING_POSITION_FEN);
        position
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    /// Occupant of `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let mask = 1u64 << square;
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in [Color::White, Color::Black] {
            for kind in ALL_PIECE_KINDS {
                if self.pieces[color.index()][kind.index()] & mask != 0 {
                    return Some(Piece { kind, color });
                }
            }
        }
        None
    }

    /// Piece kind of `color` on `square`, if any.
    #[inline]
    pub fn piece_kind_for_color(&self, color: Color, square: Square) -> Option<PieceKind> {
        let mask = 1u64 << square;
        ALL_PIECE_KINDS
            .into_iter()
            .find(|kind| self.pieces[color.index()][kind.index()] & mask != 0)
    }

    #[inline]
    pub fn bitboard(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    /// Square of `color`'s king, if exactly one is present.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.bitboard(color, PieceKind::King);
        if kings.count_ones() == 1 {
            Some(kings.trailing_zeros() as Square)
        } else {
            None
        }
    }

    #[inline]
    pub fn has_castling_right(&self, right: CastlingRights) -> bool {
        self.castling_rights & right != 0
    }

    /// True while `color` keeps at least one castling right.
    #[inline]
    pub fn castling_rights_for(&self, color: Color) -> bool {
        let mask = match color {
            Color::White => CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE,
            Color::Black => CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE,
        };
        self.castling_rights & mask != 0
    }

    pub fn repetition_key(&self) -> RepetitionKey {
        RepetitionKey {
            pieces: self.pieces,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant_square: self.en_passant_square,
        }
    }

    /// Places a piece without touching the occupancy caches.
    ///
    /// Callers finish a batch of edits with [`Position::recalc_occupancy`].
    #[inline]
    pub fn put(&mut self, square: Square, color: Color, kind: PieceKind) {
        self.pieces[color.index()][kind.index()] |= 1u64 << square;
    }

    /// Clears every piece of `color` from `square`.
    #[inline]
    pub fn clear_square_for_color(&mut self, color: Color, square: Square) {
        let mask = !(1u64 << square);
        for board in &mut self.pieces[color.index()] {
            *board &= mask;
        }
    }

    pub fn recalc_occupancy(&mut self) {
        for color in [Color::White, Color::Black] {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .copied()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[Color::White.index()]
            | self.occupancy_by_color[Color::Black.index()];
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use crate::position::chess_rules::STARTING_POSITION_FEN;
    use crate::position::chess_types::{Color, Piece, PieceKind, CASTLE_ALL};

    #[test]
    fn new_game_matches_starting_fen() {
        let game = Position::new_game();
        let parsed = Position::from_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(game, parsed);
        assert_eq!(game.castling_rights, CASTLE_ALL);
        assert_eq!(game.occupancy_all.count_ones(), 32);
    }

    #[test]
    fn piece_lookup_on_start_squares() {
        let game = Position::new_game();
        assert_eq!(
            game.piece_at(4),
            Some(Piece {
                kind: PieceKind::King,
                color: Color::White
            })
        );
        assert_eq!(
            game.piece_at(59),
            Some(Piece {
                kind: PieceKind::Queen,
                color: Color::Black
            })
        );
        assert_eq!(game.piece_at(28), None);
        assert_eq!(game.king_square(Color::Black), Some(60));
    }

    #[test]
    fn repetition_key_ignores_clocks() {
        let a = Position::new_game();
        let mut b = a.clone();
        b.halfmove_clock = 12;
        b.fullmove_number = 40;
        assert_ne!(a, b);
        assert_eq!(a.repetition_key(), b.repetition_key());
    }
}
