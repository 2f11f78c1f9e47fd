//! Canonical chess-rule constants.
//!
//! Static rule-related literals: the standard starting position, capture
//! values used by the heuristic opponent, and draw thresholds.

use crate::position::chess_types::{PieceKind, Square};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Plies without capture or pawn move after which the game is drawn.
pub const FIFTY_MOVE_RULE_PLIES: u16 = 100;

/// Occurrences of an identical position that draw the game.
pub const REPETITION_DRAW_COUNT: usize = 3;

pub const WHITE_KING_HOME: Square = 4;
pub const BLACK_KING_HOME: Square = 60;

/// Material value of a captured piece for the heuristic opponent.
///
/// Kings are never capturable under correct legality, so they have no value.
#[inline]
pub const fn capture_value(piece: PieceKind) -> Option<u32> {
    match piece {
        PieceKind::Pawn => Some(10),
        PieceKind::Knight | PieceKind::Bishop => Some(30),
        PieceKind::Rook => Some(50),
        PieceKind::Queen => Some(90),
        PieceKind::King => None,
    }
}
