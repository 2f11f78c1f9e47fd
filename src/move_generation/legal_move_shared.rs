use crate::moves::chess_move::{ChessMove, MoveFlag};
use crate::position::{chess_types::*, position::Position};

/// Target mask for a piece of the side to move: empty or enemy squares,
/// never the enemy king.
#[inline]
pub fn capturable_or_empty(position: &Position) -> u64 {
    let side = position.side_to_move;
    !position.occupancy_by_color[side.index()]
        & !position.bitboard(side.opposite(), PieceKind::King)
}

/// Kind of the enemy piece removed by `mv`, if any.
#[inline]
pub fn captured_piece(position: &Position, mv: &ChessMove) -> Option<PieceKind> {
    if mv.flag == MoveFlag::EnPassant {
        return Some(PieceKind::Pawn);
    }
    position.piece_kind_for_color(position.side_to_move.opposite(), mv.to)
}

/// Pushes one move per set bit of `targets`.
#[inline]
pub fn push_targets(from: Square, mut targets: u64, out: &mut Vec<ChessMove>) {
    while targets != 0 {
        let to = targets.trailing_zeros() as Square;
        out.push(ChessMove::new(from, to));
        targets &= targets - 1;
    }
}
