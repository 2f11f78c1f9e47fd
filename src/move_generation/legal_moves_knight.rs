use crate::move_generation::legal_move_shared::{capturable_or_empty, push_targets};
use crate::moves::chess_move::ChessMove;
use crate::moves::leaper_moves::knight_attacks;
use crate::position::{chess_types::*, position::Position};

pub fn generate_knight_moves(position: &Position, out: &mut Vec<ChessMove>) {
    let targets = capturable_or_empty(position);

    let mut knights = position.bitboard(position.side_to_move, PieceKind::Knight);
    while knights != 0 {
        let from = knights.trailing_zeros() as Square;
        push_targets(from, knight_attacks(from) & targets, out);
        knights &= knights - 1;
    }
}
