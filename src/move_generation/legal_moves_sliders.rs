//! Bishop, rook and queen move generation.
//!
//! Rays stop at the first occupant; an enemy occupant is kept as a capture,
//! a friendly one is masked out.

use crate::move_generation::legal_move_shared::{capturable_or_empty, push_targets};
use crate::moves::chess_move::ChessMove;
use crate::moves::sliding_moves::{bishop_attacks, queen_attacks, rook_attacks};
use crate::position::{chess_types::*, position::Position};

pub fn generate_slider_moves(position: &Position, out: &mut Vec<ChessMove>) {
    generate_for_kind(position, PieceKind::Bishop, bishop_attacks, out);
    generate_for_kind(position, PieceKind::Rook, rook_attacks, out);
    generate_for_kind(position, PieceKind::Queen, queen_attacks, out);
}

fn generate_for_kind(
    position: &Position,
    kind: PieceKind,
    attacks: fn(Square, u64) -> u64,
    out: &mut Vec<ChessMove>,
) {
    let targets = capturable_or_empty(position);

    let mut pieces = position.bitboard(position.side_to_move, kind);
    while pieces != 0 {
        let from = pieces.trailing_zeros() as Square;
        push_targets(from, attacks(from, position.occupancy_all) & targets, out);
        pieces &= pieces - 1;
    }
}
