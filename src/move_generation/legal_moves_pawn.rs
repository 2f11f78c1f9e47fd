use crate::move_generation::legal_move_shared::capturable_or_empty;
use crate::moves::chess_move::{ChessMove, MoveFlag};
use crate::moves::pawn_moves::{forward_step, pawn_attacks, promotion_rank, start_rank};
use crate::position::{chess_types::*, position::Position};

pub fn generate_pawn_moves(position: &Position, out: &mut Vec<ChessMove>) {
    let side = position.side_to_move;
    let enemy_occ = position.occupancy_by_color[side.opposite().index()] & capturable_or_empty(position);
    let empty = !position.occupancy_all;
    let step = forward_step(side);

    let mut pawns = position.bitboard(side, PieceKind::Pawn);
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        pawns &= pawns - 1;

        let rank = rank_of(from) as i8;
        let one_rank = rank + step;
        if !(0..8).contains(&one_rank) {
            continue;
        }

        let one_step = square_at(file_of(from), one_rank as u8);
        if (1u64 << one_step) & empty != 0 {
            push_pawn_move(from, one_step, side, out);

            if rank_of(from) == start_rank(side) {
                let two_step = square_at(file_of(from), (one_rank + step) as u8);
                if (1u64 << two_step) & empty != 0 {
                    out.push(ChessMove::with_flag(from, two_step, MoveFlag::DoublePush));
                }
            }
        }

        let attacks = pawn_attacks(side, from);
        let mut captures = attacks & enemy_occ;
        while captures != 0 {
            let to = captures.trailing_zeros() as Square;
            push_pawn_move(from, to, side, out);
            captures &= captures - 1;
        }

        if let Some(ep) = position.en_passant_square {
            if attacks & (1u64 << ep) != 0 {
                out.push(ChessMove::with_flag(from, ep, MoveFlag::EnPassant));
            }
        }
    }
}

fn push_pawn_move(from: Square, to: Square, side: Color, out: &mut Vec<ChessMove>) {
    if rank_of(to) == promotion_rank(side) {
        for promo in PROMOTION_KINDS {
            out.push(ChessMove::promoting(from, to, promo));
        }
    } else {
        out.push(ChessMove::new(from, to));
    }
}
