//! Position transition for a single move.
//!
//! Produces the successor position without touching the input: piece
//! relocation, captures (including the en-passant victim), the castling rook,
//! promotion substitution, and the castling/en-passant/clock bookkeeping.

use crate::chess_errors::{ChessError, ChessResult};
use crate::moves::chess_move::{ChessMove, MoveFlag};
use crate::position::{chess_types::*, position::Position};

pub fn apply_move(position: &Position, mv: &ChessMove) -> ChessResult<Position> {
    let moving_color = position.side_to_move;
    let enemy_color = moving_color.opposite();

    let moved_piece = position
        .piece_kind_for_color(moving_color, mv.from)
        .ok_or_else(|| {
            ChessError::InvalidPosition(format!("no {moving_color} piece on {}", mv.from))
        })?;

    let captured = match mv.flag {
        MoveFlag::EnPassant => Some(PieceKind::Pawn),
        _ => position.piece_kind_for_color(enemy_color, mv.to),
    };
    if captured == Some(PieceKind::King) {
        return Err(ChessError::InvalidPosition(format!(
            "move {mv} would capture the {enemy_color} king"
        )));
    }

    let mut next = position.clone();

    next.clear_square_for_color(moving_color, mv.from);

    match mv.flag {
        MoveFlag::EnPassant => {
            // The victim sits beside the origin, on the destination file.
            let victim = square_at(file_of(mv.to), rank_of(mv.from));
            next.clear_square_for_color(enemy_color, victim);
        }
        _ if captured.is_some() => next.clear_square_for_color(enemy_color, mv.to),
        _ => {}
    }

    next.put(mv.to, moving_color, mv.promotion.unwrap_or(moved_piece));

    let back_rank = rank_of(mv.from);
    match mv.flag {
        MoveFlag::KingSideCastle => move_rook(&mut next, moving_color, square_at(7, back_rank), square_at(5, back_rank)),
        MoveFlag::QueenSideCastle => move_rook(&mut next, moving_color, square_at(0, back_rank), square_at(3, back_rank)),
        _ => {}
    }

    update_castling_rights(&mut next, moving_color, mv.from, mv.to, moved_piece);

    next.en_passant_square = if mv.flag == MoveFlag::DoublePush {
        Some((mv.from + mv.to) / 2)
    } else {
        None
    };

    if moved_piece == PieceKind::Pawn || captured.is_some() {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Black {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = enemy_color;
    next.recalc_occupancy();

    Ok(next)
}

fn move_rook(position: &mut Position, color: Color, from: Square, to: Square) {
    let rooks = &mut position.pieces[color.index()][PieceKind::Rook.index()];
    *rooks &= !(1u64 << from);
    *rooks |= 1u64 << to;
}

fn update_castling_rights(
    position: &mut Position,
    moving_color: Color,
    from: Square,
    to: Square,
    moved_piece: PieceKind,
) {
    if moved_piece == PieceKind::King {
        position.castling_rights &= match moving_color {
            Color::White => !(CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE),
            Color::Black => !(CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE),
        };
    }

    // A rook leaving its home square, or anything landing on one, ends that right.
    for square in [from, to] {
        position.castling_rights &= match square {
            0 => !CASTLE_WHITE_QUEENSIDE,
            7 => !CASTLE_WHITE_KINGSIDE,
            56 => !CASTLE_BLACK_QUEENSIDE,
            63 => !CASTLE_BLACK_KINGSIDE,
            _ => CASTLE_ALL,
        };
    }
}
