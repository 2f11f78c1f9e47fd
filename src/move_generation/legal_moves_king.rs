use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::{capturable_or_empty, push_targets};
use crate::moves::chess_move::{ChessMove, MoveFlag};
use crate::moves::leaper_moves::king_attacks;
use crate::position::chess_rules::{BLACK_KING_HOME, WHITE_KING_HOME};
use crate::position::{chess_types::*, position::Position};

struct CastleRule {
    right: CastlingRights,
    flag: MoveFlag,
    rook_from: Square,
    king_to: Square,
    /// Squares strictly between king and rook.
    between: u64,
    /// Squares the king passes through or lands on.
    king_path: [Square; 2],
}

const WHITE_CASTLES: [CastleRule; 2] = [
    CastleRule {
        right: CASTLE_WHITE_KINGSIDE,
        flag: MoveFlag::KingSideCastle,
        rook_from: 7,
        king_to: 6,
        between: (1 << 5) | (1 << 6),
        king_path: [5, 6],
    },
    CastleRule {
        right: CASTLE_WHITE_QUEENSIDE,
        flag: MoveFlag::QueenSideCastle,
        rook_from: 0,
        king_to: 2,
        between: (1 << 1) | (1 << 2) | (1 << 3),
        king_path: [3, 2],
    },
];

const BLACK_CASTLES: [CastleRule; 2] = [
    CastleRule {
        right: CASTLE_BLACK_KINGSIDE,
        flag: MoveFlag::KingSideCastle,
        rook_from: 63,
        king_to: 62,
        between: (1 << 61) | (1 << 62),
        king_path: [61, 62],
    },
    CastleRule {
        right: CASTLE_BLACK_QUEENSIDE,
        flag: MoveFlag::QueenSideCastle,
        rook_from: 56,
        king_to: 58,
        between: (1 << 57) | (1 << 58) | (1 << 59),
        king_path: [59, 58],
    },
];

pub fn generate_king_moves(position: &Position, out: &mut Vec<ChessMove>) {
    let side = position.side_to_move;
    let Some(from) = position.king_square(side) else {
        return;
    };

    push_targets(from, king_attacks(from) & capturable_or_empty(position), out);
    generate_castling_moves(position, from, out);
}

fn generate_castling_moves(position: &Position, king_from: Square, out: &mut Vec<ChessMove>) {
    let side = position.side_to_move;
    let enemy = side.opposite();
    let (home, rules) = match side {
        Color::White => (WHITE_KING_HOME, &WHITE_CASTLES),
        Color::Black => (BLACK_KING_HOME, &BLACK_CASTLES),
    };

    if king_from != home || !position.castling_rights_for(side) {
        return;
    }

    // Cannot castle out of check.
    if is_square_attacked(position, king_from, enemy) {
        return;
    }

    let own_rooks = position.bitboard(side, PieceKind::Rook);
    for rule in rules {
        if !position.has_castling_right(rule.right)
            || own_rooks & (1u64 << rule.rook_from) == 0
            || position.occupancy_all & rule.between != 0
        {
            continue;
        }
        if rule
            .king_path
            .iter()
            .any(|&sq| is_square_attacked(position, sq, enemy))
        {
            continue;
        }
        out.push(ChessMove::with_flag(king_from, rule.king_to, rule.flag));
    }
}
