//! FEN-to-Position parser.
//!
//! Builds a fully-populated position from a Forsyth-Edwards Notation string,
//! including piece bitboards, rights, clocks, and occupancies, then checks
//! the structural rules a reachable position has to satisfy. Every failure is
//! reported as `InvalidEncoding`; nothing outside the returned value is
//! touched.

use tracing::debug;

use crate::chess_errors::{ChessError, ChessResult};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::position::chess_rules::{BLACK_KING_HOME, WHITE_KING_HOME};
use crate::position::{chess_types::*, position::Position};
use crate::utils::algebraic::algebraic_to_square;

const BACK_RANKS: u64 = 0xFF00_0000_0000_00FF;

// (right, color, king home, rook home)
const CASTLING_HOMES: [(CastlingRights, Color, Square, Square); 4] = [
    (CASTLE_WHITE_KINGSIDE, Color::White, WHITE_KING_HOME, 7),
    (CASTLE_WHITE_QUEENSIDE, Color::White, WHITE_KING_HOME, 0),
    (CASTLE_BLACK_KINGSIDE, Color::Black, BLACK_KING_HOME, 63),
    (CASTLE_BLACK_QUEENSIDE, Color::Black, BLACK_KING_HOME, 56),
];

pub fn parse_fen(fen: &str) -> ChessResult<Position> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| invalid("missing side-to-move"))?;
    let castling_part = parts.next().ok_or_else(|| invalid("missing castling rights"))?;
    let en_passant_part = parts.next().ok_or_else(|| invalid("missing en-passant square"))?;
    let halfmove_part = parts.next().ok_or_else(|| invalid("missing halfmove clock"))?;
    let fullmove_part = parts.next().ok_or_else(|| invalid("missing fullmove number"))?;

    if parts.next().is_some() {
        return Err(invalid("extra trailing fields"));
    }

    let mut position = Position::new_empty();

    parse_board(board_part, &mut position)?;
    position.side_to_move = parse_side_to_move(side_part)?;
    position.castling_rights = parse_castling_rights(castling_part)?;
    position.en_passant_square = parse_en_passant_square(en_passant_part)?;
    position.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| invalid(&format!("halfmove clock '{halfmove_part}'")))?;
    position.fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| invalid(&format!("fullmove number '{fullmove_part}'")))?;

    position.recalc_occupancy();
    validate_structure(&position)?;

    debug!(fen, "decoded position");
    Ok(position)
}

fn invalid(detail: &str) -> ChessError {
    ChessError::InvalidEncoding(detail.to_owned())
}

fn parse_board(board_part: &str, position: &mut Position) -> ChessResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(&format!("empty-square count '{ch}'")));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(invalid(&format!("rank '{rank_str}' has more than 8 files")));
                }
                continue;
            }

            let (color, piece) = piece_from_fen_char(ch)
                .ok_or_else(|| invalid(&format!("piece character '{ch}'")))?;

            if file >= 8 {
                return Err(invalid(&format!("rank '{rank_str}' has more than 8 files")));
            }

            position.put(square_at(file, board_rank), color, piece);
            file += 1;
        }

        if file != 8 {
            return Err(invalid(&format!("rank '{rank_str}' does not sum to 8 files")));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(invalid(&format!("side-to-move field '{side_part}'"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;

    for ch in castling_part.chars() {
        let flag = match ch {
            'K' => CASTLE_WHITE_KINGSIDE,
            'Q' => CASTLE_WHITE_QUEENSIDE,
            'k' => CASTLE_BLACK_KINGSIDE,
            'q' => CASTLE_BLACK_QUEENSIDE,
            _ => return Err(invalid(&format!("castling rights character '{ch}'"))),
        };
        if rights & flag != 0 {
            return Err(invalid(&format!("duplicate castling right '{ch}'")));
        }
        rights |= flag;
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    algebraic_to_square(en_passant_part)
        .map(Some)
        .map_err(|_| invalid(&format!("en-passant square '{en_passant_part}'")))
}

fn validate_structure(position: &Position) -> ChessResult<()> {
    for color in [Color::White, Color::Black] {
        let kings = position.bitboard(color, PieceKind::King).count_ones();
        if kings != 1 {
            return Err(invalid(&format!("{color} has {kings} kings, expected exactly one")));
        }
    }

    let pawns = position.bitboard(Color::White, PieceKind::Pawn)
        | position.bitboard(Color::Black, PieceKind::Pawn);
    if pawns & BACK_RANKS != 0 {
        return Err(invalid("pawn on first or last rank"));
    }

    if let Some(ep) = position.en_passant_square {
        // White to move captures onto rank 6, black onto rank 3.
        let expected_rank = match position.side_to_move {
            Color::White => 5,
            Color::Black => 2,
        };
        if rank_of(ep) != expected_rank {
            return Err(invalid("en-passant square on the wrong rank for the side to move"));
        }
        validate_en_passant(position, ep)?;
    }

    for (right, color, king_home, rook_home) in CASTLING_HOMES {
        if !position.has_castling_right(right) {
            continue;
        }
        let king_home_ok = position.bitboard(color, PieceKind::King) & (1u64 << king_home) != 0;
        let rook_home_ok = position.bitboard(color, PieceKind::Rook) & (1u64 << rook_home) != 0;
        if !king_home_ok || !rook_home_ok {
            return Err(invalid(&format!(
                "{color} castling right without king and rook on their home squares"
            )));
        }
    }

    let waiting = position.side_to_move.opposite();
    if let Some(king) = position.king_square(waiting) {
        if is_square_attacked(position, king, position.side_to_move) {
            return Err(invalid(&format!("{waiting} is in check but not to move")));
        }
    }

    Ok(())
}

/// The target must be empty, the pawn that just advanced two squares must
/// stand in front of it, and the square that pawn left must be empty.
fn validate_en_passant(position: &Position, ep: Square) -> ChessResult<()> {
    let mover = position.side_to_move;
    let (pawn_square, start_square) = match mover {
        Color::White => (ep - 8, ep + 8),
        Color::Black => (ep + 8, ep - 8),
    };

    if position.occupancy_all & (1u64 << ep) != 0 {
        return Err(invalid("en-passant square is occupied"));
    }
    if position.occupancy_all & (1u64 << start_square) != 0 {
        return Err(invalid("en-passant pawn's start square is occupied"));
    }
    if position.bitboard(mover.opposite(), PieceKind::Pawn) & (1u64 << pawn_square) == 0 {
        return Err(invalid("no pawn to capture en passant"));
    }

    Ok(())
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    let piece = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some((color, piece))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::chess_errors::ChessError;
    use crate::position::chess_rules::STARTING_POSITION_FEN;
    use crate::position::chess_types::{Color, CASTLE_ALL};
    use crate::utils::render_position::render_position;

    #[test]
    fn parse_starting_fen_and_render_board() {
        let position = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        println!("\n{}", render_position(&position));

        assert_eq!(position.side_to_move, Color::White);
        assert_eq!(position.castling_rights, CASTLE_ALL);
        assert_eq!(position.fullmove_number, 1);
        assert_eq!(position.halfmove_clock, 0);
    }

    fn assert_invalid(fen: &str) {
        match parse_fen(fen) {
            Err(ChessError::InvalidEncoding(_)) => {}
            other => panic!("expected InvalidEncoding for '{fen}', got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_layouts() {
        assert_invalid("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1");
        assert_invalid("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_invalid("rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_invalid("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1");
        assert_invalid("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra");
    }

    #[test]
    fn rejects_bad_fields() {
        assert_invalid("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1");
        assert_invalid("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkqX - 0 1");
        assert_invalid("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KK - 0 1");
        assert_invalid("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1");
        assert_invalid("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e3 0 1");
        assert_invalid("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1");
        assert_invalid("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0");
    }

    #[test]
    fn rejects_structurally_impossible_positions() {
        // No black king.
        assert_invalid("8/8/8/8/8/8/8/4K3 w - - 0 1");
        // Two white kings.
        assert_invalid("4k3/8/8/8/8/8/8/3KK3 w - - 0 1");
        // Pawn on the back rank.
        assert_invalid("P3k3/8/8/8/8/8/8/4K3 w - - 0 1");
        // Black in check with white to move.
        assert_invalid("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1");
    }

    #[test]
    fn side_to_move_may_be_in_check() {
        let position = parse_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").expect("FEN should parse");
        assert_eq!(position.side_to_move, Color::White);
    }

    #[test]
    fn rejects_en_passant_without_a_capturable_pawn() {
        // Target occupied by a knight.
        assert_invalid("4k3/8/4N3/3P4/8/8/8/4K3 w - e6 0 1");
        // No black pawn on e5.
        assert_invalid("4k3/8/8/3P4/8/8/8/4K3 w - e6 0 1");
        // e7 still occupied, so no pawn can have just left it.
        assert_invalid("4k3/4p3/8/3Pp3/8/8/8/4K3 w - e6 0 1");
        // Black to move, white pawn missing from d4.
        assert_invalid("4k3/8/8/8/4p3/8/8/4K3 b - d3 0 1");
    }

    #[test]
    fn rejects_castling_rights_without_home_pieces() {
        // Rook on g1 instead of h1.
        assert_invalid("4k3/8/8/8/8/8/8/4K1R1 w K - 0 1");
        // King off its home square.
        assert_invalid("4k3/8/8/8/8/8/8/R2K4 w Q - 0 1");
        // Black queen-side right with no rook on a8.
        assert_invalid("4k2r/8/8/8/8/8/8/4K3 w q - 0 1");

        let position = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("castling rights with home pieces should parse");
        assert_eq!(position.castling_rights, CASTLE_ALL);
    }

    #[test]
    fn accepts_en_passant_on_matching_rank() {
        let position = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        assert_eq!(position.en_passant_square, Some(43));
    }
}
