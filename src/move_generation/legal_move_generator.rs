//! Full legal move generation pipeline.
//!
//! Collects piece-wise pseudo-legal candidates, applies each to a scratch
//! copy, and drops those that leave the mover's king attacked. That single
//! filter covers pins, moving into check, and en-passant discoveries.

use tracing::trace;

use crate::chess_errors::{ChessError, ChessResult};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_shared::captured_piece;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_sliders::generate_slider_moves;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};
use crate::moves::chess_move::ChessMove;
use crate::moves::pawn_moves::promotion_rank;
use crate::position::chess_types::{rank_of, Color, PieceKind, Square};
use crate::position::position::Position;

pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, position: &Position) -> ChessResult<Vec<GeneratedMove>> {
        ensure_well_formed(position)?;

        let mut pseudo = Vec::<ChessMove>::with_capacity(64);
        generate_pseudo_legal_moves(position, &mut pseudo);

        let mover = position.side_to_move;
        let mut legal = Vec::<GeneratedMove>::with_capacity(pseudo.len());
        for mv in pseudo {
            let next = apply_move(position, &mv)?;

            // Illegal if own king is in check after move.
            if is_king_in_check(&next, mover) {
                continue;
            }

            legal.push(GeneratedMove {
                captured: captured_piece(position, &mv),
                chess_move: mv,
                position_after: next,
            });
        }

        trace!(count = legal.len(), side = %mover, "generated legal moves");
        Ok(legal)
    }
}

pub fn generate_pseudo_legal_moves(position: &Position, out: &mut Vec<ChessMove>) {
    generate_pawn_moves(position, out);
    generate_knight_moves(position, out);
    generate_slider_moves(position, out);
    generate_king_moves(position, out);
}

/// All legal moves for the side to move.
pub fn legal_moves(position: &Position) -> ChessResult<Vec<GeneratedMove>> {
    LegalMoveGenerator.generate_legal_moves(position)
}

pub fn is_legal(position: &Position, mv: &ChessMove) -> ChessResult<bool> {
    Ok(legal_moves(position)?
        .iter()
        .any(|generated| generated.chess_move == *mv))
}

/// Destinations reachable from `from` under current legality, without duplicates
/// for the four promotion choices.
pub fn legal_destinations(position: &Position, from: Square) -> ChessResult<Vec<Square>> {
    let mut destinations: Vec<Square> = legal_moves(position)?
        .into_iter()
        .filter(|generated| generated.chess_move.from == from)
        .map(|generated| generated.chess_move.to)
        .collect();
    destinations.sort_unstable();
    destinations.dedup();
    Ok(destinations)
}

/// Resolves origin, destination and optional promotion to a legal move.
///
/// A pawn reaching the last rank without an explicit promotion becomes a
/// queen; a promotion supplied for any other move matches nothing.
pub fn resolve_move(
    position: &Position,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> ChessResult<ChessMove> {
    let wanted = promotion.or_else(|| {
        let promotes = position.piece_kind_for_color(position.side_to_move, from)
            == Some(PieceKind::Pawn)
            && rank_of(to) == promotion_rank(position.side_to_move);
        promotes.then_some(PieceKind::Queen)
    });

    legal_moves(position)?
        .into_iter()
        .map(|generated| generated.chess_move)
        .find(|mv| mv.from == from && mv.to == to && mv.promotion == wanted)
        .ok_or_else(|| {
            let mut requested = ChessMove::new(from, to);
            requested.promotion = promotion;
            ChessError::IllegalMove(requested.to_long_algebraic())
        })
}

fn ensure_well_formed(position: &Position) -> ChessResult<()> {
    for color in [Color::White, Color::Black] {
        if position.king_square(color).is_none() {
            return Err(ChessError::InvalidPosition(format!(
                "{color} must have exactly one king"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{is_legal, legal_destinations, legal_moves, resolve_move};
    use crate::chess_errors::ChessError;
    use crate::moves::chess_move::{ChessMove, MoveFlag};
    use crate::position::chess_types::{Color, PieceKind};
    use crate::position::position::Position;

    #[test]
    fn start_position_has_twenty_moves() {
        let moves = legal_moves(&Position::new_game()).expect("generation should succeed");
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        // e2 knight is pinned by the e8 rook against the e1 king.
        let position =
            Position::from_fen("k3r3/8/8/8/8/8/4N3/4K3 w - - 0 1").expect("FEN should parse");
        let moves = legal_moves(&position).expect("generation should succeed");
        assert!(moves.iter().all(|m| m.chess_move.from != 12));
    }

    #[test]
    fn en_passant_discovering_check_on_rank_is_illegal() {
        // Capturing d5 en passant would open the fifth rank to the h5 rook.
        let position =
            Position::from_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1").expect("FEN should parse");
        let ep = ChessMove::with_flag(36, 43, MoveFlag::EnPassant);
        assert!(!is_legal(&position, &ep).expect("check should succeed"));
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let position =
            Position::from_fen("4k3/8/8/8/8/8/r7/4K3 w - - 0 1").expect("FEN should parse");
        let destinations = legal_destinations(&position, 4).expect("generation should succeed");
        // d1, f1 only: the whole second rank is covered by the a2 rook.
        assert_eq!(destinations, vec![3, 5]);
    }

    #[test]
    fn promotion_destinations_are_deduplicated() {
        let position =
            Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(
            legal_destinations(&position, 48).expect("generation should succeed"),
            vec![56]
        );
        let captures = legal_moves(&position).expect("generation should succeed");
        assert_eq!(
            captures.iter().filter(|m| m.chess_move.from == 48).count(),
            4
        );
    }

    #[test]
    fn missing_king_is_an_invalid_position() {
        let mut position = Position::new_empty();
        position.put(4, Color::White, PieceKind::King);
        position.recalc_occupancy();
        assert!(matches!(
            legal_moves(&position),
            Err(ChessError::InvalidPosition(_))
        ));
    }

    #[test]
    fn generated_moves_record_captures() {
        let position = Position::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1")
            .expect("FEN should parse");
        let moves = legal_moves(&position).expect("generation should succeed");
        let capture = moves
            .iter()
            .find(|m| m.chess_move == ChessMove::new(28, 35))
            .expect("exd5 should be legal");
        assert_eq!(capture.captured, Some(PieceKind::Queen));
    }

    #[test]
    fn resolve_attaches_flags_and_default_promotion() {
        let start = Position::new_game();
        assert_eq!(
            resolve_move(&start, 12, 28, None).expect("e2e4 should resolve"),
            ChessMove::with_flag(12, 28, MoveFlag::DoublePush)
        );

        let position =
            Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(
            resolve_move(&position, 48, 56, None).expect("a8 should resolve"),
            ChessMove::promoting(48, 56, PieceKind::Queen)
        );
        assert_eq!(
            resolve_move(&position, 48, 56, Some(PieceKind::Rook)).expect("a8=R should resolve"),
            ChessMove::promoting(48, 56, PieceKind::Rook)
        );
    }

    #[test]
    fn resolve_rejects_illegal_requests() {
        let start = Position::new_game();
        assert_eq!(
            resolve_move(&start, 12, 36, None),
            Err(ChessError::IllegalMove("e2e5".to_owned()))
        );
        assert!(matches!(
            resolve_move(&start, 12, 20, Some(PieceKind::Queen)),
            Err(ChessError::IllegalMove(_))
        ));
        // Black piece while white is to move.
        assert!(resolve_move(&start, 52, 36, None).is_err());
    }
}
