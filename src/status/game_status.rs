//! Game outcome derivation.
//!
//! `GameStatus` is never stored: it is recomputed from the live position and
//! the session's earlier positions each time it is needed. Terminal
//! no-move outcomes are decided first, then the rule-based draws, then check.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::chess_errors::ChessResult;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::position::chess_rules::{FIFTY_MOVE_RULE_PLIES, REPETITION_DRAW_COUNT};
use crate::position::chess_types::Color;
use crate::position::position::{Position, RepetitionKey};
use crate::status::insufficient_material::is_insufficient_material;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    InsufficientMaterial,
    FiftyMove,
    Repetition,
    /// Stalemate reported as a draw when the session is configured that way.
    StalemateVariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Normal,
    /// The side to move is in check.
    Check(Color),
    Checkmate { winner: Color },
    Stalemate,
    Draw(DrawReason),
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Normal => f.write_str("normal"),
            GameStatus::Check(side) => write!(f, "check-{side}"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate-{winner}"),
            GameStatus::Stalemate => f.write_str("stalemate"),
            GameStatus::Draw(DrawReason::InsufficientMaterial) => {
                f.write_str("draw-insufficient-material")
            }
            GameStatus::Draw(DrawReason::FiftyMove) => f.write_str("draw-fifty-move"),
            GameStatus::Draw(DrawReason::Repetition) => f.write_str("draw-repetition"),
            GameStatus::Draw(DrawReason::StalemateVariant) => f.write_str("draw-stalemate"),
        }
    }
}

impl Serialize for GameStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusOptions {
    pub report_stalemate_as_draw: bool,
}

/// Derives the status of `position`.
///
/// `earlier` holds the positions that preceded it in the same game; they only
/// matter for repetition.
pub fn evaluate_status<'a, I>(
    position: &Position,
    earlier: I,
    options: StatusOptions,
) -> ChessResult<GameStatus>
where
    I: IntoIterator<Item = &'a Position>,
{
    let side = position.side_to_move;
    let in_check = is_king_in_check(position, side);
    let has_moves = !legal_moves(position)?.is_empty();

    if !has_moves {
        return Ok(if in_check {
            GameStatus::Checkmate {
                winner: side.opposite(),
            }
        } else if options.report_stalemate_as_draw {
            GameStatus::Draw(DrawReason::StalemateVariant)
        } else {
            GameStatus::Stalemate
        });
    }

    if position.halfmove_clock >= FIFTY_MOVE_RULE_PLIES {
        return Ok(GameStatus::Draw(DrawReason::FiftyMove));
    }

    if is_insufficient_material(position) {
        return Ok(GameStatus::Draw(DrawReason::InsufficientMaterial));
    }

    if repetition_count(position.repetition_key(), earlier) >= REPETITION_DRAW_COUNT {
        return Ok(GameStatus::Draw(DrawReason::Repetition));
    }

    if in_check {
        return Ok(GameStatus::Check(side));
    }

    Ok(GameStatus::Normal)
}

/// Occurrences of `key`, counting the current position once.
fn repetition_count<'a, I>(key: RepetitionKey, earlier: I) -> usize
where
    I: IntoIterator<Item = &'a Position>,
{
    1 + earlier
        .into_iter()
        .filter(|p| p.repetition_key() == key)
        .count()
}
