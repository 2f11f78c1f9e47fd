//! Square conversions between algebraic coordinates and board indices.
//!
//! Converts between human-readable coordinates (e.g., `e4`), the internal
//! square index, and the row/column grid used by the API where row 0 is
//! rank 8 and column 0 is file `a`.

use crate::chess_errors::{ChessError, ChessResult};
use crate::position::chess_types::{file_of, rank_of, square_at, Square};

/// Convert algebraic notation (for example: "e4") to a square index.
pub fn algebraic_to_square(square: &str) -> ChessResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::UnresolvableSquare(square.to_owned()));
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::UnresolvableSquare(square.to_owned()));
    }

    Ok(square_at(file - b'a', rank - b'1'))
}

/// Convert a square index (`0..=63`) to algebraic notation (for example: "e4").
pub fn square_to_algebraic(square: Square) -> String {
    debug_assert!(square < 64, "square index out of bounds: {square}");
    let file_char = char::from(b'a' + file_of(square));
    let rank_char = char::from(b'1' + rank_of(square));
    format!("{file_char}{rank_char}")
}

/// Convert API grid coordinates to a square index.
pub fn grid_to_square(row: i64, col: i64) -> ChessResult<Square> {
    if !(0..8).contains(&row) || !(0..8).contains(&col) {
        return Err(ChessError::InvalidCoordinates { row, col });
    }
    Ok(square_at(col as u8, 7 - row as u8))
}

/// Convert a square index to API grid coordinates `(row, col)`.
#[inline]
pub fn square_to_grid(square: Square) -> (u8, u8) {
    (7 - rank_of(square), file_of(square))
}
