//! Board coordinates and algebraic notation.
//!
//! A coordinate addresses one cell of the 8x8 board by zero-based row and
//! column. Algebraic notation writes the column as a letter `A`-`H` followed
//! by the row as a digit `1`-`8`, so `(row 0, col 0)` is `A1` and
//! `(row 7, col 7)` is `H8`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of rows and columns addressable by a [`Coordinate`].
pub const BOARD_SIZE: u8 = 8;

/// Errors raised when constructing or parsing a coordinate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("coordinate ({row}, {col}) is outside the 8x8 board")]
    OutOfRange { row: i32, col: i32 },

    #[error("malformed algebraic coordinate '{0}'")]
    Malformed(String),
}

/// A validated `(row, col)` cell index with both components in `0..8`.
///
/// Ordering is row-major, which is also the order layouts iterate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coordinate {
    row: u8,
    col: u8,
}

impl Coordinate {
    /// Creates a coordinate, rejecting anything outside `0..8`.
    pub fn new(row: i32, col: i32) -> Result<Self, CoordinateError> {
        let in_range = |v: i32| (0..BOARD_SIZE as i32).contains(&v);
        if in_range(row) && in_range(col) {
            Ok(Coordinate {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(CoordinateError::OutOfRange { row, col })
        }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    /// Parses two-character algebraic notation such as `"A1"` or `"h8"`.
    pub fn parse(s: &str) -> Result<Self, CoordinateError> {
        let malformed = || CoordinateError::Malformed(s.to_string());
        let mut chars = s.chars();
        let (letter, digit) = match (chars.next(), chars.next(), chars.next()) {
            (Some(l), Some(d), None) => (l.to_ascii_uppercase(), d),
            _ => return Err(malformed()),
        };
        if !('A'..='H').contains(&letter) || !('1'..='8').contains(&digit) {
            return Err(malformed());
        }
        let col = letter as i32 - 'A' as i32;
        let row = digit as i32 - '1' as i32;
        Coordinate::new(row, col)
    }

    /// Formats the coordinate in algebraic notation.
    pub fn to_algebraic(&self) -> String {
        let letter = (b'A' + self.col) as char;
        let digit = (b'1' + self.row) as char;
        format!("{}{}", letter, digit)
    }

    /// Iterates every coordinate on the board in row-major order.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Coordinate { row, col }))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Coordinate::parse(s)
    }
}

impl TryFrom<String> for Coordinate {
    type Error = CoordinateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Coordinate::parse(&s)
    }
}

impl From<Coordinate> for String {
    fn from(c: Coordinate) -> Self {
        c.to_algebraic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a1_roundtrip() {
        let c = Coordinate::parse("A1").unwrap();
        assert_eq!((c.row(), c.col()), (0, 0));
        assert_eq!(c.to_algebraic(), "A1");
    }

    #[test]
    fn h8_roundtrip() {
        let c = Coordinate::parse("H8").unwrap();
        assert_eq!((c.row(), c.col()), (7, 7));
        assert_eq!(c.to_algebraic(), "H8");
    }

    #[test]
    fn letter_is_column_digit_is_row() {
        let c = Coordinate::parse("C5").unwrap();
        assert_eq!(c.row(), 4);
        assert_eq!(c.col(), 2);
    }

    #[test]
    fn lowercase_letter_accepted() {
        assert_eq!(Coordinate::parse("e2"), Coordinate::new(1, 4));
    }

    #[test]
    fn out_of_range_rejected() {
        assert_eq!(
            Coordinate::new(8, 0),
            Err(CoordinateError::OutOfRange { row: 8, col: 0 })
        );
        assert_eq!(
            Coordinate::new(0, -1),
            Err(CoordinateError::OutOfRange { row: 0, col: -1 })
        );
        assert!(Coordinate::new(7, 7).is_ok());
    }

    #[test]
    fn malformed_notation_rejected() {
        for s in ["", "A", "A10", "I1", "A0", "A9", "11", "AA"] {
            assert!(
                matches!(Coordinate::parse(s), Err(CoordinateError::Malformed(_))),
                "{} should be malformed",
                s
            );
        }
    }

    #[test]
    fn all_is_row_major_and_complete() {
        let all: Vec<Coordinate> = Coordinate::all().collect();
        assert_eq!(all.len(), 64);
        assert_eq!(all[0].to_algebraic(), "A1");
        assert_eq!(all[1].to_algebraic(), "B1");
        assert_eq!(all[63].to_algebraic(), "H8");
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn serializes_as_algebraic_string() {
        let c = Coordinate::new(2, 3).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"D3\"");
        let back: Coordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
        assert!(serde_json::from_str::<Coordinate>("\"Z9\"").is_err());
    }
}
