//! Static piece layouts.
//!
//! A layout maps coordinates to the piece template that starts there. It
//! can be written as the piece-placement field of chess FEN (ranks from 8
//! down to 1 separated by `/`, digits for runs of empty squares, upper case
//! for white) or as a JSON object keyed by algebraic coordinate.
//!
//! Iteration is in coordinate order (row-major from `A1`), which is the
//! order pieces are spawned in.

use std::collections::btree_map::{self, BTreeMap};

use thiserror::Error;

use super::spec::{PieceSpec, PieceType, Team};
use crate::board::{Coordinate, BOARD_SIZE};

/// The standard chess starting position.
pub const STANDARD_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Errors that can occur while loading a layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("expected 8 ranks separated by '/', got {0}")]
    WrongRankCount(usize),

    #[error("rank {rank} describes {width} squares, expected 8")]
    WrongRankWidth { rank: u8, width: usize },

    #[error("invalid piece character: '{0}'")]
    InvalidPiece(char),

    #[error("failed to parse layout JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered coordinate to piece-template map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceLayout {
    entries: BTreeMap<Coordinate, PieceSpec>,
}

impl PieceLayout {
    pub fn new() -> Self {
        PieceLayout::default()
    }

    /// The standard chess starting layout: 32 pieces, white on rows 0-1.
    pub fn standard() -> Self {
        let mut layout = PieceLayout::new();
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (col, piece_type) in BACK_RANK.into_iter().enumerate() {
            let col = col as u8;
            layout.place(0, col, PieceSpec::new(piece_type, Team::White));
            layout.place(1, col, PieceSpec::new(PieceType::Pawn, Team::White));
            layout.place(6, col, PieceSpec::new(PieceType::Pawn, Team::Black));
            layout.place(7, col, PieceSpec::new(piece_type, Team::Black));
        }
        layout
    }

    /// Parses the piece-placement field of a FEN string.
    pub fn from_fen(s: &str) -> Result<Self, LayoutError> {
        let ranks: Vec<&str> = s.trim().split('/').collect();
        if ranks.len() != BOARD_SIZE as usize {
            return Err(LayoutError::WrongRankCount(ranks.len()));
        }

        let mut layout = PieceLayout::new();
        for (i, rank) in ranks.iter().enumerate() {
            let row = BOARD_SIZE - 1 - i as u8;
            let mut col: usize = 0;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as usize;
                    continue;
                }
                let spec = PieceSpec::from_fen_char(c).ok_or(LayoutError::InvalidPiece(c))?;
                if col < BOARD_SIZE as usize {
                    layout.place(row, col as u8, spec);
                }
                col += 1;
            }
            if col != BOARD_SIZE as usize {
                return Err(LayoutError::WrongRankWidth {
                    rank: row + 1,
                    width: col,
                });
            }
        }
        Ok(layout)
    }

    /// Encodes the layout as a FEN piece-placement field.
    pub fn to_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(BOARD_SIZE as usize);
        for row in (0..BOARD_SIZE).rev() {
            let mut rank = String::new();
            let mut empty = 0;
            for col in 0..BOARD_SIZE {
                let spec = Coordinate::new(row as i32, col as i32)
                    .ok()
                    .and_then(|c| self.entries.get(&c));
                match spec {
                    Some(spec) => {
                        if empty > 0 {
                            rank.push_str(&empty.to_string());
                            empty = 0;
                        }
                        rank.push(spec.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                rank.push_str(&empty.to_string());
            }
            ranks.push(rank);
        }
        ranks.join("/")
    }

    /// Parses a JSON object such as `{"A1": {"type": "ROOK", "team": "WHITE"}}`.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let entries: BTreeMap<Coordinate, PieceSpec> = serde_json::from_str(json)?;
        Ok(PieceLayout { entries })
    }

    /// Adds or replaces the template at `coordinate`.
    pub fn insert(&mut self, coordinate: Coordinate, spec: PieceSpec) -> Option<PieceSpec> {
        self.entries.insert(coordinate, spec)
    }

    fn place(&mut self, row: u8, col: u8, spec: PieceSpec) {
        if let Ok(c) = Coordinate::new(row as i32, col as i32) {
            self.entries.insert(c, spec);
        }
    }

    pub fn get(&self, coordinate: Coordinate) -> Option<&PieceSpec> {
        self.entries.get(&coordinate)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, PieceSpec)> + '_ {
        self.entries.iter().map(|(c, s)| (*c, *s))
    }
}

impl IntoIterator for PieceLayout {
    type Item = (Coordinate, PieceSpec);
    type IntoIter = btree_map::IntoIter<Coordinate, PieceSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(Coordinate, PieceSpec)> for PieceLayout {
    fn from_iter<T: IntoIterator<Item = (Coordinate, PieceSpec)>>(iter: T) -> Self {
        PieceLayout {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> Coordinate {
        Coordinate::parse(s).unwrap()
    }

    #[test]
    fn standard_layout_has_32_pieces() {
        let layout = PieceLayout::standard();
        assert_eq!(layout.len(), 32);
        assert_eq!(
            layout.get(at("E1")),
            Some(&PieceSpec::new(PieceType::King, Team::White))
        );
        assert_eq!(
            layout.get(at("D8")),
            Some(&PieceSpec::new(PieceType::Queen, Team::Black))
        );
        assert_eq!(
            layout.get(at("C7")),
            Some(&PieceSpec::new(PieceType::Pawn, Team::Black))
        );
        assert_eq!(layout.get(at("E4")), None);
    }

    #[test]
    fn standard_fen_matches_standard_layout() {
        assert_eq!(PieceLayout::from_fen(STANDARD_FEN).unwrap(), PieceLayout::standard());
        assert_eq!(PieceLayout::standard().to_fen(), STANDARD_FEN);
    }

    #[test]
    fn sparse_fen() {
        let layout = PieceLayout::from_fen("4k3/8/8/8/8/8/8/4K2R").unwrap();
        assert_eq!(layout.len(), 3);
        assert_eq!(
            layout.get(at("H1")),
            Some(&PieceSpec::new(PieceType::Rook, Team::White))
        );
        assert_eq!(layout.to_fen(), "4k3/8/8/8/8/8/8/4K2R");
    }

    #[test]
    fn fen_errors() {
        assert!(matches!(
            PieceLayout::from_fen("8/8/8"),
            Err(LayoutError::WrongRankCount(3))
        ));
        assert!(matches!(
            PieceLayout::from_fen("8/8/8/8/8/8/8/7"),
            Err(LayoutError::WrongRankWidth { rank: 1, width: 7 })
        ));
        assert!(matches!(
            PieceLayout::from_fen("8/8/8/8/8/8/8/RNBQKBNRR"),
            Err(LayoutError::WrongRankWidth { rank: 1, width: 9 })
        ));
        assert!(matches!(
            PieceLayout::from_fen("8/8/8/8/8/8/8/xxxxxxxx"),
            Err(LayoutError::InvalidPiece('x'))
        ));
    }

    #[test]
    fn iterates_in_row_major_order() {
        let coords: Vec<String> = PieceLayout::standard()
            .iter()
            .map(|(c, _)| c.to_algebraic())
            .take(9)
            .collect();
        assert_eq!(coords, ["A1", "B1", "C1", "D1", "E1", "F1", "G1", "H1", "A2"]);
    }

    #[test]
    fn json_layout() {
        let layout = PieceLayout::from_json(
            r#"{"A1": {"type": "ROOK", "team": "WHITE"}, "H8": {"type": "KING", "team": "BLACK"}}"#,
        )
        .unwrap();
        assert_eq!(layout.len(), 2);
        assert_eq!(
            layout.get(at("H8")),
            Some(&PieceSpec::new(PieceType::King, Team::Black))
        );
        assert!(PieceLayout::from_json(r#"{"Z1": {"type": "ROOK", "team": "WHITE"}}"#).is_err());
    }
}
