//! Piece ranks, teams and the templates built from them.

use serde::{Deserialize, Serialize};

/// The six piece ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

pub const ALL_PIECE_TYPES: [PieceType; 6] = [
    PieceType::King,
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Pawn,
];

impl PieceType {
    /// Returns the upper-case FEN letter.
    pub const fn fen_char(self) -> char {
        match self {
            PieceType::King => 'K',
            PieceType::Queen => 'Q',
            PieceType::Rook => 'R',
            PieceType::Bishop => 'B',
            PieceType::Knight => 'N',
            PieceType::Pawn => 'P',
        }
    }

    /// Parses a FEN letter, ignoring case.
    pub fn from_fen_char(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'K' => Some(PieceType::King),
            'Q' => Some(PieceType::Queen),
            'R' => Some(PieceType::Rook),
            'B' => Some(PieceType::Bishop),
            'N' => Some(PieceType::Knight),
            'P' => Some(PieceType::Pawn),
            _ => None,
        }
    }

    /// Pawns cannot be claimed by a player during selection.
    pub const fn is_selectable(self) -> bool {
        !matches!(self, PieceType::Pawn)
    }
}

/// The two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Team {
    White,
    Black,
}

impl Team {
    pub const fn name(self) -> &'static str {
        match self {
            Team::White => "WHITE",
            Team::Black => "BLACK",
        }
    }
}

/// A piece template: what to spawn, not a spawned instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceSpec {
    #[serde(rename = "type")]
    pub piece_type: PieceType,
    pub team: Team,
}

impl PieceSpec {
    pub const fn new(piece_type: PieceType, team: Team) -> Self {
        PieceSpec { piece_type, team }
    }

    /// FEN letter: upper case for white, lower case for black.
    pub fn fen_char(self) -> char {
        let c = self.piece_type.fen_char();
        match self.team {
            Team::White => c,
            Team::Black => c.to_ascii_lowercase(),
        }
    }

    /// Parses a FEN letter, taking the team from its case.
    pub fn from_fen_char(c: char) -> Option<PieceSpec> {
        let team = if c.is_ascii_uppercase() {
            Team::White
        } else {
            Team::Black
        };
        PieceType::from_fen_char(c).map(|t| PieceSpec::new(t, team))
    }
}
