//! Plain-data records for saving and restoring boards and games.
//!
//! Coordinates are written as their algebraic names, enums by upper-case
//! name and vectors as `[x, y, z]`. A board is stored by the inputs that
//! built it and rebuilt through [`BoardFactory`], which is deterministic.

use std::collections::BTreeMap;
use std::rc::Rc;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, BoardFactory, Coordinate, WorldId};
use crate::config::{BorderConfig, BoardConfig, SquareConfig};
use crate::game::{Game, PhaseState};
use crate::geometry::{Direction, Orientation};
use crate::piece::PlayerId;
use crate::spawn::PlacedPieces;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("anchor {0:?} is not finite")]
    InvalidAnchor(DVec3),

    #[error("piece on {0} is outside the board")]
    PieceOffBoard(Coordinate),

    #[error("claims of player {0} do not match the pieces they own")]
    ClaimMismatch(PlayerId),
}

/// Everything needed to rebuild a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardRecord {
    pub world: WorldId,
    pub anchor: DVec3,
    pub facing: Direction,
    pub squares: SquareConfig,
    pub inner_border: BorderConfig,
    pub frame: BorderConfig,
}

impl BoardRecord {
    pub fn from_board(board: &Board) -> Self {
        let config = board.config();
        BoardRecord {
            world: board.world().clone(),
            anchor: board.anchor(),
            facing: board.orientation().facing(),
            squares: config.squares,
            inner_border: config.inner_border,
            frame: config.frame,
        }
    }

    pub fn config(&self) -> BoardConfig {
        BoardConfig {
            squares: self.squares,
            inner_border: self.inner_border,
            frame: self.frame,
        }
    }

    /// Rebuilds the board. Out-of-range sizes fall back to defaults the
    /// same way freshly loaded configuration does.
    pub fn restore(&self) -> Result<Board, RecordError> {
        if !self.anchor.is_finite() {
            return Err(RecordError::InvalidAnchor(self.anchor));
        }
        Ok(BoardFactory::create_board(
            self.world.clone(),
            self.anchor,
            Orientation::from_direction(self.facing),
            &self.config(),
        ))
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A saved game: its board, its pieces and the phase it was in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub board: BoardRecord,
    pub pieces: PlacedPieces,
    pub state: PhaseState,
}

impl GameRecord {
    pub fn from_game(game: &Game) -> Self {
        GameRecord {
            board: BoardRecord::from_board(game.board()),
            pieces: game.pieces().clone(),
            state: game.phase_state().clone(),
        }
    }

    /// Rebuilds the game. Every piece must stand on a square of the
    /// restored board and no player may own more than one piece. During
    /// selection the claim map must agree with the piece owners.
    pub fn restore(&self) -> Result<Game, RecordError> {
        let board = self.board.restore()?;
        if let Some(c) = self.pieces.keys().find(|c| board.grid().get(**c).is_none()) {
            return Err(RecordError::PieceOffBoard(*c));
        }
        self.check_owners()?;
        Ok(Game::from_parts(
            Rc::new(board),
            self.pieces.clone(),
            self.state.clone(),
        ))
    }

    fn check_owners(&self) -> Result<(), RecordError> {
        let mut owned = BTreeMap::new();
        for piece in self.pieces.values() {
            let Some(player) = piece.player() else {
                continue;
            };
            if owned.insert(player, piece.entity()).is_some() {
                return Err(RecordError::ClaimMismatch(player));
            }
        }

        if let Some(selection) = self.state.selection() {
            for (player, entity) in selection.claims() {
                if owned.get(player) != Some(entity) {
                    return Err(RecordError::ClaimMismatch(*player));
                }
            }
            if let Some(player) = owned.keys().find(|p| selection.claim_of(**p).is_none()) {
                return Err(RecordError::ClaimMismatch(*player));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }
}
