//! The game aggregate: a board, the pieces standing on it and the phase.

use std::rc::Rc;

use tracing::info;

use super::phase::{ClaimError, Phase, PhaseError, PhaseState};
use crate::board::{Board, Coordinate};
use crate::piece::{PlayerId, Team, UnitPiece};
use crate::spawn::PlacedPieces;

/// One running game.
///
/// Owned by whoever drives the phase transitions; there is no process-wide
/// current game.
#[derive(Debug, Clone)]
pub struct Game {
    board: Rc<Board>,
    pieces: PlacedPieces,
    phase: PhaseState,
}

impl Game {
    /// A game in `Selection` with nothing claimed yet.
    pub fn new(board: Rc<Board>, pieces: PlacedPieces) -> Self {
        Game::from_parts(board, pieces, PhaseState::default())
    }

    /// Reassembles a game, e.g. from a saved record.
    pub fn from_parts(board: Rc<Board>, pieces: PlacedPieces, phase: PhaseState) -> Self {
        Game {
            board,
            pieces,
            phase,
        }
    }

    pub fn board(&self) -> &Rc<Board> {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    pub fn phase_state(&self) -> &PhaseState {
        &self.phase
    }

    pub fn pieces(&self) -> &PlacedPieces {
        &self.pieces
    }

    pub fn piece_at(&self, coordinate: Coordinate) -> Option<&UnitPiece> {
        self.pieces.get(&coordinate)
    }

    pub fn pieces_of(&self, team: Team) -> impl Iterator<Item = (Coordinate, &UnitPiece)> {
        self.pieces
            .iter()
            .filter(move |(_, p)| p.spec().team == team)
            .map(|(c, p)| (*c, p))
    }

    /// The piece `player` has claimed, if any.
    pub fn claimed_piece_of(&self, player: PlayerId) -> Option<(Coordinate, &UnitPiece)> {
        self.pieces
            .iter()
            .find(|(_, p)| p.player() == Some(player))
            .map(|(c, p)| (*c, p))
    }

    /// Lets `player` claim the piece on `coordinate`.
    ///
    /// The piece records its player only once the phase has accepted the
    /// claim; on error neither the phase nor the piece changes.
    pub fn claim(
        &mut self,
        player: PlayerId,
        coordinate: Coordinate,
    ) -> Result<&UnitPiece, ClaimError> {
        let piece = self
            .pieces
            .get(&coordinate)
            .ok_or(ClaimError::NoPieceAt(coordinate))?;
        let next = self.phase.claim(player, piece)?;
        self.phase = next;

        let piece = self
            .pieces
            .get_mut(&coordinate)
            .ok_or(ClaimError::NoPieceAt(coordinate))?;
        piece.assign_player(player);
        info!(
            %player,
            %coordinate,
            piece = ?piece.spec().piece_type,
            team = piece.spec().team.name(),
            "piece claimed"
        );
        Ok(piece)
    }

    /// Moves to the next phase.
    pub fn advance_phase(&mut self) -> Result<Phase, PhaseError> {
        self.phase = self.phase.advance()?;
        info!(phase = %self.phase(), "phase advanced");
        Ok(self.phase())
    }

    /// Moves to `target`, which must directly follow the current phase.
    pub fn advance_to(&mut self, target: Phase) -> Result<Phase, PhaseError> {
        self.phase = self.phase.advance_to(target)?;
        info!(phase = %self.phase(), "phase advanced");
        Ok(self.phase())
    }
}
