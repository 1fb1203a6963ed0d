//! The four-phase game lifecycle.
//!
//! Phases run strictly `Selection -> TurnOrder -> Battle -> Ended`. Every
//! transition is checked against the phase it has to leave, and `Ended`
//! is terminal. Operations take `&self` and return the next state, so a
//! failed call never leaves a half-updated state behind.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Coordinate;
use crate::piece::{EntityId, PieceType, PlayerId, UnitPiece};

/// Phase tag without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Selection,
    TurnOrder,
    Battle,
    Ended,
}

pub const ALL_PHASES: [Phase; 4] = [Phase::Selection, Phase::TurnOrder, Phase::Battle, Phase::Ended];

impl Phase {
    /// The phase that follows, `None` for `Ended`.
    pub const fn next(self) -> Option<Phase> {
        match self {
            Phase::Selection => Some(Phase::TurnOrder),
            Phase::TurnOrder => Some(Phase::Battle),
            Phase::Battle => Some(Phase::Ended),
            Phase::Ended => None,
        }
    }

    /// The phase a transition into `self` must start from, `None` for
    /// `Selection` which nothing transitions into.
    pub const fn previous(self) -> Option<Phase> {
        match self {
            Phase::Selection => None,
            Phase::TurnOrder => Some(Phase::Selection),
            Phase::Battle => Some(Phase::TurnOrder),
            Phase::Ended => Some(Phase::Battle),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Phase::Selection => "SELECTION",
            Phase::TurnOrder => "TURN_ORDER",
            Phase::Battle => "BATTLE",
            Phase::Ended => "ENDED",
        }
    }

    pub fn from_name(s: &str) -> Option<Phase> {
        ALL_PHASES
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from phase transitions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PhaseError {
    #[error("cannot enter {target} from {actual} (requires {})", .required.map_or("no phase", Phase::name))]
    Mismatch {
        target: Phase,
        required: Option<Phase>,
        actual: Phase,
    },

    #[error("the game has ended")]
    Terminal,
}

/// Errors from claiming a piece.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("pieces can only be claimed during SELECTION, not {0}")]
    WrongPhase(Phase),

    #[error("piece {entity} is already claimed by {by}")]
    AlreadyClaimed { entity: EntityId, by: PlayerId },

    #[error("player {0} has already claimed a piece")]
    PlayerAlreadyClaimed(PlayerId),

    #[error("{0:?} pieces cannot be claimed")]
    NotSelectable(PieceType),

    #[error("no piece on {0}")]
    NoPieceAt(Coordinate),
}

/// Claims made during selection: each player holds at most one piece.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    claims: BTreeMap<PlayerId, EntityId>,
}

impl SelectionState {
    pub fn new() -> Self {
        SelectionState::default()
    }

    pub fn claims(&self) -> &BTreeMap<PlayerId, EntityId> {
        &self.claims
    }

    pub fn claim_of(&self, player: PlayerId) -> Option<EntityId> {
        self.claims.get(&player).copied()
    }

    /// The player holding `entity`, if any.
    pub fn holder_of(&self, entity: EntityId) -> Option<PlayerId> {
        self.claims
            .iter()
            .find(|(_, e)| **e == entity)
            .map(|(p, _)| *p)
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// The active phase and its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseState {
    Selection(SelectionState),
    TurnOrder,
    Battle,
    Ended,
}

impl Default for PhaseState {
    fn default() -> Self {
        PhaseState::Selection(SelectionState::new())
    }
}

impl PhaseState {
    pub fn phase(&self) -> Phase {
        match self {
            PhaseState::Selection(_) => Phase::Selection,
            PhaseState::TurnOrder => Phase::TurnOrder,
            PhaseState::Battle => Phase::Battle,
            PhaseState::Ended => Phase::Ended,
        }
    }

    fn entering(target: Phase) -> PhaseState {
        match target {
            Phase::Selection => PhaseState::default(),
            Phase::TurnOrder => PhaseState::TurnOrder,
            Phase::Battle => PhaseState::Battle,
            Phase::Ended => PhaseState::Ended,
        }
    }

    /// Transitions into `target`, which must directly follow the current
    /// phase.
    pub fn advance_to(&self, target: Phase) -> Result<PhaseState, PhaseError> {
        let actual = self.phase();
        let required = target.previous();
        if required != Some(actual) {
            return Err(PhaseError::Mismatch {
                target,
                required,
                actual,
            });
        }
        Ok(PhaseState::entering(target))
    }

    /// Transitions into the next phase.
    pub fn advance(&self) -> Result<PhaseState, PhaseError> {
        let target = self.phase().next().ok_or(PhaseError::Terminal)?;
        self.advance_to(target)
    }

    /// Records `player` claiming `piece`. Only legal during selection, for a
    /// selectable piece nobody holds, by a player holding nothing yet.
    pub fn claim(&self, player: PlayerId, piece: &UnitPiece) -> Result<PhaseState, ClaimError> {
        let PhaseState::Selection(selection) = self else {
            return Err(ClaimError::WrongPhase(self.phase()));
        };

        let entity = piece.entity();
        if let Some(by) = piece.player().or_else(|| selection.holder_of(entity)) {
            return Err(ClaimError::AlreadyClaimed { entity, by });
        }
        let piece_type = piece.spec().piece_type;
        if !piece_type.is_selectable() {
            return Err(ClaimError::NotSelectable(piece_type));
        }
        if selection.claims.contains_key(&player) {
            return Err(ClaimError::PlayerAlreadyClaimed(player));
        }

        let mut next = selection.clone();
        next.claims.insert(player, entity);
        Ok(PhaseState::Selection(next))
    }

    pub fn selection(&self) -> Option<&SelectionState> {
        match self {
            PhaseState::Selection(s) => Some(s),
            PhaseState::TurnOrder | PhaseState::Battle | PhaseState::Ended => None,
        }
    }
}
