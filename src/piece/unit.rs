//! Placed pieces and the identifiers attached to them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::spec::PieceSpec;

/// Identifier of a materialized world entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub Uuid);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn parse(s: &str) -> Option<PlayerId> {
        Uuid::parse_str(s).ok().map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A piece that exists in the world.
///
/// The claiming player goes from absent to present at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPiece {
    entity: EntityId,
    spec: PieceSpec,
    player: Option<PlayerId>,
}

impl UnitPiece {
    /// A freshly spawned, unclaimed piece.
    pub fn new(entity: EntityId, spec: PieceSpec) -> Self {
        UnitPiece {
            entity,
            spec,
            player: None,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn spec(&self) -> PieceSpec {
        self.spec
    }

    pub fn player(&self) -> Option<PlayerId> {
        self.player
    }

    pub fn is_claimed(&self) -> bool {
        self.player.is_some()
    }

    /// Records the claiming player. Returns false, leaving the piece
    /// untouched, if it was already claimed.
    pub(crate) fn assign_player(&mut self, player: PlayerId) -> bool {
        if self.player.is_some() {
            return false;
        }
        self.player = Some(player);
        true
    }
}
