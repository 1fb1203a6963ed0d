//! Turning piece templates into world entities.

use std::collections::BTreeMap;

use glam::DVec3;
use thiserror::Error;
use uuid::Uuid;

use crate::board::WorldId;
use crate::piece::{EntityId, PieceSpec};

/// Errors a materializer can report for a single spawn.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MaterializeError {
    #[error("world '{0}' is not available")]
    WorldUnavailable(WorldId),

    #[error("no entity template for {0:?}")]
    MissingTemplate(PieceSpec),

    #[error("spawn rejected: {0}")]
    Rejected(String),
}

/// Creates the in-world entity for a piece.
pub trait PieceMaterializer {
    /// Spawns `spec` at `position` looking along `facing` and returns the
    /// new entity's identifier.
    fn spawn(
        &mut self,
        world: &WorldId,
        spec: PieceSpec,
        position: DVec3,
        facing: DVec3,
    ) -> Result<EntityId, MaterializeError>;
}

/// An entity recorded by a [`SandboxWorld`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnedEntity {
    pub id: EntityId,
    pub spec: PieceSpec,
    pub position: DVec3,
    pub facing: DVec3,
}

/// In-memory world that records every spawned entity.
///
/// Entity ids are allocated sequentially, so runs are reproducible.
#[derive(Debug, Clone)]
pub struct SandboxWorld {
    world: WorldId,
    next_id: u128,
    entities: BTreeMap<EntityId, SpawnedEntity>,
}

impl SandboxWorld {
    pub fn new(world: WorldId) -> Self {
        SandboxWorld {
            world,
            next_id: 1,
            entities: BTreeMap::new(),
        }
    }

    pub fn world(&self) -> &WorldId {
        &self.world
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&SpawnedEntity> {
        self.entities.get(&id)
    }

    /// Entities in spawn order.
    pub fn entities(&self) -> impl Iterator<Item = &SpawnedEntity> {
        self.entities.values()
    }

    /// Removes an entity. Returns false if it did not exist.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.entities.remove(&id).is_some()
    }
}

impl PieceMaterializer for SandboxWorld {
    fn spawn(
        &mut self,
        world: &WorldId,
        spec: PieceSpec,
        position: DVec3,
        facing: DVec3,
    ) -> Result<EntityId, MaterializeError> {
        if world != &self.world {
            return Err(MaterializeError::WorldUnavailable(world.clone()));
        }
        if !position.is_finite() {
            return Err(MaterializeError::Rejected(format!(
                "non-finite position {:?}",
                position
            )));
        }
        let id = EntityId(Uuid::from_u128(self.next_id));
        self.next_id += 1;
        self.entities.insert(
            id,
            SpawnedEntity {
                id,
                spec,
                position,
                facing,
            },
        );
        Ok(id)
    }
}
