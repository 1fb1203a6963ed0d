//! Time-sliced piece spawning.
//!
//! The host drives a single-threaded tick loop. Spawning a layout registers
//! a repeating task that materializes a small batch of pieces per tick and
//! resolves a [`SpawnFuture`] once, when the layout is exhausted or the
//! first materialization fails.

pub mod materializer;
pub mod scheduler;
pub mod spawner;

pub use materializer::{MaterializeError, PieceMaterializer, SandboxWorld, SpawnedEntity};
pub use scheduler::{Repeat, TaskId, TickLoop, TickScheduler};
pub use spawner::{
    PieceSpawnScheduler, PlacedPieces, SpawnError, SpawnFuture, SpawnResult, BATCH_SIZE,
};
