//! Chessfield library.
//!
//! Builds oriented chess boards in a voxel world, spawns pieces onto them a
//! few per tick and tracks the game lifecycle. Exposes the geometry, board,
//! spawn, game and protocol modules for use by integration tests and the
//! binary entry point.

pub mod board;
pub mod config;
pub mod game;
pub mod geometry;
pub mod piece;
pub mod protocol;
pub mod record;
pub mod session;
pub mod spawn;
