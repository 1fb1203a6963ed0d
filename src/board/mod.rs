//! Board representation.
//!
//! Contains the validated cell coordinates, the oriented checkerboard grid,
//! the border rings around it, and the factory that assembles them into an
//! immutable [`Board`].

pub mod border;
pub mod coordinate;
pub mod factory;
pub mod grid;

pub use border::Border;
pub use coordinate::{Coordinate, CoordinateError, BOARD_SIZE};
pub use factory::{Board, BoardFactory, WorldId};
pub use grid::{CellSize, GeometryError, GridDimensions, Square, SquareColor, SquareGrid};
