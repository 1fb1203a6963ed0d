//! World-space geometry primitives.
//!
//! Contains the facing-direction basis used to lay a board out in any of the
//! four horizontal cardinal directions, and the axis-aligned regions that
//! squares and borders occupy.

pub mod orientation;
pub mod region;

pub use orientation::{Direction, Orientation, ALL_DIRECTIONS, WORLD_UP};
pub use region::Region;
