//! Facing directions and the orthonormal basis derived from them.
//!
//! World axes follow the voxel convention: `+X` is east, `+Y` is up and
//! `+Z` is south. Yaw is measured in degrees with 0 facing south, 90 west,
//! 180 north and 270 east.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// The fixed world-up unit vector.
pub const WORLD_UP: DVec3 = DVec3::Y;

/// One of the four horizontal cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

/// All directions, in yaw quadrant order starting from north.
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

impl Direction {
    /// Returns the horizontal unit vector pointing in this direction.
    pub const fn vector(self) -> DVec3 {
        match self {
            Direction::North => DVec3::new(0.0, 0.0, -1.0),
            Direction::East => DVec3::new(1.0, 0.0, 0.0),
            Direction::South => DVec3::new(0.0, 0.0, 1.0),
            Direction::West => DVec3::new(-1.0, 0.0, 0.0),
        }
    }

    /// Snaps a yaw angle in degrees to the nearest cardinal direction.
    ///
    /// Any finite yaw is accepted. Non-finite input resolves to north.
    pub fn from_yaw(yaw: f64) -> Direction {
        let normalized = (yaw + 180.0).rem_euclid(360.0);
        let quadrant = ((normalized / 90.0).round() as i64).rem_euclid(4);
        ALL_DIRECTIONS[quadrant as usize]
    }

    /// Returns the upper-case name used in records and protocol output.
    pub const fn name(self) -> &'static str {
        match self {
            Direction::North => "NORTH",
            Direction::East => "EAST",
            Direction::South => "SOUTH",
            Direction::West => "WEST",
        }
    }

    /// Parses a direction name, ignoring case.
    pub fn from_name(s: &str) -> Option<Direction> {
        ALL_DIRECTIONS
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
    }
}

/// The forward/left/right/up basis of a board.
///
/// `up` is always world-up, `left = up × forward` and `right = -left`, so
/// the three horizontal vectors are mutually orthogonal unit vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    facing: Direction,
    forward: DVec3,
    left: DVec3,
    right: DVec3,
    up: DVec3,
}

impl Orientation {
    /// Builds the basis for a cardinal facing direction.
    pub fn from_direction(facing: Direction) -> Self {
        let forward = facing.vector();
        let up = WORLD_UP;
        let left = up.cross(forward);
        Orientation {
            facing,
            forward,
            left,
            right: -left,
            up,
        }
    }

    /// Builds the basis for the cardinal direction nearest to `yaw`.
    pub fn from_yaw(yaw: f64) -> Self {
        Self::from_direction(Direction::from_yaw(yaw))
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn forward(&self) -> DVec3 {
        self.forward
    }

    pub fn left(&self) -> DVec3 {
        self.left
    }

    pub fn right(&self) -> DVec3 {
        self.right
    }

    pub fn up(&self) -> DVec3 {
        self.up
    }
}

impl From<Direction> for Orientation {
    fn from(facing: Direction) -> Self {
        Orientation::from_direction(facing)
    }
}
