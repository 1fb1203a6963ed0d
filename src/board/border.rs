//! Concentric borders around the grid.

use crate::geometry::Region;

/// A ring of `thickness` blocks wrapped around an inside region in the
/// horizontal plane. The vertical extent matches the inside region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    inside: Region,
    region: Region,
    thickness: u32,
}

impl Border {
    /// Expands `inside` by `thickness` on all four horizontal sides.
    /// A zero thickness yields a border with the same extent as `inside`.
    pub fn new(inside: Region, thickness: u32) -> Self {
        Border {
            inside,
            region: inside.expand_planar(thickness as f64),
            thickness,
        }
    }

    /// The expanded outer extent.
    pub fn region(&self) -> Region {
        self.region
    }

    /// The region this border wraps.
    pub fn inside(&self) -> Region {
        self.inside
    }

    pub fn thickness(&self) -> u32 {
        self.thickness
    }
}
