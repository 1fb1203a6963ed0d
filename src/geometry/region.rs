//! Axis-aligned cuboid regions.

use glam::DVec3;

/// An axis-aligned region described by its minimum and maximum corners.
///
/// Corners are normalized on construction so `min <= max` on every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    min: DVec3,
    max: DVec3,
}

impl Region {
    /// Creates a region spanning two arbitrary opposite corners.
    pub fn from_corners(a: DVec3, b: DVec3) -> Self {
        Region {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn min(&self) -> DVec3 {
        self.min
    }

    pub fn max(&self) -> DVec3 {
        self.max
    }

    /// Extent along each axis.
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Area of the region's footprint in the horizontal (X/Z) plane.
    pub fn planar_area(&self) -> f64 {
        let size = self.size();
        size.x * size.z
    }

    /// Returns this region moved by `offset`.
    pub fn translate(&self, offset: DVec3) -> Self {
        Region {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Smallest region enclosing both `self` and `other`.
    pub fn union(&self, other: &Region) -> Self {
        Region {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grows the region by `amount` on all four horizontal sides. The
    /// vertical extent is left unchanged.
    pub fn expand_planar(&self, amount: f64) -> Self {
        let delta = DVec3::new(amount, 0.0, amount);
        Region {
            min: self.min - delta,
            max: self.max + delta,
        }
    }

    /// Half-open point test: `min <= p < max` on every axis, so adjacent
    /// regions sharing a face never both claim a point on it.
    pub fn contains_point(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmplt(self.max).all()
    }

    /// Closed containment of another region.
    pub fn contains(&self, other: &Region) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    /// True if `self` contains `other` and extends past it on all four
    /// horizontal sides.
    pub fn strictly_contains_planar(&self, other: &Region) -> bool {
        self.contains(other)
            && self.min.x < other.min.x
            && self.min.z < other.min.z
            && self.max.x > other.max.x
            && self.max.z > other.max.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Region {
        Region::from_corners(DVec3::ZERO, DVec3::ONE)
    }

    #[test]
    fn corners_are_normalized() {
        let r = Region::from_corners(DVec3::new(5.0, 1.0, -2.0), DVec3::new(2.0, 0.0, 3.0));
        assert_eq!(r.min(), DVec3::new(2.0, 0.0, -2.0));
        assert_eq!(r.max(), DVec3::new(5.0, 1.0, 3.0));
    }

    #[test]
    fn union_covers_both() {
        let a = unit();
        let b = unit().translate(DVec3::new(3.0, 0.0, 0.0));
        let u = a.union(&b);
        assert!(u.contains(&a));
        assert!(u.contains(&b));
        assert_eq!(u.size(), DVec3::new(4.0, 1.0, 1.0));
    }

    #[test]
    fn expand_planar_keeps_height() {
        let r = unit().expand_planar(2.0);
        assert_eq!(r.min(), DVec3::new(-2.0, 0.0, -2.0));
        assert_eq!(r.max(), DVec3::new(3.0, 1.0, 3.0));
        assert_eq!(r.planar_area(), 25.0);
    }

    #[test]
    fn expand_by_zero_is_identity() {
        assert_eq!(unit().expand_planar(0.0), unit());
    }

    #[test]
    fn point_containment_is_half_open() {
        let r = unit();
        assert!(r.contains_point(DVec3::ZERO));
        assert!(r.contains_point(DVec3::splat(0.5)));
        assert!(!r.contains_point(DVec3::new(1.0, 0.5, 0.5)));
    }

    #[test]
    fn strict_planar_containment() {
        let inner = unit();
        let outer = inner.expand_planar(1.0);
        assert!(outer.strictly_contains_planar(&inner));
        assert!(!inner.strictly_contains_planar(&inner));
        assert!(!inner.strictly_contains_planar(&outer));
    }
}
