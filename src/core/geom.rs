//! 2D Geometry Primitives
//!
//! Vector and axis-aligned bounding box math for tap resolution.
//! All containment and overlap tests use half-open intervals `[min, max)`
//! so that adjacent boxes never both claim a shared edge point.

use serde::{Deserialize, Serialize};

/// A 2D point or vector in screen space (+y is down).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vec2 {
    /// Zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Create a new vector.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise addition.
    #[inline]
    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }

    /// Scale by a scalar.
    #[inline]
    pub fn scale(self, factor: f64) -> Vec2 {
        Vec2::new(self.x * factor, self.y * factor)
    }
}

/// Axis-aligned bounding box stored as center + half extents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Box center.
    pub center: Vec2,
    /// Half width.
    pub half_w: f64,
    /// Half height.
    pub half_h: f64,
}

impl Aabb {
    /// Create a box from its center and full width/height.
    pub fn from_center_size(center: Vec2, width: f64, height: f64) -> Self {
        Self {
            center,
            half_w: width / 2.0,
            half_h: height / 2.0,
        }
    }

    /// Left edge (inclusive).
    #[inline]
    pub fn min_x(&self) -> f64 {
        self.center.x - self.half_w
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.center.x + self.half_w
    }

    /// Top edge (inclusive).
    #[inline]
    pub fn min_y(&self) -> f64 {
        self.center.y - self.half_h
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.center.y + self.half_h
    }

    /// Point containment over `[min, max)` on both axes.
    ///
    /// Exact at the edges: the min edge is in, the max edge is out.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    /// Box overlap test. Symmetric: `a.overlaps(b) == b.overlaps(a)`.
    ///
    /// Boxes that merely touch edge-to-edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }

    /// The same box with both extents scaled by `factor`.
    ///
    /// Used by the shrink-ray effect.
    pub fn scaled(&self, factor: f64) -> Aabb {
        Aabb {
            center: self.center,
            half_w: self.half_w * factor,
            half_h: self.half_h * factor,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(x: f64, y: f64) -> Aabb {
        Aabb::from_center_size(Vec2::new(x, y), 2.0, 2.0)
    }

    #[test]
    fn test_contains_interior_and_exterior() {
        let b = unit_box_at(0.0, 0.0);

        assert!(b.contains(Vec2::ZERO));
        assert!(b.contains(Vec2::new(0.5, -0.5)));
        assert!(!b.contains(Vec2::new(2.0, 0.0)));
        assert!(!b.contains(Vec2::new(0.0, -3.0)));
    }

    #[test]
    fn test_contains_exact_edges() {
        let b = unit_box_at(0.0, 0.0); // spans [-1, 1) on both axes

        // Min edges are inside, max edges are outside
        assert!(b.contains(Vec2::new(-1.0, 0.0)));
        assert!(b.contains(Vec2::new(0.0, -1.0)));
        assert!(b.contains(Vec2::new(-1.0, -1.0)));
        assert!(!b.contains(Vec2::new(1.0, 0.0)));
        assert!(!b.contains(Vec2::new(0.0, 1.0)));
        assert!(!b.contains(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_overlap_symmetry() {
        let a = unit_box_at(0.0, 0.0);
        let b = unit_box_at(1.5, 0.0);
        let c = unit_box_at(5.0, 5.0);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = unit_box_at(0.0, 0.0);
        let b = unit_box_at(2.0, 0.0); // right edge of a == left edge of b

        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_scaled_keeps_center() {
        let b = unit_box_at(3.0, 4.0).scaled(0.5);

        assert_eq!(b.center, Vec2::new(3.0, 4.0));
        assert_eq!(b.half_w, 0.5);
        assert_eq!(b.half_h, 0.5);
        assert!(b.contains(Vec2::new(3.2, 4.2)));
        assert!(!b.contains(Vec2::new(3.8, 4.0)));
    }
}
