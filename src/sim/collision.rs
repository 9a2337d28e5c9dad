//! Collision detection and magnet attraction
//!
//! Every gameplay shape is an axis-aligned box anchored at its top-left
//! corner, so overlap is four strict comparisons.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Strict overlap; boxes that only share an edge do not touch
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Pull `pos` toward `target` by `fraction` of the remaining delta when
/// closer than `radius`. Returns the (possibly unchanged) position.
///
/// Distances are measured between anchor corners, so the pull converges on
/// the player's top-left rather than its center.
#[inline]
pub fn magnet_pull(pos: Vec2, target: Vec2, radius: f32, fraction: f32) -> Vec2 {
    if crate::distance(pos, target) < radius {
        pos + (target - pos) * fraction
    } else {
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_same_position() {
        let a = Aabb::new(Vec2::new(100.0, 540.0), Vec2::splat(60.0));
        let b = Aabb::new(Vec2::new(100.0, 540.0), Vec2::splat(30.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
        let right = Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let below = Aabb::new(Vec2::new(0.0, 10.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_disjoint_boxes() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(50.0, 50.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_magnet_pull_moves_ten_percent() {
        let player = Vec2::new(100.0, 540.0);
        let ring = Vec2::new(200.0, 540.0);
        let pulled = magnet_pull(ring, player, 300.0, 0.1);
        assert!((pulled.x - 190.0).abs() < 1e-4);
        assert!((pulled.y - 540.0).abs() < 1e-4);
    }

    #[test]
    fn test_magnet_ignores_far_rings() {
        let player = Vec2::new(100.0, 540.0);
        let ring = Vec2::new(400.0, 540.0);
        assert_eq!(magnet_pull(ring, player, 300.0, 0.1), ring);
    }
}
