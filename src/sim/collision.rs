//! Collision checks on the ground plane
//!
//! The player is a disc. Walls and static obstacles are axis-aligned boxes,
//! patrolling obstacles are discs. Overlap tests are strict: a player resting
//! exactly on a boundary (edge touching, or distance equal to the sum of
//! radii) is not blocked.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box on the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// Box from a full width (x) and depth (z)
    pub fn from_size(center: Vec2, size: Vec2) -> Self {
        Self::new(center, size * 0.5)
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Interval test on each axis, with the box inflated by `radius`
    pub fn overlaps_disc(&self, center: Vec2, radius: f32) -> bool {
        let min = self.min();
        let max = self.max();
        center.x + radius > min.x
            && center.x - radius < max.x
            && center.y + radius > min.y
            && center.y - radius < max.y
    }
}

/// Disc on the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn overlaps_disc(&self, center: Vec2, radius: f32) -> bool {
        self.center.distance(center) < self.radius + radius
    }
}

/// What stopped a proposed move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocker {
    /// Index into the static box list
    Box(usize),
    /// Index into the mover list
    Mover(usize),
}

/// First obstacle the player disc at `pos` would overlap, boxes first
pub fn first_blocker(
    pos: Vec2,
    radius: f32,
    boxes: &[Aabb],
    movers: impl IntoIterator<Item = Circle>,
) -> Option<Blocker> {
    if let Some(i) = boxes.iter().position(|b| b.overlaps_disc(pos, radius)) {
        return Some(Blocker::Box(i));
    }
    movers
        .into_iter()
        .position(|c| c.overlaps_disc(pos, radius))
        .map(Blocker::Mover)
}

/// Whether the player disc at `pos` overlaps anything solid
pub fn is_blocked(
    pos: Vec2,
    radius: f32,
    boxes: &[Aabb],
    movers: impl IntoIterator<Item = Circle>,
) -> bool {
    first_blocker(pos, radius, boxes, movers).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MOVER_RADIUS, PLAYER_RADIUS};

    fn unit_box() -> Aabb {
        Aabb::from_size(Vec2::ZERO, Vec2::new(2.0, 2.0))
    }

    #[test]
    fn test_box_overlap_needs_both_axes() {
        let b = unit_box();
        assert!(b.overlaps_disc(Vec2::new(1.2, 0.0), PLAYER_RADIUS));
        // x overlaps but z is far away
        assert!(!b.overlaps_disc(Vec2::new(1.2, 5.0), PLAYER_RADIUS));
        // z overlaps but x is far away
        assert!(!b.overlaps_disc(Vec2::new(5.0, 0.3), PLAYER_RADIUS));
    }

    #[test]
    fn test_box_edge_contact_is_not_blocked() {
        let b = unit_box();
        // Player edge exactly on the box face
        assert!(!b.overlaps_disc(Vec2::new(1.5, 0.0), PLAYER_RADIUS));
        assert!(b.overlaps_disc(Vec2::new(1.499, 0.0), PLAYER_RADIUS));
    }

    #[test]
    fn test_circle_boundary_is_exclusive() {
        let mover = Circle::new(Vec2::ZERO, MOVER_RADIUS);
        let sum = MOVER_RADIUS + PLAYER_RADIUS;
        assert!(!mover.overlaps_disc(Vec2::new(sum, 0.0), PLAYER_RADIUS));
        assert!(mover.overlaps_disc(Vec2::new(sum - 0.01, 0.0), PLAYER_RADIUS));
    }

    #[test]
    fn test_first_blocker_reports_source() {
        let boxes = [
            Aabb::from_size(Vec2::new(10.0, 0.0), Vec2::ONE),
            unit_box(),
        ];
        let movers = [Circle::new(Vec2::new(-5.0, 0.0), MOVER_RADIUS)];

        assert_eq!(
            first_blocker(Vec2::new(0.5, 0.0), PLAYER_RADIUS, &boxes, movers),
            Some(Blocker::Box(1))
        );
        assert_eq!(
            first_blocker(Vec2::new(-5.5, 0.0), PLAYER_RADIUS, &boxes, movers),
            Some(Blocker::Mover(0))
        );
        assert!(!is_blocked(Vec2::new(5.0, 5.0), PLAYER_RADIUS, &boxes, movers));
    }

    #[test]
    fn test_negative_extents_normalized() {
        let b = Aabb::new(Vec2::ZERO, Vec2::new(-1.0, -1.0));
        assert_eq!(b.half_extents, Vec2::ONE);
    }
}
