//! Waypoint patrol for moving obstacles
//!
//! A mover walks its path at constant speed, turns around at either end and
//! optionally waits there before heading back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PATROL_ARRIVE_EPSILON;
use crate::move_towards;

/// Travel direction along the waypoint list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Patrol state of a single mover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    pub waypoints: Vec<Vec2>,
    /// Index of the waypoint currently being approached
    pub target: usize,
    pub direction: Direction,
    /// Units per second
    pub speed: f32,
    /// Wait at each end of the path (seconds, 0 = none)
    pub pause: f32,
    /// Remaining wait
    pub wait: f32,
}

impl Patrol {
    pub fn new(waypoints: Vec<Vec2>, speed: f32, pause: f32) -> Self {
        Self {
            waypoints,
            target: 0,
            direction: Direction::Forward,
            speed,
            pause: pause.max(0.0),
            wait: 0.0,
        }
    }

    /// Starting position (first waypoint)
    pub fn start(&self) -> Vec2 {
        self.waypoints.first().copied().unwrap_or(Vec2::ZERO)
    }

    /// Rewind to the initial patrol state and return the start position
    pub fn reset(&mut self) -> Vec2 {
        self.target = 0;
        self.direction = Direction::Forward;
        self.wait = 0.0;
        self.start()
    }

    /// Advance one tick. Returns true when the mover turned around.
    pub fn advance(&mut self, pos: &mut Vec2, dt: f32) -> bool {
        if self.waypoints.len() < 2 {
            return false;
        }

        if self.wait > 0.0 {
            self.wait = (self.wait - dt).max(0.0);
            return false;
        }

        let target = self.waypoints[self.target];
        if pos.distance(target) < PATROL_ARRIVE_EPSILON {
            return self.next_waypoint();
        }

        *pos = move_towards(*pos, target, self.speed * dt);
        false
    }

    /// Step the target index; clamp and flip at either boundary
    fn next_waypoint(&mut self) -> bool {
        let last = self.waypoints.len() as isize - 1;
        let next = self.target as isize + self.direction.step();

        if (0..=last).contains(&next) {
            self.target = next as usize;
            return false;
        }

        self.target = next.clamp(0, last) as usize;
        self.direction = self.direction.flipped();
        self.wait = self.pause;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn two_point() -> Patrol {
        Patrol::new(vec![Vec2::ZERO, Vec2::new(2.0, 0.0)], 1.2, 0.0)
    }

    #[test]
    fn test_single_point_path_is_noop() {
        let mut patrol = Patrol::new(vec![Vec2::new(3.0, 4.0)], 1.2, 0.0);
        let mut pos = Vec2::new(3.0, 4.0);
        for _ in 0..100 {
            assert!(!patrol.advance(&mut pos, SIM_DT));
        }
        assert_eq!(pos, Vec2::new(3.0, 4.0));
        assert_eq!(patrol.target, 0);

        let mut empty = Patrol::new(Vec::new(), 1.2, 0.0);
        let mut pos = Vec2::ONE;
        assert!(!empty.advance(&mut pos, SIM_DT));
        assert_eq!(pos, Vec2::ONE);
    }

    #[test]
    fn test_two_point_patrol_bounces() {
        let mut patrol = two_point();
        let mut pos = patrol.start();
        let mut flips = Vec::new();

        for _ in 0..(60 * 10) {
            if patrol.advance(&mut pos, SIM_DT) {
                flips.push(patrol.target);
            }
            assert!(pos.x >= -1e-4 && pos.x <= 2.0 + 1e-4);
        }

        // Alternates far end, near end, far end...
        assert!(flips.len() >= 3);
        for pair in flips.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_constant_speed_step() {
        let mut patrol = Patrol::new(vec![Vec2::ZERO, Vec2::new(10.0, 0.0)], 1.2, 0.0);
        let mut pos = patrol.start();
        // First tick arrives at waypoint 0 and retargets
        patrol.advance(&mut pos, SIM_DT);
        assert_eq!(patrol.target, 1);
        let before = pos;
        patrol.advance(&mut pos, SIM_DT);
        assert!((pos.distance(before) - 1.2 * SIM_DT).abs() < 1e-5);
    }

    #[test]
    fn test_pause_at_each_end() {
        let mut patrol = Patrol::new(vec![Vec2::ZERO, Vec2::new(1.0, 0.0)], 1.2, 0.5);
        let mut pos = patrol.start();

        let mut ticks = 0;
        while !patrol.advance(&mut pos, SIM_DT) {
            ticks += 1;
            assert!(ticks < 10_000);
        }
        assert!((patrol.wait - 0.5).abs() < 1e-6);

        let held = pos;
        for _ in 0..29 {
            patrol.advance(&mut pos, SIM_DT);
        }
        assert_eq!(pos, held);
        assert!(patrol.wait > 0.0);
    }

    #[test]
    fn test_reset_rewinds() {
        let mut patrol = two_point();
        let mut pos = patrol.start();
        for _ in 0..200 {
            patrol.advance(&mut pos, SIM_DT);
        }
        let start = patrol.reset();
        assert_eq!(start, Vec2::ZERO);
        assert_eq!(patrol.target, 0);
        assert_eq!(patrol.direction, Direction::Forward);
    }

    proptest! {
        #[test]
        fn direction_flips_only_at_path_ends(
            points in prop::collection::vec((-20.0f32..20.0, -20.0f32..20.0), 2..6),
            ticks in 1usize..3000,
        ) {
            let waypoints: Vec<Vec2> = points.iter().map(|&(x, z)| Vec2::new(x, z)).collect();
            let last = waypoints.len() - 1;
            let mut patrol = Patrol::new(waypoints, 6.0, 0.0);
            let mut pos = patrol.start();

            for _ in 0..ticks {
                let before_target = patrol.target;
                let before_dir = patrol.direction;
                let would_be = before_target as isize + before_dir.step();
                let arriving = pos.distance(patrol.waypoints[before_target]) < PATROL_ARRIVE_EPSILON;

                let flipped = patrol.advance(&mut pos, SIM_DT);

                let past_end = would_be < 0 || would_be > last as isize;
                prop_assert_eq!(flipped, arriving && past_end);
                prop_assert_eq!(flipped, patrol.direction != before_dir);
                prop_assert!(patrol.target <= last);
            }
        }
    }
}
