//! The rolling player sphere

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PLAYER_ACCEL, PLAYER_FRICTION, PLAYER_MAX_SPEED, PLAYER_RADIUS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Planar velocity (units/s)
    pub vel: Vec2,
    pub spawn: Vec2,
    pub radius: f32,
    /// Accumulated roll angle per axis, for rendering the spin
    #[serde(skip)]
    pub roll: Vec2,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            spawn,
            radius: PLAYER_RADIUS,
            roll: Vec2::ZERO,
        }
    }

    /// Accelerate along `dir` (each axis in -1..=1), then damp and clamp
    pub fn steer(&mut self, dir: Vec2, dt: f32) {
        let dir = dir.clamp(Vec2::NEG_ONE, Vec2::ONE);
        self.vel += dir * PLAYER_ACCEL * dt;
        self.vel *= PLAYER_FRICTION;
        self.vel = self
            .vel
            .clamp(Vec2::splat(-PLAYER_MAX_SPEED), Vec2::splat(PLAYER_MAX_SPEED));
    }

    /// Where the player would be after this tick
    pub fn proposed_position(&self, dt: f32) -> Vec2 {
        self.pos + self.vel * dt
    }

    pub fn commit(&mut self, pos: Vec2) {
        let moved = pos - self.pos;
        self.roll += moved / self.radius;
        self.pos = pos;
    }

    /// Rejected move: stay put and stop dead
    pub fn block(&mut self) {
        self.vel = Vec2::ZERO;
    }

    /// Back to spawn at rest
    pub fn reset(&mut self) {
        self.pos = self.spawn;
        self.vel = Vec2::ZERO;
        self.roll = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_speed_is_clamped_per_axis() {
        let mut player = Player::new(Vec2::ZERO);
        for _ in 0..600 {
            player.steer(Vec2::new(1.0, -1.0), SIM_DT);
        }
        assert!(player.vel.x <= PLAYER_MAX_SPEED);
        assert!(player.vel.y >= -PLAYER_MAX_SPEED);
        assert!(player.vel.x > 0.0 && player.vel.y < 0.0);
    }

    #[test]
    fn test_friction_brings_player_to_rest() {
        let mut player = Player::new(Vec2::ZERO);
        player.vel = Vec2::new(10.0, 0.0);
        for _ in 0..600 {
            player.steer(Vec2::ZERO, SIM_DT);
        }
        assert!(player.vel.length() < 1e-3);
    }

    #[test]
    fn test_oversized_input_is_clamped() {
        let mut a = Player::new(Vec2::ZERO);
        let mut b = Player::new(Vec2::ZERO);
        a.steer(Vec2::new(5.0, 0.0), SIM_DT);
        b.steer(Vec2::new(1.0, 0.0), SIM_DT);
        assert_eq!(a.vel, b.vel);
    }

    #[test]
    fn test_reset_returns_to_spawn() {
        let mut player = Player::new(Vec2::new(1.0, 2.0));
        player.steer(Vec2::ONE, SIM_DT);
        let next = player.proposed_position(SIM_DT);
        player.commit(next);
        assert_ne!(player.pos, player.spawn);

        player.reset();
        assert_eq!(player.pos, Vec2::new(1.0, 2.0));
        assert_eq!(player.vel, Vec2::ZERO);
    }
}
