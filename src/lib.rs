//! Roll-a-Ball - roll the sphere, grab every pickup before the clock runs out
//!
//! Core modules:
//! - `sim`: Deterministic simulation (levels, patrol, collisions, outcome)
//! - `audio`: Procedural tones behind an explicitly passed service handle
//! - `renderer`: Top-down WebGPU rendering of the scene arena
//! - `hud`: Pure formatting helpers for the browser HUD
//! - `records`: Best completion times per level
//! - `settings`: Player preferences

pub mod audio;
pub mod hud;
pub mod records;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use audio::{AudioService, SilentAudio, SoundEffect};
pub use records::BestTimes;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
///
/// Distances are world units on the ground plane (x, z), times are seconds.
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player sphere radius
    pub const PLAYER_RADIUS: f32 = 0.5;
    /// Acceleration applied per unit of input (units/s²)
    pub const PLAYER_ACCEL: f32 = 180.0;
    /// Per-tick velocity damping
    pub const PLAYER_FRICTION: f32 = 0.95;
    /// Per-axis velocity clamp (units/s)
    pub const PLAYER_MAX_SPEED: f32 = 18.0;

    /// Patrolling obstacle radius
    pub const MOVER_RADIUS: f32 = 0.8;
    /// Patrolling obstacle speed (units/s)
    pub const MOVER_SPEED: f32 = 1.2;
    /// Distance at which a mover counts as arrived at its waypoint
    pub const PATROL_ARRIVE_EPSILON: f32 = 0.5;

    /// Planar distance under which a pickup is collected
    pub const PICKUP_RADIUS: f32 = 1.0;

    /// Countdown per level
    pub const LEVEL_TIME: f32 = 120.0;
    /// Delay before returning to the menu after a win
    pub const WIN_MENU_DELAY: f32 = 5.0;
    /// Delay before returning to the menu after time runs out
    pub const LOSE_MENU_DELAY: f32 = 3.0;

    /// Boundary wall thickness and height
    pub const WALL_THICKNESS: f32 = 1.0;
    pub const WALL_HEIGHT: f32 = 2.0;
}

/// Planar distance between two ground-plane points
#[inline]
pub fn planar_distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Move `current` toward `target` by at most `max_step`, never overshooting
#[inline]
pub fn move_towards(current: Vec2, target: Vec2, max_step: f32) -> Vec2 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_step || distance == 0.0 {
        target
    } else {
        current + delta / distance * max_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_towards_stops_at_target() {
        let p = move_towards(Vec2::ZERO, Vec2::new(1.0, 0.0), 5.0);
        assert_eq!(p, Vec2::new(1.0, 0.0));

        let p = move_towards(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0);
        assert!((p.x - 2.0).abs() < 1e-6);
        assert_eq!(p.y, 0.0);
    }
}
