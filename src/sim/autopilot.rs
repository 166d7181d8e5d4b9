//! Idle/demo steering
//!
//! Drives the ball toward the nearest pickup still on the board. Used by the
//! headless runner and the browser idle mode; it knows nothing about walls.

use glam::Vec2;

use super::state::GameState;

/// Distance gain of the steering controller
const POSITION_GAIN: f32 = 2.0;
/// Velocity damping of the steering controller
const VELOCITY_GAIN: f32 = 0.25;

/// Nearest uncollected pickup, if any
pub fn nearest_pickup(state: &GameState) -> Option<Vec2> {
    let from = state.player.pos;
    state
        .collectibles
        .iter()
        .filter(|c| !c.collected)
        .map(|c| c.pos)
        .min_by(|a, b| {
            a.distance_squared(from)
                .partial_cmp(&b.distance_squared(from))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Directional input for this tick (each axis in -1..=1)
pub fn steer(state: &GameState) -> Vec2 {
    let Some(target) = nearest_pickup(state) else {
        return Vec2::ZERO;
    };
    let to_target = target - state.player.pos;
    (to_target * POSITION_GAIN - state.player.vel * VELOCITY_GAIN).clamp(Vec2::NEG_ONE, Vec2::ONE)
}
