//! Scene to vertex list
//!
//! Walks the scene arena in insertion order (ground, walls, blocks, movers,
//! pickups, player) which doubles as painter's order.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::{CollectibleKind, GameState, NodeKind};

const CIRCLE_SEGMENTS: u32 = 24;
/// Grid spacing drawn on the ground
const GRID_STEP: f32 = 2.0;
/// Pickup spin (radians/s)
const PICKUP_SPIN: f32 = 1.5;
/// Blocks at or above this height draw in the lighter shade
const TALL_BLOCK: f32 = 2.0;

/// World-space vertices for the current frame
pub fn scene_vertices(state: &GameState, time: f32) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for (_, node) in state.scene.iter() {
        match node.kind {
            NodeKind::Ground { size } => {
                vertices.extend(shapes::rect(node.pos, size, colors::GROUND));
                ground_grid(&mut vertices, node.pos, size);
            }
            NodeKind::Wall { size, .. } => {
                vertices.extend(shapes::rect(node.pos, size, colors::WALL));
            }
            NodeKind::Block { size, height } => {
                let color = if height >= TALL_BLOCK {
                    colors::BLOCK_TALL
                } else {
                    colors::BLOCK
                };
                vertices.extend(shapes::rect(node.pos, size, color));
            }
            NodeKind::Mover { radius } => {
                vertices.extend(shapes::circle(node.pos, radius, colors::MOVER, CIRCLE_SEGMENTS));
                vertices.extend(shapes::ring(
                    node.pos,
                    radius * 0.8,
                    radius,
                    colors::MOVER_RING,
                    CIRCLE_SEGMENTS,
                ));
            }
            NodeKind::Pickup { kind } => {
                let spin = time * PICKUP_SPIN;
                match kind {
                    CollectibleKind::Triangle => vertices.extend(shapes::polygon(
                        node.pos,
                        0.45,
                        spin,
                        colors::PICKUP_TRIANGLE,
                        3,
                    )),
                    CollectibleKind::Cylinder => {
                        vertices.extend(shapes::circle(
                            node.pos,
                            0.35,
                            colors::PICKUP_CYLINDER,
                            CIRCLE_SEGMENTS,
                        ));
                        // Pulse the rim so cylinders read as spinning too
                        let rim = 0.4 + 0.05 * spin.sin();
                        vertices.extend(shapes::ring(
                            node.pos,
                            rim,
                            rim + 0.08,
                            colors::PICKUP_CYLINDER,
                            CIRCLE_SEGMENTS,
                        ));
                    }
                }
            }
            NodeKind::Player { radius } => {
                vertices.extend(shapes::circle(node.pos, radius, colors::PLAYER, CIRCLE_SEGMENTS));
                player_stripe(&mut vertices, node.pos, radius, state.player.roll);
            }
        }
    }

    vertices
}

fn ground_grid(out: &mut Vec<Vertex>, center: Vec2, size: Vec2) {
    let half = size * 0.5;
    let mut x = center.x - half.x + GRID_STEP;
    while x < center.x + half.x {
        out.extend(shapes::line(
            Vec2::new(x, center.y - half.y),
            Vec2::new(x, center.y + half.y),
            0.05,
            colors::GROUND_GRID,
        ));
        x += GRID_STEP;
    }
    let mut z = center.y - half.y + GRID_STEP;
    while z < center.y + half.y {
        out.extend(shapes::line(
            Vec2::new(center.x - half.x, z),
            Vec2::new(center.x + half.x, z),
            0.05,
            colors::GROUND_GRID,
        ));
        z += GRID_STEP;
    }
}

/// A band across the ball that slides with the accumulated roll
fn player_stripe(out: &mut Vec<Vertex>, center: Vec2, radius: f32, roll: Vec2) {
    let offset = Vec2::new(roll.x.sin(), roll.y.sin()) * radius * 0.6;
    out.extend(shapes::circle(
        center + offset,
        radius * 0.3,
        colors::PLAYER_STRIPE,
        12,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_color(vertices: &[Vertex], color: [f32; 4]) -> bool {
        vertices.iter().any(|v| v.color == color)
    }

    #[test]
    fn test_every_layer_is_drawn() {
        let state = GameState::new(9);
        let verts = scene_vertices(&state, 0.0);
        assert_eq!(verts.len() % 3, 0);
        assert!(has_color(&verts, colors::GROUND));
        assert!(has_color(&verts, colors::WALL));
        assert!(has_color(&verts, colors::MOVER));
        assert!(has_color(&verts, colors::PLAYER));
    }

    #[test]
    fn test_collected_pickups_disappear() {
        let mut state = GameState::new(1);
        let before = scene_vertices(&state, 0.0).len();
        for i in 0..state.collectibles.len() {
            state.collect(i);
        }
        let verts = scene_vertices(&state, 0.0);
        assert!(verts.len() < before);
        assert!(!has_color(&verts, colors::PICKUP_TRIANGLE));
        assert!(!has_color(&verts, colors::PICKUP_CYLINDER));
    }
}
