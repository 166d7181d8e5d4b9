//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    polygon(center, radius, 0.0, color, segments)
}

/// Regular polygon with the first corner at `rotation`
pub fn polygon(
    center: Vec2,
    radius: f32,
    rotation: f32,
    color: [f32; 4],
    sides: u32,
) -> Vec<Vertex> {
    let sides = sides.max(3);
    let mut vertices = Vec::with_capacity((sides * 3) as usize);

    for i in 0..sides {
        let theta1 = rotation + (i as f32 / sides as f32) * 2.0 * PI;
        let theta2 = rotation + ((i + 1) as f32 / sides as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let (sin1, cos1) = theta1.sin_cos();
        let (sin2, cos2) = theta2.sin_cos();
        let inner1 = center + Vec2::new(cos1, sin1) * inner_radius;
        let outer1 = center + Vec2::new(cos1, sin1) * outer_radius;
        let inner2 = center + Vec2::new(cos2, sin2) * inner_radius;
        let outer2 = center + Vec2::new(cos2, sin2) * outer_radius;

        quad(&mut vertices, inner1, outer1, outer2, inner2, color);
    }

    vertices
}

/// Axis-aligned rectangle centered on `center`
pub fn rect(center: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let half = size * 0.5;
    let mut vertices = Vec::with_capacity(6);
    quad(
        &mut vertices,
        center + Vec2::new(-half.x, -half.y),
        center + Vec2::new(half.x, -half.y),
        center + Vec2::new(half.x, half.y),
        center + Vec2::new(-half.x, half.y),
        color,
    );
    vertices
}

/// Thick line segment
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);
    let mut vertices = Vec::with_capacity(6);
    quad(&mut vertices, from + perp, from - perp, to - perp, to + perp, color);
    vertices
}

/// Two triangles for the quad a-b-c-d (in winding order)
fn quad(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));

    out.push(Vertex::new(c.x, c.y, color));
    out.push(Vertex::new(d.x, d.y, color));
    out.push(Vertex::new(a.x, a.y, color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_counts() {
        assert_eq!(circle(Vec2::ZERO, 1.0, [1.0; 4], 16).len(), 48);
        assert_eq!(polygon(Vec2::ZERO, 1.0, 0.0, [1.0; 4], 1).len(), 9);
        assert_eq!(ring(Vec2::ZERO, 0.5, 1.0, [1.0; 4], 8).len(), 48);
        assert_eq!(rect(Vec2::ZERO, Vec2::ONE, [1.0; 4]).len(), 6);
    }

    #[test]
    fn test_rect_bounds() {
        let verts = rect(Vec2::new(2.0, 3.0), Vec2::new(4.0, 2.0), [1.0; 4]);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 0.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 4.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 2.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 4.0);
    }
}
