//! Shape generation for 2D primitives
//!
//! All shapes are in screen space (pixels, y down) and emitted as triangle lists.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};

/// Axis-aligned filled rectangle
pub fn quad(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    rotated_quad(min + size / 2.0, size, 0.0, color)
}

/// Filled rectangle of `size` centered on `center`, rotated by `angle` radians
pub fn rotated_quad(center: Vec2, size: Vec2, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = size / 2.0;
    let rot = Vec2::from_angle(angle);
    let corners = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|c| center + rot.rotate(c));

    // Two triangles
    [0, 1, 2, 0, 2, 3]
        .iter()
        .map(|&i| Vertex::new(corners[i].x, corners[i].y, color))
        .collect()
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

        let inner1 = center + Vec2::from_angle(theta1) * inner_radius;
        let outer1 = center + Vec2::from_angle(theta1) * outer_radius;
        let inner2 = center + Vec2::from_angle(theta2) * inner_radius;
        let outer2 = center + Vec2::from_angle(theta2) * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// A blocky capybara filling a `size` box around `center`, rotated by `angle` radians
///
/// Body, head, snout, ear and eye, all placed in the unrotated box and then
/// spun around the center.
pub fn capybara(center: Vec2, size: Vec2, angle: f32) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle);
    // (offset from center, size) in units of the box
    let parts: [(Vec2, Vec2, [f32; 4]); 6] = [
        // Body
        (Vec2::new(-0.08, 0.05), Vec2::new(0.84, 0.62), colors::FUR),
        // Legs
        (Vec2::new(-0.3, 0.38), Vec2::new(0.14, 0.2), colors::FUR_DARK),
        (Vec2::new(0.18, 0.38), Vec2::new(0.14, 0.2), colors::FUR_DARK),
        // Head
        (Vec2::new(0.3, -0.12), Vec2::new(0.4, 0.42), colors::FUR),
        // Snout
        (Vec2::new(0.45, -0.04), Vec2::new(0.1, 0.2), colors::SNOUT),
        // Eye
        (Vec2::new(0.32, -0.2), Vec2::new(0.07, 0.07), colors::EYE),
    ];

    let mut vertices = Vec::with_capacity(parts.len() * 6 + 6);
    for (offset, part_size, color) in parts {
        let part_center = center + rot.rotate(offset * size);
        vertices.extend(rotated_quad(part_center, part_size * size, angle, color));
    }
    // Ear
    let ear = center + rot.rotate(Vec2::new(0.2, -0.36) * size);
    vertices.extend(rotated_quad(ear, Vec2::new(0.1, 0.1) * size, angle, colors::FUR_DARK));

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        vertices.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), v| {
                let p = Vec2::from(v.position);
                (lo.min(p), hi.max(p))
            },
        )
    }

    #[test]
    fn test_quad_covers_box() {
        let vertices = quad(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), colors::FUR);
        assert_eq!(vertices.len(), 6);
        let (lo, hi) = bounds(&vertices);
        assert!((lo - Vec2::new(10.0, 20.0)).length() < 1e-4);
        assert!((hi - Vec2::new(40.0, 60.0)).length() < 1e-4);
    }

    #[test]
    fn test_rotated_quad_quarter_turn_swaps_extent() {
        let vertices = rotated_quad(Vec2::ZERO, Vec2::new(10.0, 2.0), PI / 2.0, colors::FUR);
        let (lo, hi) = bounds(&vertices);
        assert!((hi.x - lo.x - 2.0).abs() < 1e-4);
        assert!((hi.y - lo.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_capybara_stays_in_its_box() {
        let center = Vec2::new(400.0, 300.0);
        let size = Vec2::splat(45.0);
        let vertices = capybara(center, size, 0.0);
        assert_eq!(vertices.len() % 3, 0);
        let (lo, hi) = bounds(&vertices);
        assert!(lo.x >= center.x - size.x / 2.0 - 1e-3);
        assert!(lo.y >= center.y - size.y / 2.0 - 1e-3);
        assert!(hi.x <= center.x + size.x / 2.0 + 1e-3);
        assert!(hi.y <= center.y + size.y / 2.0 + 1e-3);
    }

    #[test]
    fn test_ring_triangle_count() {
        assert_eq!(ring(Vec2::ZERO, 4.0, 6.0, colors::POINTER, 16).len(), 16 * 6);
    }
}
