//! Colored unit ball geometry.
//!
//! A UV sphere made of two poles and `resolution - 1` latitude rings of
//! `resolution` vertices each. Caps are triangle fans to the poles, the
//! bands between rings are quads split into two triangles. Used for marker
//! geometry (picked vertices, light gizmos) next to the half-edge mesh.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// Index of the north pole vertex
const TOP_VERTEX_INDEX: u32 = 0;
/// Index of the south pole vertex
const BOTTOM_VERTEX_INDEX: u32 = 1;
/// First ring vertex index
const RING_BASE: u32 = 2;

/// Position, color and normal of a ball vertex
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ColoredVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub normal: [f32; 3],
}

impl ColoredVertex {
    fn on_unit_sphere(position: Vec3, color: Vec4) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
            normal: position.to_array(),
        }
    }
}

/// Vertices written by [`generate_ball`] for a resolution
pub const fn ball_vertex_count(resolution: u32) -> u32 {
    let ring_count = resolution - 1;
    ring_count * resolution + 2
}

/// Indices written by [`generate_ball`] for a resolution
pub const fn ball_index_count(resolution: u32) -> u32 {
    let band_count = resolution - 2;
    let triangle_count = resolution * 2 + band_count * resolution * 2;
    triangle_count * 3
}

/// Fill `vertices` and `indices` with a unit ball.
///
/// `resolution` is both the number of segments around the equator and the
/// number of latitude steps from pole to pole; it must be at least 3. The
/// buffers must hold at least [`ball_vertex_count`] and [`ball_index_count`]
/// elements. Triangles wind counter-clockwise seen from outside.
pub fn generate_ball(
    vertices: &mut [ColoredVertex],
    indices: &mut [u32],
    resolution: u32,
    color: Vec4,
) {
    debug_assert!(resolution >= 3, "ball resolution must be at least 3");
    debug_assert!(vertices.len() >= ball_vertex_count(resolution) as usize);
    debug_assert!(indices.len() >= ball_index_count(resolution) as usize);

    let ring_count = resolution - 1;

    let mut vertex_index = 0usize;
    vertices[vertex_index] = ColoredVertex::on_unit_sphere(Vec3::Y, color);
    vertex_index += 1;
    vertices[vertex_index] = ColoredVertex::on_unit_sphere(Vec3::NEG_Y, color);
    vertex_index += 1;

    let delta_yaw = TAU / resolution as f32;
    let delta_pitch = -PI / resolution as f32;

    for ring in 0..ring_count {
        let pitch = PI * 0.5 + delta_pitch * (ring + 1) as f32;
        let (pitch_sin, pitch_cos) = pitch.sin_cos();

        for segment in 0..resolution {
            let yaw = delta_yaw * segment as f32;
            let position = Vec3::new(pitch_cos * yaw.cos(), pitch_sin, pitch_cos * yaw.sin());
            vertices[vertex_index] = ColoredVertex::on_unit_sphere(position, color);
            vertex_index += 1;
        }
    }

    let mut index_index = 0usize;
    let mut push_triangle = |a: u32, b: u32, c: u32| {
        indices[index_index..index_index + 3].copy_from_slice(&[a, b, c]);
        index_index += 3;
    };

    // Caps
    let last_ring = RING_BASE + (ring_count - 1) * resolution;
    for i in 0..resolution {
        let current = RING_BASE + i;
        let next = RING_BASE + (i + 1) % resolution;
        push_triangle(next, current, TOP_VERTEX_INDEX);

        let current = last_ring + i;
        let next = last_ring + (i + 1) % resolution;
        push_triangle(current, next, BOTTOM_VERTEX_INDEX);
    }

    // Bands between consecutive rings
    for band in 0..ring_count - 1 {
        let upper = RING_BASE + band * resolution;
        let lower = upper + resolution;

        for i in 0..resolution {
            let upper_right = upper + i;
            let upper_left = upper + (i + 1) % resolution;
            let lower_right = lower + i;
            let lower_left = lower + (i + 1) % resolution;

            push_triangle(upper_left, lower_left, lower_right);
            push_triangle(upper_left, lower_right, upper_right);
        }
    }
}
