//! Shared constants for the mesh core

/// Maximum number of outgoing (and, separately, incoming) half-edges per vertex
pub const MAX_VERTEX_VALENCE: usize = 16;

/// Sentinel id written for "nothing selected" in highlight uniforms
pub const ID_NONE: u32 = u32::MAX;

/// Ray-plane dot products with a smaller magnitude count as parallel
pub const RAY_PARALLEL_EPSILON: f32 = 1e-4;
