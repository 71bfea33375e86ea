//! Half-edge boundary-representation mesh core
//!
//! This crate provides the mesh data structure and the algorithms that run
//! on it every frame:
//! - [`arena`] - Bump allocator over caller-provided memory
//! - [`half_edge`] - Half-edge mesh store with fixed-capacity tables
//! - [`geometry`] - Linearization into a triangle list with topology tags
//! - [`raycast`] - Nearest face / nearest vertex picking
//! - [`ball`] - Colored unit ball geometry
//! - [`primitives`] - Quads, grids and cubes built from vertex loops
//! - [`camera`] - Fly camera and viewport rays
//! - [`edit`] - Per-frame input state, selection and nudge editing

pub mod arena;
pub mod ball;
pub mod camera;
pub mod constants;
pub mod edit;
pub mod geometry;
pub mod half_edge;
pub mod primitives;
pub mod raycast;

pub use arena::*;
pub use ball::*;
pub use camera::*;
pub use constants::*;
pub use edit::*;
pub use geometry::*;
pub use half_edge::*;
pub use primitives::*;
pub use raycast::*;
