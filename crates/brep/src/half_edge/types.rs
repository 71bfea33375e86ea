//! Type definitions for the half-edge mesh data structure.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::MAX_VERTEX_VALENCE;

/// Type-safe vertex identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u32);

/// Type-safe half-edge identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HalfEdgeId(pub u32);

/// Type-safe face identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaceId(pub u32);

impl VertexId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl HalfEdgeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FaceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Half-edge references kept inline on a vertex, bounded by the valence limit
pub type EdgeList = SmallVec<[HalfEdgeId; MAX_VERTEX_VALENCE]>;

/// A vertex in the half-edge mesh
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    /// Mutable during editing; faces keep the plane computed at construction
    pub position: Vec3,
    /// Every half-edge whose origin is this vertex
    pub(crate) outgoing: EdgeList,
    /// Every half-edge whose end is this vertex
    pub(crate) incoming: EdgeList,
}

impl Vertex {
    pub(crate) fn new(id: VertexId, position: Vec3) -> Self {
        Self {
            id,
            position,
            outgoing: EdgeList::new(),
            incoming: EdgeList::new(),
        }
    }

    /// Half-edges leaving this vertex, in construction order
    pub fn outgoing_half_edges(&self) -> &[HalfEdgeId] {
        &self.outgoing
    }

    /// Half-edges arriving at this vertex, in construction order
    pub fn incoming_half_edges(&self) -> &[HalfEdgeId] {
        &self.incoming
    }

    /// True if no face uses this vertex yet
    pub fn is_isolated(&self) -> bool {
        self.outgoing.is_empty() && self.incoming.is_empty()
    }
}

/// A half-edge in the mesh
///
/// Each interior edge is represented by two half-edges pointing in opposite
/// directions; boundary edges have a single half-edge with no twin.
#[derive(Debug, Clone)]
pub struct HalfEdge {
    pub id: HalfEdgeId,
    /// The vertex this half-edge originates from
    pub origin: VertexId,
    /// The vertex this half-edge points to
    pub end: VertexId,
    /// The opposite half-edge (None for boundary edges)
    pub twin: Option<HalfEdgeId>,
    /// The next half-edge around the face (same winding)
    pub next: HalfEdgeId,
    /// The previous half-edge around the face
    pub prev: HalfEdgeId,
    /// The face this half-edge borders
    pub face: FaceId,
}

/// A planar polygon in the mesh
#[derive(Debug, Clone)]
pub struct Face {
    pub id: FaceId,
    /// Entry point for walking the boundary cycle
    pub half_edge: HalfEdgeId,
    /// Render color (RGBA)
    pub color: Vec4,
    /// Unit normal computed at construction
    pub normal: Vec3,
    /// Plane offset: `normal.dot(p) + offset == 0` on the face plane
    pub offset: f32,
}

impl Face {
    /// Signed distance of `point` from the face plane
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.offset
    }
}

/// Errors that can occur during half-edge mesh operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HalfEdgeError {
    #[error("Vertex table is full ({capacity} vertices)")]
    VertexCapacity { capacity: usize },
    #[error("Half-edge table cannot fit {requested} more half-edges ({available} slots left)")]
    HalfEdgeCapacity { requested: usize, available: usize },
    #[error("Face table is full ({capacity} faces)")]
    FaceCapacity { capacity: usize },
    #[error("Vertex {0:?} does not exist")]
    InvalidVertex(VertexId),
    #[error("Face {0:?} does not exist")]
    InvalidFace(FaceId),
    #[error("Invalid mesh topology: {0}")]
    InvalidTopology(String),
}
