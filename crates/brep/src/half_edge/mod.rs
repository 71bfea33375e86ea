//! Half-edge mesh data structure for B-rep polygon meshes
//!
//! Vertices, half-edges and faces live in three fixed-capacity tables owned
//! by [`HalfEdgeMesh`]. All cross references are typed slot indices, so the
//! whole mesh is plain relocatable data. Entities are only ever appended;
//! editing moves vertex positions but never changes topology.

mod construction;
mod topology;
mod types;
mod validation;

pub use brep_config::MeshCapacityConfig;
pub use topology::FaceLoop;
pub use types::{EdgeList, Face, FaceId, HalfEdge, HalfEdgeError, HalfEdgeId, Vertex, VertexId};

/// Half-edge mesh data structure
///
/// Table capacities are fixed at creation; construction fails cleanly
/// instead of growing storage.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) half_edges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,
    pub(crate) capacity: MeshCapacityConfig,
}

impl Default for HalfEdgeMesh {
    fn default() -> Self {
        Self::new()
    }
}
