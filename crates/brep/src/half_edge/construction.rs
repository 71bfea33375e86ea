//! Construction methods for HalfEdgeMesh.

use brep_config::{MeshCapacityConfig, SceneConfig};
use glam::{Vec3, Vec4};
use tracing::{debug, trace, warn};

use super::types::{Face, FaceId, HalfEdge, HalfEdgeError, HalfEdgeId, Vertex, VertexId};
use super::HalfEdgeMesh;
use crate::constants::MAX_VERTEX_VALENCE;

impl HalfEdgeMesh {
    /// Create an empty mesh with the default table capacities
    pub fn new() -> Self {
        Self::with_capacity(MeshCapacityConfig::default())
    }

    /// Create an empty mesh whose tables hold at most the given counts.
    ///
    /// Storage for every table is reserved up front and never grows.
    pub fn with_capacity(capacity: MeshCapacityConfig) -> Self {
        debug!(
            "HalfEdgeMesh: reserving {} vertices, {} half-edges, {} faces",
            capacity.max_vertices, capacity.max_half_edges, capacity.max_faces
        );
        Self {
            vertices: Vec::with_capacity(capacity.max_vertices),
            half_edges: Vec::with_capacity(capacity.max_half_edges),
            faces: Vec::with_capacity(capacity.max_faces),
            capacity,
        }
    }

    /// Create an empty mesh sized from a scene config
    pub fn from_config(config: &SceneConfig) -> Self {
        Self::with_capacity(config.capacity)
    }

    /// Drop every entity. Reserved storage is kept.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.half_edges.clear();
        self.faces.clear();
    }

    /// Append a vertex with the next sequential id.
    ///
    /// Fails without touching the mesh when the vertex table is full.
    pub fn add_vertex(&mut self, position: Vec3) -> Result<VertexId, HalfEdgeError> {
        if self.vertices.len() >= self.capacity.max_vertices {
            return Err(HalfEdgeError::VertexCapacity {
                capacity: self.capacity.max_vertices,
            });
        }

        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Vertex::new(id, position));
        Ok(id)
    }

    /// Build a face from a loop of existing vertices.
    ///
    /// `vertex_loop` lists at least three distinct vertices counter-clockwise
    /// as seen from the face's outward side. One half-edge is allocated per
    /// loop vertex in a contiguous block, linked into a cycle, registered on
    /// its endpoints, and paired with the opposite half-edge of a previously
    /// built face when one exists.
    ///
    /// The plane (normal and offset) is derived from the first, second and
    /// last loop vertices and is not refreshed when vertices move later.
    ///
    /// All capacity and id checks happen before anything is written, so an
    /// error leaves the mesh unchanged.
    ///
    /// An edge already shared by two faces makes a third claimant
    /// non-manifold input. The new half-edge is paired anyway and the old
    /// partner keeps its stale twin, which [`HalfEdgeMesh::validate`] reports.
    pub fn construct_face(
        &mut self,
        vertex_loop: &[VertexId],
        color: Vec4,
    ) -> Result<FaceId, HalfEdgeError> {
        debug_assert!(
            vertex_loop.len() >= 3,
            "face loop needs at least 3 vertices, got {}",
            vertex_loop.len()
        );
        let n = vertex_loop.len();

        let available = self.capacity.max_half_edges - self.half_edges.len();
        if n > available {
            return Err(HalfEdgeError::HalfEdgeCapacity {
                requested: n,
                available,
            });
        }
        if self.faces.len() >= self.capacity.max_faces {
            return Err(HalfEdgeError::FaceCapacity {
                capacity: self.capacity.max_faces,
            });
        }
        if let Some(&missing) = vertex_loop
            .iter()
            .find(|v| v.index() >= self.vertices.len())
        {
            return Err(HalfEdgeError::InvalidVertex(missing));
        }

        // Plane from loop[0], loop[1] and loop[n - 1]
        let start = self.vertices[vertex_loop[0].index()].position;
        let next = self.vertices[vertex_loop[1].index()].position;
        let prev = self.vertices[vertex_loop[n - 1].index()].position;
        let normal = (next - start).cross(prev - start).normalize_or_zero();
        if normal == Vec3::ZERO {
            warn!("construct_face: degenerate loop {:?}, normal is zero", vertex_loop);
        }

        let face_id = FaceId(self.faces.len() as u32);
        let base = self.half_edges.len();
        let block_id = |i: usize| HalfEdgeId((base + i % n) as u32);

        self.faces.push(Face {
            id: face_id,
            half_edge: block_id(0),
            color,
            normal,
            offset: -normal.dot(start),
        });

        for i in 0..n {
            let v0 = vertex_loop[i];
            let v1 = vertex_loop[(i + 1) % n];
            let current = block_id(i);

            self.half_edges.push(HalfEdge {
                id: current,
                origin: v0,
                end: v1,
                twin: None,
                next: block_id(i + 1),
                prev: block_id(i + n - 1),
                face: face_id,
            });

            debug_assert!(
                self.vertices[v0.index()].outgoing.len() < MAX_VERTEX_VALENCE,
                "vertex {v0:?} exceeds {MAX_VERTEX_VALENCE} outgoing half-edges"
            );
            debug_assert!(
                self.vertices[v1.index()].incoming.len() < MAX_VERTEX_VALENCE,
                "vertex {v1:?} exceeds {MAX_VERTEX_VALENCE} incoming half-edges"
            );
            self.vertices[v0.index()].outgoing.push(current);
            self.vertices[v1.index()].incoming.push(current);

            // The opposite half-edge leaves v1 and ends at v0
            let half_edges = &self.half_edges;
            let twin = self.vertices[v1.index()]
                .outgoing
                .iter()
                .copied()
                .find(|candidate| half_edges[candidate.index()].end == v0);

            if let Some(twin) = twin {
                if let Some(previous) = self.half_edges[twin.index()].twin {
                    warn!(
                        "construct_face: non-manifold edge {:?}->{:?} already paired with {:?}, twin links now asymmetric",
                        v1, v0, previous
                    );
                }
                self.half_edges[current.index()].twin = Some(twin);
                self.half_edges[twin.index()].twin = Some(current);
            }
        }

        trace!("construct_face: {:?} with {} half-edges", face_id, n);
        Ok(face_id)
    }
}
