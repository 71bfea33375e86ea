//! Accessor, topology query and position editing methods for HalfEdgeMesh.

use brep_config::MeshCapacityConfig;
use glam::Vec3;

use super::types::{Face, FaceId, HalfEdge, HalfEdgeError, HalfEdgeId, Vertex, VertexId};
use super::HalfEdgeMesh;

/// Iterator over the half-edges of one face, starting at its entry half-edge.
///
/// The walk follows `next` and stops once an edge ends at the loop's start
/// vertex, so the face's vertex count is discovered from the cycle itself.
#[derive(Debug, Clone)]
pub struct FaceLoop<'a> {
    mesh: &'a HalfEdgeMesh,
    current: Option<HalfEdgeId>,
    start_vertex: VertexId,
}

impl<'a> Iterator for FaceLoop<'a> {
    type Item = &'a HalfEdge;

    fn next(&mut self) -> Option<Self::Item> {
        let he = self.mesh.half_edge(self.current?)?;
        self.current = if he.end == self.start_vertex {
            None
        } else {
            Some(he.next)
        };
        Some(he)
    }
}

impl HalfEdgeMesh {
    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get vertex by ID
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    /// Get mutable vertex by ID
    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(id.index())
    }

    /// Get half-edge by ID
    pub fn half_edge(&self, id: HalfEdgeId) -> Option<&HalfEdge> {
        self.half_edges.get(id.index())
    }

    /// Get face by ID
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.index())
    }

    /// Get all vertices
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Get all half-edges
    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    /// Get all faces
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of half-edges
    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Fixed table capacities
    pub fn capacity(&self) -> MeshCapacityConfig {
        self.capacity
    }

    /// Number of edges (each edge has two half-edges, boundary edges have one)
    pub fn edge_count(&self) -> usize {
        let paired = self.half_edges.iter().filter(|he| he.twin.is_some()).count();
        let boundary = self.half_edges.len() - paired;
        paired / 2 + boundary
    }

    // ========================================================================
    // Topology Queries
    // ========================================================================

    /// Walk the boundary of a face. Empty if the face does not exist.
    pub fn face_loop(&self, face_id: FaceId) -> FaceLoop<'_> {
        let entry = self.face(face_id).map(|f| f.half_edge);
        let start_vertex = entry
            .and_then(|he| self.half_edge(he))
            .map(|he| he.origin)
            .unwrap_or(VertexId(u32::MAX));
        FaceLoop {
            mesh: self,
            current: entry,
            start_vertex,
        }
    }

    /// Get the vertices of a face in winding order
    pub fn face_vertices(&self, face_id: FaceId) -> Vec<VertexId> {
        self.face_loop(face_id).map(|he| he.origin).collect()
    }

    /// Get the half-edges forming the boundary of a face
    pub fn face_half_edges(&self, face_id: FaceId) -> Vec<HalfEdgeId> {
        self.face_loop(face_id).map(|he| he.id).collect()
    }

    /// Number of vertices (equivalently half-edges) around a face
    pub fn face_vertex_count(&self, face_id: FaceId) -> usize {
        self.face_loop(face_id).count()
    }

    /// Average of the face's vertex positions
    pub fn face_centroid(&self, face_id: FaceId) -> Option<Vec3> {
        let (sum, count) = self
            .face_loop(face_id)
            .filter_map(|he| self.vertex(he.origin))
            .fold((Vec3::ZERO, 0usize), |(sum, count), v| {
                (sum + v.position, count + 1)
            });
        (count > 0).then(|| sum / count as f32)
    }

    /// Get the destination vertex of a half-edge
    pub fn half_edge_dest(&self, he_id: HalfEdgeId) -> Option<VertexId> {
        self.half_edge(he_id).map(|he| he.end)
    }

    /// Find a half-edge by its origin and destination vertices
    pub fn find_half_edge(&self, from: VertexId, to: VertexId) -> Option<HalfEdgeId> {
        self.vertex(from)?
            .outgoing
            .iter()
            .copied()
            .find(|&he| self.half_edges[he.index()].end == to)
    }

    /// Get all faces using a vertex, in construction order
    pub fn vertex_faces(&self, vertex_id: VertexId) -> Vec<FaceId> {
        let Some(vertex) = self.vertex(vertex_id) else {
            return Vec::new();
        };
        vertex
            .outgoing
            .iter()
            .map(|he| self.half_edges[he.index()].face)
            .collect()
    }

    /// Get all faces sharing an edge with the given face
    pub fn adjacent_faces(&self, face_id: FaceId) -> Vec<FaceId> {
        let mut faces = Vec::new();
        for he in self.face_loop(face_id) {
            if let Some(twin) = he.twin.and_then(|t| self.half_edge(t)) {
                if !faces.contains(&twin.face) {
                    faces.push(twin.face);
                }
            }
        }
        faces
    }

    /// Check if a half-edge is on the boundary (has no twin)
    pub fn is_boundary_half_edge(&self, he_id: HalfEdgeId) -> bool {
        self.half_edge(he_id)
            .map(|he| he.twin.is_none())
            .unwrap_or(true)
    }

    /// All half-edges without a twin
    pub fn boundary_half_edges(&self) -> Vec<HalfEdgeId> {
        self.half_edges
            .iter()
            .filter(|he| he.twin.is_none())
            .map(|he| he.id)
            .collect()
    }

    // ========================================================================
    // Position Editing
    // ========================================================================

    /// Move a vertex. Face planes keep their construction-time values.
    pub fn set_vertex_position(
        &mut self,
        vertex_id: VertexId,
        position: Vec3,
    ) -> Result<(), HalfEdgeError> {
        let vertex = self
            .vertex_mut(vertex_id)
            .ok_or(HalfEdgeError::InvalidVertex(vertex_id))?;
        vertex.position = position;
        Ok(())
    }

    /// Displace a vertex by `delta`
    pub fn translate_vertex(&mut self, vertex_id: VertexId, delta: Vec3) -> Result<(), HalfEdgeError> {
        let vertex = self
            .vertex_mut(vertex_id)
            .ok_or(HalfEdgeError::InvalidVertex(vertex_id))?;
        vertex.position += delta;
        Ok(())
    }

    /// Displace every vertex of a face by `delta`
    pub fn translate_face(&mut self, face_id: FaceId, delta: Vec3) -> Result<(), HalfEdgeError> {
        if self.face(face_id).is_none() {
            return Err(HalfEdgeError::InvalidFace(face_id));
        }
        for vertex_id in self.face_vertices(face_id) {
            self.translate_vertex(vertex_id, delta)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn triangle_pair() -> (HalfEdgeMesh, [VertexId; 4], FaceId, FaceId) {
        let mut mesh = HalfEdgeMesh::new();
        let v = [
            mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0)).unwrap(),
            mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0)).unwrap(),
            mesh.add_vertex(Vec3::new(0.0, 0.0, 1.0)).unwrap(),
            mesh.add_vertex(Vec3::new(1.0, 0.0, 1.0)).unwrap(),
        ];
        let a = mesh.construct_face(&[v[0], v[2], v[1]], Vec4::ONE).unwrap();
        let b = mesh.construct_face(&[v[1], v[2], v[3]], Vec4::ONE).unwrap();
        (mesh, v, a, b)
    }

    #[test]
    fn test_face_loop_visits_each_edge_once() {
        let (mesh, v, a, _) = triangle_pair();
        assert_eq!(mesh.face_vertices(a), vec![v[0], v[2], v[1]]);
        assert_eq!(mesh.face_vertex_count(a), 3);
        assert_eq!(mesh.face_half_edges(a).len(), 3);
    }

    #[test]
    fn test_face_loop_of_missing_face_is_empty() {
        let (mesh, _, _, _) = triangle_pair();
        assert_eq!(mesh.face_loop(FaceId(42)).count(), 0);
        assert!(mesh.face_centroid(FaceId(42)).is_none());
    }

    #[test]
    fn test_adjacent_faces_through_shared_edge() {
        let (mesh, _, a, b) = triangle_pair();
        assert_eq!(mesh.adjacent_faces(a), vec![b]);
        assert_eq!(mesh.adjacent_faces(b), vec![a]);
    }

    #[test]
    fn test_find_half_edge_and_dest() {
        let (mesh, v, _, _) = triangle_pair();
        let he = mesh.find_half_edge(v[2], v[1]).unwrap();
        assert_eq!(mesh.half_edge_dest(he), Some(v[1]));
        assert!(!mesh.is_boundary_half_edge(he));
        assert!(mesh.find_half_edge(v[0], v[3]).is_none());
    }

    #[test]
    fn test_face_centroid() {
        let (mesh, _, a, _) = triangle_pair();
        let centroid = mesh.face_centroid(a).unwrap();
        assert!((centroid - Vec3::new(1.0 / 3.0, 0.0, 1.0 / 3.0)).length() < 1e-6);
    }

    #[test]
    fn test_translate_face_keeps_stale_plane() {
        let (mut mesh, v, a, _) = triangle_pair();
        let before = mesh.face(a).unwrap().offset;

        mesh.translate_face(a, Vec3::new(0.0, 0.5, 0.0)).unwrap();

        assert_eq!(mesh.vertex(v[0]).unwrap().position, Vec3::new(0.0, 0.5, 0.0));
        // Shared vertices move for the neighbor too
        assert_eq!(mesh.vertex(v[1]).unwrap().position, Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(mesh.vertex(v[3]).unwrap().position, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(mesh.face(a).unwrap().offset, before);
    }

    #[test]
    fn test_editing_unknown_ids_fails() {
        let (mut mesh, _, _, _) = triangle_pair();
        assert_eq!(
            mesh.set_vertex_position(VertexId(99), Vec3::ZERO),
            Err(HalfEdgeError::InvalidVertex(VertexId(99)))
        );
        assert_eq!(
            mesh.translate_face(FaceId(7), Vec3::Y),
            Err(HalfEdgeError::InvalidFace(FaceId(7)))
        );
    }
}
