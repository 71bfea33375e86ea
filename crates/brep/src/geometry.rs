//! Linearization of the half-edge mesh into a renderable triangle list.
//!
//! Every face is emitted as its own vertex fan (no vertex sharing across
//! faces) so that each output vertex can carry the flat face normal, the
//! face color and the topology tags the fragment stage uses to highlight a
//! picked vertex or face.
//!
//! Output buffers are caller-provided. Use the required-count queries to
//! size them before calling [`HalfEdgeMesh::generate_geometry`], or let
//! [`HalfEdgeMesh::generate_geometry_in`] carve them out of an [`Arena`].

use bytemuck::{Pod, Zeroable};
use tracing::trace;

use crate::arena::{Arena, ArenaError};
use crate::half_edge::HalfEdgeMesh;

/// One linearized vertex, laid out for direct GPU upload
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct GeometryVertex {
    pub position: [f32; 3],
    /// Face normal, identical for every vertex of a face
    pub normal: [f32; 3],
    /// Face color (RGBA)
    pub color: [f32; 4],
    /// Id of the mesh vertex this output vertex came from
    pub vertex_id: u32,
    /// Id of the face this output vertex belongs to
    pub face_id: u32,
}

/// Number of elements written by a geometry pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometryCounts {
    pub vertices: usize,
    pub indices: usize,
}

/// Vertex and index buffers allocated from an arena and filled
#[derive(Debug)]
pub struct GeometryBuffers<'a> {
    pub vertices: &'a mut [GeometryVertex],
    pub indices: &'a mut [u32],
}

impl GeometryBuffers<'_> {
    /// Raw bytes of the vertex buffer
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&*self.vertices)
    }

    /// Raw bytes of the index buffer
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&*self.indices)
    }
}

impl HalfEdgeMesh {
    /// Output vertices needed by [`HalfEdgeMesh::generate_geometry`].
    ///
    /// Each face emits one vertex per loop vertex, and each face owns one
    /// half-edge per loop vertex, so this is the half-edge count.
    pub fn required_geometry_vertex_count(&self) -> usize {
        self.half_edge_count()
    }

    /// Output indices needed by [`HalfEdgeMesh::generate_geometry`].
    ///
    /// An N-gon fans into N - 2 triangles.
    pub fn required_geometry_index_count(&self) -> usize {
        3 * (self.half_edge_count() - 2 * self.face_count())
    }

    /// Write a fan-triangulated triangle list for every face.
    ///
    /// Writing past either slice is a precondition violation and panics;
    /// size the slices with the required-count queries.
    pub fn generate_geometry(
        &self,
        vertices: &mut [GeometryVertex],
        indices: &mut [u32],
    ) -> GeometryCounts {
        let mut vertex_index = 0usize;
        let mut index_index = 0usize;

        for face in self.faces() {
            let start_vertex_index = vertex_index;

            for he in self.face_loop(face.id) {
                debug_assert!(
                    vertex_index < vertices.len(),
                    "vertex buffer too small ({} slots)",
                    vertices.len()
                );
                let position = self.vertices[he.origin.index()].position;
                vertices[vertex_index] = GeometryVertex {
                    position: position.to_array(),
                    normal: face.normal.to_array(),
                    color: face.color.to_array(),
                    vertex_id: he.origin.0,
                    face_id: face.id.0,
                };
                vertex_index += 1;
            }

            // Fan from the first emitted vertex: (v0, v1, vi), then v1 = vi
            let v0 = start_vertex_index as u32;
            let mut v1 = v0 + 1;
            for vi in (start_vertex_index + 2)..vertex_index {
                debug_assert!(
                    index_index + 3 <= indices.len(),
                    "index buffer too small ({} slots)",
                    indices.len()
                );
                let vi = vi as u32;
                indices[index_index..index_index + 3].copy_from_slice(&[v0, v1, vi]);
                index_index += 3;
                v1 = vi;
            }
        }

        trace!(
            "generate_geometry: {} vertices, {} indices from {} faces",
            vertex_index,
            index_index,
            self.face_count()
        );

        GeometryCounts {
            vertices: vertex_index,
            indices: index_index,
        }
    }

    /// Size, allocate and fill geometry buffers from an arena.
    ///
    /// Returns an error when the arena cannot hold both buffers. In that
    /// case nothing is allocated and the mesh is never walked.
    pub fn generate_geometry_in<'a>(
        &self,
        arena: &mut Arena<'a>,
    ) -> Result<GeometryBuffers<'a>, ArenaError> {
        let vertex_count = self.required_geometry_vertex_count();
        let index_count = self.required_geometry_index_count();
        let vertex_bytes = vertex_count * std::mem::size_of::<GeometryVertex>();
        let index_bytes = index_count * std::mem::size_of::<u32>();

        if !arena.can_allocate_all(&[
            (vertex_bytes, std::mem::align_of::<GeometryVertex>()),
            (index_bytes, std::mem::align_of::<u32>()),
        ]) {
            return Err(ArenaError::OutOfMemory {
                requested: vertex_bytes + index_bytes,
                remaining: arena.remaining(),
            });
        }

        let vertices = arena.try_allocate_slice::<GeometryVertex>(vertex_count)?;
        let indices = arena.try_allocate_slice::<u32>(index_count)?;

        let counts = self.generate_geometry(vertices, indices);
        debug_assert_eq!(counts.vertices, vertices.len());
        debug_assert_eq!(counts.indices, indices.len());

        Ok(GeometryBuffers { vertices, indices })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::half_edge::{FaceId, VertexId};
    use glam::{Vec3, Vec4};

    const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
    const BLUE: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);

    fn unit_quad() -> HalfEdgeMesh {
        let mut mesh = HalfEdgeMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0)).unwrap();
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let c = mesh.add_vertex(Vec3::new(1.0, 1.0, 0.0)).unwrap();
        let d = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        mesh.construct_face(&[a, b, c, d], RED).unwrap();
        mesh
    }

    fn buffers_for(mesh: &HalfEdgeMesh) -> (Vec<GeometryVertex>, Vec<u32>) {
        (
            vec![GeometryVertex::zeroed(); mesh.required_geometry_vertex_count()],
            vec![0; mesh.required_geometry_index_count()],
        )
    }

    #[test]
    fn test_quad_emits_four_vertices_two_triangles() {
        let mesh = unit_quad();
        let (mut vertices, mut indices) = buffers_for(&mesh);

        let counts = mesh.generate_geometry(&mut vertices, &mut indices);

        assert_eq!(counts, GeometryCounts { vertices: 4, indices: 6 });
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
        for (i, v) in vertices.iter().enumerate() {
            assert_eq!(v.vertex_id, i as u32);
            assert_eq!(v.face_id, 0);
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.color, [1.0, 0.0, 0.0, 1.0]);
        }
        assert_eq!(vertices[2].position, [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_pentagon_fans_into_three_triangles() {
        let mut mesh = HalfEdgeMesh::new();
        let ids: Vec<VertexId> = (0..5)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / 5.0;
                mesh.add_vertex(Vec3::new(angle.cos(), angle.sin(), 0.0))
                    .unwrap()
            })
            .collect();
        mesh.construct_face(&ids, BLUE).unwrap();
        let (mut vertices, mut indices) = buffers_for(&mesh);

        let counts = mesh.generate_geometry(&mut vertices, &mut indices);

        assert_eq!(counts, GeometryCounts { vertices: 5, indices: 9 });
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
    }

    #[test]
    fn test_faces_are_emitted_in_order_with_offsets() {
        let mut mesh = unit_quad();
        let b = VertexId(1);
        let c = VertexId(2);
        let e = mesh.add_vertex(Vec3::new(2.0, 0.5, 0.0)).unwrap();
        mesh.construct_face(&[b, e, c], BLUE).unwrap();
        let (mut vertices, mut indices) = buffers_for(&mesh);

        let counts = mesh.generate_geometry(&mut vertices, &mut indices);

        assert_eq!(counts, GeometryCounts { vertices: 7, indices: 9 });
        assert_eq!(&indices[6..], &[4u32, 5, 6][..]);
        assert_eq!(vertices[4].face_id, 1);
        assert_eq!(vertices[4].vertex_id, b.0);
        assert_eq!(vertices[5].vertex_id, e.0);
        assert_eq!(vertices[6].color, [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_generation_is_idempotent() {
        let mesh = unit_quad();
        let (mut first_v, mut first_i) = buffers_for(&mesh);
        let (mut second_v, mut second_i) = buffers_for(&mesh);

        mesh.generate_geometry(&mut first_v, &mut first_i);
        mesh.generate_geometry(&mut second_v, &mut second_i);

        assert_eq!(
            bytemuck::cast_slice::<_, u8>(&first_v[..]),
            bytemuck::cast_slice::<_, u8>(&second_v[..])
        );
        assert_eq!(first_i, second_i);
    }

    #[test]
    fn test_moved_vertex_shows_up_with_stale_normal() {
        let mut mesh = unit_quad();
        mesh.translate_vertex(VertexId(2), Vec3::new(0.0, 0.0, 0.25))
            .unwrap();
        let (mut vertices, mut indices) = buffers_for(&mesh);

        mesh.generate_geometry(&mut vertices, &mut indices);

        assert_eq!(vertices[2].position, [1.0, 1.0, 0.25]);
        assert_eq!(vertices[2].normal, mesh.face(FaceId(0)).unwrap().normal.to_array());
    }

    #[test]
    fn test_empty_mesh_writes_nothing() {
        let mesh = HalfEdgeMesh::new();
        let counts = mesh.generate_geometry(&mut [], &mut []);
        assert_eq!(counts, GeometryCounts::default());
        assert_eq!(mesh.required_geometry_index_count(), 0);
    }

    #[test]
    fn test_generate_into_arena() {
        let mesh = unit_quad();
        let mut memory = vec![0u8; 1024];
        let mut arena = Arena::new(&mut memory);

        let buffers = mesh.generate_geometry_in(&mut arena).unwrap();

        assert_eq!(buffers.vertices.len(), 4);
        assert_eq!(&buffers.indices[..], &[0u32, 1, 2, 0, 2, 3][..]);
        assert_eq!(
            buffers.vertex_bytes().len(),
            4 * std::mem::size_of::<GeometryVertex>()
        );
        assert_eq!(buffers.index_bytes().len(), 24);
    }

    #[test]
    fn test_arena_too_small_is_reported() {
        let mesh = unit_quad();
        let mut memory = vec![0u8; 64];
        let mut arena = Arena::new(&mut memory);

        let result = mesh.generate_geometry_in(&mut arena);

        assert!(matches!(result, Err(ArenaError::OutOfMemory { .. })));
    }

    #[test]
    fn test_index_shortfall_leaves_arena_untouched() {
        let mesh = unit_quad();
        let vertex_bytes = 4 * std::mem::size_of::<GeometryVertex>();
        // Room for the vertex slice and any padding, not for the 24 index bytes
        let mut memory = vec![0u8; vertex_bytes + 8];
        let mut arena = Arena::new(&mut memory);
        assert!(arena.can_allocate(vertex_bytes, std::mem::align_of::<GeometryVertex>()));

        let result = mesh.generate_geometry_in(&mut arena);

        assert_eq!(
            result.unwrap_err(),
            ArenaError::OutOfMemory {
                requested: vertex_bytes + 24,
                remaining: vertex_bytes + 8,
            }
        );
        assert_eq!(arena.offset(), 0);
        assert!(arena.try_allocate_slice::<GeometryVertex>(4).is_ok());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "index buffer too small")]
    fn test_undersized_index_buffer_panics() {
        let mesh = unit_quad();
        let mut vertices = vec![GeometryVertex::zeroed(); mesh.required_geometry_vertex_count()];
        let mut indices = vec![0u32; 3];
        mesh.generate_geometry(&mut vertices, &mut indices);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "vertex buffer too small")]
    fn test_undersized_vertex_buffer_panics() {
        let mesh = unit_quad();
        let mut vertices = vec![GeometryVertex::zeroed(); 3];
        let mut indices = vec![0u32; mesh.required_geometry_index_count()];
        mesh.generate_geometry(&mut vertices, &mut indices);
    }
}
