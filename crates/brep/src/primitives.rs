//! Primitive shapes built through vertex loops.
//!
//! Every helper goes through [`HalfEdgeMesh::add_vertex`] and
//! [`HalfEdgeMesh::construct_face`], so shared corners produce twin-linked
//! edges exactly as hand-built faces would. Capacity is checked for the
//! whole primitive before anything is added.

use brep_config::SceneConfig;
use glam::{Vec3, Vec4};
use tracing::debug;

use crate::half_edge::{FaceId, HalfEdgeError, HalfEdgeMesh, VertexId};

/// Corner order of a cube; bit 0 = +X, bit 1 = +Y, bit 2 = +Z
const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 4, 6, 2], // -X
    [1, 3, 7, 5], // +X
    [0, 1, 5, 4], // -Y
    [2, 6, 7, 3], // +Y
    [0, 2, 3, 1], // -Z
    [4, 5, 7, 6], // +Z
];

/// Fail with the matching capacity error if the mesh cannot take a primitive.
fn ensure_room(
    mesh: &HalfEdgeMesh,
    vertices: usize,
    half_edges: usize,
    faces: usize,
) -> Result<(), HalfEdgeError> {
    let capacity = mesh.capacity();
    if mesh.vertex_count() + vertices > capacity.max_vertices {
        return Err(HalfEdgeError::VertexCapacity {
            capacity: capacity.max_vertices,
        });
    }
    let available = capacity.max_half_edges - mesh.half_edge_count();
    if half_edges > available {
        return Err(HalfEdgeError::HalfEdgeCapacity {
            requested: half_edges,
            available,
        });
    }
    if mesh.face_count() + faces > capacity.max_faces {
        return Err(HalfEdgeError::FaceCapacity {
            capacity: capacity.max_faces,
        });
    }
    Ok(())
}

/// Add a standalone quad from four corners in counter-clockwise order.
pub fn add_quad(
    mesh: &mut HalfEdgeMesh,
    corners: [Vec3; 4],
    color: Vec4,
) -> Result<FaceId, HalfEdgeError> {
    ensure_room(mesh, 4, 4, 1)?;
    let mut ids = [VertexId(0); 4];
    for (id, corner) in ids.iter_mut().zip(corners) {
        *id = mesh.add_vertex(corner)?;
    }
    mesh.construct_face(&ids, color)
}

/// Add a `columns` x `rows` grid of square cells in the XZ plane facing +Y.
///
/// Cells share their corner vertices, so interior edges are twin-linked.
/// Faces are returned row-major (column index fastest along X).
pub fn add_quad_grid(
    mesh: &mut HalfEdgeMesh,
    origin: Vec3,
    columns: usize,
    rows: usize,
    cell_size: f32,
    color: Vec4,
) -> Result<Vec<FaceId>, HalfEdgeError> {
    let cells = columns * rows;
    ensure_room(mesh, (columns + 1) * (rows + 1), cells * 4, cells)?;

    let mut corners = Vec::with_capacity((columns + 1) * (rows + 1));
    for z in 0..=rows {
        for x in 0..=columns {
            let offset = Vec3::new(x as f32 * cell_size, 0.0, z as f32 * cell_size);
            corners.push(mesh.add_vertex(origin + offset)?);
        }
    }
    let corner = |x: usize, z: usize| corners[z * (columns + 1) + x];

    let mut faces = Vec::with_capacity(cells);
    for z in 0..rows {
        for x in 0..columns {
            let face = mesh.construct_face(
                &[
                    corner(x, z),
                    corner(x, z + 1),
                    corner(x + 1, z + 1),
                    corner(x + 1, z),
                ],
                color,
            )?;
            faces.push(face);
        }
    }

    debug!("add_quad_grid: {}x{} cells", columns, rows);
    Ok(faces)
}

/// Add a closed axis-aligned cube. Every half-edge ends up twin-linked.
///
/// Faces are returned in the order -X, +X, -Y, +Y, -Z, +Z.
pub fn add_cube(
    mesh: &mut HalfEdgeMesh,
    center: Vec3,
    half_extent: f32,
    color: Vec4,
) -> Result<[FaceId; 6], HalfEdgeError> {
    ensure_room(mesh, 8, 24, 6)?;

    let mut corners = [VertexId(0); 8];
    for (bits, id) in corners.iter_mut().enumerate() {
        let sign = |bit: usize| if bits & bit != 0 { 1.0 } else { -1.0 };
        let offset = Vec3::new(sign(1), sign(2), sign(4)) * half_extent;
        *id = mesh.add_vertex(center + offset)?;
    }

    let mut faces = [FaceId(0); 6];
    for (face, loop_indices) in faces.iter_mut().zip(CUBE_FACES) {
        *face = mesh.construct_face(&loop_indices.map(|i| corners[i]), color)?;
    }
    Ok(faces)
}

/// Build the interactive demo scene: a floor grid with a cube resting on it.
pub fn build_demo_scene(config: &SceneConfig) -> Result<HalfEdgeMesh, HalfEdgeError> {
    let mut mesh = HalfEdgeMesh::from_config(config);
    add_quad_grid(
        &mut mesh,
        Vec3::new(-4.0, 0.0, -4.0),
        8,
        8,
        1.0,
        Vec4::new(0.6, 0.6, 0.6, 1.0),
    )?;
    add_cube(
        &mut mesh,
        Vec3::new(0.0, 0.5, 0.0),
        0.5,
        Vec4::new(0.0, 0.5, 0.5, 1.0),
    )?;
    debug!(
        "build_demo_scene: {} vertices, {} faces",
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}
