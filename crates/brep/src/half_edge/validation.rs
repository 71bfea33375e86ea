//! Validation methods for HalfEdgeMesh.
//!
//! Checks the structural invariants that construction is supposed to keep:
//! - next/prev cycles are consistent and stay inside one face block
//! - twin relationships are symmetric with swapped endpoints
//! - vertex outgoing/incoming lists cover every half-edge exactly once

use super::types::HalfEdgeError;
use super::HalfEdgeMesh;

impl HalfEdgeMesh {
    /// Validate the mesh topology.
    pub fn validate(&self) -> Result<(), HalfEdgeError> {
        let he_count = self.half_edges.len();

        for (index, he) in self.half_edges.iter().enumerate() {
            if he.id.index() != index {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Half-edge in slot {} has id {:?}",
                    index, he.id
                )));
            }
            if he.next.index() >= he_count || he.prev.index() >= he_count {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Half-edge {:?}: next/prev out of range",
                    he.id
                )));
            }

            let next = &self.half_edges[he.next.index()];
            if next.prev != he.id {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Half-edge {:?}: next.prev = {:?}",
                    he.id, next.prev
                )));
            }
            if next.origin != he.end {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Half-edge {:?}: ends at {:?} but next starts at {:?}",
                    he.id, he.end, next.origin
                )));
            }
            if next.face != he.face {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Half-edge {:?}: next belongs to another face",
                    he.id
                )));
            }

            if let Some(twin_id) = he.twin {
                let twin = self.half_edge(twin_id).ok_or_else(|| {
                    HalfEdgeError::InvalidTopology(format!(
                        "Half-edge {:?}: twin {:?} doesn't exist",
                        he.id, twin_id
                    ))
                })?;
                if twin.twin != Some(he.id) {
                    return Err(HalfEdgeError::InvalidTopology(format!(
                        "Half-edge {:?}: twin.twin = {:?}",
                        he.id, twin.twin
                    )));
                }
                if twin.origin != he.end || twin.end != he.origin {
                    return Err(HalfEdgeError::InvalidTopology(format!(
                        "Half-edge {:?}: twin direction mismatch",
                        he.id
                    )));
                }
            }

            let origin = self.vertex(he.origin).ok_or(HalfEdgeError::InvalidVertex(he.origin))?;
            let end = self.vertex(he.end).ok_or(HalfEdgeError::InvalidVertex(he.end))?;
            if !origin.outgoing.contains(&he.id) || !end.incoming.contains(&he.id) {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Half-edge {:?} missing from its vertices' adjacency lists",
                    he.id
                )));
            }
        }

        // Each face cycle closes after exactly as many steps as it has edges
        let mut cycle_total = 0;
        for face in &self.faces {
            let entry = self
                .half_edge(face.half_edge)
                .ok_or(HalfEdgeError::InvalidFace(face.id))?;
            if entry.face != face.id {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Face {:?}: entry half-edge belongs to {:?}",
                    face.id, entry.face
                )));
            }

            let mut current = face.half_edge;
            let mut count = 0;
            loop {
                current = self.half_edges[current.index()].next;
                count += 1;
                if current == face.half_edge {
                    break;
                }
                if count > he_count {
                    return Err(HalfEdgeError::InvalidTopology(format!(
                        "Face {:?}: next cycle does not close",
                        face.id
                    )));
                }
            }

            if count < 3 {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Face {:?} has fewer than 3 edges",
                    face.id
                )));
            }
            if self.face_vertex_count(face.id) != count {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Face {:?}: loop revisits its start vertex early",
                    face.id
                )));
            }
            cycle_total += count;
        }

        if cycle_total != he_count {
            return Err(HalfEdgeError::InvalidTopology(format!(
                "Face cycles cover {} of {} half-edges",
                cycle_total, he_count
            )));
        }

        let listed: usize = self.vertices.iter().map(|v| v.outgoing.len()).sum();
        if listed != he_count {
            return Err(HalfEdgeError::InvalidTopology(format!(
                "Vertices list {} outgoing half-edges, mesh has {}",
                listed, he_count
            )));
        }

        Ok(())
    }
}
