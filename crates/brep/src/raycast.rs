//! Ray picking against half-edge mesh faces and vertices.
//!
//! Face picking intersects the ray with each face's stored plane and then
//! walks the face's half-edge cycle to test containment. Vertex picking
//! measures the perpendicular distance from each vertex to the ray. Both
//! are brute force over the mesh, which is fine for scenes of a few hundred
//! faces.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::RAY_PARALLEL_EPSILON;
use crate::half_edge::{FaceId, HalfEdgeMesh, VertexId};

/// A ray with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a face pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceHit {
    pub face: FaceId,
    /// Intersection with the face's stored plane
    pub point: Vec3,
    /// Ray parameter of the intersection
    pub distance: f32,
}

/// Result of a vertex pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexHit {
    pub vertex: VertexId,
    /// Perpendicular distance from the vertex to the ray
    pub distance: f32,
    /// Ray parameter of the vertex's projection onto the ray
    pub t: f32,
}

/// Kind of element a pick resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PickMode {
    #[default]
    Face,
    Vertex,
}

/// Ray-plane intersection for a plane `normal.dot(p) + offset == 0`.
///
/// Returns the ray parameter, or `None` when the ray is parallel to the
/// plane (`|normal.dot(direction)|` below the parallel epsilon).
pub fn ray_plane_intersection(
    ray_origin: Vec3,
    ray_direction: Vec3,
    normal: Vec3,
    offset: f32,
) -> Option<f32> {
    let denom = normal.dot(ray_direction);
    if denom.abs() < RAY_PARALLEL_EPSILON {
        return None;
    }
    Some(-(offset + normal.dot(ray_origin)) / denom)
}

/// Project `point` onto a ray.
///
/// Returns `(t, distance)`: the ray parameter of the projection and the
/// perpendicular distance from the point to the ray's line.
pub fn point_ray_distance(point: Vec3, ray_origin: Vec3, ray_direction: Vec3) -> (f32, f32) {
    let to_point = point - ray_origin;
    let t = to_point.dot(ray_direction);
    let distance = (to_point - ray_direction * t).length();
    (t, distance)
}

impl HalfEdgeMesh {
    /// Test whether a point on a face's plane lies inside the face.
    ///
    /// For every boundary edge the point must be on the inner side, i.e.
    /// `cross(edge, point - edge_origin)` must not point against the face
    /// normal. Points exactly on an edge count as inside.
    pub fn face_contains_point(&self, face_id: FaceId, point: Vec3) -> bool {
        let Some(face) = self.face(face_id) else {
            return false;
        };

        self.face_loop(face_id).all(|he| {
            let start = self.vertices[he.origin.index()].position;
            let end = self.vertices[he.end.index()].position;
            let w = (end - start).cross(point - start);
            w.dot(face.normal) >= 0.0
        })
    }

    /// Find the nearest face hit by a ray.
    ///
    /// # Arguments
    /// * `ray_origin` - Origin of the ray
    /// * `ray_direction` - Direction of the ray (must be a unit vector)
    /// * `min_length`, `max_length` - Accepted range of the ray parameter
    ///
    /// # Returns
    /// `Some(FaceHit)` for the closest face whose plane intersection lies in
    /// range and inside the face, `None` otherwise. Planes come from face
    /// construction, so edited faces are hit where they were built. On equal
    /// distances the earlier face wins.
    pub fn find_nearest_intersecting_face(
        &self,
        ray_origin: Vec3,
        ray_direction: Vec3,
        min_length: f32,
        max_length: f32,
    ) -> Option<FaceHit> {
        let mut closest: Option<FaceHit> = None;

        // Test all faces (brute force)
        for face in self.faces() {
            let Some(t) =
                ray_plane_intersection(ray_origin, ray_direction, face.normal, face.offset)
            else {
                continue;
            };
            if t < min_length || t > max_length {
                continue;
            }

            let dominated = closest.is_some_and(|hit| t >= hit.distance);
            if dominated {
                continue;
            }

            let point = ray_origin + ray_direction * t;
            if self.face_contains_point(face.id, point) {
                closest = Some(FaceHit {
                    face: face.id,
                    point,
                    distance: t,
                });
            }
        }

        closest
    }

    /// Find the vertex closest to a ray.
    ///
    /// Distance is measured perpendicular to the ray. Vertices behind the
    /// ray origin are ignored, as are vertices farther than `max_distance`
    /// from the ray. On equal distances the lower vertex id wins.
    pub fn find_nearest_vertex(
        &self,
        ray_origin: Vec3,
        ray_direction: Vec3,
        max_distance: f32,
    ) -> Option<VertexHit> {
        let mut closest: Option<VertexHit> = None;

        for vertex in self.vertices() {
            let (t, distance) = point_ray_distance(vertex.position, ray_origin, ray_direction);
            if t < 0.0 || distance > max_distance {
                continue;
            }
            if closest.is_some_and(|hit| distance >= hit.distance) {
                continue;
            }
            closest = Some(VertexHit {
                vertex: vertex.id,
                distance,
                t,
            });
        }

        closest
    }

    /// Face pick with a [`Ray`]
    pub fn raycast_face(&self, ray: &Ray, min_length: f32, max_length: f32) -> Option<FaceHit> {
        self.find_nearest_intersecting_face(ray.origin, ray.direction, min_length, max_length)
    }

    /// Vertex pick with a [`Ray`]
    pub fn raycast_vertex(&self, ray: &Ray, max_distance: f32) -> Option<VertexHit> {
        self.find_nearest_vertex(ray.origin, ray.direction, max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const TOLERANCE: f32 = 1e-4;

    /// Two unit quads in the plane y = height, side by side along X.
    fn two_quads_at(height: f32) -> HalfEdgeMesh {
        let mut mesh = HalfEdgeMesh::new();
        add_quad_pair(&mut mesh, height);
        mesh
    }

    fn add_quad_pair(mesh: &mut HalfEdgeMesh, height: f32) {
        let v: Vec<VertexId> = [
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (2.0, 1.0),
        ]
        .iter()
        .map(|&(x, z)| mesh.add_vertex(Vec3::new(x, height, z)).unwrap())
        .collect();
        mesh.construct_face(&[v[0], v[3], v[4], v[1]], Vec4::ONE)
            .unwrap();
        mesh.construct_face(&[v[1], v[4], v[5], v[2]], Vec4::ONE)
            .unwrap();
    }

    #[test]
    fn test_ray_through_first_quad_center() {
        let mesh = two_quads_at(0.0);
        let origin = Vec3::new(0.5, 5.0, 0.5);
        let direction = Vec3::NEG_Y;

        let hit = mesh
            .find_nearest_intersecting_face(origin, direction, 0.0, 100.0)
            .unwrap();

        assert_eq!(hit.face, FaceId(0));
        assert!((hit.point - Vec3::new(0.5, 0.0, 0.5)).length() < TOLERANCE);
        assert!((hit.distance - 5.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_ray_through_second_quad() {
        let mesh = two_quads_at(0.0);
        let direction = Vec3::new(0.3, -1.0, 0.2).normalize();
        let target = Vec3::new(1.6, 0.0, 0.4);
        let origin = target - direction * 3.0;

        let hit = mesh
            .find_nearest_intersecting_face(origin, direction, 0.0, 100.0)
            .unwrap();

        assert_eq!(hit.face, FaceId(1));
        assert!((hit.point - target).length() < TOLERANCE);
        assert!((hit.distance - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let mesh = two_quads_at(0.0);
        let hit = mesh.find_nearest_intersecting_face(
            Vec3::new(-1.0, 0.0, 0.5),
            Vec3::X,
            0.0,
            100.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_ray_outside_polygons_misses() {
        let mesh = two_quads_at(0.0);
        let hit = mesh.find_nearest_intersecting_face(
            Vec3::new(3.0, 5.0, 0.5),
            Vec3::NEG_Y,
            0.0,
            100.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_distance_range_is_respected() {
        let mesh = two_quads_at(0.0);
        let origin = Vec3::new(0.5, 5.0, 0.5);
        assert!(mesh
            .find_nearest_intersecting_face(origin, Vec3::NEG_Y, 0.0, 4.0)
            .is_none());
        assert!(mesh
            .find_nearest_intersecting_face(origin, Vec3::NEG_Y, 6.0, 10.0)
            .is_none());
        // Pointing away gives a negative parameter
        assert!(mesh
            .find_nearest_intersecting_face(origin, Vec3::Y, 0.0, 100.0)
            .is_none());
    }

    #[test]
    fn test_nearest_of_stacked_faces_wins() {
        // Lower layer is built first, so the nearer face is found second
        let mut mesh = two_quads_at(0.0);
        add_quad_pair(&mut mesh, 1.0);

        let hit = mesh
            .find_nearest_intersecting_face(Vec3::new(0.5, 5.0, 0.5), Vec3::NEG_Y, 0.0, 100.0)
            .unwrap();
        assert_eq!(hit.face, FaceId(2));
        assert!((hit.distance - 4.0).abs() < TOLERANCE);

        let hit = mesh
            .find_nearest_intersecting_face(Vec3::new(0.5, -5.0, 0.5), Vec3::Y, 0.0, 100.0)
            .unwrap();
        assert_eq!(hit.face, FaceId(0));
    }

    #[test]
    fn test_shared_edge_tie_keeps_first_face() {
        let mesh = two_quads_at(0.0);
        let hit = mesh
            .find_nearest_intersecting_face(Vec3::new(1.0, 2.0, 0.5), Vec3::NEG_Y, 0.0, 100.0)
            .unwrap();
        assert_eq!(hit.face, FaceId(0));
    }

    #[test]
    fn test_picking_uses_construction_plane() {
        let mut mesh = two_quads_at(0.0);
        mesh.translate_face(FaceId(0), Vec3::new(0.0, 0.5, 0.0))
            .unwrap();

        let hit = mesh
            .find_nearest_intersecting_face(Vec3::new(0.5, 5.0, 0.5), Vec3::NEG_Y, 0.0, 100.0)
            .unwrap();

        assert_eq!(hit.face, FaceId(0));
        assert!(hit.point.y.abs() < TOLERANCE);
    }

    #[test]
    fn test_face_contains_point() {
        let mesh = two_quads_at(0.0);
        assert!(mesh.face_contains_point(FaceId(0), Vec3::new(0.25, 0.0, 0.75)));
        assert!(!mesh.face_contains_point(FaceId(0), Vec3::new(1.25, 0.0, 0.75)));
        assert!(!mesh.face_contains_point(FaceId(9), Vec3::ZERO));
    }

    #[test]
    fn test_nearest_vertex_within_radius() {
        let mesh = two_quads_at(0.0);
        let hit = mesh
            .find_nearest_vertex(Vec3::new(1.05, 3.0, 0.98), Vec3::NEG_Y, 0.1)
            .unwrap();
        assert_eq!(hit.vertex, VertexId(4));
        assert!((hit.t - 3.0).abs() < TOLERANCE);
        assert!(hit.distance < 0.1);
    }

    #[test]
    fn test_nearest_vertex_misses() {
        let mesh = two_quads_at(0.0);
        // Too far from every vertex
        assert!(mesh
            .find_nearest_vertex(Vec3::new(0.5, 3.0, 0.5), Vec3::NEG_Y, 0.1)
            .is_none());
        // Vertex behind the ray origin
        assert!(mesh
            .find_nearest_vertex(Vec3::new(0.0, 3.0, 0.0), Vec3::Y, 0.1)
            .is_none());
    }

    #[test]
    fn test_ray_helpers() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(ray.direction, Vec3::NEG_Z);
        assert_eq!(ray.at(3.0), Vec3::new(0.0, 0.0, -3.0));

        let (t, distance) = point_ray_distance(Vec3::new(1.0, 0.0, -4.0), ray.origin, ray.direction);
        assert!((t - 4.0).abs() < 1e-6);
        assert!((distance - 1.0).abs() < 1e-6);

        let mesh = two_quads_at(0.0);
        let down = Ray::new(Vec3::new(1.5, 1.0, 0.5), Vec3::NEG_Y);
        assert_eq!(mesh.raycast_face(&down, 0.0, 10.0).unwrap().face, FaceId(1));
        assert!(mesh.raycast_vertex(&down, 0.01).is_none());
    }
}
