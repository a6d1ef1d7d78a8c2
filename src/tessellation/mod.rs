mod column;
mod hole_cutting;
mod mesher_state;

pub use column::{Column, ColumnEmitter, Transition};
pub use hole_cutting::{HoleCuttingRenderer, MeshStats, WallMesh, WallMesher};
pub use mesher_state::{CurveCursor, MesherState, ObjectCursor};

use crate::math::{Point2, Point3, Vector3};

/// A triangle mesh approximation of the building walls.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// UV coordinates: arc length along the wall and height above the floor.
    pub uvs: Vec<Point2>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }
}

/// A sphere enclosing every vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Point3,
    pub radius: f64,
}

impl TriangleMesh {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Appends a vertex and returns its index.
    #[allow(clippy::cast_possible_truncation)]
    pub fn push_vertex(&mut self, position: Point3, uv: Point2) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.uvs.push(uv);
        index
    }

    /// Recomputes area-weighted vertex normals from the triangles.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vector3::zeros(); self.vertices.len()];
        for tri in &self.indices {
            let [a, b, c] = tri.map(|i| self.vertices[i as usize]);
            // Twice the triangle area, so larger triangles weigh more.
            let n = (b - a).cross(&(c - a));
            for &i in tri {
                normals[i as usize] += n;
            }
        }
        for n in &mut normals {
            let len = n.norm();
            if len > 0.0 {
                *n /= len;
            }
        }
        self.normals = normals;
    }

    /// Axis-aligned bounds of all vertices, or `None` for an empty mesh.
    #[must_use]
    pub fn aabb(&self) -> Option<Aabb> {
        let first = *self.vertices.first()?;
        let mut aabb = Aabb {
            min: first,
            max: first,
        };
        for v in &self.vertices[1..] {
            aabb.min = aabb.min.inf(v);
            aabb.max = aabb.max.sup(v);
        }
        Some(aabb)
    }

    /// Sphere centred on the bounding box that encloses every vertex.
    #[must_use]
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        let center = self.aabb()?.center();
        let radius = self
            .vertices
            .iter()
            .map(|v| (v - center).norm())
            .fold(0.0, f64::max);
        Some(BoundingSphere { center, radius })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn quad() -> TriangleMesh {
        let mut mesh = TriangleMesh::default();
        let uv = Point2::origin();
        mesh.push_vertex(Point3::new(0.0, 0.0, 0.0), uv);
        mesh.push_vertex(Point3::new(0.0, 1.0, 0.0), uv);
        mesh.push_vertex(Point3::new(2.0, 0.0, 0.0), uv);
        mesh.push_vertex(Point3::new(2.0, 1.0, 0.0), uv);
        mesh.indices = vec![[0, 1, 2], [1, 3, 2]];
        mesh
    }

    #[test]
    fn normals_follow_right_hand_winding() {
        let mut mesh = quad();
        mesh.compute_vertex_normals();
        assert_eq!(mesh.normals.len(), 4);
        for n in &mesh.normals {
            assert_abs_diff_eq!(n.z, -1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mesh = quad();
        let aabb = mesh.aabb().unwrap();
        assert_eq!(aabb.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(aabb.max, Point3::new(2.0, 1.0, 0.0));
        let sphere = mesh.bounding_sphere().unwrap();
        assert_abs_diff_eq!(sphere.radius, (1.0f64 + 0.25).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        let mesh = TriangleMesh::default();
        assert!(mesh.aabb().is_none());
        assert!(mesh.bounding_sphere().is_none());
    }
}
