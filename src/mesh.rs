//! Triangle soup container and model transform
//!
//! A [`TriangleMesh`] is an ordered list of triangles, each carrying three
//! positions and three vertex normals exactly as the loader produced them.
//! Meshes are replaced wholesale, never patched: every operation that changes
//! geometry returns a new mesh.

use nalgebra::{Matrix3, Matrix4, Point3, UnitQuaternion, Vector3};

use crate::error::{Error, Result};

/// One triangle of a mesh, copied out of the soup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertex positions in model space
    pub positions: [Point3<f64>; 3],
    /// Vertex normals in model space
    pub normals: [Vector3<f64>; 3],
}

impl Triangle {
    /// Create a triangle from its positions and normals
    pub fn new(positions: [Point3<f64>; 3], normals: [Vector3<f64>; 3]) -> Self {
        Self { positions, normals }
    }

    /// The normal used for face-level decisions
    ///
    /// Loaders for the supported formats emit one normal per face repeated on
    /// every vertex, so the first vertex normal stands for the face.
    pub fn face_normal(&self) -> Vector3<f64> {
        self.normals[0]
    }

    /// Normal derived from winding order (zero for degenerate triangles)
    pub fn winding_normal(&self) -> Vector3<f64> {
        calculate_face_normal(&self.positions[0], &self.positions[1], &self.positions[2])
    }

    /// Average of the three vertex positions
    pub fn centroid(&self) -> Point3<f64> {
        let [a, b, c] = self.positions;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Signed volume of the tetrahedron spanned with the origin
    pub fn signed_volume(&self) -> f64 {
        let [a, b, c] = self.positions;
        a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
    }
}

/// Calculate the unit normal of a triangle from its winding order
///
/// Returns the zero vector when the triangle has no area.
///
/// # Example
/// ```
/// use nalgebra::Point3;
/// use printprep::mesh::calculate_face_normal;
///
/// let n = calculate_face_normal(
///     &Point3::new(0.0, 0.0, 0.0),
///     &Point3::new(1.0, 0.0, 0.0),
///     &Point3::new(0.0, 1.0, 0.0),
/// );
/// assert_eq!(n.z, 1.0);
/// ```
pub fn calculate_face_normal(v0: &Point3<f64>, v1: &Point3<f64>, v2: &Point3<f64>) -> Vector3<f64> {
    let cross = (v1 - v0).cross(&(v2 - v0));
    let magnitude = cross.norm();
    if magnitude > 0.0 {
        cross / magnitude
    } else {
        Vector3::zeros()
    }
}

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner
    pub min: Point3<f64>,
    /// Maximum corner
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// Smallest box containing every finite point
    ///
    /// Points with a NaN or infinite coordinate are skipped. `None` when no
    /// finite point remains.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Self> {
        let mut points = points
            .into_iter()
            .filter(|p| p.iter().all(|c| c.is_finite()));
        let first = *points.next()?;
        Some(points.fold(
            BoundingBox {
                min: first,
                max: first,
            },
            |bb, p| BoundingBox {
                min: bb.min.inf(p),
                max: bb.max.sup(p),
            },
        ))
    }

    /// Centre of the box
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Extent along each axis
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Largest extent
    pub fn max_dimension(&self) -> f64 {
        self.size().max()
    }
}

/// Placement of the model in the world: scale, then rotate, then translate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    /// World-space translation
    pub translation: Vector3<f64>,
    /// Orientation
    pub rotation: UnitQuaternion<f64>,
    /// Uniform scale
    pub scale: f64,
}

impl ModelTransform {
    /// The identity placement
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: 1.0,
        }
    }

    /// Homogeneous world matrix
    pub fn to_matrix(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.translation)
            * self.rotation.to_homogeneous()
            * Matrix4::new_scaling(self.scale)
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Inverse-transpose of the upper 3x3 block of a world matrix
///
/// Returns an error if the matrix is singular, in which case normals have no
/// meaningful world-space direction.
pub fn normal_matrix(world: &Matrix4<f64>) -> Result<Matrix3<f64>> {
    let linear: Matrix3<f64> = world.fixed_view::<3, 3>(0, 0).into_owned();
    linear
        .try_inverse()
        .map(|inverse| inverse.transpose())
        .ok_or_else(|| {
            Error::SingularTransform("world matrix has no inverse; normals are undefined".to_string())
        })
}

fn no_finite_vertices() -> Error {
    Error::EmptyMesh("cannot compute bounding box of mesh with no finite vertices".to_string())
}

/// A triangle soup with per-vertex normals
///
/// Invariant: `positions.len() == normals.len()` and both are a multiple of 3.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriangleMesh {
    positions: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
}

impl TriangleMesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from per-vertex positions and normals
    ///
    /// Fails if the two arrays disagree in length or do not form whole
    /// triangles. Nothing is truncated.
    pub fn from_vertices(positions: Vec<Point3<f64>>, normals: Vec<Vector3<f64>>) -> Result<Self> {
        if positions.len() != normals.len() {
            return Err(Error::LengthMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }
        if positions.len() % 3 != 0 {
            return Err(Error::malformed_mesh("vertex list", positions.len(), 3));
        }
        Ok(Self { positions, normals })
    }

    /// Create a mesh from flat `x, y, z` component buffers as loaders emit them
    ///
    /// # Example
    /// ```
    /// use printprep::TriangleMesh;
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let normals = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
    /// let mesh = TriangleMesh::from_flat_arrays(&positions, &normals)?;
    /// assert_eq!(mesh.triangle_count(), 1);
    /// # Ok::<(), printprep::Error>(())
    /// ```
    pub fn from_flat_arrays(positions: &[f32], normals: &[f32]) -> Result<Self> {
        if positions.len() != normals.len() {
            return Err(Error::LengthMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }
        if positions.len() % 9 != 0 {
            return Err(Error::malformed_mesh("position components", positions.len(), 9));
        }

        let positions = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0] as f64, c[1] as f64, c[2] as f64))
            .collect();
        let normals = normals
            .chunks_exact(3)
            .map(|c| Vector3::new(c[0] as f64, c[1] as f64, c[2] as f64))
            .collect();

        Ok(Self { positions, normals })
    }

    /// Collect triangles into a mesh
    pub fn from_triangles(triangles: impl IntoIterator<Item = Triangle>) -> Self {
        let mut mesh = Self::new();
        for triangle in triangles {
            mesh.push(triangle);
        }
        mesh
    }

    fn push(&mut self, triangle: Triangle) {
        self.positions.extend_from_slice(&triangle.positions);
        self.normals.extend_from_slice(&triangle.normals);
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Whether the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Per-vertex positions, three per triangle
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Per-vertex normals, three per triangle
    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    /// The triangle at `index`, if any
    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        let start = index.checked_mul(3)?;
        let end = start.checked_add(3)?;
        let p = self.positions.get(start..end)?;
        let n = self.normals.get(start..end)?;
        Some(Triangle::new([p[0], p[1], p[2]], [n[0], n[1], n[2]]))
    }

    /// Iterate over all triangles in order
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = Triangle> + '_ {
        self.positions
            .chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
            .map(|(p, n)| Triangle::new([p[0], p[1], p[2]], [n[0], n[1], n[2]]))
    }

    /// A copy whose normals are re-derived from winding order
    ///
    /// Loader normals are trusted by default; call this only when the source
    /// normals are missing or known to be wrong.
    pub fn with_face_normals(&self) -> Self {
        Self::from_triangles(self.triangles().map(|t| {
            let n = t.winding_normal();
            Triangle::new(t.positions, [n, n, n])
        }))
    }

    /// A copy with every position offset by `offset`
    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        Self {
            positions: self.positions.iter().map(|p| p + offset).collect(),
            normals: self.normals.clone(),
        }
    }

    /// Bounding box in model space, ignoring non-finite vertices
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        BoundingBox::from_points(&self.positions).ok_or_else(no_finite_vertices)
    }

    /// Bounding box of every finite vertex after applying `world`
    pub fn transformed_bounding_box(&self, world: &Matrix4<f64>) -> Result<BoundingBox> {
        let transformed: Vec<Point3<f64>> = self
            .positions
            .iter()
            .map(|p| world.transform_point(p))
            .collect();
        BoundingBox::from_points(&transformed).ok_or_else(no_finite_vertices)
    }

    /// Flat `f32` position and normal buffers for a renderer
    pub fn to_flat_arrays(&self) -> (Vec<f32>, Vec<f32>) {
        let positions = self
            .positions
            .iter()
            .flat_map(|p| [p.x as f32, p.y as f32, p.z as f32])
            .collect();
        let normals = self
            .normals
            .iter()
            .flat_map(|n| [n.x as f32, n.y as f32, n.z as f32])
            .collect();
        (positions, normals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> Triangle {
        let n = Vector3::z();
        Triangle::new(
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            [n, n, n],
        )
    }

    #[test]
    fn test_from_flat_arrays() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
        let mesh = TriangleMesh::from_flat_arrays(&positions, &normals).unwrap();

        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangle(0).unwrap(), unit_triangle());
        assert!(mesh.triangle(1).is_none());
    }

    #[test]
    fn test_from_flat_arrays_partial_triangle() {
        let positions = [0.0_f32; 12];
        let normals = [0.0_f32; 12];
        let err = TriangleMesh::from_flat_arrays(&positions, &normals).unwrap_err();
        assert!(matches!(err, Error::MalformedMesh(_)));
        assert!(err.to_string().contains("multiple of 9"));
    }

    #[test]
    fn test_from_flat_arrays_length_mismatch() {
        let positions = [0.0_f32; 9];
        let normals = [0.0_f32; 18];
        let err = TriangleMesh::from_flat_arrays(&positions, &normals).unwrap_err();
        assert_eq!(
            err,
            Error::LengthMismatch {
                positions: 9,
                normals: 18
            }
        );
    }

    #[test]
    fn test_from_vertices_rejects_partial_triangle() {
        let positions = vec![Point3::origin(); 4];
        let normals = vec![Vector3::y(); 4];
        assert!(TriangleMesh::from_vertices(positions, normals).is_err());
    }

    #[test]
    fn test_triangle_helpers() {
        let t = unit_triangle();
        assert_relative_eq!(t.centroid(), Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0));
        assert_eq!(t.winding_normal(), Vector3::z());
        assert_eq!(t.face_normal(), Vector3::z());
        // Flat in the z = 0 plane through the origin
        assert_eq!(t.signed_volume(), 0.0);
    }

    #[test]
    fn test_calculate_face_normal_degenerate() {
        let n = calculate_face_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(2.0, 0.0, 0.0),
        );
        assert_eq!(n, Vector3::zeros());
    }

    #[test]
    fn test_with_face_normals_replaces_loader_normals() {
        let mut t = unit_triangle();
        t.normals = [Vector3::x(); 3];
        let mesh = TriangleMesh::from_triangles([t]).with_face_normals();
        assert!(mesh.normals().iter().all(|n| *n == Vector3::z()));
    }

    #[test]
    fn test_bounding_box() {
        let offset = Vector3::new(-5.0, 2.0, 3.0);
        let mesh = TriangleMesh::from_triangles([unit_triangle()]).translated(&offset);
        let bb = mesh.bounding_box().unwrap();
        assert_eq!(bb.min, Point3::new(-5.0, 2.0, 3.0));
        assert_eq!(bb.max, Point3::new(-4.0, 3.0, 3.0));
        assert_eq!(bb.max_dimension(), 1.0);
        assert_eq!(bb.center(), Point3::new(-4.5, 2.5, 3.0));
    }

    #[test]
    fn test_empty_mesh_bounding_box() {
        let err = TriangleMesh::new().bounding_box().unwrap_err();
        assert!(err.to_string().contains("[E1003]"));
    }

    #[test]
    fn test_bounding_box_skips_non_finite_vertices() {
        let bad = Triangle::new(
            [
                Point3::new(f64::INFINITY, 0.0, 0.0),
                Point3::new(0.0, f64::NAN, 0.0),
                Point3::new(0.5, 0.5, 0.5),
            ],
            [Vector3::z(); 3],
        );
        let mesh = TriangleMesh::from_triangles([unit_triangle(), bad]);

        let bb = mesh.bounding_box().unwrap();
        assert_eq!(bb.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bb.max, Point3::new(1.0, 1.0, 0.5));

        let all_bad = TriangleMesh::from_triangles([Triangle::new(
            [Point3::new(f64::NAN, 0.0, 0.0); 3],
            [Vector3::z(); 3],
        )]);
        assert!(all_bad.bounding_box().is_err());
        assert!(all_bad.transformed_bounding_box(&Matrix4::identity()).is_err());
    }

    #[test]
    fn test_transformed_bounding_box() {
        let mesh = TriangleMesh::from_triangles([unit_triangle()]);
        let transform = ModelTransform {
            translation: Vector3::new(10.0, 0.0, 0.0),
            rotation: UnitQuaternion::identity(),
            scale: 2.0,
        };
        let bb = mesh.transformed_bounding_box(&transform.to_matrix()).unwrap();
        assert_relative_eq!(bb.min, Point3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(bb.max, Point3::new(12.0, 2.0, 0.0));
    }

    #[test]
    fn test_normal_matrix_singular() {
        let transform = ModelTransform {
            scale: 0.0,
            ..ModelTransform::identity()
        };
        let err = normal_matrix(&transform.to_matrix()).unwrap_err();
        assert!(matches!(err, Error::SingularTransform(_)));
    }

    #[test]
    fn test_normal_matrix_uniform_scale_keeps_direction() {
        let transform = ModelTransform {
            scale: 4.0,
            ..ModelTransform::identity()
        };
        let m = normal_matrix(&transform.to_matrix()).unwrap();
        let n = (m * Vector3::y()).normalize();
        assert_relative_eq!(n, Vector3::y());
    }

    #[test]
    fn test_to_flat_arrays() {
        let mesh = TriangleMesh::from_triangles([unit_triangle()]);
        let (positions, normals) = mesh.to_flat_arrays();
        assert_eq!(positions, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(normals.len(), 9);
        assert_eq!(&normals[..3], &[0.0, 0.0, 1.0]);
    }
}
