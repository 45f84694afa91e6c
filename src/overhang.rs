//! Overhang classification
//!
//! A face is an overhang when the angle between its normal and the up
//! direction is strictly greater than the threshold (135° by default, i.e.
//! more than 45° below horizontal). Classification always produces a fresh
//! partition of the source mesh and must be re-run whenever the model's
//! orientation changes.

use nalgebra::{Matrix3, Matrix4, Vector3};
use tracing::debug;

use crate::error::Result;
use crate::mesh::{TriangleMesh, normal_matrix};

/// Outcome of the angle test for one face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceClass {
    /// Printable without support
    Normal,
    /// Needs support
    Overhang,
}

/// Disjoint partition of a mesh into normal and overhang triangles
///
/// Both halves carry the source positions and normals unchanged, in source
/// order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Classification {
    /// Triangles that print without support
    pub normal: TriangleMesh,
    /// Triangles that need support
    pub overhang: TriangleMesh,
    /// Threshold the partition was computed with (degrees from up)
    pub threshold_degrees: f64,
}

impl Classification {
    /// Total number of triangles across both sets
    pub fn triangle_count(&self) -> usize {
        self.normal.triangle_count() + self.overhang.triangle_count()
    }

    /// Whether any face needs support
    pub fn has_overhangs(&self) -> bool {
        !self.overhang.is_empty()
    }
}

/// Angle between `normal` and `up` in degrees, or `None` for a zero normal
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use printprep::overhang::angle_from_up;
///
/// let angle = angle_from_up(&Vector3::new(0.0, -1.0, 0.0), &Vector3::y()).unwrap();
/// assert!((angle - 180.0).abs() < 1e-9);
/// ```
pub fn angle_from_up(normal: &Vector3<f64>, up: &Vector3<f64>) -> Option<f64> {
    let n = normal.try_normalize(0.0)?;
    let u = up.try_normalize(0.0)?;
    Some(n.dot(&u).clamp(-1.0, 1.0).acos().to_degrees())
}

/// Classify a single normal
///
/// A zero-length or non-finite normal carries no signal and is `Normal`. A
/// face exactly at the threshold is `Normal`.
pub fn classify_normal(normal: &Vector3<f64>, up: &Vector3<f64>, threshold_degrees: f64) -> FaceClass {
    match angle_from_up(normal, up) {
        Some(angle) if angle > threshold_degrees => FaceClass::Overhang,
        _ => FaceClass::Normal,
    }
}

/// Partition a mesh using its stored (model-space) normals
pub fn classify(mesh: &TriangleMesh, up: &Vector3<f64>, threshold_degrees: f64) -> Classification {
    partition(mesh, &Matrix3::identity(), up, threshold_degrees)
}

/// Partition a mesh as placed in the world by `world`
///
/// Normals are taken to world space through the normal matrix (inverse
/// transpose of the world transform) and re-normalized before the angle test.
/// Fails only if `world` is singular.
pub fn classify_in_world(
    mesh: &TriangleMesh,
    world: &Matrix4<f64>,
    up: &Vector3<f64>,
    threshold_degrees: f64,
) -> Result<Classification> {
    let normal_matrix = normal_matrix(world)?;
    Ok(partition(mesh, &normal_matrix, up, threshold_degrees))
}

fn partition(
    mesh: &TriangleMesh,
    normal_matrix: &Matrix3<f64>,
    up: &Vector3<f64>,
    threshold_degrees: f64,
) -> Classification {
    let classes = face_classes(mesh, normal_matrix, up, threshold_degrees);

    let mut normal = Vec::new();
    let mut overhang = Vec::new();
    for (triangle, class) in mesh.triangles().zip(classes) {
        match class {
            FaceClass::Normal => normal.push(triangle),
            FaceClass::Overhang => overhang.push(triangle),
        }
    }

    debug!(
        normal = normal.len(),
        overhang = overhang.len(),
        threshold_degrees,
        "classified triangles"
    );

    Classification {
        normal: TriangleMesh::from_triangles(normal),
        overhang: TriangleMesh::from_triangles(overhang),
        threshold_degrees,
    }
}

#[cfg(not(feature = "parallel"))]
fn face_classes(
    mesh: &TriangleMesh,
    normal_matrix: &Matrix3<f64>,
    up: &Vector3<f64>,
    threshold_degrees: f64,
) -> Vec<FaceClass> {
    mesh.triangles()
        .map(|t| classify_normal(&(normal_matrix * t.face_normal()), up, threshold_degrees))
        .collect()
}

#[cfg(feature = "parallel")]
fn face_classes(
    mesh: &TriangleMesh,
    normal_matrix: &Matrix3<f64>,
    up: &Vector3<f64>,
    threshold_degrees: f64,
) -> Vec<FaceClass> {
    use rayon::prelude::*;

    // Normals are stored per vertex; every third one is the face normal.
    mesh.normals()
        .par_chunks_exact(3)
        .map(|n| classify_normal(&(normal_matrix * n[0]), up, threshold_degrees))
        .collect()
}
