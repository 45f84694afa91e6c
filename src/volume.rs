//! Enclosed volume by signed-tetrahedron integration
//!
//! Each triangle `(a, b, c)` contributes `a · (b × c) / 6`, the signed volume
//! of the tetrahedron it forms with the origin. For a closed, consistently
//! wound surface the sum is the enclosed volume; the sign reflects winding.
//! Open or inconsistently wound meshes give a number without complaint, since
//! validating closure is outside this crate's job.

use tracing::warn;

use crate::mesh::TriangleMesh;

/// Cubic millimetres per cubic centimetre
pub const MM3_PER_CM3: f64 = 1000.0;

/// Compute the signed volume of a mesh in cubic model units (mm³)
///
/// Positive for outward (counter-clockwise) winding, negative for inverted
/// meshes. Triangles with non-finite coordinates contribute nothing.
///
/// # Example
/// ```
/// use printprep::{TriangleMesh, volume::compute_signed_volume};
///
/// assert_eq!(compute_signed_volume(&TriangleMesh::new()), 0.0);
/// ```
pub fn compute_signed_volume(mesh: &TriangleMesh) -> f64 {
    let (volume, skipped) = accumulate(mesh);
    if skipped > 0 {
        warn!(skipped, "skipped triangles with non-finite coordinates in volume sum");
    }
    volume
}

#[cfg(not(feature = "parallel"))]
fn accumulate(mesh: &TriangleMesh) -> (f64, usize) {
    mesh.triangles()
        .map(|t| contribution(t.signed_volume()))
        .fold((0.0, 0), |(sum, skipped), c| match c {
            Some(v) => (sum + v, skipped),
            None => (sum, skipped + 1),
        })
}

#[cfg(feature = "parallel")]
fn accumulate(mesh: &TriangleMesh) -> (f64, usize) {
    use rayon::prelude::*;

    let count = mesh.triangle_count();
    (0..count)
        .into_par_iter()
        .filter_map(|i| mesh.triangle(i))
        .map(|t| match contribution(t.signed_volume()) {
            Some(v) => (v, 0),
            None => (0.0, 1),
        })
        .reduce(|| (0.0, 0), |a, b| (a.0 + b.0, a.1 + b.1))
}

#[inline]
fn contribution(signed: f64) -> Option<f64> {
    signed.is_finite().then_some(signed)
}

/// Compute the enclosed volume of a mesh in cubic centimetres
///
/// Model units are taken as millimetres. The result is never negative.
pub fn estimate_volume(mesh: &TriangleMesh) -> f64 {
    compute_signed_volume(mesh).abs() / MM3_PER_CM3
}
