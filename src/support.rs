//! Support column generation
//!
//! One square column per overhang face, dropped from the face centroid to the
//! bed. Columns are a visual aid: adjacent columns may overlap and the prism
//! has side walls only, no caps.

use nalgebra::{Matrix4, Point3, Vector3};
use tracing::debug;

use crate::mesh::{Triangle, TriangleMesh};

/// Side faces of a column, two triangles per side, wound outward
///
/// Vertices `0..4` are the bottom ring and `4..8` the top ring, both ordered
/// `(-x,-z)`, `(+x,-z)`, `(+x,+z)`, `(-x,+z)`.
pub const COLUMN_INDICES: [[u32; 3]; 8] = [
    // front (-z)
    [0, 4, 5],
    [0, 5, 1],
    // right (+x)
    [1, 5, 6],
    [1, 6, 2],
    // back (+z)
    [2, 6, 7],
    [2, 7, 3],
    // left (-x)
    [3, 7, 4],
    [3, 4, 0],
];

/// A vertical rectangular prism under one overhang face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportColumn {
    /// Eight corners in world space, laid out as described on [`COLUMN_INDICES`]
    pub vertices: [Point3<f64>; 8],
}

impl SupportColumn {
    /// Column with square cross-section `width` centred on `(x, z)`, spanning
    /// between elevations `y0` and `y1` in either order
    pub fn new(x: f64, z: f64, y0: f64, y1: f64, width: f64) -> Self {
        let h = width / 2.0;
        let (bottom, top) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        let ring = |y: f64| {
            [
                Point3::new(x - h, y, z - h),
                Point3::new(x + h, y, z - h),
                Point3::new(x + h, y, z + h),
                Point3::new(x - h, y, z + h),
            ]
        };
        let [b0, b1, b2, b3] = ring(bottom);
        let [t0, t1, t2, t3] = ring(top);
        Self {
            vertices: [b0, b1, b2, b3, t0, t1, t2, t3],
        }
    }

    /// The column's index list
    pub fn indices(&self) -> &'static [[u32; 3]; 8] {
        &COLUMN_INDICES
    }

    /// Vertical extent
    pub fn height(&self) -> f64 {
        self.vertices[4].y - self.vertices[0].y
    }

    /// Triangles of the side walls with winding-derived normals
    pub fn to_mesh(&self) -> TriangleMesh {
        TriangleMesh::from_triangles(COLUMN_INDICES.iter().map(|[a, b, c]| {
            let positions = [
                self.vertices[*a as usize],
                self.vertices[*b as usize],
                self.vertices[*c as usize],
            ];
            let t = Triangle::new(positions, [Vector3::zeros(); 3]);
            let n = t.winding_normal();
            Triangle::new(positions, [n, n, n])
        }))
    }
}

/// Emit one column per overhang triangle
///
/// Each triangle is taken to world space by `world`; its centroid fixes the
/// column's `(x, z)` and top, and `base_elevation` its bottom.
pub fn generate_supports(
    overhang: &TriangleMesh,
    world: &Matrix4<f64>,
    base_elevation: f64,
    column_width: f64,
) -> Vec<SupportColumn> {
    let columns: Vec<SupportColumn> = overhang
        .triangles()
        .map(|t| {
            let [a, b, c] = t.positions.map(|p| world.transform_point(&p));
            let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
            SupportColumn::new(centroid.x, centroid.z, centroid.y, base_elevation, column_width)
        })
        .collect();

    debug!(columns = columns.len(), "generated support columns");
    columns
}
