//! Shared mesh builders for integration tests

#![allow(dead_code)]

use nalgebra::{Point3, Vector3};
use printprep::{Triangle, TriangleMesh};

/// Corner order: bit 0 selects max x, bit 1 max y, bit 2 max z
const BOX_FACES: [[usize; 3]; 12] = [
    // -z
    [0, 2, 1],
    [0, 3, 2],
    // +z
    [4, 5, 6],
    [4, 6, 7],
    // -y
    [0, 1, 5],
    [0, 5, 4],
    // +y
    [3, 7, 6],
    [3, 6, 2],
    // -x
    [0, 4, 7],
    [0, 7, 3],
    // +x
    [1, 2, 6],
    [1, 6, 5],
];

/// Closed axis-aligned box with outward winding and matching face normals
pub fn box_mesh(min: Point3<f64>, max: Point3<f64>) -> TriangleMesh {
    let corner = |x: bool, y: bool, z: bool| {
        Point3::new(
            if x { max.x } else { min.x },
            if y { max.y } else { min.y },
            if z { max.z } else { min.z },
        )
    };
    let v = [
        corner(false, false, false),
        corner(true, false, false),
        corner(true, true, false),
        corner(false, true, false),
        corner(false, false, true),
        corner(true, false, true),
        corner(true, true, true),
        corner(false, true, true),
    ];
    TriangleMesh::from_triangles(BOX_FACES.iter().map(|[a, b, c]| {
        let positions = [v[*a], v[*b], v[*c]];
        let n = Triangle::new(positions, [Vector3::zeros(); 3]).winding_normal();
        Triangle::new(positions, [n, n, n])
    }))
}

/// Cube of edge `size` with its minimum corner at the origin
pub fn cube(size: f64) -> TriangleMesh {
    box_mesh(Point3::origin(), Point3::new(size, size, size))
}

/// Flat loader-style buffers for `mesh`
pub fn flat_buffers(mesh: &TriangleMesh) -> (Vec<f32>, Vec<f32>) {
    mesh.to_flat_arrays()
}

/// A floating shelf: one horizontal square whose two triangles face down
pub fn downward_shelf(y: f64, size: f64) -> TriangleMesh {
    let p = |x: f64, z: f64| Point3::new(x, y, z);
    let down = -Vector3::y();
    TriangleMesh::from_triangles([
        Triangle::new([p(0.0, 0.0), p(size, 0.0), p(size, size)], [down; 3]),
        Triangle::new([p(0.0, 0.0), p(size, size), p(0.0, size)], [down; 3]),
    ])
}
