//! Example walking through one viewer session
//!
//! Loads a wedge, prints its cost quote and overhangs, picks the sloped face
//! through the default camera, animates the rotation to completion and prints
//! the analysis again with the face on the bed.

use nalgebra::{Point3, Vector3};
use printprep::{
    AnalysisConfig, Camera, CostParameters, PickOutcome, StepOutcome, Triangle, TriangleMesh,
    ViewerState, Viewport,
};

/// Right-angled wedge: a 20 x 20 mm base rising to 10 mm along -z
fn wedge() -> TriangleMesh {
    let v = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(20.0, 0.0, 0.0),
        Point3::new(20.0, 0.0, 20.0),
        Point3::new(0.0, 0.0, 20.0),
        Point3::new(0.0, 10.0, 0.0),
        Point3::new(20.0, 10.0, 0.0),
    ];
    let faces: [[usize; 3]; 8] = [
        // base
        [0, 1, 2],
        [0, 2, 3],
        // back wall (-z)
        [0, 4, 5],
        [0, 5, 1],
        // slope
        [3, 2, 5],
        [3, 5, 4],
        // sides
        [0, 3, 4],
        [1, 5, 2],
    ];
    TriangleMesh::from_triangles(faces.iter().map(|[a, b, c]| {
        Triangle::new([v[*a], v[*b], v[*c]], [Vector3::zeros(); 3])
    }))
    .with_face_normals()
}

fn report(viewer: &ViewerState) {
    if let Some(classification) = viewer.classification() {
        println!(
            "  Faces: {} normal, {} overhang",
            classification.normal.triangle_count(),
            classification.overhang.triangle_count()
        );
    }
    println!("  Support columns: {}", viewer.supports().len());
    let rotation = viewer.transform().rotation;
    let (axis, angle) = rotation
        .axis_angle()
        .map(|(axis, angle)| (axis.into_inner(), angle))
        .unwrap_or((Vector3::y(), 0.0));
    println!(
        "  Orientation: {:.1}° about ({:.2}, {:.2}, {:.2})",
        angle.to_degrees(),
        axis.x,
        axis.y,
        axis.z
    );
}

fn main() -> printprep::Result<()> {
    println!("=== Reorientation Example ===\n");

    let mut viewer = ViewerState::new(AnalysisConfig::default())?
        .with_cost_parameters(CostParameters::from_inputs("20", "0.03", "1.5"));
    viewer.load_mesh(wedge())?;

    println!("Loaded wedge:");
    if let Some(summary) = viewer.cost_summary() {
        for line in summary.to_string().lines() {
            println!("  {line}");
        }
    }
    report(&viewer);

    println!("\nPicking the sloped face from the default camera:");
    let viewport = Viewport::new(1280.0, 720.0);
    let camera = Camera::new(viewport.aspect());
    match viewer.pick(640.0, 300.0, &viewport, &camera) {
        PickOutcome::Started(hit) => println!(
            "  Hit triangle {} at distance {:.2}, normal ({:.2}, {:.2}, {:.2})",
            hit.triangle_index,
            hit.distance,
            hit.face_normal_world.x,
            hit.face_normal_world.y,
            hit.face_normal_world.z
        ),
        other => {
            println!("  No rotation started: {other:?}");
            return Ok(());
        }
    }

    let mut ticks = 0;
    loop {
        match viewer.step() {
            StepOutcome::Rotating { .. } => ticks += 1,
            StepOutcome::Converged => {
                ticks += 1;
                break;
            }
            StepOutcome::Idle => break,
        }
    }

    println!("\nAfter {ticks} ticks:");
    report(&viewer);
    Ok(())
}
