//! End-to-end volume and cost estimation on closed meshes

mod common;

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use printprep::{AnalysisConfig, CostParameters, ViewerState, estimate_cost, estimate_volume};

#[test]
fn test_twenty_mm_cube_quote() {
    let mesh = common::cube(20.0);
    let params = CostParameters::from_inputs("50", "0.05", "2");
    let summary = estimate_cost(&mesh, &params);

    assert_relative_eq!(summary.volume_cm3, 8.0, epsilon = 1e-9);
    assert_relative_eq!(summary.weight_grams, 4.96, epsilon = 1e-9);
    assert_relative_eq!(summary.material_cost, 0.248, epsilon = 1e-9);
    assert_relative_eq!(summary.print_time_hours, 0.4, epsilon = 1e-9);
    assert_relative_eq!(summary.time_cost, 0.8, epsilon = 1e-9);
    assert_relative_eq!(summary.total_cost, 1.048, epsilon = 1e-9);

    let text = summary.to_string();
    assert!(text.contains("Volume: 8.00 cm³"));
    assert!(text.contains("Weight: 4.96 g"));
    assert!(text.contains("Material cost: $0.25"));
    assert!(text.contains("Total cost: $1.05"));
}

#[test]
fn test_volume_of_rectangular_box() {
    let mesh = common::box_mesh(Point3::new(-5.0, 0.0, 2.0), Point3::new(5.0, 20.0, 32.0));
    // 10 x 20 x 30 mm = 6 cm³
    assert_relative_eq!(estimate_volume(&mesh), 6.0, epsilon = 1e-9);
}

#[test]
fn test_volume_ignores_placement() {
    let mesh = common::cube(10.0);
    let moved = mesh.translated(&Vector3::new(-250.0, 40.0, 1e3));
    assert_relative_eq!(estimate_volume(&mesh), estimate_volume(&moved), epsilon = 1e-9);
}

#[test]
fn test_invalid_inputs_zero_their_contribution() {
    let mesh = common::cube(20.0);
    let summary = estimate_cost(&mesh, &CostParameters::from_inputs("100", "", "NaN"));

    assert_relative_eq!(summary.weight_grams, 9.92, epsilon = 1e-9);
    assert_eq!(summary.material_cost, 0.0);
    assert_eq!(summary.time_cost, 0.0);
    assert_eq!(summary.total_cost, 0.0);
}

#[test]
fn test_viewer_quotes_unscaled_model() {
    let mesh = common::cube(20.0);
    let mut viewer = ViewerState::new(AnalysisConfig::default())
        .unwrap()
        .with_cost_parameters(CostParameters::new(0.5, 0.05, 2.0));
    viewer.load_mesh(mesh).unwrap();

    // The cube is displayed at 50 mm but quoted at its true 20 mm size.
    assert_relative_eq!(viewer.transform().scale, 2.5, epsilon = 1e-12);
    let summary = viewer.cost_summary().unwrap();
    assert_relative_eq!(summary.volume_cm3, 8.0, epsilon = 1e-9);
    assert_relative_eq!(summary.total_cost, 1.048, epsilon = 1e-9);

    viewer.update_cost_inputs("100", "0.05", "2");
    assert_relative_eq!(viewer.cost_summary().unwrap().total_cost, 2.096, epsilon = 1e-9);
}

#[test]
fn test_flat_buffers_round_trip_through_loader() {
    let (positions, normals) = common::flat_buffers(&common::cube(10.0));
    let mut viewer = ViewerState::new(AnalysisConfig::default()).unwrap();
    viewer.load_flat_arrays(&positions, &normals).unwrap();

    assert_eq!(viewer.mesh().unwrap().triangle_count(), 12);
    assert_relative_eq!(viewer.cost_summary().unwrap().volume_cm3, 1.0, epsilon = 1e-6);
}
