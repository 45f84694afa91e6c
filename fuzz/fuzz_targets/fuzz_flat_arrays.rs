#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<f32>, Vec<f32>)| {
    // Arbitrary loader buffers must either be rejected or analyzed, never panic.
    let (positions, normals) = data;
    let Ok(mesh) = printprep::TriangleMesh::from_flat_arrays(&positions, &normals) else {
        return;
    };

    let _ = printprep::estimate_volume(&mesh);
    let _ = mesh.bounding_box();
    let _ = mesh.with_face_normals();

    let mut viewer = match printprep::ViewerState::new(printprep::AnalysisConfig::default()) {
        Ok(viewer) => viewer,
        Err(_) => return,
    };
    let _ = viewer.load_flat_arrays(&positions, &normals);
});
