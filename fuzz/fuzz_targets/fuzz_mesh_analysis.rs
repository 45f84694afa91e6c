#![no_main]

use libfuzzer_sys::arbitrary::{Arbitrary, Result, Unstructured};
use libfuzzer_sys::fuzz_target;
use nalgebra::{Point3, Vector3};

#[derive(Debug)]
struct FuzzSession {
    triangles: Vec<[(f64, f64, f64); 4]>,
    picks: Vec<(f64, f64, f64)>,
    ticks: u8,
}

impl<'a> Arbitrary<'a> for FuzzSession {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let triangle_count = u.int_in_range(0..=64)?;
        let mut triangles = Vec::with_capacity(triangle_count);
        for _ in 0..triangle_count {
            triangles.push(u.arbitrary()?);
        }

        let pick_count = u.int_in_range(0..=4)?;
        let mut picks = Vec::with_capacity(pick_count);
        for _ in 0..pick_count {
            picks.push(u.arbitrary()?);
        }

        Ok(FuzzSession {
            triangles,
            picks,
            ticks: u.arbitrary()?,
        })
    }
}

fuzz_target!(|session: FuzzSession| {
    // Non-finite and degenerate geometry is allowed through on purpose: every
    // analysis step must tolerate it.
    let mesh = printprep::TriangleMesh::from_triangles(session.triangles.iter().map(|t| {
        let p = |(x, y, z): (f64, f64, f64)| Point3::new(x, y, z);
        let (nx, ny, nz) = t[3];
        let n = Vector3::new(nx, ny, nz);
        printprep::Triangle::new([p(t[0]), p(t[1]), p(t[2])], [n; 3])
    }));

    let _ = printprep::estimate_volume(&mesh);
    let _ = printprep::classify(&mesh, &Vector3::y(), 135.0);

    let Ok(mut viewer) = printprep::ViewerState::new(printprep::AnalysisConfig::default()) else {
        return;
    };
    if viewer.load_mesh(mesh).is_err() {
        return;
    }

    for (x, y, z) in session.picks {
        let _ = viewer.request_reorientation(&Vector3::new(x, y, z));
        for _ in 0..session.ticks {
            viewer.step();
        }
    }
});
