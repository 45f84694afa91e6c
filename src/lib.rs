//! # printprep
//!
//! Geometry analysis for preparing triangle meshes for 3D printing.
//!
//! Given a triangle soup (per-vertex positions and normals, three vertices per
//! triangle) this crate estimates printed volume and cost, detects overhanging
//! faces, computes the rotation that lays a picked face on the build plate, and
//! generates simple support columns under overhangs.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - Signed-tetrahedron volume and material/time cost estimation
//! - Overhang classification against a configurable angle threshold
//! - Face-to-bed reorientation with incremental rotation toward the target
//! - One support column per overhang face
//! - Screen-space picking against the placed mesh
//!
//! ## Example
//!
//! ```
//! use printprep::{AnalysisConfig, CostParameters, TriangleMesh, ViewerState};
//!
//! # fn main() -> printprep::Result<()> {
//! let positions = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0];
//! let normals = [0.0, -1.0, 0.0, 0.0, -1.0, 0.0, 0.0, -1.0, 0.0];
//! let mesh = TriangleMesh::from_flat_arrays(&positions, &normals)?;
//!
//! let mut viewer = ViewerState::new(AnalysisConfig::default())?
//!     .with_cost_parameters(CostParameters::new(0.2, 0.05, 1.5));
//! viewer.load_mesh(mesh)?;
//!
//! assert!(viewer.classification().is_some_and(|c| c.has_overhangs()));
//! assert_eq!(viewer.supports().len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod cost;
pub mod error;
pub mod mesh;
pub mod orientation;
pub mod overhang;
pub mod pick;
pub mod state;
pub mod support;
pub mod volume;

pub use config::AnalysisConfig;
pub use cost::{CostParameters, CostSummary, estimate_cost};
pub use error::{Error, Result};
pub use mesh::{BoundingBox, ModelTransform, Triangle, TriangleMesh};
pub use orientation::{rotate_towards, solve_placement, solve_rotation};
pub use overhang::{Classification, FaceClass, classify, classify_in_world};
pub use pick::{Camera, PickHit, PickRay, Viewport, resolve_pick, resolve_ray};
pub use state::{PickOutcome, ReorientOutcome, RotationState, StepOutcome, ViewerState};
pub use support::{SupportColumn, generate_supports};
pub use volume::{compute_signed_volume, estimate_volume};
