//! Viewer state machine
//!
//! [`ViewerState`] owns the current mesh, its placement and the derived
//! analysis (classification, supports, cost). Events are applied one at a
//! time: loading a mesh, changing cost inputs, picking a face, and advancing
//! an in-progress rotation with [`ViewerState::step`].
//!
//! Rotation is modelled as `Idle` or `Rotating`. While rotating, picks are
//! ignored; a new load cancels the rotation outright. When a rotation
//! converges the model is set down on the bed and the classification and
//! supports are regenerated exactly once.
//!
//! Every recompute is staged before being committed, so a failure leaves the
//! last good results in place.

use nalgebra::{Matrix4, UnitQuaternion, Vector3};
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::cost::{CostParameters, CostSummary, estimate_cost};
use crate::error::Result;
use crate::mesh::{ModelTransform, TriangleMesh};
use crate::orientation::{rotate_towards, solve_rotation, target_orientation};
use crate::overhang::{Classification, classify_in_world};
use crate::pick::{Camera, PickHit, Viewport, resolve_pick};
use crate::support::{SupportColumn, generate_supports};

/// A solved reorientation being approached tick by tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRotation {
    /// Orientation when the rotation was requested
    pub start: UnitQuaternion<f64>,
    /// Orientation to reach
    pub target: UnitQuaternion<f64>,
}

/// Whether a rotation is in progress
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RotationState {
    /// No rotation in progress
    #[default]
    Idle,
    /// Approaching a target orientation
    Rotating(PendingRotation),
}

/// Result of a reorientation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReorientOutcome {
    /// A rotation toward `target` has begun
    Started {
        /// Absolute orientation to reach
        target: UnitQuaternion<f64>,
    },
    /// A rotation is already in progress; the request was ignored
    Busy,
    /// No model is loaded
    NoModel,
}

/// Result of a pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickOutcome {
    /// The pick hit a face and a rotation has begun
    Started(PickHit),
    /// The pick missed the model
    Missed,
    /// A rotation is already in progress; the pick was ignored
    Busy,
    /// No model is loaded
    NoModel,
}

/// Result of one animation tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Nothing to do
    Idle,
    /// Still rotating; `remaining` radians to go
    Rotating {
        /// Angular distance left to the target
        remaining: f64,
    },
    /// Reached the target this tick; the analysis was regenerated
    Converged,
}

/// Owned state of one viewer session
#[derive(Debug, Clone)]
pub struct ViewerState {
    config: AnalysisConfig,
    cost_parameters: CostParameters,
    mesh: Option<TriangleMesh>,
    transform: ModelTransform,
    rotation: RotationState,
    classification: Option<Classification>,
    supports: Vec<SupportColumn>,
    cost: Option<CostSummary>,
}

impl ViewerState {
    /// Create an empty session; fails if `config` is invalid
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cost_parameters: CostParameters::default(),
            mesh: None,
            transform: ModelTransform::identity(),
            rotation: RotationState::Idle,
            classification: None,
            supports: Vec::new(),
            cost: None,
        })
    }

    /// Set the initial cost parameters
    pub fn with_cost_parameters(mut self, params: CostParameters) -> Self {
        self.cost_parameters = params.sanitized();
        self
    }

    /// Analysis settings
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Current cost parameters
    pub fn cost_parameters(&self) -> &CostParameters {
        &self.cost_parameters
    }

    /// The loaded mesh in model space
    pub fn mesh(&self) -> Option<&TriangleMesh> {
        self.mesh.as_ref()
    }

    /// Current placement of the model
    pub fn transform(&self) -> &ModelTransform {
        &self.transform
    }

    /// Current world matrix of the model
    pub fn world_matrix(&self) -> Matrix4<f64> {
        self.transform.to_matrix()
    }

    /// Latest normal/overhang partition
    pub fn classification(&self) -> Option<&Classification> {
        self.classification.as_ref()
    }

    /// Latest support columns
    pub fn supports(&self) -> &[SupportColumn] {
        &self.supports
    }

    /// Latest cost summary
    pub fn cost_summary(&self) -> Option<&CostSummary> {
        self.cost.as_ref()
    }

    /// Rotation state
    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    /// Whether a rotation is in progress
    pub fn is_rotating(&self) -> bool {
        matches!(self.rotation, RotationState::Rotating(_))
    }

    /// Replace the model, cancelling any rotation in progress
    ///
    /// The model is fitted to view (centred, largest dimension scaled to the
    /// configured fit size) and fully re-analyzed. An empty mesh cannot be
    /// fitted and is rejected. On error the previous model and results are
    /// kept.
    pub fn load_mesh(&mut self, mesh: TriangleMesh) -> Result<()> {
        let transform = self.fit_to_view(&mesh)?;
        let (classification, supports) = self.analyze(&mesh, &transform)?;
        let cost = estimate_cost(&mesh, &self.cost_parameters);

        if let RotationState::Rotating(pending) = self.rotation {
            info!(
                remaining = self.transform.rotation.angle_to(&pending.target),
                "new model loaded; pending rotation discarded"
            );
        }

        info!(
            triangles = mesh.triangle_count(),
            scale = transform.scale,
            volume_cm3 = cost.volume_cm3,
            "model loaded"
        );

        self.rotation = RotationState::Idle;
        self.transform = transform;
        self.classification = Some(classification);
        self.supports = supports;
        self.cost = Some(cost);
        self.mesh = Some(mesh);
        Ok(())
    }

    /// Build a mesh from loader buffers and load it
    ///
    /// Malformed buffers are rejected before anything is replaced.
    pub fn load_flat_arrays(&mut self, positions: &[f32], normals: &[f32]) -> Result<()> {
        let mesh = TriangleMesh::from_flat_arrays(positions, normals)?;
        self.load_mesh(mesh)
    }

    /// Replace the cost parameters and recompute the summary
    ///
    /// Negative or non-finite values count as zero.
    pub fn set_cost_parameters(&mut self, params: CostParameters) {
        self.cost_parameters = params.sanitized();
        if let Some(mesh) = &self.mesh {
            self.cost = Some(estimate_cost(mesh, &self.cost_parameters));
        }
    }

    /// Re-read raw cost inputs; unusable fields count as zero
    pub fn update_cost_inputs(&mut self, infill_percent: &str, cost_per_gram: &str, cost_per_hour: &str) {
        self.set_cost_parameters(
            CostParameters::from_inputs(infill_percent, cost_per_gram, cost_per_hour)
                .with_density(self.cost_parameters.density),
        );
    }

    /// Start turning the model so the face with `face_normal_world` points down
    pub fn request_reorientation(&mut self, face_normal_world: &Vector3<f64>) -> ReorientOutcome {
        if self.mesh.is_none() {
            return ReorientOutcome::NoModel;
        }
        if self.is_rotating() {
            debug!("reorientation requested while rotating; ignored");
            return ReorientOutcome::Busy;
        }

        let down = -self.config.up;
        let delta = solve_rotation(face_normal_world, &down, self.config.parallel_epsilon);
        let start = self.transform.rotation;
        let target = target_orientation(&start, &delta);

        info!(angle = delta.angle(), "reorientation started");
        self.rotation = RotationState::Rotating(PendingRotation { start, target });
        ReorientOutcome::Started { target }
    }

    /// Pick the face under a client pixel and, on a hit, start reorienting
    pub fn pick(
        &mut self,
        client_x: f64,
        client_y: f64,
        viewport: &Viewport,
        camera: &Camera,
    ) -> PickOutcome {
        if self.is_rotating() {
            debug!("pick while rotating; ignored");
            return PickOutcome::Busy;
        }
        let Some(mesh) = &self.mesh else {
            return PickOutcome::NoModel;
        };

        let world = self.world_matrix();
        let Some(hit) = resolve_pick(client_x, client_y, viewport, camera, mesh, &world) else {
            debug!(client_x, client_y, "pick missed the model");
            return PickOutcome::Missed;
        };

        match self.request_reorientation(&hit.face_normal_world) {
            ReorientOutcome::Started { .. } => PickOutcome::Started(hit),
            ReorientOutcome::Busy => PickOutcome::Busy,
            ReorientOutcome::NoModel => PickOutcome::NoModel,
        }
    }

    /// Advance the rotation by the configured step
    pub fn step(&mut self) -> StepOutcome {
        self.step_by(self.config.rotation_step)
    }

    /// Advance the rotation by at most `max_angle` radians
    ///
    /// Within the convergence tolerance the orientation snaps exactly to the
    /// target, the model is set on the bed and the analysis is regenerated;
    /// that happens on exactly one call, which returns `Converged`. A step
    /// that is not a positive number jumps straight to the target.
    pub fn step_by(&mut self, max_angle: f64) -> StepOutcome {
        let RotationState::Rotating(pending) = self.rotation else {
            return StepOutcome::Idle;
        };

        let current = if max_angle > 0.0 {
            rotate_towards(&self.transform.rotation, &pending.target, max_angle)
        } else {
            pending.target
        };
        let remaining = current.angle_to(&pending.target);
        if remaining >= self.config.convergence_tolerance {
            self.transform.rotation = current;
            return StepOutcome::Rotating { remaining };
        }

        self.transform.rotation = pending.target;
        self.rotation = RotationState::Idle;
        self.settle_on_bed();
        if let Err(err) = self.refresh_analysis() {
            warn!(error = %err, "analysis after rotation failed; keeping previous results");
        }
        info!("reorientation converged");
        StepOutcome::Converged
    }

    /// Centre the model over the origin in x/z and rest its lowest point on the bed
    fn settle_on_bed(&mut self) {
        let Some(mesh) = &self.mesh else {
            return;
        };
        let Ok(bounds) = mesh.transformed_bounding_box(&self.world_matrix()) else {
            return;
        };
        let center = bounds.center();
        self.transform.translation.x -= center.x;
        self.transform.translation.z -= center.z;
        self.transform.translation.y += self.config.base_elevation - bounds.min.y;
    }

    /// Recompute classification and supports for the current placement
    pub fn refresh_analysis(&mut self) -> Result<()> {
        let Some(mesh) = &self.mesh else {
            return Ok(());
        };
        let (classification, supports) = self.analyze(mesh, &self.transform)?;
        self.classification = Some(classification);
        self.supports = supports;
        Ok(())
    }

    fn analyze(
        &self,
        mesh: &TriangleMesh,
        transform: &ModelTransform,
    ) -> Result<(Classification, Vec<SupportColumn>)> {
        let world = transform.to_matrix();
        let classification = classify_in_world(
            mesh,
            &world,
            &self.config.up,
            self.config.overhang_threshold_degrees,
        )?;
        let supports = generate_supports(
            &classification.overhang,
            &world,
            self.config.base_elevation,
            self.config.column_width,
        );
        Ok((classification, supports))
    }

    fn fit_to_view(&self, mesh: &TriangleMesh) -> Result<ModelTransform> {
        let bounds = mesh.bounding_box()?;
        let max_dimension = bounds.max_dimension();
        let scale = if max_dimension.is_finite() && max_dimension > 0.0 {
            self.config.fit_size / max_dimension
        } else {
            1.0
        };
        Ok(ModelTransform {
            translation: -bounds.center().coords * scale,
            rotation: UnitQuaternion::identity(),
            scale,
        })
    }
}
