//! Analysis settings and the tolerances they default to
//!
//! Every threshold the analysis depends on is a named constant here, and
//! [`AnalysisConfig`] bundles them so a caller can override any of them.

use nalgebra::Vector3;

use crate::error::{Error, Result};

/// Angle from the up vector above which a face is an overhang (degrees)
///
/// 135° from up is 45° below horizontal.
pub const OVERHANG_THRESHOLD_DEGREES: f64 = 135.0;

/// Maximum angle the model turns per animation tick (radians)
pub const ROTATION_STEP_RADIANS: f64 = 0.05;

/// Angular distance below which a rotation snaps to its target (radians)
pub const CONVERGENCE_TOLERANCE_RADIANS: f64 = 0.01;

/// Cross-product magnitude below which two unit vectors count as parallel
pub const PARALLEL_EPSILON: f64 = 1e-6;

/// Side length of a support column's square cross-section
pub const DEFAULT_COLUMN_WIDTH: f64 = 1.0;

/// Elevation of the print bed
pub const DEFAULT_BASE_ELEVATION: f64 = 0.0;

/// Largest model dimension after fit-to-view scaling
pub const FIT_SIZE: f64 = 50.0;

/// World up direction
pub fn up() -> Vector3<f64> {
    Vector3::y()
}

/// World down direction, the default reorientation target
pub fn down() -> Vector3<f64> {
    -Vector3::y()
}

/// Geometric settings shared by classification, reorientation and supports
///
/// # Example
///
/// ```
/// use printprep::AnalysisConfig;
///
/// let config = AnalysisConfig::new()
///     .with_column_width(2.0)
///     .with_overhang_threshold(120.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisConfig {
    /// Reference "up" direction for overhang classification
    pub up: Vector3<f64>,
    /// Overhang threshold in degrees from `up` (strictly greater is overhang)
    pub overhang_threshold_degrees: f64,
    /// Per-tick rotation step in radians
    pub rotation_step: f64,
    /// Convergence tolerance in radians
    pub convergence_tolerance: f64,
    /// Parallel-vector epsilon for the reorientation solver
    pub parallel_epsilon: f64,
    /// Support column width
    pub column_width: f64,
    /// Print bed elevation
    pub base_elevation: f64,
    /// Fit-to-view target size
    pub fit_size: f64,
}

impl AnalysisConfig {
    /// Create a configuration holding the default tolerances
    pub fn new() -> Self {
        Self {
            up: up(),
            overhang_threshold_degrees: OVERHANG_THRESHOLD_DEGREES,
            rotation_step: ROTATION_STEP_RADIANS,
            convergence_tolerance: CONVERGENCE_TOLERANCE_RADIANS,
            parallel_epsilon: PARALLEL_EPSILON,
            column_width: DEFAULT_COLUMN_WIDTH,
            base_elevation: DEFAULT_BASE_ELEVATION,
            fit_size: FIT_SIZE,
        }
    }

    /// Set the reference up direction
    pub fn with_up(mut self, up: Vector3<f64>) -> Self {
        self.up = up;
        self
    }

    /// Set the overhang threshold in degrees from up
    pub fn with_overhang_threshold(mut self, degrees: f64) -> Self {
        self.overhang_threshold_degrees = degrees;
        self
    }

    /// Set the per-tick rotation step in radians
    pub fn with_rotation_step(mut self, radians: f64) -> Self {
        self.rotation_step = radians;
        self
    }

    /// Set the convergence tolerance in radians
    pub fn with_convergence_tolerance(mut self, radians: f64) -> Self {
        self.convergence_tolerance = radians;
        self
    }

    /// Set the support column width
    pub fn with_column_width(mut self, width: f64) -> Self {
        self.column_width = width;
        self
    }

    /// Set the print bed elevation
    pub fn with_base_elevation(mut self, elevation: f64) -> Self {
        self.base_elevation = elevation;
        self
    }

    /// Set the fit-to-view target size
    pub fn with_fit_size(mut self, size: f64) -> Self {
        self.fit_size = size;
        self
    }

    /// Check that every setting is finite and in range
    pub fn validate(&self) -> Result<()> {
        if !self.up.iter().all(|c| c.is_finite()) || self.up.norm() <= 0.0 {
            return Err(Error::invalid_setting(
                "up",
                format!("({}, {}, {})", self.up.x, self.up.y, self.up.z),
                "a finite non-zero vector",
            ));
        }

        let threshold = self.overhang_threshold_degrees;
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 180.0 {
            return Err(Error::invalid_setting(
                "overhang_threshold_degrees",
                threshold,
                "in the range (0, 180]",
            ));
        }

        let positive = [
            ("rotation_step", self.rotation_step),
            ("convergence_tolerance", self.convergence_tolerance),
            ("parallel_epsilon", self.parallel_epsilon),
            ("column_width", self.column_width),
            ("fit_size", self.fit_size),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid_setting(name, value, "a positive number"));
            }
        }

        if !self.base_elevation.is_finite() {
            return Err(Error::invalid_setting(
                "base_elevation",
                self.base_elevation,
                "a finite number",
            ));
        }

        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}
