//! Material weight and cost estimation
//!
//! The print-time figure is a placeholder proxy (`volume * 0.1 * infill`
//! hours), not a slicer estimate. It is kept exactly so that quoted totals
//! stay comparable.

use std::fmt;

use crate::mesh::TriangleMesh;
use crate::volume::estimate_volume;

/// Density of PLA in g/cm³
pub const PLA_DENSITY_G_PER_CM3: f64 = 1.24;

/// Proxy print hours per cm³ of solid volume
pub const PRINT_HOURS_PER_CM3: f64 = 0.1;

/// Parse a user-supplied number, mapping anything unusable to zero
///
/// Unparseable, negative, NaN and infinite inputs all become `0.0`, so an
/// invalid field zeroes its own contribution instead of failing the estimate.
///
/// # Example
/// ```
/// use printprep::cost::lenient_number;
///
/// assert_eq!(lenient_number(" 0.05 "), 0.05);
/// assert_eq!(lenient_number("abc"), 0.0);
/// assert_eq!(lenient_number("-3"), 0.0);
/// ```
pub fn lenient_number(input: &str) -> f64 {
    sanitize(input.trim().parse::<f64>().unwrap_or(0.0))
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Externally supplied cost inputs
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostParameters {
    /// Fraction of solid volume actually printed, in `[0, 1]`
    pub infill_fraction: f64,
    /// Material cost per gram
    pub cost_per_gram: f64,
    /// Machine time cost per hour
    pub cost_per_hour: f64,
    /// Material density in g/cm³
    pub density: f64,
}

impl CostParameters {
    /// Create parameters for PLA, sanitizing every value
    pub fn new(infill_fraction: f64, cost_per_gram: f64, cost_per_hour: f64) -> Self {
        Self {
            infill_fraction: sanitize(infill_fraction).min(1.0),
            cost_per_gram: sanitize(cost_per_gram),
            cost_per_hour: sanitize(cost_per_hour),
            density: PLA_DENSITY_G_PER_CM3,
        }
    }

    /// Re-read raw form inputs
    ///
    /// `infill_percent` is a percentage (`"50"` means half infill), as the
    /// infill slider reports it. Invalid fields count as zero.
    pub fn from_inputs(infill_percent: &str, cost_per_gram: &str, cost_per_hour: &str) -> Self {
        Self::new(
            lenient_number(infill_percent) / 100.0,
            lenient_number(cost_per_gram),
            lenient_number(cost_per_hour),
        )
    }

    /// Use a material other than PLA
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = sanitize(density);
        self
    }

    /// The same parameters with every field passed through the zero mapping
    ///
    /// Fields are public, so values built by hand may be negative or NaN;
    /// this brings them back to what [`CostParameters::new`] guarantees.
    pub fn sanitized(self) -> Self {
        Self::new(self.infill_fraction, self.cost_per_gram, self.cost_per_hour)
            .with_density(self.density)
    }
}

impl Default for CostParameters {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }
}

/// Read-only snapshot of the derived figures for one mesh and parameter set
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostSummary {
    /// Enclosed volume in cm³
    pub volume_cm3: f64,
    /// Printed weight in grams
    pub weight_grams: f64,
    /// Material cost
    pub material_cost: f64,
    /// Proxy print time in hours
    pub print_time_hours: f64,
    /// Machine time cost
    pub time_cost: f64,
    /// Material plus time cost
    pub total_cost: f64,
}

impl CostSummary {
    /// Derive every figure from a volume in cm³
    pub fn from_volume(volume_cm3: f64, params: &CostParameters) -> Self {
        let weight_grams = volume_cm3 * params.density * params.infill_fraction;
        let material_cost = weight_grams * params.cost_per_gram;
        let print_time_hours = volume_cm3 * PRINT_HOURS_PER_CM3 * params.infill_fraction;
        let time_cost = print_time_hours * params.cost_per_hour;

        Self {
            volume_cm3,
            weight_grams,
            material_cost,
            print_time_hours,
            time_cost,
            total_cost: material_cost + time_cost,
        }
    }
}

impl fmt::Display for CostSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Volume: {:.2} cm³", self.volume_cm3)?;
        writeln!(f, "Weight: {:.2} g", self.weight_grams)?;
        writeln!(f, "Material cost: ${:.2}", self.material_cost)?;
        write!(f, "Total cost: ${:.2}", self.total_cost)
    }
}

/// Estimate volume, weight and cost of a mesh
///
/// Positions are read in model units (millimetres); any display scaling
/// applied to the model does not enter the estimate.
pub fn estimate_cost(mesh: &TriangleMesh, params: &CostParameters) -> CostSummary {
    CostSummary::from_volume(estimate_volume(mesh), params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_twenty_mm_cube_figures() {
        let params = CostParameters::new(0.5, 0.05, 2.0);
        let summary = CostSummary::from_volume(8.0, &params);

        assert_relative_eq!(summary.weight_grams, 4.96, epsilon = 1e-12);
        assert_relative_eq!(summary.material_cost, 0.248, epsilon = 1e-12);
        assert_relative_eq!(summary.print_time_hours, 0.4, epsilon = 1e-12);
        assert_relative_eq!(summary.time_cost, 0.8, epsilon = 1e-12);
        assert_relative_eq!(summary.total_cost, 1.048, epsilon = 1e-12);
    }

    #[test]
    fn test_from_inputs_percent_and_invalid_fields() {
        let params = CostParameters::from_inputs("50", "not a price", "2");
        assert_eq!(params.infill_fraction, 0.5);
        assert_eq!(params.cost_per_gram, 0.0);
        assert_eq!(params.cost_per_hour, 2.0);

        let summary = CostSummary::from_volume(8.0, &params);
        assert_eq!(summary.material_cost, 0.0);
        assert_relative_eq!(summary.total_cost, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_infill_is_clamped() {
        assert_eq!(CostParameters::new(3.0, 0.0, 0.0).infill_fraction, 1.0);
        assert_eq!(CostParameters::new(-0.5, 0.0, 0.0).infill_fraction, 0.0);
        assert_eq!(CostParameters::from_inputs("250", "0", "0").infill_fraction, 1.0);
    }

    #[test]
    fn test_lenient_number_rejects_non_finite() {
        assert_eq!(lenient_number("NaN"), 0.0);
        assert_eq!(lenient_number("inf"), 0.0);
        assert_eq!(lenient_number(""), 0.0);
        assert_eq!(lenient_number("1e2"), 100.0);
    }

    #[test]
    fn test_custom_density() {
        let params = CostParameters::new(1.0, 1.0, 0.0).with_density(1.04);
        let summary = CostSummary::from_volume(10.0, &params);
        assert_relative_eq!(summary.weight_grams, 10.4, epsilon = 1e-12);
    }

    #[test]
    fn test_display_rounds_to_cents() {
        let params = CostParameters::new(0.5, 0.05, 2.0);
        let text = CostSummary::from_volume(8.0, &params).to_string();
        assert!(text.contains("Volume: 8.00 cm³"));
        assert!(text.contains("Weight: 4.96 g"));
        assert!(text.contains("Material cost: $0.25"));
        assert!(text.contains("Total cost: $1.05"));
    }

    #[test]
    fn test_sanitized_maps_hand_built_values() {
        let params = CostParameters {
            infill_fraction: 3.0,
            cost_per_gram: -1.0,
            cost_per_hour: f64::NAN,
            density: f64::INFINITY,
        }
        .sanitized();

        assert_eq!(params.infill_fraction, 1.0);
        assert_eq!(params.cost_per_gram, 0.0);
        assert_eq!(params.cost_per_hour, 0.0);
        assert_eq!(params.density, 0.0);

        let valid = CostParameters::new(0.5, 0.05, 2.0);
        assert_eq!(valid.sanitized(), valid);
    }

    #[test]
    fn test_empty_mesh_costs_nothing() {
        let summary = estimate_cost(&TriangleMesh::new(), &CostParameters::new(1.0, 1.0, 1.0));
        assert_eq!(summary.total_cost, 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_summary_serializes_every_figure() {
        let summary = CostSummary::from_volume(8.0, &CostParameters::new(0.5, 0.05, 2.0));
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["volume_cm3"], 8.0);
        assert_eq!(json["weight_grams"], summary.weight_grams);
        assert_eq!(json["total_cost"], summary.total_cost);

        let back: CostSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }
}
