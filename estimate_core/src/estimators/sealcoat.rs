//! # Sealcoat Coverage Estimator
//!
//! Sealer quantity and cost estimation for asphalt and concrete surfaces.
//! Coverage rate is a lookup over `(SurfaceType, SurfaceCondition)`; real
//! coverage rates are empirically tiered, not a linear formula. Gallons
//! scale with coat count; sand and costs are derived from caller-supplied
//! per-unit rates.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::estimators::sealcoat::{
//!     calculate, SealcoatInput, SurfaceCondition, SurfaceType,
//! };
//!
//! let input = SealcoatInput {
//!     length_ft: 200.0,
//!     width_ft: 50.0,
//!     number_of_coats: 2,
//!     surface_type: SurfaceType::Asphalt,
//!     surface_condition: SurfaceCondition::Good,
//!     sealer_cost_per_gallon: 3.25,
//!     labor_rate_per_sqft: 0.05,
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.total_area_sqft, 10_000.0);
//! assert_eq!(result.gallons_needed, 10_000.0 / 80.0 * 2.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Pavement surface material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceType {
    Asphalt,
    Concrete,
}

/// Observed condition of the existing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceCondition {
    New,
    Good,
    Fair,
    Poor,
    Oxidized,
}

/// Sand loading: one 50 lb bag per this many gallons of mixed sealer
const GALLONS_PER_SAND_BAG: f64 = 6.0;

/// First-coat coverage rate in square feet per gallon.
///
/// Rougher, more porous, or oxidized surfaces absorb more sealer and get a
/// lower rate. Concrete is less porous than weathered asphalt at the same
/// nominal condition.
pub fn coverage_rate(surface: SurfaceType, condition: SurfaceCondition) -> f64 {
    match (surface, condition) {
        (SurfaceType::Asphalt, SurfaceCondition::New) => 95.0,
        (SurfaceType::Asphalt, SurfaceCondition::Good) => 80.0,
        (SurfaceType::Asphalt, SurfaceCondition::Fair) => 70.0,
        (SurfaceType::Asphalt, SurfaceCondition::Poor) => 60.0,
        (SurfaceType::Asphalt, SurfaceCondition::Oxidized) => 55.0,
        (SurfaceType::Concrete, SurfaceCondition::New) => 90.0,
        (SurfaceType::Concrete, SurfaceCondition::Good) => 85.0,
        (SurfaceType::Concrete, SurfaceCondition::Fair) => 75.0,
        (SurfaceType::Concrete, SurfaceCondition::Poor) => 65.0,
        (SurfaceType::Concrete, SurfaceCondition::Oxidized) => 60.0,
    }
}

/// Input parameters for a sealcoat estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealcoatInput {
    /// Lot length in feet
    pub length_ft: f64,
    /// Lot width in feet
    pub width_ft: f64,
    /// Number of coats to apply (1-3 typical)
    pub number_of_coats: u32,
    /// Surface material
    pub surface_type: SurfaceType,
    /// Surface condition tier
    pub surface_condition: SurfaceCondition,
    /// Sealer price per gallon, supplied by the caller
    pub sealer_cost_per_gallon: f64,
    /// Labor rate per square foot, supplied by the caller
    pub labor_rate_per_sqft: f64,
}

impl SealcoatInput {
    /// Validate input parameters.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.length_ft <= 0.0 {
            return Err(EstimateError::invalid_input(
                "length_ft",
                self.length_ft.to_string(),
                "Length must be positive",
            ));
        }
        if self.width_ft <= 0.0 {
            return Err(EstimateError::invalid_input(
                "width_ft",
                self.width_ft.to_string(),
                "Width must be positive",
            ));
        }
        if self.number_of_coats == 0 {
            return Err(EstimateError::invalid_input(
                "number_of_coats",
                "0",
                "At least one coat is required",
            ));
        }
        if self.sealer_cost_per_gallon < 0.0 {
            return Err(EstimateError::invalid_input(
                "sealer_cost_per_gallon",
                self.sealer_cost_per_gallon.to_string(),
                "Cost rate cannot be negative",
            ));
        }
        if self.labor_rate_per_sqft < 0.0 {
            return Err(EstimateError::invalid_input(
                "labor_rate_per_sqft",
                self.labor_rate_per_sqft.to_string(),
                "Labor rate cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Results from a sealcoat estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealcoatOutput {
    /// Total surface area in square feet
    pub total_area_sqft: f64,
    /// Selected coverage rate in sqft per gallon
    pub coverage_rate_sqft_per_gal: f64,
    /// Sealer gallons required across all coats
    pub gallons_needed: f64,
    /// 50 lb sand bags for the mix, rounded up
    pub sand_bags_needed: u32,
    /// Sealer material cost
    pub material_cost: f64,
    /// Labor cost over the full area
    pub labor_cost: f64,
    /// Material plus labor
    pub total_project_cost: f64,
    /// Human-readable description for the history ledger
    pub formula_text: String,
}

/// Estimate sealer quantity and cost.
pub fn calculate(input: &SealcoatInput) -> EstimateResult<SealcoatOutput> {
    input.validate()?;

    let total_area = input.length_ft * input.width_ft;
    let rate = coverage_rate(input.surface_type, input.surface_condition);
    let gallons = total_area / rate * input.number_of_coats as f64;
    let sand_bags = (gallons / GALLONS_PER_SAND_BAG).ceil() as u32;

    let material_cost = gallons * input.sealer_cost_per_gallon;
    let labor_cost = total_area * input.labor_rate_per_sqft;

    Ok(SealcoatOutput {
        total_area_sqft: total_area,
        coverage_rate_sqft_per_gal: rate,
        gallons_needed: gallons,
        sand_bags_needed: sand_bags,
        material_cost,
        labor_cost,
        total_project_cost: material_cost + labor_cost,
        formula_text: format!(
            "gallons = {:.0} sqft / {:.0} sqft/gal x {} coats",
            total_area, rate, input.number_of_coats
        ),
    })
}
