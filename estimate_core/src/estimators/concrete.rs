//! # Concrete Volume & Rebar Estimators
//!
//! Slab volume with an optional waste factor, converted to cubic yards at
//! the fixed 27 cuft/cuyd constant, and a rebar takeoff from on-center
//! spacing. The waste factor is the one explicitly optional field; every
//! dimension is required and must be positive.

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::units::CUFT_PER_CUYD;

/// Default rebar spacing in inches on-center
pub const DEFAULT_REBAR_SPACING_IN: f64 = 12.0;

/// Input parameters for a concrete volume estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteVolumeInput {
    /// Pour length in feet
    pub length_ft: f64,
    /// Pour width in feet
    pub width_ft: f64,
    /// Pour height (thickness) in feet
    pub height_ft: f64,
    /// Optional waste allowance in percent (e.g., 10.0 for 10%)
    #[serde(default)]
    pub waste_factor_pct: Option<f64>,
}

impl ConcreteVolumeInput {
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
        if self.height_ft <= 0.0 {
            return Err(EstimateError::invalid_input(
                "height_ft",
                self.height_ft.to_string(),
                "Height must be positive",
            ));
        }
        if let Some(waste) = self.waste_factor_pct {
            if !(0.0..=100.0).contains(&waste) {
                return Err(EstimateError::invalid_input(
                    "waste_factor_pct",
                    waste.to_string(),
                    "Waste factor must be between 0 and 100 percent",
                ));
            }
        }
        Ok(())
    }
}

/// Results from a concrete volume estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteVolumeOutput {
    /// Geometric volume in cubic feet
    pub volume_cuft: f64,
    /// Volume including the waste allowance
    pub waste_adjusted_cuft: f64,
    /// Order quantity in cubic yards
    pub cubic_yards: f64,
    /// Human-readable description for the history ledger
    pub formula_text: String,
}

/// Estimate concrete volume.
///
/// # Example
///
/// ```rust
/// use estimate_core::estimators::concrete::{calculate_volume, ConcreteVolumeInput};
///
/// let input = ConcreteVolumeInput {
///     length_ft: 10.0,
///     width_ft: 10.0,
///     height_ft: 0.5,
///     waste_factor_pct: Some(10.0),
/// };
/// let result = calculate_volume(&input).unwrap();
/// assert_eq!(result.volume_cuft, 50.0);
/// assert_eq!(result.waste_adjusted_cuft, 55.0);
/// assert!((result.cubic_yards - 2.037).abs() < 0.001);
/// ```
pub fn calculate_volume(input: &ConcreteVolumeInput) -> EstimateResult<ConcreteVolumeOutput> {
    input.validate()?;

    let volume = input.length_ft * input.width_ft * input.height_ft;
    let waste_pct = input.waste_factor_pct.unwrap_or(0.0);
    let waste_adjusted = volume * (1.0 + waste_pct / 100.0);
    let cubic_yards = waste_adjusted / CUFT_PER_CUYD;

    Ok(ConcreteVolumeOutput {
        volume_cuft: volume,
        waste_adjusted_cuft: waste_adjusted,
        cubic_yards,
        formula_text: format!(
            "V = {} x {} x {} cuft, +{}% waste, / 27 cuft/cuyd",
            input.length_ft, input.width_ft, input.height_ft, waste_pct
        ),
    })
}

/// Input parameters for a rebar takeoff over a rectangular mat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebarInput {
    /// Mat length in feet
    pub length_ft: f64,
    /// Mat width in feet
    pub width_ft: f64,
    /// On-center spacing in inches; defaults to 12 in when omitted
    #[serde(default)]
    pub spacing_in: Option<f64>,
}

impl RebarInput {
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
        if let Some(spacing) = self.spacing_in {
            if spacing <= 0.0 {
                return Err(EstimateError::invalid_input(
                    "spacing_in",
                    spacing.to_string(),
                    "Spacing must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Results from a rebar takeoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebarOutput {
    /// Bars running the length direction (count across the width)
    pub bars_lengthwise: u32,
    /// Bars running the width direction (count across the length)
    pub bars_widthwise: u32,
    /// Total bar length in feet across both directions
    pub total_linear_ft: f64,
    /// Spacing actually used, in inches
    pub spacing_in: f64,
    /// Human-readable description for the history ledger
    pub formula_text: String,
}

/// Estimate rebar counts and total length for a two-way mat.
///
/// Bar count per axis is the number of spacing intervals across the other
/// axis plus the edge bar, so a 10 ft span at 12 in on-center takes 11 bars.
pub fn calculate_rebar(input: &RebarInput) -> EstimateResult<RebarOutput> {
    input.validate()?;

    let spacing_in = input.spacing_in.unwrap_or(DEFAULT_REBAR_SPACING_IN);
    let spacing_ft = spacing_in / 12.0;

    let bars_lengthwise = (input.width_ft / spacing_ft).floor() as u32 + 1;
    let bars_widthwise = (input.length_ft / spacing_ft).floor() as u32 + 1;

    let total_linear_ft =
        bars_lengthwise as f64 * input.length_ft + bars_widthwise as f64 * input.width_ft;

    Ok(RebarOutput {
        bars_lengthwise,
        bars_widthwise,
        total_linear_ft,
        spacing_in,
        formula_text: format!(
            "bars per axis = floor(span / {} in o.c.) + 1, total {} lf",
            spacing_in, total_linear_ft
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_reference_vector() {
        let input = ConcreteVolumeInput {
            length_ft: 10.0,
            width_ft: 10.0,
            height_ft: 0.5,
            waste_factor_pct: Some(10.0),
        };
        let result = calculate_volume(&input).unwrap();
        assert_eq!(result.volume_cuft, 50.0);
        assert_eq!(result.waste_adjusted_cuft, 55.0);
        assert!((result.cubic_yards - 2.0370370).abs() < 1e-6);
    }

    #[test]
    fn test_waste_factor_defaults_to_zero() {
        let input = ConcreteVolumeInput {
            length_ft: 9.0,
            width_ft: 3.0,
            height_ft: 1.0,
            waste_factor_pct: None,
        };
        let result = calculate_volume(&input).unwrap();
        assert_eq!(result.volume_cuft, 27.0);
        assert_eq!(result.waste_adjusted_cuft, 27.0);
        assert_eq!(result.cubic_yards, 1.0);
    }

    #[test]
    fn test_nonpositive_dimension_rejected() {
        let input = ConcreteVolumeInput {
            length_ft: 10.0,
            width_ft: -1.0,
            height_ft: 0.5,
            waste_factor_pct: None,
        };
        let err = calculate_volume(&input).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_waste_factor_bounds() {
        let input = ConcreteVolumeInput {
            length_ft: 10.0,
            width_ft: 10.0,
            height_ft: 0.5,
            waste_factor_pct: Some(150.0),
        };
        assert!(calculate_volume(&input).is_err());
    }

    #[test]
    fn test_rebar_default_spacing() {
        let input = RebarInput {
            length_ft: 20.0,
            width_ft: 10.0,
            spacing_in: None,
        };
        let result = calculate_rebar(&input).unwrap();
        // 12 in o.c. including edge bars: 11 lengthwise, 21 widthwise
        assert_eq!(result.bars_lengthwise, 11);
        assert_eq!(result.bars_widthwise, 21);
        assert_eq!(result.total_linear_ft, 11.0 * 20.0 + 21.0 * 10.0);
        assert_eq!(result.spacing_in, 12.0);
    }

    #[test]
    fn test_rebar_custom_spacing() {
        let input = RebarInput {
            length_ft: 20.0,
            width_ft: 10.0,
            spacing_in: Some(18.0),
        };
        let result = calculate_rebar(&input).unwrap();
        // 1.5 ft o.c.: floor(10/1.5) + 1 = 7; floor(20/1.5) + 1 = 14
        assert_eq!(result.bars_lengthwise, 7);
        assert_eq!(result.bars_widthwise, 14);
    }

    #[test]
    fn test_rebar_rejects_bad_spacing() {
        let input = RebarInput {
            length_ft: 20.0,
            width_ft: 10.0,
            spacing_in: Some(0.0),
        };
        assert!(calculate_rebar(&input).is_err());
    }
}
