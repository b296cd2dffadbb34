//! # Unit Conversion Table
//!
//! Static mapping of `(category, from, to)` to an affine transform
//! `to = from * factor + offset`. A single stored entry serves both
//! directions: the inverse is applied as `(value - offset) / factor`.
//!
//! There is no transitive path search; only the pairs the estimators and
//! formula display actually need are registered, and requesting an
//! unregistered pair fails with `UnsupportedConversion`.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::units::{convert, UnitCategory};
//!
//! let meters = convert(UnitCategory::Length, "ft", "m", 100.0).unwrap();
//! assert!((meters - 30.48).abs() < 1e-9);
//!
//! // The inverse direction uses the same stored entry
//! let feet = convert(UnitCategory::Length, "m", "ft", meters).unwrap();
//! assert!((feet - 100.0).abs() < 1e-9);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Cubic feet per cubic yard. Fixed constant, not configurable.
pub const CUFT_PER_CUYD: f64 = 27.0;

/// Fixed categories of engineering units supported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    Length,
    Area,
    Volume,
    Mass,
    Temperature,
    Pressure,
    Power,
}

impl UnitCategory {
    /// Display name for UI grouping
    pub fn display_name(&self) -> &'static str {
        match self {
            UnitCategory::Length => "Length",
            UnitCategory::Area => "Area",
            UnitCategory::Volume => "Volume",
            UnitCategory::Mass => "Mass",
            UnitCategory::Temperature => "Temperature",
            UnitCategory::Pressure => "Pressure",
            UnitCategory::Power => "Power",
        }
    }
}

impl std::fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One directional conversion entry: `to = from * factor + offset`.
///
/// Entries are pure affine maps, so the reverse direction is always
/// recoverable from the same record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitConversion {
    pub category: UnitCategory,
    pub from: &'static str,
    pub to: &'static str,
    pub factor: f64,
    pub offset: f64,
}

impl UnitConversion {
    const fn linear(category: UnitCategory, from: &'static str, to: &'static str, factor: f64) -> Self {
        UnitConversion {
            category,
            from,
            to,
            factor,
            offset: 0.0,
        }
    }

    const fn affine(
        category: UnitCategory,
        from: &'static str,
        to: &'static str,
        factor: f64,
        offset: f64,
    ) -> Self {
        UnitConversion {
            category,
            from,
            to,
            factor,
            offset,
        }
    }

    /// Apply the transform in the stored direction.
    pub fn apply(&self, value: f64) -> f64 {
        value * self.factor + self.offset
    }

    /// Apply the transform in the reverse direction.
    pub fn apply_inverse(&self, value: f64) -> f64 {
        (value - self.offset) / self.factor
    }
}

/// The built-in conversion table.
///
/// Only the pairs required by the estimators and formula variable display
/// are registered; the graph per category is intentionally not fully
/// connected.
static CONVERSIONS: Lazy<Vec<UnitConversion>> = Lazy::new(|| {
    use UnitCategory::*;
    vec![
        // Length
        UnitConversion::linear(Length, "ft", "m", 0.3048),
        UnitConversion::linear(Length, "in", "ft", 1.0 / 12.0),
        UnitConversion::linear(Length, "in", "cm", 2.54),
        UnitConversion::linear(Length, "yd", "ft", 3.0),
        UnitConversion::linear(Length, "mi", "km", 1.609344),
        // Area
        UnitConversion::linear(Area, "sqft", "sqm", 0.09290304),
        UnitConversion::linear(Area, "sqyd", "sqft", 9.0),
        UnitConversion::linear(Area, "acre", "sqft", 43_560.0),
        // Volume
        UnitConversion::linear(Volume, "cuft", "cuyd", 1.0 / CUFT_PER_CUYD),
        UnitConversion::linear(Volume, "cuft", "gal", 7.48052),
        UnitConversion::linear(Volume, "cuyd", "cum", 0.764555),
        // Mass
        UnitConversion::linear(Mass, "lb", "kg", 0.45359237),
        UnitConversion::linear(Mass, "ton", "lb", 2000.0),
        // Temperature (the one offset case)
        UnitConversion::affine(Temperature, "degC", "degF", 1.8, 32.0),
        // Pressure
        UnitConversion::linear(Pressure, "psi", "kPa", 6.894757),
        // Power
        UnitConversion::linear(Power, "hp", "kW", 0.7457),
    ]
});

/// Convert `value` from one unit to another within a category.
///
/// Fails with `UnsupportedConversion` if no entry exists for the pair in
/// either direction. Converting a unit to itself is the identity.
///
/// # Example
///
/// ```rust
/// use estimate_core::units::{convert, UnitCategory};
///
/// let f = convert(UnitCategory::Temperature, "degC", "degF", 100.0).unwrap();
/// assert!((f - 212.0).abs() < 1e-9);
/// ```
pub fn convert(category: UnitCategory, from: &str, to: &str, value: f64) -> EstimateResult<f64> {
    if from == to {
        return Ok(value);
    }

    for entry in CONVERSIONS.iter().filter(|e| e.category == category) {
        if entry.from == from && entry.to == to {
            return Ok(entry.apply(value));
        }
        if entry.from == to && entry.to == from {
            return Ok(entry.apply_inverse(value));
        }
    }

    Err(EstimateError::unsupported_conversion(
        category.to_string(),
        from,
        to,
    ))
}

/// All registered conversion entries, for UI listings and tests.
pub fn registered_conversions() -> &'static [UnitConversion] {
    &CONVERSIONS
}
