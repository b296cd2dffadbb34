//! # Domain Estimators
//!
//! Specialized paving calculators encoding tiered, empirical business rules
//! (coverage-rate tables, density lookups, waste factors) rather than
//! generic formula evaluation. Each estimator follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable) with `validate()`
//! - `*Output` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Output, EstimateError>` - Pure function
//!
//! Every output carries a human-readable `formula_text` for the history
//! ledger. Estimators never substitute defaults for required dimensions; a
//! non-positive length or width is an `InvalidInput`, not a zero result.
//!
//! ## Available Estimators
//!
//! - [`sealcoat`] - Sealer gallons, sand, and cost from surface tiers
//! - [`striping`] - Paint quantities per line, totaled by color
//! - [`asphalt`] - Tonnage by mix density and zone compaction
//! - [`concrete`] - Slab volume with waste factor, rebar takeoff
//! - [`scoring`] - Composite quality score and letter grade

pub mod asphalt;
pub mod concrete;
pub mod scoring;
pub mod sealcoat;
pub mod striping;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use asphalt::{AsphaltInput, AsphaltOutput, MaterialZone, MixType, ZoneSurfaceType};
pub use concrete::{ConcreteVolumeInput, ConcreteVolumeOutput, RebarInput, RebarOutput};
pub use scoring::{LetterGrade, QualityScoreInput, QualityScoreOutput, SampleRating};
pub use sealcoat::{SealcoatInput, SealcoatOutput, SurfaceCondition, SurfaceType};
pub use striping::{LineColor, LineType, StripingInput, StripingLine, StripingOutput};

/// Identifies which calculator produced a result, for history tagging.
///
/// `Formula` carries the registry id of the evaluated formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum CalculatorType {
    Sealcoat,
    Striping,
    AsphaltTonnage,
    ConcreteVolume,
    Rebar,
    QualityScore,
    Formula(String),
}

impl CalculatorType {
    /// Display name for history listings
    pub fn display_name(&self) -> String {
        match self {
            CalculatorType::Sealcoat => "Sealcoat Coverage".to_string(),
            CalculatorType::Striping => "Striping Paint".to_string(),
            CalculatorType::AsphaltTonnage => "Asphalt Tonnage".to_string(),
            CalculatorType::ConcreteVolume => "Concrete Volume".to_string(),
            CalculatorType::Rebar => "Rebar Takeoff".to_string(),
            CalculatorType::QualityScore => "Quality Score".to_string(),
            CalculatorType::Formula(id) => format!("Formula: {}", id),
        }
    }
}
