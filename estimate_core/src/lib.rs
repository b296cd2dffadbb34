//! # estimate_core - Paving Estimation & Calculation Engine
//!
//! `estimate_core` is the computational heart of a paving contractor's
//! estimating workflow: unit conversions, a registry of named engineering
//! formulas with a safe expression evaluator, and domain estimators for
//! sealcoat, striping, asphalt tonnage, concrete, and quality scoring,
//! plus a versioned project store and a bounded calculation history.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **No I/O**: Persistence and rendering live behind trait seams
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use estimate_core::formula::FormulaRegistry;
//!
//! let registry = FormulaRegistry::builtin();
//! let mut inputs = HashMap::new();
//! inputs.insert("w".to_string(), 100.0);
//! inputs.insert("L".to_string(), 12.0);
//!
//! // M_max = w * L^2 / 8
//! let moment = registry.evaluate("beam-max-moment", &inputs).unwrap();
//! assert_eq!(moment, 1800.0);
//! ```
//!
//! ## Modules
//!
//! - [`units`] - Unit conversion table over physical categories
//! - [`formula`] - Formula registry and expression evaluator
//! - [`estimators`] - Sealcoat, striping, asphalt, concrete, scoring
//! - [`history`] - Bounded calculation history and saved calculations
//! - [`project`] - Versioned project store with lifecycle and templates
//! - [`errors`] - Structured error types

pub mod errors;
pub mod estimators;
pub mod formula;
pub mod history;
pub mod project;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{EstimateError, EstimateResult};
pub use formula::{Formula, FormulaRegistry};
pub use history::{CalculationHistoryEntry, HistoryLedger, SavedCalculation};
pub use project::{CalculationProject, ProjectRepository, ProjectStore};
pub use units::convert;
