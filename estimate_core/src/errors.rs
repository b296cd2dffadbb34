//! # Error Types
//!
//! Structured error types for estimate_core. Every failure carries enough
//! context (which field, which symbol, which project version) for the caller
//! to correct the call and retry; none of these errors is fatal to the
//! engine itself.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::errors::{EstimateError, EstimateResult};
//!
//! fn validate_length(length_ft: f64) -> EstimateResult<()> {
//!     if length_ft <= 0.0 {
//!         return Err(EstimateError::invalid_input(
//!             "length_ft",
//!             length_ft.to_string(),
//!             "Length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for estimate_core operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Structured error type for the calculation engine.
///
/// Each variant provides specific context about what went wrong, enabling
/// programmatic handling by UI and API consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// Unknown formula, project, or history entry id
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A formula variable has no corresponding input value
    #[error("Missing variable '{symbol}' for formula '{formula_id}'")]
    MissingVariable { symbol: String, formula_id: String },

    /// An input value is invalid (non-positive dimension, wrong shape, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A numeric input violates a variable's declared range
    #[error("Value {value} for '{symbol}' is out of bounds [{min}, {max}]")]
    OutOfBounds {
        symbol: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// No unit-conversion entry exists for the requested pair
    #[error("No conversion registered for {category}: {from} -> {to}")]
    UnsupportedConversion {
        category: String,
        from: String,
        to: String,
    },

    /// Optimistic-concurrency mismatch on project update
    #[error("Version conflict on project {project_id}: expected {expected}, stored {actual}")]
    VersionConflict {
        project_id: String,
        expected: u64,
        actual: u64,
    },

    /// Illegal project lifecycle transition
    #[error("Invalid transition for project {project_id}: {from} -> {to}")]
    InvalidTransition {
        project_id: String,
        from: String,
        to: String,
    },

    /// A formula expression failed to parse. This is a registry configuration
    /// defect, surfaced at load time rather than at evaluation time.
    #[error("Malformed expression in formula '{formula_id}': {reason}")]
    MalformedExpression { formula_id: String, reason: String },
}

impl EstimateError {
    /// Create a NotFound error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        EstimateError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a MissingVariable error
    pub fn missing_variable(symbol: impl Into<String>, formula_id: impl Into<String>) -> Self {
        EstimateError::MissingVariable {
            symbol: symbol.into(),
            formula_id: formula_id.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an OutOfBounds error
    pub fn out_of_bounds(symbol: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        EstimateError::OutOfBounds {
            symbol: symbol.into(),
            value,
            min,
            max,
        }
    }

    /// Create an UnsupportedConversion error
    pub fn unsupported_conversion(
        category: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        EstimateError::UnsupportedConversion {
            category: category.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a VersionConflict error
    pub fn version_conflict(project_id: impl ToString, expected: u64, actual: u64) -> Self {
        EstimateError::VersionConflict {
            project_id: project_id.to_string(),
            expected,
            actual,
        }
    }

    /// Create an InvalidTransition error
    pub fn invalid_transition(
        project_id: impl ToString,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        EstimateError::InvalidTransition {
            project_id: project_id.to_string(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a MalformedExpression error
    pub fn malformed_expression(formula_id: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::MalformedExpression {
            formula_id: formula_id.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is recoverable by the caller (re-supply input,
    /// re-read and retry, pick a different unit pair).
    ///
    /// `MalformedExpression` is the exception: it indicates a defective
    /// formula definition, which no caller-side retry can fix.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EstimateError::MalformedExpression { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::NotFound { .. } => "NOT_FOUND",
            EstimateError::MissingVariable { .. } => "MISSING_VARIABLE",
            EstimateError::InvalidInput { .. } => "INVALID_INPUT",
            EstimateError::OutOfBounds { .. } => "OUT_OF_BOUNDS",
            EstimateError::UnsupportedConversion { .. } => "UNSUPPORTED_CONVERSION",
            EstimateError::VersionConflict { .. } => "VERSION_CONFLICT",
            EstimateError::InvalidTransition { .. } => "INVALID_TRANSITION",
            EstimateError::MalformedExpression { .. } => "MALFORMED_EXPRESSION",
        }
    }
}
