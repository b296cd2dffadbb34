//! # Formula Registry & Expression Evaluator
//!
//! Catalog of named engineering formulas, each with a symbolic expression,
//! a typed variable list, category, and reference metadata. Expressions are
//! parsed to an AST when the registry is constructed, so a malformed formula
//! string is a load-time defect, never a runtime user error.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use estimate_core::formula::FormulaRegistry;
//!
//! let registry = FormulaRegistry::builtin();
//! let mut inputs = HashMap::new();
//! inputs.insert("w".to_string(), 100.0); // plf
//! inputs.insert("L".to_string(), 12.0);  // ft
//!
//! // M_max = wL^2/8
//! let moment = registry.evaluate("beam-max-moment", &inputs).unwrap();
//! assert_eq!(moment, 1800.0);
//! ```

pub mod catalog;
pub mod expr;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use expr::Expr;

/// Formula categories mirroring the engineering domains served by the
/// calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaCategory {
    Structural,
    Electrical,
    Construction,
    Geotechnical,
}

impl FormulaCategory {
    /// Display name for UI grouping
    pub fn display_name(&self) -> &'static str {
        match self {
            FormulaCategory::Structural => "Structural",
            FormulaCategory::Electrical => "Electrical",
            FormulaCategory::Construction => "Construction",
            FormulaCategory::Geotechnical => "Geotechnical",
        }
    }
}

/// Difficulty tier shown next to a formula in selection UIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Basic,
    Intermediate,
    Advanced,
    Expert,
}

/// Input kind for a formula variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Number,
    Select,
    Boolean,
}

/// Inclusive numeric range for a variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

/// Definition of a variable used in a formula. Immutable once defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Symbol as it appears in the expression (e.g., "L", "w")
    pub symbol: String,
    /// Human-readable name
    pub name: String,
    /// Description shown as help text
    pub description: String,
    /// Unit label (e.g., "ft", "plf", "psi")
    pub unit: String,
    /// Input kind
    pub kind: VariableKind,
    /// Optional inclusive bounds, enforced at evaluation time
    pub bounds: Option<Bounds>,
    /// Allowed options for `Select` variables
    pub options: Vec<String>,
}

impl Variable {
    /// Create a numeric variable
    pub fn number(
        symbol: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Variable {
            symbol: symbol.into(),
            name: name.into(),
            description: String::new(),
            unit: unit.into(),
            kind: VariableKind::Number,
            bounds: None,
            options: Vec::new(),
        }
    }

    /// Attach a description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach inclusive min/max bounds
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.bounds = Some(Bounds { min, max });
        self
    }
}

/// A named, symbolic arithmetic expression with typed variables and a
/// result unit.
///
/// Invariant: every symbol referenced in `expression` appears exactly once
/// in `variables`. `FormulaRegistry::with_formulas` rejects violations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    /// Globally unique, immutable id (e.g., "beam-max-moment")
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Engineering domain
    pub category: FormulaCategory,
    /// Arithmetic expression over the declared variable symbols
    pub expression: String,
    /// Declared variables, in display order
    pub variables: Vec<Variable>,
    /// Unit label of the result
    pub result_unit: String,
    /// Difficulty tier
    pub complexity: Complexity,
    /// Source citations (code sections, handbooks)
    pub references: Vec<String>,
}

/// A formula paired with its parsed expression tree.
#[derive(Debug, Clone)]
struct CompiledFormula {
    formula: Formula,
    ast: Expr,
}

/// Catalog of formulas with pre-parsed, validated expressions.
#[derive(Debug, Clone)]
pub struct FormulaRegistry {
    compiled: Vec<CompiledFormula>,
    index: HashMap<String, usize>,
}

static BUILTIN: Lazy<FormulaRegistry> = Lazy::new(|| {
    // The builtin catalog is static data; a validation failure here is a
    // defect in this crate, caught by the catalog test before release.
    FormulaRegistry::with_formulas(catalog::builtin_formulas())
        .expect("builtin formula catalog must validate")
});

impl FormulaRegistry {
    /// The built-in catalog, parsed and validated once.
    pub fn builtin() -> &'static FormulaRegistry {
        &BUILTIN
    }

    /// Build a registry from formula definitions, parsing and validating
    /// every expression eagerly.
    ///
    /// Fails with `MalformedExpression` when an expression does not parse,
    /// when it references an undeclared symbol, when a declared numeric
    /// variable is unused, or when an id or symbol is duplicated.
    pub fn with_formulas(formulas: Vec<Formula>) -> EstimateResult<Self> {
        let mut compiled = Vec::with_capacity(formulas.len());
        let mut index = HashMap::with_capacity(formulas.len());

        for formula in formulas {
            let ast = expr::parse(&formula.expression)
                .map_err(|e| EstimateError::malformed_expression(&formula.id, e.to_string()))?;

            let mut declared: Vec<&str> = Vec::with_capacity(formula.variables.len());
            for var in &formula.variables {
                if declared.contains(&var.symbol.as_str()) {
                    return Err(EstimateError::malformed_expression(
                        &formula.id,
                        format!("variable '{}' declared more than once", var.symbol),
                    ));
                }
                declared.push(&var.symbol);
            }

            for symbol in ast.variables() {
                if !declared.contains(&symbol) {
                    return Err(EstimateError::malformed_expression(
                        &formula.id,
                        format!("expression references undeclared symbol '{}'", symbol),
                    ));
                }
            }
            let referenced = ast.variables();
            for var in &formula.variables {
                if var.kind == VariableKind::Number
                    && !referenced.contains(&var.symbol.as_str())
                {
                    return Err(EstimateError::malformed_expression(
                        &formula.id,
                        format!("declared variable '{}' is never used", var.symbol),
                    ));
                }
            }

            if index
                .insert(formula.id.clone(), compiled.len())
                .is_some()
            {
                return Err(EstimateError::malformed_expression(
                    &formula.id,
                    "duplicate formula id",
                ));
            }
            compiled.push(CompiledFormula { formula, ast });
        }

        Ok(FormulaRegistry { compiled, index })
    }

    /// Look up a formula by id.
    pub fn lookup(&self, formula_id: &str) -> EstimateResult<&Formula> {
        self.index
            .get(formula_id)
            .map(|&i| &self.compiled[i].formula)
            .ok_or_else(|| EstimateError::not_found("Formula", formula_id))
    }

    /// All formulas, in catalog order.
    pub fn formulas(&self) -> impl Iterator<Item = &Formula> {
        self.compiled.iter().map(|c| &c.formula)
    }

    /// All formulas in a given category.
    pub fn in_category(&self, category: FormulaCategory) -> Vec<&Formula> {
        self.formulas()
            .filter(|f| f.category == category)
            .collect()
    }

    /// Evaluate a formula against a symbol -> value map.
    ///
    /// Fails with `MissingVariable` if any declared symbol is absent from
    /// `inputs`, and with `OutOfBounds` if a value violates its declared
    /// range. The result is never rounded internally.
    pub fn evaluate(
        &self,
        formula_id: &str,
        inputs: &HashMap<String, f64>,
    ) -> EstimateResult<f64> {
        let compiled = self
            .index
            .get(formula_id)
            .map(|&i| &self.compiled[i])
            .ok_or_else(|| EstimateError::not_found("Formula", formula_id))?;

        for var in &compiled.formula.variables {
            let value = *inputs
                .get(&var.symbol)
                .ok_or_else(|| EstimateError::missing_variable(&var.symbol, formula_id))?;
            if let Some(bounds) = var.bounds {
                if value < bounds.min || value > bounds.max {
                    return Err(EstimateError::out_of_bounds(
                        &var.symbol,
                        value,
                        bounds.min,
                        bounds.max,
                    ));
                }
            }
        }

        // Validation guarantees every referenced symbol is declared, and the
        // loop above guarantees every declared symbol has an input.
        let result = compiled.ast.evaluate(inputs).ok_or_else(|| {
            EstimateError::missing_variable("<internal>", formula_id)
        })?;

        if !result.is_finite() {
            return Err(EstimateError::invalid_input(
                "inputs",
                format!("{:?}", inputs),
                format!("evaluation of '{}' is not finite (division by zero?)", formula_id),
            ));
        }
        Ok(result)
    }
}

/// Round a value for display at the presentation boundary.
///
/// The engine never rounds internally, so chained calculations always see
/// full-precision values. This helper exists only for callers formatting
/// final output.
pub fn round_display(value: f64, decimals: u32) -> f64 {
    let scale = 10_f64.powi(decimals as i32);
    (value * scale).round() / scale
}
