//! # Striping Paint Estimator
//!
//! Paint quantity per pavement marking line, with project totals grouped by
//! color. Lines are processed in `line_order` for deterministic reporting;
//! order values must be unique within a request.

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Marking line style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Solid,
    Dashed,
    Double,
}

impl LineType {
    /// Paint multiplier relative to a single solid line.
    ///
    /// Dashed lines use the standard 10 ft stripe / 10 ft gap cycle, so
    /// half the paint of a solid line of the same nominal length.
    pub fn paint_factor(&self) -> f64 {
        match self {
            LineType::Solid => 1.0,
            LineType::Dashed => 0.5,
            LineType::Double => 2.0,
        }
    }
}

/// Traffic paint color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineColor {
    White,
    Yellow,
    Blue,
}

impl LineColor {
    /// Gallons of paint per foot of line length per inch of line width.
    ///
    /// Baseline: one gallon of white traffic paint covers roughly 320 ft of
    /// 4 in solid line. Yellow and blue carry heavier pigment loads and
    /// cover slightly less.
    pub fn coverage_rate(&self) -> f64 {
        match self {
            LineColor::White => 1.0 / 1280.0,
            LineColor::Yellow => 1.0 / 1200.0,
            LineColor::Blue => 1.0 / 1150.0,
        }
    }
}

/// One marking line in a striping layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripingLine {
    /// Line style
    pub line_type: LineType,
    /// Painted width in inches (4 in typical)
    pub width_in: f64,
    /// Line length in feet
    pub length_ft: f64,
    /// Paint color
    pub color: LineColor,
    /// Display/processing order, unique within the layout
    pub line_order: u32,
}

/// Input parameters for a striping estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripingInput {
    /// All lines in the layout
    pub lines: Vec<StripingLine>,
    /// Paint price per gallon, supplied by the caller
    pub paint_cost_per_gallon: f64,
}

impl StripingInput {
    /// Validate input parameters.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.lines.is_empty() {
            return Err(EstimateError::invalid_input(
                "lines",
                "[]",
                "At least one line is required",
            ));
        }
        if self.paint_cost_per_gallon < 0.0 {
            return Err(EstimateError::invalid_input(
                "paint_cost_per_gallon",
                self.paint_cost_per_gallon.to_string(),
                "Cost rate cannot be negative",
            ));
        }

        let mut orders: Vec<u32> = Vec::with_capacity(self.lines.len());
        for (i, line) in self.lines.iter().enumerate() {
            if line.length_ft <= 0.0 {
                return Err(EstimateError::invalid_input(
                    format!("lines[{}].length_ft", i),
                    line.length_ft.to_string(),
                    "Line length must be positive",
                ));
            }
            if line.width_in <= 0.0 {
                return Err(EstimateError::invalid_input(
                    format!("lines[{}].width_in", i),
                    line.width_in.to_string(),
                    "Line width must be positive",
                ));
            }
            if orders.contains(&line.line_order) {
                return Err(EstimateError::invalid_input(
                    format!("lines[{}].line_order", i),
                    line.line_order.to_string(),
                    "Line order values must be unique",
                ));
            }
            orders.push(line.line_order);
        }
        Ok(())
    }
}

/// Per-line result, reported in `line_order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineResult {
    pub line_order: u32,
    pub line_type: LineType,
    pub color: LineColor,
    pub length_ft: f64,
    /// Paint gallons for this line
    pub paint_gallons: f64,
}

/// Results from a striping estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripingOutput {
    /// Per-line breakdown, sorted by `line_order`
    pub lines: Vec<LineResult>,
    /// Sum of all line lengths in feet
    pub total_linear_ft: f64,
    /// Gallons of white paint
    pub white_gallons: f64,
    /// Gallons of yellow paint
    pub yellow_gallons: f64,
    /// Gallons of blue paint
    pub blue_gallons: f64,
    /// All colors combined
    pub total_gallons: f64,
    /// Paint cost at the supplied rate
    pub total_paint_cost: f64,
    /// Human-readable description for the history ledger
    pub formula_text: String,
}

/// Estimate paint quantities for a striping layout.
pub fn calculate(input: &StripingInput) -> EstimateResult<StripingOutput> {
    input.validate()?;

    let mut ordered: Vec<&StripingLine> = input.lines.iter().collect();
    ordered.sort_by_key(|l| l.line_order);

    let mut lines = Vec::with_capacity(ordered.len());
    let mut total_linear_ft = 0.0;
    let mut white = 0.0;
    let mut yellow = 0.0;
    let mut blue = 0.0;

    for line in ordered {
        let gallons = line.length_ft
            * line.width_in
            * line.color.coverage_rate()
            * line.line_type.paint_factor();

        match line.color {
            LineColor::White => white += gallons,
            LineColor::Yellow => yellow += gallons,
            LineColor::Blue => blue += gallons,
        }
        total_linear_ft += line.length_ft;

        lines.push(LineResult {
            line_order: line.line_order,
            line_type: line.line_type,
            color: line.color,
            length_ft: line.length_ft,
            paint_gallons: gallons,
        });
    }

    let total_gallons = white + yellow + blue;

    Ok(StripingOutput {
        lines,
        total_linear_ft,
        white_gallons: white,
        yellow_gallons: yellow,
        blue_gallons: blue,
        total_gallons,
        total_paint_cost: total_gallons * input.paint_cost_per_gallon,
        formula_text: format!(
            "paint = length_ft x width_in x color rate over {} lines ({:.0} lf)",
            input.lines.len(),
            total_linear_ft
        ),
    })
}
