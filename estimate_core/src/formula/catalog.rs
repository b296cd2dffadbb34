//! # Builtin Formula Catalog
//!
//! The formulas shipped with the engine, spanning the four engineering
//! domains the estimator suite serves. Every expression here is parsed and
//! cross-checked against its variable list when `FormulaRegistry::builtin()`
//! is first touched, so a typo in this file fails fast rather than at
//! evaluation time.
//!
//! All values are US customary units, matching field practice for US paving
//! and site work.

use super::{Complexity, Formula, FormulaCategory, Variable};

fn formula(
    id: &str,
    name: &str,
    category: FormulaCategory,
    expression: &str,
    variables: Vec<Variable>,
    result_unit: &str,
    complexity: Complexity,
    references: &[&str],
) -> Formula {
    Formula {
        id: id.to_string(),
        name: name.to_string(),
        category,
        expression: expression.to_string(),
        variables,
        result_unit: result_unit.to_string(),
        complexity,
        references: references.iter().map(|r| r.to_string()).collect(),
    }
}

/// The full builtin catalog.
pub fn builtin_formulas() -> Vec<Formula> {
    use Complexity::*;
    use FormulaCategory::*;

    vec![
        // ---------------------------------------------------------------
        // Structural
        // ---------------------------------------------------------------
        formula(
            "beam-max-moment",
            "Maximum Moment, Uniform Load",
            Structural,
            "w * L ^ 2 / 8",
            vec![
                Variable::number("w", "Uniform load intensity", "plf")
                    .describe("Distributed load along the full span")
                    .with_bounds(0.0, 50_000.0),
                Variable::number("L", "Span length", "ft")
                    .describe("Clear span, simply supported")
                    .with_bounds(0.1, 200.0),
            ],
            "ft-lb",
            Basic,
            &["Roark's Formulas for Stress and Strain, 8th ed., Table 8.1"],
        ),
        formula(
            "rect-section-modulus",
            "Rectangular Section Modulus",
            Structural,
            "b * d ^ 2 / 6",
            vec![
                Variable::number("b", "Section width", "in").with_bounds(0.1, 100.0),
                Variable::number("d", "Section depth", "in").with_bounds(0.1, 100.0),
            ],
            "in^3",
            Basic,
            &["Fundamental mechanics of materials"],
        ),
        formula(
            "bending-stress",
            "Bending Stress",
            Structural,
            "M / S",
            vec![
                Variable::number("M", "Bending moment", "in-lb")
                    .with_bounds(0.0, 1.0e9),
                Variable::number("S", "Section modulus", "in^3")
                    .with_bounds(0.001, 100_000.0),
            ],
            "psi",
            Basic,
            &["Fundamental mechanics of materials"],
        ),
        formula(
            "point-load-deflection",
            "Midspan Deflection, Center Point Load",
            Structural,
            "P * L ^ 3 / (48 * E * I)",
            vec![
                Variable::number("P", "Point load", "lb").with_bounds(0.0, 1.0e7),
                Variable::number("L", "Span length", "in").with_bounds(1.0, 2400.0),
                Variable::number("E", "Modulus of elasticity", "psi")
                    .with_bounds(1000.0, 1.0e8),
                Variable::number("I", "Moment of inertia", "in^4")
                    .with_bounds(0.001, 1.0e6),
            ],
            "in",
            Intermediate,
            &["Roark's Formulas for Stress and Strain, 8th ed., Table 8.1"],
        ),
        // ---------------------------------------------------------------
        // Electrical
        // ---------------------------------------------------------------
        formula(
            "ohms-law-power",
            "Electrical Power",
            Electrical,
            "V * I",
            vec![
                Variable::number("V", "Voltage", "V").with_bounds(0.0, 480.0),
                Variable::number("I", "Current", "A").with_bounds(0.0, 2000.0),
            ],
            "W",
            Basic,
            &["NEC 2023, Article 220"],
        ),
        formula(
            "voltage-drop",
            "Voltage Drop, Copper Conductor",
            Electrical,
            "2 * K * I * L / CM",
            vec![
                Variable::number("K", "Resistivity constant", "ohm-cmil/ft")
                    .describe("12.9 for copper, 21.2 for aluminum")
                    .with_bounds(10.0, 25.0),
                Variable::number("I", "Load current", "A").with_bounds(0.0, 2000.0),
                Variable::number("L", "One-way circuit length", "ft")
                    .with_bounds(1.0, 10_000.0),
                Variable::number("CM", "Conductor area", "cmil")
                    .with_bounds(1000.0, 2_000_000.0),
            ],
            "V",
            Intermediate,
            &["NEC 2023, Chapter 9, Table 8"],
        ),
        formula(
            "energy-cost",
            "Equipment Energy Cost",
            Electrical,
            "P * t * rate / 1000",
            vec![
                Variable::number("P", "Power draw", "W").with_bounds(0.0, 1.0e6),
                Variable::number("t", "Run time", "hr").with_bounds(0.0, 10_000.0),
                Variable::number("rate", "Utility rate", "$/kWh").with_bounds(0.0, 2.0),
            ],
            "$",
            Basic,
            &["Standard utility billing arithmetic"],
        ),
        // ---------------------------------------------------------------
        // Construction
        // ---------------------------------------------------------------
        formula(
            "concrete-volume",
            "Concrete Slab Volume",
            Construction,
            "L * W * H",
            vec![
                Variable::number("L", "Slab length", "ft").with_bounds(0.1, 1000.0),
                Variable::number("W", "Slab width", "ft").with_bounds(0.1, 1000.0),
                Variable::number("H", "Slab thickness", "ft").with_bounds(0.01, 10.0),
            ],
            "cuft",
            Basic,
            &["ACI 318 commentary, slab-on-grade"],
        ),
        formula(
            "asphalt-tonnage",
            "Asphalt Tonnage",
            Construction,
            "A * (t / 12) * D / 2000",
            vec![
                Variable::number("A", "Paved area", "sqft").with_bounds(1.0, 10_000_000.0),
                Variable::number("t", "Compacted thickness", "in").with_bounds(0.5, 12.0),
                Variable::number("D", "Mix density", "lb/cuft")
                    .describe("Typically 140-148 depending on mix")
                    .with_bounds(100.0, 160.0),
            ],
            "ton",
            Basic,
            &["Asphalt Institute MS-22"],
        ),
        formula(
            "slope-grade",
            "Slope Grade",
            Construction,
            "rise / run * 100",
            vec![
                Variable::number("rise", "Vertical rise", "ft").with_bounds(-1000.0, 1000.0),
                Variable::number("run", "Horizontal run", "ft").with_bounds(0.1, 10_000.0),
            ],
            "%",
            Basic,
            &["Caltrans Highway Design Manual, Ch. 300"],
        ),
        formula(
            "earthwork-cut-volume",
            "Earthwork Volume, Average End Area",
            Construction,
            "(A1 + A2) / 2 * L / 27",
            vec![
                Variable::number("A1", "First end area", "sqft").with_bounds(0.0, 100_000.0),
                Variable::number("A2", "Second end area", "sqft").with_bounds(0.0, 100_000.0),
                Variable::number("L", "Distance between sections", "ft")
                    .with_bounds(0.1, 10_000.0),
            ],
            "cuyd",
            Intermediate,
            &["Caltrans Highway Design Manual, Ch. 800"],
        ),
        // ---------------------------------------------------------------
        // Geotechnical
        // ---------------------------------------------------------------
        formula(
            "bearing-capacity-strip",
            "Ultimate Bearing Capacity, Strip Footing",
            Geotechnical,
            "c * Nc + q * Nq + 0.5 * gamma * B * Ng",
            vec![
                Variable::number("c", "Soil cohesion", "psf").with_bounds(0.0, 20_000.0),
                Variable::number("Nc", "Cohesion factor", "-").with_bounds(1.0, 100.0),
                Variable::number("q", "Surcharge pressure", "psf").with_bounds(0.0, 20_000.0),
                Variable::number("Nq", "Surcharge factor", "-").with_bounds(1.0, 100.0),
                Variable::number("gamma", "Soil unit weight", "pcf").with_bounds(50.0, 200.0),
                Variable::number("B", "Footing width", "ft").with_bounds(0.5, 50.0),
                Variable::number("Ng", "Unit-weight factor", "-").with_bounds(0.0, 100.0),
            ],
            "psf",
            Expert,
            &["Terzaghi & Peck, Soil Mechanics in Engineering Practice"],
        ),
        formula(
            "lateral-earth-force",
            "Active Lateral Earth Force (Rankine)",
            Geotechnical,
            "0.5 * Ka * gamma * H ^ 2",
            vec![
                Variable::number("Ka", "Active pressure coefficient", "-")
                    .with_bounds(0.1, 1.0),
                Variable::number("gamma", "Soil unit weight", "pcf").with_bounds(50.0, 200.0),
                Variable::number("H", "Wall height", "ft").with_bounds(0.5, 100.0),
            ],
            "lb/ft",
            Advanced,
            &["Rankine earth pressure theory; Das, Principles of Foundation Engineering"],
        ),
        formula(
            "proctor-moisture",
            "Moisture Content, Dry Basis",
            Geotechnical,
            "(wet - dry) / dry * 100",
            vec![
                Variable::number("wet", "Wet sample mass", "g").with_bounds(0.1, 100_000.0),
                Variable::number("dry", "Oven-dry sample mass", "g").with_bounds(0.1, 100_000.0),
            ],
            "%",
            Basic,
            &["ASTM D2216"],
        ),
    ]
}
