//! End-to-end checks across the calculation engine: conversions feeding
//! estimators, estimator results landing in history, and project workflows
//! from draft through archive.

use std::collections::HashMap;

use estimate_core::estimators::{
    concrete, sealcoat, CalculatorType, ConcreteVolumeInput, SealcoatInput, SurfaceCondition,
    SurfaceType,
};
use estimate_core::formula::FormulaRegistry;
use estimate_core::history::{HistoryLedger, HISTORY_CAPACITY};
use estimate_core::project::{
    CalculationType, ProjectData, ProjectPatch, ProjectStatus, ProjectStore, SealcoatCalculation,
};
use estimate_core::units::{convert, registered_conversions, UnitCategory};
use estimate_core::EstimateError;

#[test]
fn conversions_round_trip_within_tolerance() {
    for conversion in registered_conversions() {
        let out = convert(conversion.category, conversion.from, conversion.to, 123.456).unwrap();
        let back = convert(conversion.category, conversion.to, conversion.from, out).unwrap();
        assert!(
            (back - 123.456).abs() < 1e-9,
            "{} -> {} -> {} drifted: {}",
            conversion.from,
            conversion.to,
            conversion.from,
            back
        );
    }
}

#[test]
fn unknown_conversion_is_structured_error() {
    let err = convert(UnitCategory::Length, "ft", "furlong", 1.0).unwrap_err();
    match err {
        EstimateError::UnsupportedConversion { ref from, ref to, .. } => {
            assert_eq!(from, "ft");
            assert_eq!(to, "furlong");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.error_code(), "UNSUPPORTED_CONVERSION");
    assert!(err.is_recoverable());
}

#[test]
fn every_formula_requires_all_inputs() {
    let registry = FormulaRegistry::builtin();
    let empty = HashMap::new();
    for formula in registry.formulas() {
        assert!(!formula.variables.is_empty(), "{} has no variables", formula.id);
        let err = registry.evaluate(&formula.id, &empty).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_VARIABLE");
    }
}

#[test]
fn formula_results_feed_history_unrounded() {
    let registry = FormulaRegistry::builtin();
    let mut ledger = HistoryLedger::new();

    let mut inputs = HashMap::new();
    inputs.insert("A".to_string(), 4000.0);
    inputs.insert("t".to_string(), 3.0);
    inputs.insert("D".to_string(), 145.0);
    let tons = registry.evaluate("asphalt-tonnage", &inputs).unwrap();
    assert_eq!(tons, 72.5);

    let json_inputs = inputs
        .iter()
        .map(|(k, v)| (k.clone(), serde_json::json!(v)))
        .collect();
    let id = ledger.record(
        CalculatorType::Formula("asphalt-tonnage".to_string()),
        json_inputs,
        tons,
        "tons = A x (t/12) x D / 2000",
    );
    assert_eq!(ledger.get(id).unwrap().result, 72.5);
}

#[test]
fn concrete_reference_vector_end_to_end() {
    // Imperial inputs arriving in inches get converted at the boundary.
    let height_ft = convert(UnitCategory::Length, "in", "ft", 6.0).unwrap();
    assert!((height_ft - 0.5).abs() < 1e-12);

    let result = concrete::calculate_volume(&ConcreteVolumeInput {
        length_ft: 10.0,
        width_ft: 10.0,
        height_ft,
        waste_factor_pct: Some(10.0),
    })
    .unwrap();
    assert_eq!(result.volume_cuft, 50.0);
    assert_eq!(result.waste_adjusted_cuft, 55.0);
    assert!((result.cubic_yards - 55.0 / 27.0).abs() < 1e-12);
}

#[test]
fn sealcoat_gallons_scale_with_coats() {
    let base = SealcoatInput {
        length_ft: 200.0,
        width_ft: 50.0,
        number_of_coats: 1,
        surface_type: SurfaceType::Asphalt,
        surface_condition: SurfaceCondition::Good,
        sealer_cost_per_gallon: 3.25,
        labor_rate_per_sqft: 0.05,
    };
    let one = sealcoat::calculate(&base).unwrap();
    let two = sealcoat::calculate(&SealcoatInput {
        number_of_coats: 2,
        ..base
    })
    .unwrap();
    assert_eq!(two.gallons_needed, one.gallons_needed * 2.0);
}

#[test]
fn history_never_exceeds_capacity() {
    let mut ledger = HistoryLedger::new();
    for i in 0..(HISTORY_CAPACITY + 25) {
        ledger.record(
            CalculatorType::QualityScore,
            HashMap::new(),
            i as f64,
            "scoring run",
        );
        assert!(ledger.len() <= HISTORY_CAPACITY);
    }
    assert_eq!(ledger.len(), HISTORY_CAPACITY);
    // Newest entry survives, oldest evicted.
    assert_eq!(
        ledger.entries().next().unwrap().result,
        (HISTORY_CAPACITY + 24) as f64
    );
}

#[test]
fn project_workflow_draft_to_archive() {
    let mut store = ProjectStore::in_memory();
    let project = store
        .create("owner-1", CalculationType::Sealcoat, "Retail plaza lot")
        .unwrap();

    let data = ProjectData::Sealcoat(SealcoatCalculation {
        input: SealcoatInput {
            length_ft: 300.0,
            width_ft: 120.0,
            number_of_coats: 2,
            surface_type: SurfaceType::Asphalt,
            surface_condition: SurfaceCondition::Fair,
            sealer_cost_per_gallon: 3.40,
            labor_rate_per_sqft: 0.06,
        },
        computed: None,
    });
    let updated = store
        .update(
            project.id,
            project.version_number,
            ProjectPatch {
                project_data: Some(data),
                tags: Some(vec!["2026".to_string(), "plaza".to_string()]),
                ..ProjectPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.version_number, 2);

    let recalced = store.recalculate(project.id, 2).unwrap();
    assert_eq!(recalced.version_number, 3);
    assert_eq!(store.history("owner-1").len(), 1);

    let committed = store.commit(project.id).unwrap();
    assert_eq!(committed.status, ProjectStatus::Final);

    let archived = store.archive(project.id).unwrap();
    assert_eq!(archived.status, ProjectStatus::Archived);
    assert_eq!(
        store.commit(project.id).unwrap_err().error_code(),
        "INVALID_TRANSITION"
    );
}

#[test]
fn stale_writer_gets_version_conflict_with_actual_version() {
    let mut store = ProjectStore::in_memory();
    let project = store
        .create("owner-1", CalculationType::MaterialEstimate, "Overlay phase 2")
        .unwrap();

    store
        .update(
            project.id,
            1,
            ProjectPatch {
                description: Some("first writer".to_string()),
                ..ProjectPatch::default()
            },
        )
        .unwrap();

    let err = store
        .update(
            project.id,
            1,
            ProjectPatch {
                description: Some("stale writer".to_string()),
                ..ProjectPatch::default()
            },
        )
        .unwrap_err();
    match err {
        EstimateError::VersionConflict {
            expected, actual, ..
        } => {
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn template_instantiation_is_a_fresh_draft() {
    let mut store = ProjectStore::in_memory();
    let project = store
        .create("owner-1", CalculationType::Striping, "Standard 90-stall layout")
        .unwrap();
    let template = store.clone_as_template(project.id).unwrap();

    let draft = store
        .instantiate_from_template(template.id, "owner-2", "Northside lot striping")
        .unwrap();
    assert_ne!(draft.id, template.id);
    assert_eq!(draft.status, ProjectStatus::Draft);
    assert_eq!(draft.version_number, 1);
    assert!(!draft.is_template);
    assert_eq!(draft.calculation_type, CalculationType::Striping);
}

#[test]
fn errors_serialize_with_stable_tags() {
    let err = EstimateError::not_found("Formula", "no-such-id");
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["type"], "NotFound");
    let roundtrip: EstimateError = serde_json::from_value(json).unwrap();
    assert_eq!(roundtrip.error_code(), "NOT_FOUND");
}
