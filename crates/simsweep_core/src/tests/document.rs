//! Tests for document extraction and end-to-end plan assembly

use super::node;
use crate::combine::{KeyPath, SweepMode};
use crate::document::{FullDocument, ReferenceDocument, build_plan};
use crate::error::{CombineError, SweepError};

fn reference_document() -> ReferenceDocument {
    ReferenceDocument::from_node(&node(
        r#"{"parameters": {
              "wall": {"innerRadius": 20, "hardness": 10},
              "propulsion": {"speed": 1, "radius": 0.5}
            }}"#,
    ))
    .unwrap()
}

fn full_document(parameters: &str) -> FullDocument {
    FullDocument::from_node(&node(&format!(
        r#"{{"unitOfMeasure": {{"length": "um", "time": "s"}},
             "initialConditions": {{
               "bacteria": [{{"grid": {{"count": 4, "spacing": 1,
                                        "position": {{"x": 0, "y": 0}},
                                        "direction": "up"}}}}]
             }},
             "parameters": {parameters}}}"#
    )))
    .unwrap()
}

/// A varying leaf plans one group with one file per alternative; grid-expanded
/// initial conditions and the unit section are shared by every document.
#[test]
fn test_build_plan_end_to_end() {
    let full = full_document(
        r#"{"wall": {"innerRadius": [20, 30], "hardness": 10},
            "propulsion": {"speed": 1, "radius": 0.5}}"#,
    );

    let plan = build_plan(&reference_document(), &full, SweepMode::OneFactor).unwrap();

    assert_eq!(plan.groups.len(), 1);
    assert_eq!(plan.file_count(), 2);
    let key = KeyPath::from_fields(["parameters", "wall", "innerRadius"]);
    let group = &plan.groups[&key];
    assert_eq!(
        group.filenames().collect::<Vec<_>>(),
        vec![
            "parameters_wall_innerRadius_0.json",
            "parameters_wall_innerRadius_1.json",
        ]
    );

    let expanded = plan.initial_conditions.get("bacteria").unwrap();
    assert_eq!(expanded.as_sequence().unwrap().len(), 4);

    for (filename, document) in plan.documents() {
        assert!(filename.starts_with("parameters_wall_innerRadius_"));
        assert_eq!(document.unit_of_measure, full.unit_of_measure);
        assert_eq!(document.initial_conditions, plan.initial_conditions);
    }
}

/// Output documents serialize with the agreed key order.
#[test]
fn test_output_document_key_order() {
    let full = full_document(
        r#"{"wall": {"innerRadius": 20, "hardness": 10},
            "propulsion": {"speed": 1, "radius": 0.5}}"#,
    );
    let plan = build_plan(&reference_document(), &full, SweepMode::OneFactor).unwrap();

    let (_, document) = plan.documents().next().unwrap();
    let serialized = serde_json::to_string(&document).unwrap();

    let unit = serialized.find("unitOfMeasure").unwrap();
    let parameters = serialized.find("parameters").unwrap();
    let conditions = serialized.find("initialConditions").unwrap();
    assert!(unit < parameters && parameters < conditions);
}

/// Off-key-path leaves survive the output format byte-for-byte equal to the
/// reference leaves.
#[test]
fn test_defaulting_fidelity_through_round_trip() {
    let reference = reference_document();
    let full = full_document(
        r#"{"wall": {"innerRadius": [20, 30], "hardness": 10},
            "propulsion": {"speed": 1, "radius": 0.5}}"#,
    );
    let plan = build_plan(&reference, &full, SweepMode::OneFactor).unwrap();

    for (_, document) in plan.documents() {
        let serialized = serde_json::to_string(&document).unwrap();
        let reparsed = node(&serialized);
        let parameters = reparsed.get("parameters").unwrap();
        assert_eq!(
            serde_json::to_string(parameters.get("propulsion").unwrap()).unwrap(),
            serde_json::to_string(reference.parameters.get("propulsion").unwrap()).unwrap(),
        );
        assert_eq!(
            parameters.get("wall").unwrap().get("hardness"),
            reference.parameters.get("wall").unwrap().get("hardness"),
        );
    }
}

/// A sweep with no variation anywhere still yields exactly one baseline file.
#[test]
fn test_no_variation_plans_single_baseline_file() {
    let full = full_document(
        r#"{"wall": {"innerRadius": 20, "hardness": 10},
            "propulsion": {"speed": 1, "radius": 0.5}}"#,
    );
    let plan = build_plan(&reference_document(), &full, SweepMode::OneFactor).unwrap();

    assert_eq!(plan.file_count(), 1);
    let group = &plan.groups[&KeyPath::root()];
    assert_eq!(group.filenames().collect::<Vec<_>>(), vec!["baseline_0.json"]);
}

/// Generation is atomic: a missing default fails the whole plan, so nothing
/// is ever available to write.
#[test]
fn test_missing_default_fails_whole_plan() {
    let full = full_document(
        r#"{"wall": {"innerRadius": [20, 30], "hardness": 10, "zeta": 1},
            "propulsion": {"speed": 1, "radius": 0.5}}"#,
    );

    let error = build_plan(&reference_document(), &full, SweepMode::OneFactor).unwrap_err();

    assert_eq!(
        error,
        SweepError::Combine(CombineError::MissingDefault {
            path: KeyPath::from_fields(["wall"]),
            field: "zeta".to_owned(),
        })
    );
}

/// Source documents missing their parameter section are malformed.
#[test]
fn test_document_extraction_requires_parameters_record() {
    let error = ReferenceDocument::from_node(&node(r#"{"parameters": 3}"#)).unwrap_err();
    assert_eq!(
        error,
        CombineError::MalformedNode {
            path: KeyPath::from_fields(["parameters"]),
        }
    );

    assert!(FullDocument::from_node(&node(r#"{"parameters": {}}"#)).is_err());
}
