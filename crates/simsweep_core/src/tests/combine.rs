//! Tests for the tree combinator

use super::node;
use crate::combine::{KeyPath, SweepMode, combine};
use crate::error::CombineError;

/// A full tree with no variation axis yields exactly one instance: the full
/// tree with every reference-only field filled in, full-tree values winning
/// where both trees carry one.
#[test]
fn test_no_variation_merges_reference_defaults() {
    let reference = node(r#"{"speed": 1, "radius": 0.5, "extra": 7}"#);
    let full = node(r#"{"speed": 2, "radius": 0.5}"#);

    let instances = combine(&full, &reference, SweepMode::OneFactor).unwrap();

    assert_eq!(instances.len(), 1);
    assert!(instances[0].key_path.is_empty());
    assert_eq!(
        instances[0].tree,
        node(r#"{"speed": 2, "radius": 0.5, "extra": 7}"#)
    );
}

/// A single three-value axis yields three instances in element order, each
/// defaulting the sibling from the reference.
#[test]
fn test_single_axis_cardinality() {
    let reference = node(r#"{"parameters": {"speed": 1, "radius": 0.5}}"#);
    let full = node(r#"{"parameters": {"speed": [1, 2, 3], "radius": 0.5}}"#);

    let instances = combine(&full, &reference, SweepMode::OneFactor).unwrap();

    assert_eq!(instances.len(), 3);
    for (instance, speed) in instances.iter().zip([1, 2, 3]) {
        assert_eq!(
            instance.key_path,
            KeyPath::from_fields(["parameters", "speed"])
        );
        assert_eq!(
            instance.tree,
            node(&format!(r#"{{"parameters": {{"speed": {speed}, "radius": 0.5}}}}"#))
        );
    }
}

/// Two axes under a record with no reference branch cross-multiply: 2 x 3
/// combinations, each exactly once, the later field varying fastest.
#[test]
fn test_cartesian_closure_at_free_form_position() {
    let reference = node(r#"{"a": 1}"#);
    let full = node(r#"{"box": {"w": [1, 2], "h": [10, 20, 30]}, "a": 1}"#);

    let instances = combine(&full, &reference, SweepMode::OneFactor).unwrap();

    assert_eq!(instances.len(), 6);
    let expected = [(1, 10), (1, 20), (1, 30), (2, 10), (2, 20), (2, 30)];
    for (instance, (w, h)) in instances.iter().zip(expected) {
        assert_eq!(instance.key_path, KeyPath::from_fields(["box", "w", "h"]));
        assert_eq!(
            instance.tree,
            node(&format!(r#"{{"box": {{"w": {w}, "h": {h}}}, "a": 1}}"#))
        );
    }
    for (i, a) in instances.iter().enumerate() {
        for b in &instances[i + 1..] {
            assert_ne!(a.tree, b.tree, "no combination may repeat");
        }
    }
}

/// With a baseline present, simultaneously varying siblings sweep one factor
/// at a time against the shared baseline instead of cross-multiplying.
#[test]
fn test_one_factor_siblings_do_not_cross_multiply() {
    let reference = node(r#"{"speed": 1, "radius": 2}"#);
    let full = node(r#"{"speed": [1, 5], "radius": [2, 9]}"#);

    let instances = combine(&full, &reference, SweepMode::OneFactor).unwrap();

    assert_eq!(instances.len(), 4);
    let expected = [
        (KeyPath::from_fields(["speed"]), r#"{"speed": 1, "radius": 2}"#),
        (KeyPath::from_fields(["speed"]), r#"{"speed": 5, "radius": 2}"#),
        (KeyPath::from_fields(["radius"]), r#"{"speed": 1, "radius": 2}"#),
        (KeyPath::from_fields(["radius"]), r#"{"speed": 1, "radius": 9}"#),
    ];
    for (instance, (key_path, tree)) in instances.iter().zip(expected) {
        assert_eq!(instance.key_path, key_path);
        assert_eq!(instance.tree, node(tree));
    }
}

/// Cartesian mode cross-multiplies even where a baseline exists, labelling
/// each instance with both varied fields.
#[test]
fn test_cartesian_mode_crosses_baseline_siblings() {
    let reference = node(r#"{"speed": 1, "radius": 2}"#);
    let full = node(r#"{"speed": [1, 5], "radius": [2, 9]}"#);

    let instances = combine(&full, &reference, SweepMode::Cartesian).unwrap();

    assert_eq!(instances.len(), 4);
    let expected = [(1, 2), (1, 9), (5, 2), (5, 9)];
    for (instance, (speed, radius)) in instances.iter().zip(expected) {
        assert_eq!(instance.key_path, KeyPath::from_fields(["speed", "radius"]));
        assert_eq!(
            instance.tree,
            node(&format!(r#"{{"speed": {speed}, "radius": {radius}}}"#))
        );
    }
}

/// An axis whose elements are records copies each alternative verbatim.
#[test]
fn test_record_valued_axis() {
    let reference = node(r#"{"tumble": {"mode": "none"}, "speed": 3}"#);
    let full = node(
        r#"{"tumble": [{"mode": "none"}, {"mode": "burst", "angle": 1.5}], "speed": 3}"#,
    );

    let instances = combine(&full, &reference, SweepMode::OneFactor).unwrap();

    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].key_path, KeyPath::from_fields(["tumble"]));
    assert_eq!(
        instances[0].tree,
        node(r#"{"tumble": {"mode": "none"}, "speed": 3}"#)
    );
    assert_eq!(
        instances[1].tree,
        node(r#"{"tumble": {"mode": "burst", "angle": 1.5}, "speed": 3}"#)
    );
}

/// A sequence over a reference sequence is positional: elements combine
/// independently by index, siblings defaulting from the reference elements.
#[test]
fn test_positional_sequence_elements_combine_independently() {
    let reference = node(r#"{"agents": [{"s": 1}, {"s": 2}]}"#);
    let full = node(r#"{"agents": [{"s": [1, 9]}, {"s": 2}]}"#);

    let instances = combine(&full, &reference, SweepMode::OneFactor).unwrap();

    assert_eq!(instances.len(), 2);
    for (instance, s) in instances.iter().zip([1, 9]) {
        assert_eq!(instance.key_path, KeyPath::from_fields(["agents", "0", "s"]));
        assert_eq!(
            instance.tree,
            node(&format!(r#"{{"agents": [{{"s": {s}}}, {{"s": 2}}]}}"#))
        );
    }
}

/// A positional sequence shorter than its reference is padded with the
/// reference's trailing elements.
#[test]
fn test_positional_sequence_pads_from_reference() {
    let reference = node(r#"{"agents": [{"s": 1}, {"s": 2}]}"#);
    let full = node(r#"{"agents": [{"s": 5}]}"#);

    let instances = combine(&full, &reference, SweepMode::OneFactor).unwrap();

    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].tree, node(r#"{"agents": [{"s": 5}, {"s": 2}]}"#));
}

/// A varying field's sibling absent from both the partial record and the
/// reference branch cannot be defaulted.
#[test]
fn test_missing_default_is_fatal() {
    let reference = node(r#"{"speed": 1}"#);
    let full = node(r#"{"speed": [1, 2], "flux": 3}"#);

    let error = combine(&full, &reference, SweepMode::OneFactor).unwrap_err();

    assert_eq!(
        error,
        CombineError::MissingDefault {
            path: KeyPath::root(),
            field: "flux".to_owned(),
        }
    );
}

/// An axis with zero elements is fatal.
#[test]
fn test_empty_variation_axis_is_fatal() {
    let reference = node(r#"{"speed": 1}"#);
    let full = node(r#"{"speed": []}"#);

    let error = combine(&full, &reference, SweepMode::OneFactor).unwrap_err();

    assert_eq!(
        error,
        CombineError::EmptyVariationAxis {
            path: KeyPath::from_fields(["speed"]),
        }
    );
}

/// A record over a scalar baseline cannot be complemented.
#[test]
fn test_shape_mismatch_is_fatal() {
    let reference = node(r#"{"wall": 3}"#);
    let full = node(r#"{"wall": {"radius": 1}}"#);

    let error = combine(&full, &reference, SweepMode::OneFactor).unwrap_err();

    assert_eq!(
        error,
        CombineError::MalformedNode {
            path: KeyPath::from_fields(["wall"]),
        }
    );
}

/// Identical inputs yield identical ordered output.
#[test]
fn test_determinism() {
    let reference = node(
        r#"{"wall": {"radius": 10, "hardness": 3},
            "propulsion": {"speed": 1, "tumble": {"rate": 0.1}}}"#,
    );
    let full = node(
        r#"{"wall": {"radius": [10, 20, 30], "hardness": 3},
            "propulsion": {"speed": [1, 2], "tumble": {"rate": [0.1, 0.5]}}}"#,
    );

    let first = combine(&full, &reference, SweepMode::OneFactor).unwrap();
    let second = combine(&full, &reference, SweepMode::OneFactor).unwrap();

    assert_eq!(first, second);
    assert!(!first.is_empty());
}

/// Every leaf not on an instance's key path equals the reference value.
#[test]
fn test_defaulting_fidelity() {
    let reference = node(r#"{"speed": 1, "radius": 0.25, "noise": {"sigma": 0.013}}"#);
    let full = node(r#"{"speed": [1, 2, 3], "radius": 0.25, "noise": {"sigma": 0.013}}"#);

    let instances = combine(&full, &reference, SweepMode::OneFactor).unwrap();

    for instance in &instances {
        assert_eq!(instance.key_path, KeyPath::from_fields(["speed"]));
        assert_eq!(instance.tree.get("radius"), reference.get("radius"));
        assert_eq!(instance.tree.get("noise"), reference.get("noise"));
    }
}
