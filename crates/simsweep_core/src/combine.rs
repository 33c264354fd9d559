//! Tree combinator - reconciles a full tree against a reference tree.
//!
//! Given a reference tree holding fully-resolved defaults and a full tree in
//! which some positions enumerate alternative values, [`combine`] produces the
//! ordered list of concrete instances needed to explore every variation. Each
//! instance carries a [`KeyPath`] naming the fields in which it differs from
//! the reference tree; every other leaf is defaulted from the reference.
//!
//! Two merge semantics exist for simultaneously varying sibling fields
//! (see [`SweepMode`]): one-factor-at-a-time against the shared baseline, or a
//! full Cartesian cross product. Positions with no reference branch to default
//! from are always Cartesian-merged.
//!
//! The combinator is pure: inputs are never mutated and every output tree is a
//! fresh deep copy, so instances share no state.

use std::fmt;

use crate::error::CombineError;
use crate::node::{ConfigNode, Fields};

/// Ordered sequence of field names identifying which positions of an instance
/// differ from the reference tree.
///
/// Two key paths are the same group key only if they are identical in length
/// and field-name sequence. Positional sequence elements contribute their
/// decimal index as a field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// The empty path (an instance that varies nothing).
    #[must_use]
    pub fn root() -> Self {
        KeyPath(Vec::new())
    }

    /// Build a path from field names, for group keys and tests.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyPath(fields.into_iter().map(Into::into).collect())
    }

    /// A new path descending into `field`.
    #[must_use]
    pub fn child(&self, field: &str) -> Self {
        let mut fields = self.0.clone();
        fields.push(field.to_owned());
        KeyPath(fields)
    }

    /// A new path with `field` prepended (used when a parent record attaches
    /// its field name to a child's path).
    #[must_use]
    pub fn prepended(&self, field: &str) -> Self {
        let mut fields = Vec::with_capacity(self.0.len() + 1);
        fields.push(field.to_owned());
        fields.extend(self.0.iter().cloned());
        KeyPath(fields)
    }

    /// Append every field of `other` to this path.
    pub fn extend(&mut self, other: &KeyPath) {
        self.0.extend(other.0.iter().cloned());
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Join the field names with `separator` (filename derivation).
    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", self.0.join("."))
        }
    }
}

/// How simultaneously varying sibling fields combine when a reference branch
/// exists at their position.
///
/// The two semantics diverged in the history of the original driver and are
/// both kept, selected explicitly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepMode {
    /// Each varying field sweeps alone against the shared baseline; two
    /// varying siblings never cross-multiply. Positions without a baseline
    /// still Cartesian-merge (there is no baseline to hold the others at).
    #[default]
    OneFactor,
    /// Varying siblings always cross-multiply, each combination complemented
    /// from the baseline where one exists.
    Cartesian,
}

/// One fully-resolved concrete configuration plus the path of fields it varies.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantInstance {
    pub key_path: KeyPath,
    pub tree: ConfigNode,
}

/// Reconcile `full` against `reference`, producing every concrete instance in
/// production order.
///
/// A full tree with no variation axis anywhere yields exactly one instance
/// with an empty key path: the full tree with every reference-only field
/// filled in.
pub fn combine(
    full: &ConfigNode,
    reference: &ConfigNode,
    mode: SweepMode,
) -> Result<Vec<VariantInstance>, CombineError> {
    let pairs = combine_at(full, Some(reference), &KeyPath::root(), mode)?;
    Ok(pairs
        .into_iter()
        .map(|(key_path, tree)| VariantInstance { key_path, tree })
        .collect())
}

/// A child position of a record (or of a positional sequence, keyed by index).
struct Slot<'a> {
    key: String,
    /// The full-tree child, `None` for reference-only fields.
    node: Option<&'a ConfigNode>,
    /// The reference-branch child, `None` where the baseline has no field.
    baseline: Option<&'a ConfigNode>,
}

/// Per-slot recursion outcome.
enum SlotOutcome {
    /// Exactly one combination: folds into the accumulator as-is.
    Fixed(ConfigNode),
    /// Two or more combinations: this slot is a varying field.
    Varying(Vec<(KeyPath, ConfigNode)>),
}

/// What to rebuild the combined slots into.
#[derive(Clone, Copy)]
enum Shape {
    Record,
    Sequence,
}

fn combine_at(
    node: &ConfigNode,
    baseline: Option<&ConfigNode>,
    path: &KeyPath,
    mode: SweepMode,
) -> Result<Vec<(KeyPath, ConfigNode)>, CombineError> {
    match node {
        ConfigNode::Scalar(_) => Ok(vec![(KeyPath::root(), node.clone())]),

        ConfigNode::Sequence(elements) => match baseline {
            // The reference holds an array here: the list is positional, one
            // independent child per index.
            Some(ConfigNode::Sequence(reference_elements)) => {
                let slots = sequence_slots(elements, reference_elements);
                combine_slots(&slots, baseline, path, mode, Shape::Sequence)
            }
            // No corresponding array in the reference: a variation axis. Each
            // element is one alternative value, copied verbatim.
            _ => {
                if elements.is_empty() {
                    return Err(CombineError::EmptyVariationAxis { path: path.clone() });
                }
                Ok(elements
                    .iter()
                    .map(|element| (KeyPath::root(), element.clone()))
                    .collect())
            }
        },

        ConfigNode::Record(fields) => match baseline {
            Some(ConfigNode::Record(reference_fields)) => {
                let slots = record_slots(fields, Some(reference_fields));
                combine_slots(&slots, baseline, path, mode, Shape::Record)
            }
            // Free-form position: nothing to default from, varying children
            // are always Cartesian-merged.
            None => {
                let slots = record_slots(fields, None);
                combine_slots(&slots, None, path, mode, Shape::Record)
            }
            // A record over a scalar or sequence baseline cannot be
            // complemented; refuse rather than guess.
            Some(_) => Err(CombineError::MalformedNode { path: path.clone() }),
        },
    }
}

fn record_slots<'a>(fields: &'a Fields, reference: Option<&'a Fields>) -> Vec<Slot<'a>> {
    let mut slots: Vec<Slot<'a>> = fields
        .iter()
        .map(|(key, child)| Slot {
            key: key.clone(),
            node: Some(child),
            baseline: reference.and_then(|r| r.get(key)),
        })
        .collect();
    // Reference-only fields follow, in reference order (invariant: the output
    // field set is the union of both trees' fields at this position).
    if let Some(reference) = reference {
        slots.extend(
            reference
                .iter()
                .filter(|(key, _)| !fields.contains_key(*key))
                .map(|(key, child)| Slot {
                    key: key.clone(),
                    node: None,
                    baseline: Some(child),
                }),
        );
    }
    slots
}

fn sequence_slots<'a>(
    elements: &'a [ConfigNode],
    reference_elements: &'a [ConfigNode],
) -> Vec<Slot<'a>> {
    let len = elements.len().max(reference_elements.len());
    (0..len)
        .map(|index| Slot {
            key: index.to_string(),
            node: elements.get(index),
            baseline: reference_elements.get(index),
        })
        .collect()
}

fn combine_slots(
    slots: &[Slot<'_>],
    baseline: Option<&ConfigNode>,
    path: &KeyPath,
    mode: SweepMode,
    shape: Shape,
) -> Result<Vec<(KeyPath, ConfigNode)>, CombineError> {
    let has_baseline = baseline.is_some();

    let mut outcomes: Vec<SlotOutcome> = Vec::with_capacity(slots.len());
    for slot in slots {
        let outcome = match slot.node {
            Some(child) => {
                let mut pairs = combine_at(child, slot.baseline, &path.child(&slot.key), mode)?;
                if pairs.len() == 1 {
                    // One combination: this field contributes no variation.
                    let (_, tree) = pairs.remove(0);
                    SlotOutcome::Fixed(tree)
                } else {
                    SlotOutcome::Varying(pairs)
                }
            }
            // Reference-only field, filled from the baseline.
            None => SlotOutcome::Fixed(
                slot.baseline
                    .cloned()
                    .ok_or_else(|| CombineError::MalformedNode { path: path.clone() })?,
            ),
        };
        outcomes.push(outcome);
    }

    let varying: Vec<usize> = outcomes
        .iter()
        .enumerate()
        .filter(|(_, o)| matches!(o, SlotOutcome::Varying(_)))
        .map(|(i, _)| i)
        .collect();

    // No variation anywhere below: fold everything into a single accumulator.
    // Full-tree values win here; only fields absent from the full tree were
    // filled from the reference.
    if varying.is_empty() {
        let values = slots
            .iter()
            .zip(&outcomes)
            .map(|(slot, outcome)| match outcome {
                SlotOutcome::Fixed(tree) => (slot.key.clone(), tree.clone()),
                SlotOutcome::Varying(_) => unreachable!("varying set is empty"),
            })
            .collect();
        return Ok(vec![(KeyPath::root(), rebuild(shape, values))]);
    }

    if has_baseline && mode == SweepMode::OneFactor {
        one_factor_instances(slots, &outcomes, &varying, path, shape)
    } else {
        cartesian_instances(slots, &outcomes, &varying, path, shape, has_baseline)
    }
}

/// One-factor-at-a-time merge: each varying slot contributes its own instances
/// against the shared baseline, sibling variations never cross-multiply.
fn one_factor_instances(
    slots: &[Slot<'_>],
    outcomes: &[SlotOutcome],
    varying: &[usize],
    path: &KeyPath,
    shape: Shape,
) -> Result<Vec<(KeyPath, ConfigNode)>, CombineError> {
    let mut result = Vec::new();
    for &v in varying {
        let SlotOutcome::Varying(pairs) = &outcomes[v] else {
            unreachable!("index collected from varying outcomes");
        };
        for (child_path, value) in pairs {
            let values = complemented_values(slots, path, |index| {
                (index == v).then_some(value)
            })?;
            result.push((child_path.prepended(&slots[v].key), rebuild(shape, values)));
        }
    }
    Ok(result)
}

/// Cartesian merge: the accumulator is crossed with each varying slot in slot
/// order, so later fields vary fastest (row-major).
fn cartesian_instances(
    slots: &[Slot<'_>],
    outcomes: &[SlotOutcome],
    varying: &[usize],
    path: &KeyPath,
    shape: Shape,
    has_baseline: bool,
) -> Result<Vec<(KeyPath, ConfigNode)>, CombineError> {
    // Each combination selects one pair per varying slot.
    let mut combos: Vec<(KeyPath, Vec<&ConfigNode>)> = vec![(KeyPath::root(), Vec::new())];
    for &v in varying {
        let SlotOutcome::Varying(pairs) = &outcomes[v] else {
            unreachable!("index collected from varying outcomes");
        };
        let mut next = Vec::with_capacity(combos.len() * pairs.len());
        for (combo_path, selections) in &combos {
            for (child_path, value) in pairs {
                let mut key_path = combo_path.clone();
                key_path.extend(&child_path.prepended(&slots[v].key));
                let mut selections = selections.clone();
                selections.push(value);
                next.push((key_path, selections));
            }
        }
        combos = next;
    }

    let mut result = Vec::with_capacity(combos.len());
    for (key_path, selections) in combos {
        let values = if has_baseline {
            complemented_values(slots, path, |index| {
                varying
                    .iter()
                    .position(|&v| v == index)
                    .map(|pos| selections[pos])
            })?
        } else {
            // Free-form: non-varying slots keep their folded values.
            slots
                .iter()
                .enumerate()
                .map(|(index, slot)| {
                    let value = match varying.iter().position(|&v| v == index) {
                        Some(pos) => selections[pos].clone(),
                        None => match &outcomes[index] {
                            SlotOutcome::Fixed(tree) => tree.clone(),
                            SlotOutcome::Varying(_) => unreachable!("not in varying set"),
                        },
                    };
                    (slot.key.clone(), value)
                })
                .collect()
        };
        result.push((key_path, rebuild(shape, values)));
    }
    Ok(result)
}

/// Build instance values against a baseline: selected slots take their variant
/// value, every other slot is complemented from the reference branch. A
/// sibling with neither a selection nor a reference default is fatal.
fn complemented_values<'a>(
    slots: &[Slot<'_>],
    path: &KeyPath,
    selected: impl Fn(usize) -> Option<&'a ConfigNode>,
) -> Result<Vec<(String, ConfigNode)>, CombineError> {
    slots
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let value = match selected(index) {
                Some(value) => value.clone(),
                None => slot
                    .baseline
                    .cloned()
                    .ok_or_else(|| CombineError::MissingDefault {
                        path: path.clone(),
                        field: slot.key.clone(),
                    })?,
            };
            Ok((slot.key.clone(), value))
        })
        .collect()
}

fn rebuild(shape: Shape, values: Vec<(String, ConfigNode)>) -> ConfigNode {
    match shape {
        Shape::Record => ConfigNode::Record(values.into_iter().collect()),
        Shape::Sequence => {
            ConfigNode::Sequence(values.into_iter().map(|(_, value)| value).collect())
        }
    }
}
