//! Source and output document model, and sweep plan assembly.
//!
//! The reference document carries only a `parameters` baseline tree. The full
//! document carries `unitOfMeasure` (opaque passthrough), `initialConditions`
//! (grid-expanded before combination) and `parameters` (the full tree handed
//! to the combinator). One output document is produced per variant instance,
//! sharing the expanded initial conditions and the verbatim unit section.
//!
//! [`build_plan`] runs expander, combinator and grouper entirely in memory, so
//! a failure anywhere yields a plan-free error and zero output files.

use indexmap::IndexMap;
use serde::Serialize;

use crate::combine::{KeyPath, SweepMode, VariantInstance, combine};
use crate::error::{CombineError, SweepError};
use crate::grid::expand_initial_conditions;
use crate::group::{SweepGroup, group_instances};
use crate::node::ConfigNode;

/// Field holding the parameter tree in both source documents.
const PARAMETERS_FIELD: &str = "parameters";
const UNIT_FIELD: &str = "unitOfMeasure";
const INITIAL_CONDITIONS_FIELD: &str = "initialConditions";

/// Baseline document: fully-resolved defaults only.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDocument {
    pub parameters: ConfigNode,
}

impl ReferenceDocument {
    /// Extract from a parsed tree; the root must be a record with a record
    /// `parameters` section.
    pub fn from_node(node: &ConfigNode) -> Result<Self, CombineError> {
        Ok(ReferenceDocument {
            parameters: require_record_field(node, PARAMETERS_FIELD)?,
        })
    }
}

/// Full document: the tree whose branches may enumerate alternatives.
#[derive(Debug, Clone, PartialEq)]
pub struct FullDocument {
    /// Opaque to the combinator, copied verbatim into every output.
    pub unit_of_measure: ConfigNode,
    /// Entity collections, possibly holding compact grid descriptors.
    pub initial_conditions: ConfigNode,
    pub parameters: ConfigNode,
}

impl FullDocument {
    pub fn from_node(node: &ConfigNode) -> Result<Self, CombineError> {
        let unit_of_measure = node
            .get(UNIT_FIELD)
            .cloned()
            .ok_or_else(|| missing(UNIT_FIELD))?;
        let initial_conditions = node
            .get(INITIAL_CONDITIONS_FIELD)
            .cloned()
            .ok_or_else(|| missing(INITIAL_CONDITIONS_FIELD))?;
        Ok(FullDocument {
            unit_of_measure,
            initial_conditions,
            parameters: require_record_field(node, PARAMETERS_FIELD)?,
        })
    }
}

fn missing(field: &str) -> CombineError {
    CombineError::MalformedNode {
        path: KeyPath::from_fields([field]),
    }
}

fn require_record_field(node: &ConfigNode, field: &str) -> Result<ConfigNode, CombineError> {
    let value = node.get(field).ok_or_else(|| missing(field))?;
    if value.as_record().is_none() {
        return Err(missing(field));
    }
    Ok(value.clone())
}

/// One generated simulation input, serialized with a fixed key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputDocument {
    #[serde(rename = "unitOfMeasure")]
    pub unit_of_measure: ConfigNode,
    pub parameters: ConfigNode,
    #[serde(rename = "initialConditions")]
    pub initial_conditions: ConfigNode,
}

/// Complete in-memory result of one sweep-generation invocation.
///
/// The group map is the surface consumed by the simulation runner (iterate
/// groups, then members, one invocation per file) and the plot dispatcher
/// (one overlay figure per group).
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPlan {
    pub groups: IndexMap<KeyPath, SweepGroup>,
    /// Shared across all documents of this invocation.
    pub unit_of_measure: ConfigNode,
    /// Grid-expanded, shared across all documents of this invocation.
    pub initial_conditions: ConfigNode,
}

impl SweepPlan {
    /// Total number of generated documents across all groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.values().map(|g| g.members.len()).sum()
    }

    /// Yield every `(filename, document)` in group order, members in ordinal
    /// order. Each document owns fresh copies of the shared sections.
    pub fn documents(&self) -> impl Iterator<Item = (&str, OutputDocument)> {
        self.groups.values().flat_map(|group| {
            group.members.iter().map(|member| {
                let document = OutputDocument {
                    unit_of_measure: self.unit_of_measure.clone(),
                    parameters: member.tree.clone(),
                    initial_conditions: self.initial_conditions.clone(),
                };
                (member.filename.as_str(), document)
            })
        })
    }
}

/// Build the complete sweep plan for one reference/full document pair.
///
/// Key paths are rooted at the document's `parameters` section, so a varying
/// `speed` leaf groups under `["parameters", "speed"]` and derives filenames
/// like `parameters_speed_0.json`.
pub fn build_plan(
    reference: &ReferenceDocument,
    full: &FullDocument,
    mode: SweepMode,
) -> Result<SweepPlan, SweepError> {
    let initial_conditions = expand_initial_conditions(&full.initial_conditions)?;

    // A no-variation run keeps its empty key path (it varies nothing, not
    // "parameters") and groups under the baseline filename stem.
    let instances: Vec<VariantInstance> =
        combine(&full.parameters, &reference.parameters, mode)?
            .into_iter()
            .map(|instance| VariantInstance {
                key_path: if instance.key_path.is_empty() {
                    instance.key_path
                } else {
                    instance.key_path.prepended(PARAMETERS_FIELD)
                },
                tree: instance.tree,
            })
            .collect();

    let groups = group_instances(instances)?;

    Ok(SweepPlan {
        groups,
        unit_of_measure: full.unit_of_measure.clone(),
        initial_conditions,
    })
}
