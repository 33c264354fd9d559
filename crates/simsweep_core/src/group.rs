//! Sweep grouper - organizes combinator output by varied dimension.
//!
//! Instances sharing a key path (the same set of varied fields) form one
//! [`SweepGroup`]; the group key identifies *which* dimension varied, member
//! filenames identify *which value* along it. This map is the contract handed
//! to the simulation runner (one external invocation per member file) and the
//! plot dispatcher (one overlay figure per group).

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::combine::{KeyPath, VariantInstance};
use crate::error::GroupError;
use crate::node::ConfigNode;

/// Separator between key-path fields in derived filenames.
const FIELD_SEPARATOR: &str = "_";
/// Extension of every generated document.
const FILE_EXTENSION: &str = ".json";
/// Filename stem used for the empty key path (a sweep with no variation).
const BASELINE_STEM: &str = "baseline";

/// One member of a sweep group.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepMember {
    /// 0-based position within the group, assigned in production order.
    pub ordinal: usize,
    /// Derived output filename for this member.
    pub filename: String,
    /// The member's concrete configuration tree.
    pub tree: ConfigNode,
}

/// All variant instances sharing one key path.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepGroup {
    pub key_path: KeyPath,
    pub members: Vec<SweepMember>,
}

impl SweepGroup {
    /// Filenames of every member, in ordinal order.
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.filename.as_str())
    }
}

/// Derive the output filename for one member of a group.
///
/// Key-path fields joined by `_`, then the ordinal, then `.json`. The empty
/// key path uses the stem `baseline` (joining nothing would produce a filename
/// starting with the separator).
#[must_use]
pub fn derive_filename(key_path: &KeyPath, ordinal: usize) -> String {
    let stem = if key_path.is_empty() {
        BASELINE_STEM.to_owned()
    } else {
        key_path.join(FIELD_SEPARATOR)
    };
    format!("{stem}{FIELD_SEPARATOR}{ordinal}{FILE_EXTENSION}")
}

/// Group instances by key path, preserving production order both across groups
/// (first occurrence) and within each group (ordinals).
///
/// Distinct key paths can still collide on the derived filename (`["a","b"]`
/// and `["a_b"]` both join to `a_b`); that is fatal before anything is
/// written.
pub fn group_instances(
    instances: Vec<VariantInstance>,
) -> Result<IndexMap<KeyPath, SweepGroup>, GroupError> {
    let mut groups: IndexMap<KeyPath, SweepGroup> = IndexMap::new();
    let mut claimed: FxHashMap<String, KeyPath> = FxHashMap::default();

    for instance in instances {
        let group = groups
            .entry(instance.key_path.clone())
            .or_insert_with(|| SweepGroup {
                key_path: instance.key_path.clone(),
                members: Vec::new(),
            });

        let ordinal = group.members.len();
        let filename = derive_filename(&instance.key_path, ordinal);
        if let Some(first) = claimed.insert(filename.clone(), instance.key_path.clone()) {
            return Err(GroupError::NamingCollision {
                filename,
                first,
                second: instance.key_path,
            });
        }

        group.members.push(SweepMember {
            ordinal,
            filename,
            tree: instance.tree,
        });
    }

    Ok(groups)
}
