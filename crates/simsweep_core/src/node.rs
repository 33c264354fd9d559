//! Configuration tree model
//!
//! `ConfigNode` is the tagged union every sweep component operates on. The shape
//! of a node is decided once when the source document is parsed, so downstream
//! code dispatches on the enum instead of re-inspecting raw JSON values.
//!
//! Records are backed by `IndexMap`: field insertion order is preserved and is
//! semantically significant (it drives merge order and output determinism).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A fully-resolved leaf value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl Scalar {
    /// Numeric view of the scalar, if it is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// String view of the scalar, if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Number(serde_json::Number::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        // Non-finite values cannot appear in a JSON document; fall back to null.
        serde_json::Number::from_f64(v).map_or(Scalar::Null, Scalar::Number)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_owned())
    }
}

/// Ordered field map backing a [`ConfigNode::Record`].
pub type Fields = IndexMap<String, ConfigNode>;

/// One node of a configuration tree.
///
/// Both the reference tree and the full tree are `ConfigNode`s. In a full tree
/// a `Sequence` at a position where the reference has no corresponding array is
/// a variation axis: each element enumerates one alternative value for that
/// position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigNode {
    Record(Fields),
    Sequence(Vec<ConfigNode>),
    Scalar(Scalar),
}

impl ConfigNode {
    /// Build a record node from `(name, node)` pairs, preserving order.
    pub fn record<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, ConfigNode)>,
    {
        ConfigNode::Record(fields.into_iter().collect())
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Fields> {
        match self {
            ConfigNode::Record(fields) => Some(fields),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&[ConfigNode]> {
        match self {
            ConfigNode::Sequence(elements) => Some(elements),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ConfigNode::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Field lookup on a record node; `None` for other shapes.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&ConfigNode> {
        self.as_record().and_then(|fields| fields.get(field))
    }

    /// True if every reachable leaf is a scalar (no sequence survives anywhere).
    ///
    /// Concrete sweep outputs keep positional sequences, so this is a stronger
    /// check than the combinator guarantees; it is mainly useful in tests on
    /// trees known to contain no positional lists.
    #[must_use]
    pub fn is_fully_scalar(&self) -> bool {
        match self {
            ConfigNode::Scalar(_) => true,
            ConfigNode::Sequence(_) => false,
            ConfigNode::Record(fields) => fields.values().all(ConfigNode::is_fully_scalar),
        }
    }
}

impl From<Scalar> for ConfigNode {
    fn from(scalar: Scalar) -> Self {
        ConfigNode::Scalar(scalar)
    }
}
