//! Grid expander - turns compact "grid of entities" descriptors into explicit
//! entity records.
//!
//! The initial-conditions section of a full document may place a descriptor
//! element inside an entity collection instead of listing every entity. The
//! expander replaces each descriptor with the individual entities it denotes,
//! centered on the descriptor's position. Expanded entities are appended to
//! their containing collection; interleaving with hand-written entities is
//! explicitly not preserved.
//!
//! Pure and deterministic: no randomness, inputs never mutated.

use crate::combine::KeyPath;
use crate::error::CombineError;
use crate::node::{ConfigNode, Scalar};

/// Collection element key marking a compact grid descriptor.
const GRID_FIELD: &str = "grid";

/// Grid extent: a square grid sized by a total entity count, or an explicit
/// rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridShape {
    /// `edge = round(sqrt(count))`, generating `edge x edge` entities.
    Square { count: u64 },
    /// Independent row/column spans, each centered on its own axis.
    Rect { rows: u64, columns: u64 },
}

/// Compact specification of a regularly spaced block of entities.
#[derive(Debug, Clone, PartialEq)]
pub struct GridDescriptor {
    pub shape: GridShape,
    pub spacing: f64,
    /// Center of the grid.
    pub x: f64,
    pub y: f64,
    /// Copied verbatim into every generated entity.
    pub direction: ConfigNode,
}

impl GridDescriptor {
    /// Parse a descriptor from the record under a collection element's `grid`
    /// field. Shape violations (missing extent, non-numeric spacing or
    /// position) are fatal.
    pub fn from_node(node: &ConfigNode, path: &KeyPath) -> Result<Self, CombineError> {
        let malformed = || CombineError::MalformedNode { path: path.clone() };

        let fields = node.as_record().ok_or_else(malformed)?;

        let shape = if let Some(count) = fields.get("count") {
            GridShape::Square {
                count: finite_count(count).ok_or_else(malformed)?,
            }
        } else {
            match (fields.get("rows"), fields.get("columns")) {
                (Some(rows), Some(columns)) => GridShape::Rect {
                    rows: finite_count(rows).ok_or_else(malformed)?,
                    columns: finite_count(columns).ok_or_else(malformed)?,
                },
                _ => return Err(malformed()),
            }
        };

        let spacing = finite_number(fields.get("spacing")).ok_or_else(malformed)?;
        let position = fields.get("position").ok_or_else(malformed)?;
        let x = finite_number(position.get("x")).ok_or_else(malformed)?;
        let y = finite_number(position.get("y")).ok_or_else(malformed)?;
        let direction = fields.get("direction").cloned().ok_or_else(malformed)?;

        Ok(GridDescriptor {
            shape,
            spacing,
            x,
            y,
            direction,
        })
    }

    /// Expand into one entity record per grid point, row by row.
    ///
    /// Each entity is `{position: {x, y}, direction}` with the grid centered on
    /// the descriptor's position: grid index `(i, j)` maps to
    /// `(x + (i - (w-1)/2) * spacing, y + (j - (h-1)/2) * spacing)`.
    #[must_use]
    pub fn expand(&self) -> Vec<ConfigNode> {
        let (width, height) = match self.shape {
            GridShape::Square { count } => {
                let edge = (count as f64).sqrt().round() as u64;
                (edge, edge)
            }
            // Columns span x, rows span y.
            GridShape::Rect { rows, columns } => (columns, rows),
        };

        let mut entities = Vec::with_capacity((width * height) as usize);
        for i in 0..width {
            for j in 0..height {
                let x = self.x + (i as f64 - (width as f64 - 1.0) / 2.0) * self.spacing;
                let y = self.y + (j as f64 - (height as f64 - 1.0) / 2.0) * self.spacing;
                let position = ConfigNode::record([
                    ("x".to_owned(), ConfigNode::Scalar(Scalar::from(x))),
                    ("y".to_owned(), ConfigNode::Scalar(Scalar::from(y))),
                ]);
                entities.push(ConfigNode::record([
                    ("position".to_owned(), position),
                    ("direction".to_owned(), self.direction.clone()),
                ]));
            }
        }
        entities
    }
}

/// Rewrite an initial-conditions record, expanding every grid descriptor found
/// inside its entity collections.
///
/// Descriptor elements are removed from their collection and the entities they
/// expand to are appended after the hand-written ones. Sections that are not
/// sequences, and elements that carry no `grid` field, pass through untouched.
pub fn expand_initial_conditions(node: &ConfigNode) -> Result<ConfigNode, CombineError> {
    let root = KeyPath::from_fields(["initialConditions"]);
    let sections = node
        .as_record()
        .ok_or_else(|| CombineError::MalformedNode { path: root.clone() })?;

    let mut expanded = indexmap::IndexMap::new();
    for (name, section) in sections {
        let value = match section {
            ConfigNode::Sequence(elements) => {
                let section_path = root.child(name);
                let mut kept = Vec::with_capacity(elements.len());
                let mut appended = Vec::new();
                for (index, element) in elements.iter().enumerate() {
                    match element.get(GRID_FIELD) {
                        Some(descriptor) => {
                            let path = section_path.child(&index.to_string());
                            let descriptor = GridDescriptor::from_node(descriptor, &path)?;
                            appended.extend(descriptor.expand());
                        }
                        None => kept.push(element.clone()),
                    }
                }
                kept.extend(appended);
                ConfigNode::Sequence(kept)
            }
            other => other.clone(),
        };
        expanded.insert(name.clone(), value);
    }
    Ok(ConfigNode::Record(expanded))
}

fn finite_number(node: Option<&ConfigNode>) -> Option<f64> {
    node.and_then(ConfigNode::as_scalar)
        .and_then(Scalar::as_f64)
        .filter(|v| v.is_finite())
}

fn finite_count(node: &ConfigNode) -> Option<u64> {
    let value = node.as_scalar()?.as_f64()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0).then_some(value as u64)
}
