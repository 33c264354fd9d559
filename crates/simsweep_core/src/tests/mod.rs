//! Integration tests for sweep generation
//!
//! Tests are organized by topic:
//! - `combine` - Tree combinator semantics (axes, defaulting, merge modes)
//! - `grid` - Grid descriptor expansion
//! - `group` - Grouping, ordinals, filenames, collisions
//! - `document` - Document extraction and end-to-end plan assembly

mod combine;
mod document;

use crate::node::ConfigNode;

/// Parse a JSON literal into a config tree.
pub(crate) fn node(source: &str) -> ConfigNode {
    serde_json::from_str(source).expect("test literal must parse")
}
