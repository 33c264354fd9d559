//! Hierarchical parameter-sweep generation library
//!
//! Given a baseline ("reference") configuration tree and a "full" tree in
//! which some branches enumerate alternative values, this crate synthesizes
//! the complete set of concrete simulation inputs needed to explore those
//! variations:
//! - the **tree combinator** recursively reconciles the two trees, defaulting
//!   every non-varying field from the baseline ([`combine::combine`]);
//! - the **sweep grouper** organizes the resulting instances by varied
//!   dimension and derives stable output filenames ([`group_instances`]);
//! - the **grid expander** turns compact grid-of-entities descriptors in the
//!   initial-conditions section into explicit entity records ([`GridDescriptor`]);
//! - [`build_plan`] ties the three together into a ready-to-write
//!   [`SweepPlan`].
//!
//! Everything here is pure and synchronous; file I/O and process spawning
//! live in the `simsweep` binary crate.

#![warn(clippy::all)]

pub mod combine;
pub mod document;
pub mod error;
pub mod grid;
pub mod group;
pub mod node;

#[cfg(test)]
mod tests;

pub use combine::{KeyPath, SweepMode, VariantInstance, combine};
pub use document::{FullDocument, OutputDocument, ReferenceDocument, SweepPlan, build_plan};
pub use error::{CombineError, GroupError, SweepError};
pub use grid::{GridDescriptor, GridShape, expand_initial_conditions};
pub use group::{SweepGroup, SweepMember, derive_filename, group_instances};
pub use node::{ConfigNode, Scalar};
