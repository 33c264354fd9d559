use std::fmt;

use crate::combine::KeyPath;

/// Errors raised while reconciling the full tree against the reference tree.
///
/// All variants are fatal: the whole sweep-generation invocation aborts and no
/// output is committed.
#[derive(Debug, Clone, PartialEq)]
pub enum CombineError {
    /// A varying field's sibling is absent from both the partial record and the
    /// reference branch, so it cannot be defaulted.
    MissingDefault { path: KeyPath, field: String },
    /// A node's shape cannot be reconciled at this position (e.g. a record in
    /// the full tree over a scalar baseline, or a structurally invalid
    /// document/descriptor section).
    MalformedNode { path: KeyPath },
    /// A sequence meant to enumerate alternatives has zero elements.
    EmptyVariationAxis { path: KeyPath },
}

impl fmt::Display for CombineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombineError::MissingDefault { path, field } => {
                write!(
                    f,
                    "field {field:?} at {path} has no default in the reference tree"
                )
            }
            CombineError::MalformedNode { path } => {
                write!(f, "malformed node at {path}")
            }
            CombineError::EmptyVariationAxis { path } => {
                write!(f, "variation axis at {path} has no elements")
            }
        }
    }
}

impl std::error::Error for CombineError {}

/// Errors raised while grouping variant instances.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupError {
    /// Two distinct instances derive the same output filename.
    NamingCollision {
        filename: String,
        first: KeyPath,
        second: KeyPath,
    },
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupError::NamingCollision {
                filename,
                first,
                second,
            } => {
                write!(
                    f,
                    "key paths {first} and {second} both derive the filename {filename:?}"
                )
            }
        }
    }
}

impl std::error::Error for GroupError {}

/// Top-level error for one sweep-generation invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepError {
    Combine(CombineError),
    Group(GroupError),
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepError::Combine(e) => write!(f, "{e}"),
            SweepError::Group(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SweepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SweepError::Combine(e) => Some(e),
            SweepError::Group(e) => Some(e),
        }
    }
}

impl From<CombineError> for SweepError {
    fn from(e: CombineError) -> Self {
        SweepError::Combine(e)
    }
}

impl From<GroupError> for SweepError {
    fn from(e: GroupError) -> Self {
        SweepError::Group(e)
    }
}
