//! Source document loading and sweep plan writing.
//!
//! Loading distinguishes I/O failures from parse failures so a missing file
//! and a malformed one surface differently. Writing is all-or-nothing at the
//! plan level: if any document fails to write, every file this invocation
//! already wrote is removed again.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use simsweep_core::{ConfigNode, SweepPlan};

/// A source document could not be read or parsed.
#[derive(Debug)]
pub enum SourceReadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for SourceReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceReadError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            SourceReadError::Parse { path, source } => {
                write!(f, "cannot parse {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SourceReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceReadError::Io { source, .. } => Some(source),
            SourceReadError::Parse { source, .. } => Some(source),
        }
    }
}

/// Load one source document into a config tree.
pub fn load_document(path: &Path) -> Result<ConfigNode, SourceReadError> {
    let text = fs::read_to_string(path).map_err(|source| SourceReadError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SourceReadError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Write every document of the plan into `input_dir`, returning the written
/// paths in plan order.
///
/// On any failure the files already written by this call are removed before
/// the error is returned, so a half-generated sweep never survives on disk.
pub fn write_plan(plan: &SweepPlan, input_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    fs::create_dir_all(input_dir)?;

    let mut written = Vec::with_capacity(plan.file_count());
    for (filename, document) in plan.documents() {
        let path = input_dir.join(filename);
        match write_document(&path, &document) {
            Ok(()) => written.push(path),
            Err(e) => {
                for path in &written {
                    if let Err(cleanup) = fs::remove_file(path) {
                        tracing::warn!(
                            "failed to remove partial output {}: {cleanup}",
                            path.display()
                        );
                    }
                }
                return Err(e);
            }
        }
    }
    Ok(written)
}

fn write_document(
    path: &Path,
    document: &simsweep_core::OutputDocument,
) -> std::io::Result<()> {
    let text = serde_json::to_string_pretty(document).map_err(std::io::Error::other)?;
    let mut file = fs::File::create(path)?;
    file.write_all(text.as_bytes())?;
    file.write_all(b"\n")
}
