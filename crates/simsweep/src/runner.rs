//! External simulation runner.
//!
//! One process invocation per generated file, each receiving exactly one
//! filename argument. Runs are sequential and isolated: a failed member is
//! recorded and its siblings still run against their own untouched inputs.

use std::path::{Path, PathBuf};
use std::process::Command;

use simsweep_core::SweepPlan;

/// Execution settings for the external simulation, threaded explicitly
/// through the call boundary.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// The simulation executable to invoke once per generated file.
    pub executable: PathBuf,
    /// Directory holding the generated input documents.
    pub input_dir: PathBuf,
}

/// Outcome of one simulation invocation.
#[derive(Debug)]
pub struct RunOutcome {
    pub filename: String,
    /// Spawn error or non-zero exit, `None` on success.
    pub failure: Option<String>,
}

impl RunOutcome {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Run the simulation once per plan member, in group order.
///
/// Returns one outcome per file; the caller decides whether any failure fails
/// the whole invocation.
pub fn run_all(config: &RunnerConfig, plan: &SweepPlan) -> Vec<RunOutcome> {
    let mut outcomes = Vec::with_capacity(plan.file_count());
    for group in plan.groups.values() {
        for member in &group.members {
            let input = config.input_dir.join(&member.filename);
            tracing::info!("running {} {}", config.executable.display(), input.display());
            let failure = invoke(&config.executable, &input);
            match &failure {
                None => tracing::info!("{} completed", member.filename),
                Some(reason) => tracing::error!("{} failed: {reason}", member.filename),
            }
            outcomes.push(RunOutcome {
                filename: member.filename.clone(),
                failure,
            });
        }
    }
    outcomes
}

fn invoke(executable: &Path, input: &Path) -> Option<String> {
    match Command::new(executable).arg(input).status() {
        Ok(status) if status.success() => None,
        Ok(status) => Some(format!("exited with {status}")),
        Err(e) => Some(format!("failed to start: {e}")),
    }
}
