//! Plot dispatcher.
//!
//! One invocation of a user-supplied plot command per sweep group, passing
//! every member file of that group so the tool can build one overlay figure
//! per varied dimension. Failures are isolated per group, like the runner.

use std::path::{Path, PathBuf};
use std::process::Command;

use simsweep_core::SweepPlan;

/// Outcome of one plot invocation.
#[derive(Debug)]
pub struct PlotOutcome {
    /// Display form of the group's key path.
    pub group: String,
    pub failure: Option<String>,
}

/// Invoke `command` once per group with the group's member file paths as
/// arguments.
pub fn dispatch_plots(command: &Path, input_dir: &Path, plan: &SweepPlan) -> Vec<PlotOutcome> {
    let mut outcomes = Vec::with_capacity(plan.groups.len());
    for (key_path, group) in &plan.groups {
        let files: Vec<PathBuf> = group
            .members
            .iter()
            .map(|member| input_dir.join(&member.filename))
            .collect();
        tracing::info!("plotting group {key_path} ({} files)", files.len());

        let failure = match Command::new(command).args(&files).status() {
            Ok(status) if status.success() => None,
            Ok(status) => Some(format!("exited with {status}")),
            Err(e) => Some(format!("failed to start: {e}")),
        };
        if let Some(reason) = &failure {
            tracing::error!("plot for group {key_path} failed: {reason}");
        }
        outcomes.push(PlotOutcome {
            group: key_path.to_string(),
            failure,
        });
    }
    outcomes
}
