//! Sweep driver CLI: generate simulation input files from a reference/full
//! document pair, optionally run the external simulation per file and
//! dispatch plots per varied dimension.

mod io;
mod logging;
mod plot;
mod runner;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::eyre;

use simsweep_core::{FullDocument, ReferenceDocument, SweepMode, build_plan};

use crate::runner::RunnerConfig;

#[derive(Parser, Debug)]
#[command(name = "simsweep")]
#[command(about = "Generates parameter-sweep input files and drives simulation runs")]
struct Args {
    /// Path to the reference (baseline) parameters document
    #[arg(long, default_value = "param/article_physics_parameters.json")]
    reference: PathBuf,

    /// Path to the full parameters document (the one enumerating alternatives)
    #[arg(long, default_value = "param/full_physics_parameters.json")]
    full: PathBuf,

    /// Directory the generated input documents are written to
    #[arg(short, long, default_value = "input")]
    input_dir: PathBuf,

    /// How simultaneously varying sibling fields combine at baseline positions
    #[arg(long, value_enum, default_value_t = ModeArg::OneFactor)]
    mode: ModeArg,

    /// Simulation executable to run once per generated file
    #[arg(long)]
    run: Option<PathBuf>,

    /// Plot command to invoke once per sweep group
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Each varying field sweeps alone against the baseline
    OneFactor,
    /// Varying sibling fields cross-multiply
    Cartesian,
}

impl From<ModeArg> for SweepMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::OneFactor => SweepMode::OneFactor,
            ModeArg::Cartesian => SweepMode::Cartesian,
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    logging::init_logging(&args.log_level)?;

    let reference = ReferenceDocument::from_node(&io::load_document(&args.reference)?)?;
    let full = FullDocument::from_node(&io::load_document(&args.full)?)?;

    let plan = build_plan(&reference, &full, args.mode.into())?;
    tracing::info!(
        "planned {} files across {} groups",
        plan.file_count(),
        plan.groups.len()
    );

    let written = io::write_plan(&plan, &args.input_dir)?;
    for path in &written {
        println!("{}", path.display());
    }

    if let Some(executable) = args.run {
        let config = RunnerConfig {
            executable,
            input_dir: args.input_dir.clone(),
        };
        let outcomes = runner::run_all(&config, &plan);
        let failed: Vec<&str> = outcomes
            .iter()
            .filter(|o| !o.succeeded())
            .map(|o| o.filename.as_str())
            .collect();
        if !failed.is_empty() {
            return Err(eyre!(
                "{} of {} simulation runs failed: {}",
                failed.len(),
                outcomes.len(),
                failed.join(", ")
            ));
        }
    }

    if let Some(command) = args.plot {
        let outcomes = plot::dispatch_plots(&command, &args.input_dir, &plan);
        let failed: Vec<&str> = outcomes
            .iter()
            .filter(|o| o.failure.is_some())
            .map(|o| o.group.as_str())
            .collect();
        if !failed.is_empty() {
            return Err(eyre!("plots failed for groups: {}", failed.join(", ")));
        }
    }

    Ok(())
}
