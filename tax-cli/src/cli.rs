use std::path::PathBuf;

use clap::{Args, Parser};

use crate::config::OutputFormat;

/// Net-to-gross salary estimator.
///
/// Finds the pre-tax salary that leaves a target take-home pay after
/// federal, state and city income tax, FICA, SDI and pre-tax benefits.
/// Runs one scenario from flags or many from a CSV file.
#[derive(Debug, Default, Parser)]
#[command(name = "gross-up", version, about, long_about = None)]
pub struct Cli {
    /// Desired annual net income, e.g. `100000` or `$100,000`.
    #[arg(long)]
    pub net: Option<String>,

    /// Filing status: S, MFJ, MFS or HOH.
    #[arg(long)]
    pub filing_status: Option<String>,

    /// Scenario CSV; when given, the inline scenario flags are ignored.
    #[arg(long)]
    pub scenarios: Option<PathBuf>,

    #[command(flatten)]
    pub inline: InlineScenario,

    /// Replacement bracket CSV (defaults to the built-in 2025 tables).
    #[arg(long)]
    pub brackets: Option<PathBuf>,

    /// Replacement payroll and SDI rates TOML.
    #[arg(long)]
    pub rates: Option<PathBuf>,

    /// Run configuration file supplying defaults for these flags.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Solve scenarios on all cores.
    #[arg(long, conflicts_with = "sequential")]
    pub parallel: bool,

    /// Solve scenarios one at a time, even if the config file sets `parallel`.
    #[arg(long)]
    pub sequential: bool,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Log filter: a level (`warn`, `debug`, ...) or a full directive.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Append log records to this file as well.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print the known states and their city schedules, then exit.
    #[arg(long)]
    pub list_states: bool,
}

/// A single scenario described on the command line.
#[derive(Debug, Default, Args)]
pub struct InlineScenario {
    #[arg(long)]
    pub work_state: Option<String>,

    /// Defaults to the work state.
    #[arg(long)]
    pub residence_state: Option<String>,

    #[arg(long)]
    pub work_city: Option<String>,

    #[arg(long)]
    pub health: Option<String>,

    #[arg(long)]
    pub dental_vision: Option<String>,

    #[arg(long)]
    pub hsa: Option<String>,

    #[arg(long)]
    pub fsa: Option<String>,

    /// 401(k) and similar pre-tax contributions.
    #[arg(long)]
    pub retirement: Option<String>,

    #[arg(long)]
    pub other: Option<String>,
}
