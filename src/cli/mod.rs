//! Command-line parsing for the scoreboard charting tool.
//!
//! Argument parsing and command dispatch stay separate from the reshaping
//! and rendering code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::ModelTarget;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "scorecharts",
    version,
    about = "Static charts for epidemiological forecast scoreboards"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the full chart set (calibration, distributions, grouped,
    /// longitudinal, actuals), reporting per-chart failures individually.
    All(InputArgs),
    /// Calibration-error histogram plus the maximum conversion error.
    Calibration(InputArgs),
    /// Score-vs-horizon scatters and horizon histograms.
    Distributions(InputArgs),
    /// Grouped score time series aligned by target end date.
    GroupsTarget(InputArgs),
    /// Grouped score time series aligned by forecast date, for one horizon.
    GroupsForecast {
        #[command(flatten)]
        input: InputArgs,

        /// Horizon (weeks ahead) to filter to.
        #[arg(long, default_value_t = 1)]
        weeks: u32,
    },
    /// Point estimates + confidence bands against the observed series.
    Longitudinal {
        #[command(flatten)]
        input: InputArgs,

        /// Horizon (weeks ahead) to filter to.
        #[arg(long, default_value_t = 1)]
        weeks: u32,

        /// Plot a single model instead of all models at the horizon.
        #[arg(long)]
        model: Option<String>,
    },
    /// Interpolated score-vs-time chart for one horizon.
    ScoresTime {
        #[command(flatten)]
        input: InputArgs,

        /// Week horizon (order-2 polynomial smoothing).
        #[arg(long, conflicts_with = "days")]
        weeks: Option<u32>,

        /// Day horizon (linear smoothing).
        #[arg(long)]
        days: Option<u32>,
    },
    /// Observed series on its own.
    Actuals(InputArgs),
    /// Generate a deterministic synthetic input set, write it as CSVs, and
    /// render the full chart set from it.
    Demo(DemoArgs),
}

/// Common input/output options.
#[derive(Debug, Parser, Clone)]
pub struct InputArgs {
    /// Long-format scoreboard CSV.
    #[arg(long, default_value = "scoreboard.csv")]
    pub scoreboard: PathBuf,

    /// Model → modeltype mapping CSV.
    #[arg(long, default_value = "modeltypes.csv")]
    pub modeltypes: PathBuf,

    /// Observed series CSV.
    #[arg(long, default_value = "actuals.csv")]
    pub actuals: PathBuf,

    /// Directory figures are written into (created if missing).
    #[arg(long, default_value = "figures")]
    pub figures_dir: PathBuf,

    /// Forecast target, controls file naming and titles.
    #[arg(long, value_enum, default_value_t = ModelTarget::Case)]
    pub target: ModelTarget,

    /// Week horizons covered by the grouped/longitudinal families in `all`.
    #[arg(long, value_delimiter = ',', default_values_t = vec![1, 2, 3, 4])]
    pub horizons: Vec<u32>,
}

/// Options for the demo run.
#[derive(Debug, Parser)]
pub struct DemoArgs {
    /// Output directory for both the synthetic CSVs and the figures.
    #[arg(long, default_value = "demo")]
    pub out_dir: PathBuf,

    /// Seed for the synthetic data.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Forecast target, controls file naming and titles.
    #[arg(long, value_enum, default_value_t = ModelTarget::Case)]
    pub target: ModelTarget,
}
