//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the input CSVs
//! - dispatches to the requested chart family (or all of them)
//! - prints diagnostics and per-chart outcomes

use clap::Parser;

use crate::charts::calibration::render_calibration_histogram;
use crate::charts::longitudinal::{ModelSelection, render_longitudinal};
use crate::charts::scatter::{HorizonUnit, render_score_vs_horizon};
use crate::charts::{actuals, ensure_dir, groups, histogram, scores_time};
use crate::cli::{Cli, Command, DemoArgs, InputArgs};
use crate::domain::RunConfig;
use crate::error::ChartError;

pub mod pipeline;

use pipeline::{LoadedData, load_inputs, run_all};

/// Entry point for the `scorecharts` binary.
pub fn run() -> Result<(), ChartError> {
    let cli = Cli::parse();

    match cli.command {
        Command::All(args) => handle_all(&args),
        Command::Calibration(args) => handle_calibration(&args),
        Command::Distributions(args) => handle_distributions(&args),
        Command::GroupsTarget(args) => handle_groups_target(&args),
        Command::GroupsForecast { input, weeks } => handle_groups_forecast(&input, weeks),
        Command::Longitudinal {
            input,
            weeks,
            model,
        } => handle_longitudinal(&input, weeks, model),
        Command::ScoresTime { input, weeks, days } => handle_scores_time(&input, weeks, days),
        Command::Actuals(args) => handle_actuals(&args),
        Command::Demo(args) => handle_demo(&args),
    }
}

fn config_from_args(args: &InputArgs) -> RunConfig {
    RunConfig {
        scoreboard_path: args.scoreboard.clone(),
        modeltypes_path: args.modeltypes.clone(),
        actuals_path: args.actuals.clone(),
        figures_dir: args.figures_dir.clone(),
        model_target: args.target,
        horizon_weeks: args.horizons.clone(),
    }
}

fn handle_all(args: &InputArgs) -> Result<(), ChartError> {
    let config = config_from_args(args);
    let data = load_inputs(&config)?;
    render_everything(&config, &data)
}

fn render_everything(config: &RunConfig, data: &LoadedData) -> Result<(), ChartError> {
    println!(
        "{}",
        crate::report::format_run_summary(config, &data.scoreboard, &data.modeltypes, &data.actuals)
    );

    let run = run_all(config, data)?;

    if let Some(report) = &run.calibration {
        print!("{}", crate::report::format_calibration(report));
    }
    for (label, diag) in &run.merges {
        print!("{}", crate::report::format_merge_diagnostics(label, diag));
    }
    print!("{}", crate::report::format_outcomes(&run.outcomes));

    let failed = run.outcomes.iter().filter(|o| o.result.is_err()).count();

    let diag = crate::io::diag::RunDiagnostics {
        tool: "scorecharts".to_string(),
        target: format!("{:?}", config.model_target),
        scoreboard_rows: data.scoreboard.len(),
        max_conversion_error: run.calibration.as_ref().map(|r| r.max_abs_error),
        merges: run
            .merges
            .iter()
            .map(|(label, diagnostics)| crate::io::diag::MergeEntry {
                label: label.clone(),
                diagnostics: diagnostics.clone(),
            })
            .collect(),
        charts_failed: failed,
    };
    let diag_path = crate::io::diag::write_diagnostics_json(&config.figures_dir, &diag)?;
    println!("Diagnostics: {}", diag_path.display());

    if failed > 0 {
        return Err(ChartError::render(format!(
            "{failed} of {} chart families failed",
            run.outcomes.len()
        )));
    }
    Ok(())
}

fn handle_calibration(args: &InputArgs) -> Result<(), ChartError> {
    let config = config_from_args(args);
    let data = load_inputs(&config)?;
    ensure_dir(&config.figures_dir)?;

    let report =
        render_calibration_histogram(&data.scoreboard, &config.figures_dir, config.model_target)?;
    print!("{}", crate::report::format_calibration(&report));
    println!("Wrote {}", report.path.display());
    Ok(())
}

fn handle_distributions(args: &InputArgs) -> Result<(), ChartError> {
    let config = config_from_args(args);
    let data = load_inputs(&config)?;
    ensure_dir(&config.figures_dir)?;

    for unit in [HorizonUnit::Days, HorizonUnit::Weeks] {
        let p = render_score_vs_horizon(
            &data.scoreboard,
            &config.figures_dir,
            config.model_target,
            unit,
        )?;
        println!("Wrote {}", p.display());
        let p = histogram::render_horizon_histogram(
            &data.scoreboard,
            &config.figures_dir,
            config.model_target,
            unit,
        )?;
        println!("Wrote {}", p.display());
    }
    Ok(())
}

fn handle_groups_target(args: &InputArgs) -> Result<(), ChartError> {
    let config = config_from_args(args);
    let data = load_inputs(&config)?;
    ensure_dir(&config.figures_dir)?;

    let out = groups::render_groups_by_target_date(
        &data.scoreboard,
        &data.modeltypes,
        &config.figures_dir,
        config.model_target,
    )?;
    print!(
        "{}",
        crate::report::format_merge_diagnostics("target-date merge", &out.diagnostics)
    );
    for p in &out.paths {
        println!("Wrote {}", p.display());
    }
    Ok(())
}

fn handle_groups_forecast(args: &InputArgs, weeks: u32) -> Result<(), ChartError> {
    let config = config_from_args(args);
    let data = load_inputs(&config)?;
    ensure_dir(&config.figures_dir)?;

    let out = groups::render_groups_by_forecast_date(
        &data.scoreboard,
        &data.modeltypes,
        &config.figures_dir,
        weeks,
        config.model_target,
    )?;
    print!(
        "{}",
        crate::report::format_merge_diagnostics(
            &format!("{weeks}-week forecast merge"),
            &out.diagnostics
        )
    );
    for p in &out.paths {
        println!("Wrote {}", p.display());
    }
    Ok(())
}

fn handle_longitudinal(args: &InputArgs, weeks: u32, model: Option<String>) -> Result<(), ChartError> {
    let config = config_from_args(args);
    let data = load_inputs(&config)?;
    ensure_dir(&config.figures_dir)?;

    let selection = match model {
        Some(model) => ModelSelection::One(model),
        None => ModelSelection::All,
    };
    let p = render_longitudinal(
        &data.actuals,
        &data.scoreboard,
        &config.figures_dir,
        config.model_target,
        weeks,
        &selection,
    )?;
    println!("Wrote {}", p.display());
    Ok(())
}

fn handle_scores_time(
    args: &InputArgs,
    weeks: Option<u32>,
    days: Option<u32>,
) -> Result<(), ChartError> {
    let config = config_from_args(args);
    let data = load_inputs(&config)?;
    ensure_dir(&config.figures_dir)?;

    let p = match (weeks, days) {
        (Some(w), None) => scores_time::render_scores_vs_time_weeks(
            &data.scoreboard,
            &config.figures_dir,
            config.model_target,
            w,
        )?,
        (None, Some(d)) => scores_time::render_scores_vs_time_days(
            &data.scoreboard,
            &config.figures_dir,
            config.model_target,
            d,
        )?,
        _ => {
            return Err(ChartError::invalid_range(
                "scores-time requires exactly one of --weeks or --days",
            ));
        }
    };
    println!("Wrote {}", p.display());
    Ok(())
}

fn handle_actuals(args: &InputArgs) -> Result<(), ChartError> {
    let config = config_from_args(args);
    let data = load_inputs(&config)?;
    ensure_dir(&config.figures_dir)?;

    let p = actuals::render_actuals(&data.actuals, &config.figures_dir, config.model_target)?;
    println!("Wrote {}", p.display());
    Ok(())
}

fn handle_demo(args: &DemoArgs) -> Result<(), ChartError> {
    ensure_dir(&args.out_dir)?;

    let demo = crate::data::generate_demo(args.seed)?;
    crate::data::write_demo_csvs(&demo, &args.out_dir)?;
    println!(
        "Wrote synthetic CSVs to {} (seed {})",
        args.out_dir.display(),
        args.seed
    );

    let config = RunConfig {
        scoreboard_path: args.out_dir.join("scoreboard.csv"),
        modeltypes_path: args.out_dir.join("modeltypes.csv"),
        actuals_path: args.out_dir.join("actuals.csv"),
        figures_dir: args.out_dir.join("figures"),
        model_target: args.target,
        horizon_weeks: vec![1, 2, 3, 4],
    };
    let data = LoadedData {
        scoreboard: demo.scoreboard,
        modeltypes: demo.modeltypes,
        actuals: demo.actuals,
    };
    render_everything(&config, &data)
}
