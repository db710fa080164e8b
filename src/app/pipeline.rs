//! Shared run pipeline used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the workflow:
//! load CSVs -> reshape -> render chart families -> report outcomes
//!
//! The CLI layer then focuses on argument handling and printing.

use crate::charts::calibration::{CalibrationReport, render_calibration_histogram};
use crate::charts::longitudinal::{ModelSelection, render_longitudinal};
use crate::charts::scatter::{HorizonUnit, render_score_vs_horizon};
use crate::charts::{actuals, ensure_dir, groups, histogram, scores_time};
use crate::domain::{ActualObservation, ModelTypeRecord, RunConfig, ScoreboardRecord};
use crate::error::ChartError;
use crate::io::ingest;
use crate::report::ChartOutcome;

/// Everything loaded from disk for one run.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub scoreboard: Vec<ScoreboardRecord>,
    pub modeltypes: Vec<ModelTypeRecord>,
    pub actuals: Vec<ActualObservation>,
}

/// Computed outputs of a full `scorecharts all` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub outcomes: Vec<ChartOutcome>,
    pub calibration: Option<CalibrationReport>,
    /// Labelled merge diagnostics from each pivot-backed family.
    pub merges: Vec<(String, crate::reshape::MergeDiagnostics)>,
}

/// Load and validate the three input CSVs, printing row-level skips.
pub fn load_inputs(config: &RunConfig) -> Result<LoadedData, ChartError> {
    let scoreboard = ingest::load_scoreboard(&config.scoreboard_path)?;
    let modeltypes = ingest::load_modeltypes(&config.modeltypes_path)?;
    let actuals = ingest::load_actuals(&config.actuals_path)?;

    for (label, rows_read, errors) in [
        ("scoreboard", scoreboard.rows_read, &scoreboard.row_errors),
        ("modeltypes", modeltypes.rows_read, &modeltypes.row_errors),
        ("actuals", actuals.rows_read, &actuals.row_errors),
    ] {
        let msg = crate::report::format_row_errors(label, rows_read, errors);
        if !msg.is_empty() {
            eprint!("{msg}");
        }
    }

    if scoreboard.rows.is_empty() {
        return Err(ChartError::data(format!(
            "Scoreboard '{}' contained no usable rows",
            config.scoreboard_path.display()
        )));
    }

    Ok(LoadedData {
        scoreboard: scoreboard.rows,
        modeltypes: modeltypes.rows,
        actuals: actuals.rows,
    })
}

/// Render every chart family sequentially.
///
/// Failures are captured per family; one chart failing to write never stops
/// the rest from rendering.
pub fn run_all(config: &RunConfig, data: &LoadedData) -> Result<RunOutput, ChartError> {
    ensure_dir(&config.figures_dir)?;

    let dir = &config.figures_dir;
    let target = config.model_target;
    let mut outcomes = Vec::new();

    let calibration = render_calibration_histogram(&data.scoreboard, dir, target);
    outcomes.push(ChartOutcome {
        name: "calibration",
        result: calibration.as_ref().map(|r| vec![r.path.clone()]).map_err(Clone::clone),
    });

    outcomes.push(ChartOutcome {
        name: "actuals",
        result: actuals::render_actuals(&data.actuals, dir, target).map(|p| vec![p]),
    });

    for unit in [HorizonUnit::Days, HorizonUnit::Weeks] {
        outcomes.push(ChartOutcome {
            name: "score-scatter",
            result: render_score_vs_horizon(&data.scoreboard, dir, target, unit).map(|p| vec![p]),
        });
        outcomes.push(ChartOutcome {
            name: "horizon-hist",
            result: histogram::render_horizon_histogram(&data.scoreboard, dir, target, unit)
                .map(|p| vec![p]),
        });
    }

    let mut merges = Vec::new();

    outcomes.push(ChartOutcome {
        name: "groups-target",
        result: groups::render_groups_by_target_date(
            &data.scoreboard,
            &data.modeltypes,
            dir,
            target,
        )
        .map(|g| {
            merges.push(("target-date merge".to_string(), g.diagnostics));
            g.paths
        }),
    });

    for &weeks in &config.horizon_weeks {
        outcomes.push(ChartOutcome {
            name: "groups-forecast",
            result: groups::render_groups_by_forecast_date(
                &data.scoreboard,
                &data.modeltypes,
                dir,
                weeks,
                target,
            )
            .map(|g| {
                merges.push((format!("{weeks}-week forecast merge"), g.diagnostics));
                g.paths
            }),
        });

        outcomes.push(ChartOutcome {
            name: "longitudinal",
            result: render_longitudinal(
                &data.actuals,
                &data.scoreboard,
                dir,
                target,
                weeks,
                &ModelSelection::All,
            )
            .map(|p| vec![p]),
        });

        outcomes.push(ChartOutcome {
            name: "scores-time",
            result: scores_time::render_scores_vs_time_weeks(&data.scoreboard, dir, target, weeks)
                .map(|p| vec![p]),
        });

        // Day-granularity counterpart at the equivalent horizon, so both
        // smoothing variants appear in a full run.
        outcomes.push(ChartOutcome {
            name: "scores-time-days",
            result: scores_time::render_scores_vs_time_days(
                &data.scoreboard,
                dir,
                target,
                weeks * 7,
            )
            .map(|p| vec![p]),
        });
    }

    Ok(RunOutput {
        outcomes,
        calibration: calibration.ok(),
        merges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelTarget;

    fn test_config(figures_dir: std::path::PathBuf) -> RunConfig {
        RunConfig {
            scoreboard_path: "scoreboard.csv".into(),
            modeltypes_path: "modeltypes.csv".into(),
            actuals_path: "actuals.csv".into(),
            figures_dir,
            model_target: ModelTarget::Case,
            horizon_weeks: vec![1],
        }
    }

    #[test]
    fn run_all_isolates_per_chart_failures() {
        let demo = crate::data::generate_demo(42).unwrap();
        // No observations: the actuals and longitudinal families must fail
        // without taking down the families that only need the scoreboard.
        let data = LoadedData {
            scoreboard: demo.scoreboard,
            modeltypes: demo.modeltypes,
            actuals: Vec::new(),
        };
        let dir = std::env::temp_dir().join(format!(
            "scorecharts-pipeline-{}",
            std::process::id()
        ));
        let config = test_config(dir);

        let run = run_all(&config, &data).unwrap();

        let failed: Vec<&str> = run
            .outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.name)
            .collect();
        assert!(failed.contains(&"actuals"), "failed: {failed:?}");
        assert!(failed.contains(&"longitudinal"), "failed: {failed:?}");

        let ok = |name: &str| {
            run.outcomes
                .iter()
                .any(|o| o.name == name && o.result.is_ok())
        };
        assert!(ok("calibration"));
        assert!(ok("score-scatter"));
        assert!(ok("horizon-hist"));
        assert!(ok("groups-target"));
        assert!(ok("groups-forecast"));
        assert!(ok("scores-time"));
        assert!(ok("scores-time-days"));

        assert!(run.calibration.is_some());
        assert!(!run.merges.is_empty());
    }
}
