//! Horizon histograms: how many forecasts were made at each horizon.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::charts::scatter::HorizonUnit;
use crate::charts::{COMPACT, figure_path, render_failure};
use crate::domain::{ModelTarget, ScoreboardRecord};
use crate::error::ChartError;

/// Weekly horizons are binned over a fixed 1..=20 window so the weekly chart
/// is comparable across scoreboards.
const WEEK_BIN_MAX: u32 = 20;

fn histogram_file(unit: HorizonUnit, label: &str) -> String {
    match unit {
        HorizonUnit::Days => format!("{label}_x-Days_Forward_Forecast_Hist.png"),
        HorizonUnit::Weeks => format!("{label}_x-Weeks_Forward_Forecast_Hist.png"),
    }
}

/// Count forecasts per integer horizon value.
///
/// Day-granularity spans the observed `[min, max]` range with bin width 1;
/// week-granularity uses the fixed `1..=20` window.
pub(crate) fn horizon_counts(
    scoreboard: &[ScoreboardRecord],
    unit: HorizonUnit,
) -> BTreeMap<u32, usize> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();

    match unit {
        HorizonUnit::Days => {
            for r in scoreboard {
                *counts.entry(r.delta).or_insert(0) += 1;
            }
        }
        HorizonUnit::Weeks => {
            for w in 1..=WEEK_BIN_MAX {
                counts.insert(w, 0);
            }
            for r in scoreboard {
                if (1..=WEEK_BIN_MAX).contains(&r.delta_w) {
                    *counts.entry(r.delta_w).or_insert(0) += 1;
                }
            }
        }
    }

    counts
}

/// Render the forecast-count histogram for the chosen horizon unit.
pub fn render_horizon_histogram(
    scoreboard: &[ScoreboardRecord],
    figures_dir: &Path,
    model_target: ModelTarget,
    unit: HorizonUnit,
) -> Result<PathBuf, ChartError> {
    if scoreboard.is_empty() {
        return Err(ChartError::data(
            "Cannot render horizon histogram: scoreboard is empty",
        ));
    }

    let path = figure_path(
        figures_dir,
        &histogram_file(unit, model_target.file_label()),
    );
    draw(scoreboard, &path, model_target, unit).map_err(|e| render_failure(&path, e))?;
    Ok(path)
}

fn draw(
    scoreboard: &[ScoreboardRecord],
    path: &Path,
    model_target: ModelTarget,
    unit: HorizonUnit,
) -> Result<(), Box<dyn std::error::Error>> {
    let counts = horizon_counts(scoreboard, unit);

    let x_min = counts.keys().next().copied().unwrap_or(0) as f64;
    let x_max = counts.keys().next_back().copied().unwrap_or(1) as f64;
    let y_max = counts.values().copied().max().unwrap_or(1).max(1) as f64;

    let root = BitMapBackend::new(path, COMPACT).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} Forecasts", model_target.title_label()),
            ("sans-serif", 24),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((x_min - 0.5)..(x_max + 1.5), 0f64..y_max * 1.05)?;

    chart
        .configure_mesh()
        .x_desc(unit.axis_desc())
        .y_desc("Number of forecasts made")
        .x_label_formatter(&|v| format!("{}", v.round() as i64))
        .draw()?;

    chart.draw_series(counts.iter().map(|(&h, &c)| {
        let x0 = h as f64 - 0.4;
        let x1 = h as f64 + 0.4;
        Rectangle::new([(x0, 0.0), (x1, c as f64)], BLUE.mix(0.6).filled())
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(delta: u32, delta_w: u32) -> ScoreboardRecord {
        ScoreboardRecord {
            model: "A".to_string(),
            forecast_date: "2021-01-02".parse().unwrap(),
            target_end_date: "2021-01-23".parse().unwrap(),
            delta,
            delta_w,
            pe: 0.0,
            ci_lo: 0.0,
            ci_hi: 0.0,
            score: 0.0,
            prange: 0.95,
            sumpdf: 0.95,
        }
    }

    #[test]
    fn day_counts_span_observed_range_only() {
        let sb = vec![record(7, 1), record(7, 1), record(21, 3)];
        let counts = horizon_counts(&sb, HorizonUnit::Days);
        assert_eq!(counts.get(&7), Some(&2));
        assert_eq!(counts.get(&21), Some(&1));
        assert_eq!(counts.get(&14), None);
    }

    #[test]
    fn week_counts_use_fixed_window() {
        let sb = vec![record(7, 1), record(175, 25)]; // 25 weeks falls outside
        let counts = horizon_counts(&sb, HorizonUnit::Weeks);
        assert_eq!(counts.len(), 20);
        assert_eq!(counts.get(&1), Some(&1));
        assert_eq!(counts.get(&20), Some(&0));
        assert_eq!(counts.get(&25), None);
    }
}
