//! Score-vs-horizon scatter charts.
//!
//! One point per scoreboard row: how far ahead the forecast looked (x)
//! against the score it earned (y). Day- and week-granularity variants are
//! the same chart with a different horizon column.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::charts::{SQUARE, figure_path, render_failure};
use crate::domain::{ModelTarget, ScoreboardRecord};
use crate::error::ChartError;

/// Which horizon column the scatter/histogram family plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizonUnit {
    Days,
    Weeks,
}

impl HorizonUnit {
    pub fn of(self, record: &ScoreboardRecord) -> u32 {
        match self {
            HorizonUnit::Days => record.delta,
            HorizonUnit::Weeks => record.delta_w,
        }
    }

    pub fn axis_desc(self) -> &'static str {
        match self {
            HorizonUnit::Days => "N-Days Forward Forecast",
            HorizonUnit::Weeks => "N-Weeks Forward Forecast",
        }
    }

    fn scatter_file(self, label: &str) -> String {
        match self {
            HorizonUnit::Days => format!("{label}_ScoreVSx-Days_Forward_Forecast.png"),
            HorizonUnit::Weeks => format!("{label}_ScoreVSx-Weeks_Forward_Forecast.png"),
        }
    }
}

/// Scatter of score against the chosen horizon column.
pub fn render_score_vs_horizon(
    scoreboard: &[ScoreboardRecord],
    figures_dir: &Path,
    model_target: ModelTarget,
    unit: HorizonUnit,
) -> Result<PathBuf, ChartError> {
    if scoreboard.is_empty() {
        return Err(ChartError::data(
            "Cannot render score scatter: scoreboard is empty",
        ));
    }

    let path = figure_path(figures_dir, &unit.scatter_file(model_target.file_label()));
    draw(scoreboard, &path, model_target, unit).map_err(|e| render_failure(&path, e))?;
    Ok(path)
}

fn draw(
    scoreboard: &[ScoreboardRecord],
    path: &Path,
    model_target: ModelTarget,
    unit: HorizonUnit,
) -> Result<(), Box<dyn std::error::Error>> {
    let points: Vec<(f64, f64)> = scoreboard
        .iter()
        .map(|r| (unit.of(r) as f64, r.score))
        .collect();

    let x_max = points.iter().map(|p| p.0).fold(0.0_f64, f64::max);
    let (y_min, y_max) = points
        .iter()
        .map(|p| p.1)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });
    let pad = ((y_max - y_min) * 0.05).max(0.5);

    let root = BitMapBackend::new(path, SQUARE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} Forecasts", model_target.title_label()),
            ("sans-serif", 26),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..x_max + 1.0, (y_min - pad)..(y_max + pad))?;

    chart
        .configure_mesh()
        .x_desc(unit.axis_desc())
        .y_desc("Score")
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 2, BLUE.mix(0.5).filled())),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizon_unit_selects_column() {
        let r = ScoreboardRecord {
            model: "A".to_string(),
            forecast_date: "2021-01-02".parse().unwrap(),
            target_end_date: "2021-01-23".parse().unwrap(),
            delta: 21,
            delta_w: 3,
            pe: 0.0,
            ci_lo: 0.0,
            ci_hi: 0.0,
            score: 0.0,
            prange: 0.95,
            sumpdf: 0.95,
        };
        assert_eq!(HorizonUnit::Days.of(&r), 21);
        assert_eq!(HorizonUnit::Weeks.of(&r), 3);
    }

    #[test]
    fn file_names_follow_the_label_convention() {
        assert_eq!(
            HorizonUnit::Days.scatter_file("INCCASE"),
            "INCCASE_ScoreVSx-Days_Forward_Forecast.png"
        );
        assert_eq!(
            HorizonUnit::Weeks.scatter_file("CUMDEATH"),
            "CUMDEATH_ScoreVSx-Weeks_Forward_Forecast.png"
        );
    }
}
