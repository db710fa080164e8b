//! Interpolated score-vs-time charts.
//!
//! Filters the scoreboard to one horizon, pivots scores by forecast date ×
//! model, fills interior gaps so each model draws as a connected line, and
//! plots every model together.
//!
//! The day-horizon variant smooths linearly; the week-horizon variant fits
//! an order-2 polynomial. The split is inherited from the source analysis
//! and deliberately not unified (see DESIGN.md).

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use plotters::prelude::*;

use crate::charts::palette::model_color;
use crate::charts::{WIDE, figure_path, render_failure};
use crate::domain::{ModelTarget, ScoreboardRecord};
use crate::error::ChartError;
use crate::math::interp::{InterpMethod, fill_missing};
use crate::reshape::{PivotTable, pivot_all_by_forecast_date};

/// Scores over time for forecasts issued `weeks` out (polynomial smoothing).
pub fn render_scores_vs_time_weeks(
    scoreboard: &[ScoreboardRecord],
    figures_dir: &Path,
    model_target: ModelTarget,
    weeks: u32,
) -> Result<PathBuf, ChartError> {
    let filtered: Vec<ScoreboardRecord> = scoreboard
        .iter()
        .filter(|r| r.delta_w == weeks)
        .cloned()
        .collect();
    if filtered.is_empty() {
        return Err(ChartError::data(format!(
            "No forecasts at horizon {weeks} weeks"
        )));
    }

    let path = figure_path(
        figures_dir,
        &format!(
            "{}_{weeks}-Week_Forward_Scores.png",
            model_target.file_label()
        ),
    );
    draw(
        &filtered,
        &path,
        &format!("{weeks}-Week Forward Scores"),
        &format!("Score for {weeks} wk ahead {}", model_target.series_noun()),
        InterpMethod::Poly2,
    )
    .map_err(|e| render_failure(&path, e))?;
    Ok(path)
}

/// Scores over time for forecasts issued `days` out (linear smoothing).
pub fn render_scores_vs_time_days(
    scoreboard: &[ScoreboardRecord],
    figures_dir: &Path,
    model_target: ModelTarget,
    days: u32,
) -> Result<PathBuf, ChartError> {
    let filtered: Vec<ScoreboardRecord> = scoreboard
        .iter()
        .filter(|r| r.delta == days)
        .cloned()
        .collect();
    if filtered.is_empty() {
        return Err(ChartError::data(format!(
            "No forecasts at horizon {days} days"
        )));
    }

    let path = figure_path(
        figures_dir,
        &format!(
            "{}_{days}-Day_Forward_Scores.png",
            model_target.file_label()
        ),
    );
    draw(
        &filtered,
        &path,
        &format!("{days}-Day Forward Scores"),
        &format!("Score for {days} day ahead {}", model_target.series_noun()),
        InterpMethod::Linear,
    )
    .map_err(|e| render_failure(&path, e))?;
    Ok(path)
}

/// Interpolated per-model series from a pivot table: dates paired with
/// gap-filled values, missing edges dropped.
pub(crate) fn smoothed_columns(
    table: &PivotTable,
    method: InterpMethod,
) -> Vec<(String, Vec<(NaiveDate, f64)>)> {
    let Some(first) = table.first_date() else {
        return Vec::new();
    };

    let xs: Vec<f64> = table
        .dates
        .iter()
        .map(|d| (*d - first).num_days() as f64)
        .collect();

    table
        .models
        .iter()
        .enumerate()
        .map(|(col, model)| {
            let raw: Vec<Option<f64>> = table.values.iter().map(|row| row[col]).collect();
            let filled = fill_missing(&xs, &raw, method);
            let series: Vec<(NaiveDate, f64)> = table
                .dates
                .iter()
                .zip(filled.iter())
                .filter_map(|(&d, v)| v.map(|v| (d, v)))
                .collect();
            (model.clone(), series)
        })
        .filter(|(_, series)| !series.is_empty())
        .collect()
}

fn draw(
    filtered: &[ScoreboardRecord],
    path: &Path,
    title: &str,
    y_desc: &str,
    method: InterpMethod,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = pivot_all_by_forecast_date(filtered);
    let columns = smoothed_columns(&table, method);

    let Some((first, last)) = table.first_date().zip(table.last_date()) else {
        return Err("empty pivot table".into());
    };
    let (x_min, x_max) = if first == last {
        (first, last + chrono::Duration::days(7))
    } else {
        (first, last)
    };

    let (mut y_lo, mut y_hi) = table.value_range().unwrap_or((0.0, 1.0));
    // Interpolated values can overshoot the observed range (poly2 especially).
    for (_, series) in &columns {
        for &(_, v) in series {
            y_lo = y_lo.min(v);
            y_hi = y_hi.max(v);
        }
    }

    let root = BitMapBackend::new(path, WIDE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 26))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, (y_lo - 1.0)..(y_hi + 1.0))?;

    chart
        .configure_mesh()
        .x_desc("Date Forecast Made")
        .y_desc(y_desc)
        .x_label_formatter(&|d| d.format("%b %d").to_string())
        .draw()?;

    for (model, series) in &columns {
        let color = model_color(model);
        chart
            .draw_series(LineSeries::new(series.iter().copied(), color.stroke_width(2)))?
            .label(model.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        chart.draw_series(
            series
                .iter()
                .map(|&(d, v)| Circle::new((d, v), 3, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(model: &str, forecast: &str, delta_w: u32, score: Option<f64>) -> Option<ScoreboardRecord> {
        score.map(|score| ScoreboardRecord {
            model: model.to_string(),
            forecast_date: forecast.parse().unwrap(),
            target_end_date: "2021-06-01".parse().unwrap(),
            delta: delta_w * 7,
            delta_w,
            pe: 0.0,
            ci_lo: 0.0,
            ci_hi: 0.0,
            score,
            prange: 0.95,
            sumpdf: 0.95,
        })
    }

    #[test]
    fn interior_gap_is_smoothed_linearly() {
        let scoreboard: Vec<ScoreboardRecord> = [
            record("A", "2021-01-01", 1, Some(1.0)),
            record("A", "2021-01-15", 1, Some(3.0)),
            // B present on the middle date forces a row A is missing.
            record("B", "2021-01-08", 1, Some(5.0)),
            record("B", "2021-01-01", 1, Some(4.0)),
            record("B", "2021-01-15", 1, Some(6.0)),
        ]
        .into_iter()
        .flatten()
        .collect();

        let table = pivot_all_by_forecast_date(&scoreboard);
        let columns = smoothed_columns(&table, InterpMethod::Linear);

        let a = columns.iter().find(|(m, _)| m == "A").unwrap();
        assert_eq!(a.1.len(), 3);
        let mid = a.1[1];
        assert_eq!(mid.0, "2021-01-08".parse::<NaiveDate>().unwrap());
        assert!((mid.1 - 2.0).abs() < 1e-12);
    }
}
