//! Longitudinal overlays: forecasts against the observed series.
//!
//! For one chosen horizon, draws each model's point estimate as a line with
//! its confidence interval as a translucent band, then overlays the actual
//! observed series in heavy black as the reference.
//!
//! The y-axis is clipped to `[min(actual)*0.6, max(actual)*1.4]`. This exact
//! scaling is load-bearing: downstream review compares these figures against
//! an archive produced with the same heuristic.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use plotters::prelude::*;

use crate::charts::palette::model_color;
use crate::charts::{WIDE, figure_path, render_failure};
use crate::domain::{ActualObservation, ModelTarget, ScoreboardRecord};
use crate::error::ChartError;

/// Which models to overlay.
#[derive(Debug, Clone)]
pub enum ModelSelection {
    /// One named model.
    One(String),
    /// Every model present at the chosen horizon.
    All,
}

/// Render the longitudinal overlay for forecasts `weeks_ahead` out.
pub fn render_longitudinal(
    actuals: &[ActualObservation],
    scoreboard: &[ScoreboardRecord],
    figures_dir: &Path,
    model_target: ModelTarget,
    weeks_ahead: u32,
    selection: &ModelSelection,
) -> Result<PathBuf, ChartError> {
    if actuals.is_empty() {
        return Err(ChartError::data(
            "Cannot render longitudinal chart: no actual observations",
        ));
    }

    let mut filtered: Vec<&ScoreboardRecord> = scoreboard
        .iter()
        .filter(|r| r.delta_w == weeks_ahead)
        .collect();
    filtered.sort_by_key(|r| r.target_end_date);

    let models: Vec<String> = match selection {
        ModelSelection::One(model) => {
            if !filtered.iter().any(|r| &r.model == model) {
                return Err(ChartError::data(format!(
                    "Model '{model}' has no {weeks_ahead}-week-ahead forecasts"
                )));
            }
            vec![model.clone()]
        }
        ModelSelection::All => {
            let unique: BTreeSet<&str> = filtered.iter().map(|r| r.model.as_str()).collect();
            unique.into_iter().map(str::to_string).collect()
        }
    };

    let suffix = match selection {
        ModelSelection::One(model) => model.clone(),
        ModelSelection::All => "ALL".to_string(),
    };
    let path = figure_path(
        figures_dir,
        &format!(
            "{}_Longitudinal_{weeks_ahead}wk_{suffix}.png",
            model_target.file_label()
        ),
    );

    draw(
        actuals,
        &filtered,
        &models,
        &path,
        model_target,
        weeks_ahead,
        selection,
    )
    .map_err(|e| render_failure(&path, e))?;

    Ok(path)
}

/// Fixed visual-scaling heuristic for the y-axis, kept byte-for-byte
/// compatible with prior output.
pub(crate) fn clip_range(actual_values: &[f64]) -> (f64, f64) {
    let min = actual_values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = actual_values
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    (min * 0.6, max * 1.4)
}

#[allow(clippy::too_many_arguments)]
fn draw(
    actuals: &[ActualObservation],
    filtered: &[&ScoreboardRecord],
    models: &[String],
    path: &Path,
    model_target: ModelTarget,
    weeks_ahead: u32,
    selection: &ModelSelection,
) -> Result<(), Box<dyn std::error::Error>> {
    let actual_values: Vec<f64> = actuals.iter().map(|a| a.value_for(model_target)).collect();
    let (y_min, y_max) = clip_range(&actual_values);

    let mut x_min: NaiveDate = actuals[0].date_observed;
    let mut x_max: NaiveDate = actuals[0].date_observed;
    for a in actuals {
        x_min = x_min.min(a.date_observed);
        x_max = x_max.max(a.date_observed);
    }
    for r in filtered {
        x_min = x_min.min(r.target_end_date);
        x_max = x_max.max(r.target_end_date);
    }
    if x_min == x_max {
        // A single observation still needs a non-empty axis.
        x_max = x_max + chrono::Duration::days(7);
    }

    let title = match selection {
        ModelSelection::One(model) => format!("{model}: {weeks_ahead}-week-ahead Forecasts"),
        ModelSelection::All => format!("{weeks_ahead}-week-ahead Forecasts"),
    };

    let root = BitMapBackend::new(path, WIDE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(format!("US {}", model_target.actual_label()))
        .x_label_formatter(&|d| d.format("%m-%d").to_string())
        .draw()?;

    for model in models {
        let color = model_color(model);

        let series: Vec<&&ScoreboardRecord> =
            filtered.iter().filter(|r| &r.model == model).collect();

        // Confidence band first so the point-estimate line sits on top.
        let mut band: Vec<(NaiveDate, f64)> = series
            .iter()
            .map(|r| (r.target_end_date, r.ci_hi))
            .collect();
        band.extend(series.iter().rev().map(|r| (r.target_end_date, r.ci_lo)));
        chart.draw_series(std::iter::once(Polygon::new(band, color.mix(0.1))))?;

        chart
            .draw_series(LineSeries::new(
                series.iter().map(|r| (r.target_end_date, r.pe)),
                color.stroke_width(2),
            ))?
            .label(model.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    // Observed reference series.
    chart.draw_series(LineSeries::new(
        actuals
            .iter()
            .map(|a| (a.date_observed, a.value_for(model_target))),
        BLACK.stroke_width(3),
    ))?;

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

    #[test]
    fn clip_range_uses_fixed_multipliers() {
        let (lo, hi) = clip_range(&[100.0, 200.0, 150.0]);
        assert_eq!(lo, 60.0);
        assert_eq!(hi, 280.0);
    }

    #[test]
    fn missing_model_is_a_data_error() {
        let actuals = vec![ActualObservation {
            date_observed: "2021-01-02".parse().unwrap(),
            cases: 100.0,
            deaths: 10.0,
        }];
        let err = render_longitudinal(
            &actuals,
            &[],
            Path::new("/tmp"),
            ModelTarget::Case,
            1,
            &ModelSelection::One("ghost".to_string()),
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Data);
    }
}
