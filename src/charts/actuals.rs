//! Plain line charts of the observed series (no forecasts).

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::charts::{COMPACT, figure_path, render_failure};
use crate::domain::{ActualObservation, ModelTarget};
use crate::error::ChartError;

/// Render the observed series on its own: "US Weekly Incidental Cases" or
/// "US Cumulative Deaths".
pub fn render_actuals(
    actuals: &[ActualObservation],
    figures_dir: &Path,
    model_target: ModelTarget,
) -> Result<PathBuf, ChartError> {
    if actuals.is_empty() {
        return Err(ChartError::data(
            "Cannot render actuals chart: no observations",
        ));
    }

    let path = figure_path(
        figures_dir,
        &format!("{}_US_Actuals.png", model_target.file_label()),
    );
    draw(actuals, &path, model_target).map_err(|e| render_failure(&path, e))?;
    Ok(path)
}

fn draw(
    actuals: &[ActualObservation],
    path: &Path,
    model_target: ModelTarget,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut sorted: Vec<&ActualObservation> = actuals.iter().collect();
    sorted.sort_by_key(|a| a.date_observed);

    let Some((first, last)) = sorted.first().zip(sorted.last()) else {
        return Err("no observations".into());
    };
    let x_min = first.date_observed;
    let x_max = if last.date_observed > x_min {
        last.date_observed
    } else {
        x_min + chrono::Duration::days(7)
    };

    let values: Vec<f64> = sorted.iter().map(|a| a.value_for(model_target)).collect();
    let y_min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let y_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = ((y_max - y_min) * 0.05).max(1.0);

    let title = match model_target {
        ModelTarget::Case => "US Weekly Incidental Cases",
        ModelTarget::Death => "US Cumulative Deaths",
    };

    let root = BitMapBackend::new(path, COMPACT).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, (y_min - pad)..(y_max + pad))?;

    chart
        .configure_mesh()
        .y_desc(model_target.actual_label())
        .x_label_formatter(&|d| d.format("%m-%d").to_string())
        .draw()?;

    chart.draw_series(LineSeries::new(
        sorted
            .iter()
            .map(|a| (a.date_observed, a.value_for(model_target))),
        BLUE.stroke_width(2),
    ))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_actuals_is_a_data_error() {
        let err = render_actuals(&[], Path::new("/tmp"), ModelTarget::Case).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Data);
    }
}
