//! Calibration-error histogram.
//!
//! Every scoreboard row carries two probability masses: `prange` (the
//! cumulative range stated by the forecast's quantiles) and `sumpdf` (the
//! same mass recovered by integrating the reconstructed density). Their
//! difference should be near zero; this chart bins the differences and the
//! report carries the worst offender.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::charts::{COMPACT, figure_path, render_failure};
use crate::domain::{ModelTarget, ScoreboardRecord};
use crate::error::ChartError;

/// Number of histogram bins.
const BINS: usize = 50;

/// Outcome of the calibration chart.
#[derive(Debug, Clone)]
pub struct CalibrationReport {
    pub path: PathBuf,
    /// `max |prange - sumpdf|` over the whole scoreboard.
    pub max_abs_error: f64,
}

/// Render the 50-bin histogram of `prange - sumpdf` and report the maximum
/// absolute conversion error.
pub fn render_calibration_histogram(
    scoreboard: &[ScoreboardRecord],
    figures_dir: &Path,
    model_target: ModelTarget,
) -> Result<CalibrationReport, ChartError> {
    if scoreboard.is_empty() {
        return Err(ChartError::data(
            "Cannot render calibration histogram: scoreboard is empty",
        ));
    }

    let diffs: Vec<f64> = scoreboard.iter().map(|r| r.prange - r.sumpdf).collect();
    let max_abs_error = diffs.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));

    let path = figure_path(
        figures_dir,
        &format!("{}_CDF_PDF_Difference_Hist.png", model_target.file_label()),
    );
    draw(&diffs, &path, model_target).map_err(|e| render_failure(&path, e))?;

    Ok(CalibrationReport {
        path,
        max_abs_error,
    })
}

/// Equal-width bin counts over `[min, max]`. Exposed to tests; the drawing
/// code is just rectangles over this.
pub(crate) fn bin_counts(diffs: &[f64], bins: usize) -> (f64, f64, Vec<usize>) {
    let min = diffs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = diffs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Degenerate case: all differences identical. Widen so one bin holds all.
    let (min, max) = if max > min {
        (min, max)
    } else {
        (min - 0.5e-6, max + 0.5e-6)
    };

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &d in diffs {
        let idx = (((d - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    (min, max, counts)
}

fn draw(
    diffs: &[f64],
    path: &Path,
    model_target: ModelTarget,
) -> Result<(), Box<dyn std::error::Error>> {
    let (min, max, counts) = bin_counts(diffs, BINS);
    let width = (max - min) / BINS as f64;
    let y_max = counts.iter().copied().max().unwrap_or(1).max(1) as f64;

    let root = BitMapBackend::new(path, COMPACT).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(model_target.title_label(), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(min..max, 0f64..y_max * 1.05)?;

    chart
        .configure_mesh()
        .x_desc("Difference between integrated pdf and given cdf")
        .y_desc("Records")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, &c)| {
        let x0 = min + i as f64 * width;
        let x1 = x0 + width;
        Rectangle::new([(x0, 0.0), (x1, c as f64)], BLUE.mix(0.6).filled())
    }))?;

    root.present()?;
    Ok(())
}
