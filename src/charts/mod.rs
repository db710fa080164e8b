//! Chart renderers.
//!
//! Each renderer is an independent function: it takes the scoreboard (or a
//! reshaped view of it) plus rendering parameters, draws one figure with
//! Plotters, and writes a PNG under the figures directory. None of them
//! mutate their inputs, and no renderer depends on another having run.
//!
//! Plotters errors are generic over the backend, so each renderer keeps its
//! drawing body in a private `Box<dyn Error>` function and wraps the result
//! into a `ChartError` with the output path at the public boundary.

use std::path::{Path, PathBuf};

use crate::error::ChartError;

pub mod actuals;
pub mod calibration;
pub mod groups;
pub mod histogram;
pub mod longitudinal;
pub mod palette;
pub mod scatter;
pub mod scores_time;

/// Standard figure size for wide time-series charts.
pub(crate) const WIDE: (u32, u32) = (1440, 720);

/// Standard figure size for square-ish distribution charts.
pub(crate) const SQUARE: (u32, u32) = (960, 960);

/// Standard figure size for compact diagnostic charts.
pub(crate) const COMPACT: (u32, u32) = (960, 480);

/// Join a figure file name onto the output directory.
pub(crate) fn figure_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}

/// Wrap a drawing failure with the figure path it was producing.
pub(crate) fn render_failure(path: &Path, e: impl std::fmt::Display) -> ChartError {
    ChartError::render(format!("Failed to render '{}': {e}", path.display()))
}

/// Ensure the output directory (or a per-horizon subdirectory) exists.
pub(crate) fn ensure_dir(dir: &Path) -> Result<(), ChartError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        ChartError::render(format!(
            "Failed to create figures directory '{}': {e}",
            dir.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figure_path_joins() {
        let p = figure_path(Path::new("/tmp/figs"), "INCCASE_test.png");
        assert_eq!(p, PathBuf::from("/tmp/figs/INCCASE_test.png"));
    }
}
