//! Shared domain types.
//!
//! These types are intentionally lightweight and serializable so they can be:
//!
//! - loaded from CSV by the ingest layer
//! - reshaped in-memory for rendering
//! - dumped to JSON for debugging a run

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// Which forecast target the charts describe.
///
/// This gates output file naming and chart titling only; the reshaping and
/// rendering logic is identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelTarget {
    /// Weekly incidental cases.
    Case,
    /// Cumulative deaths.
    Death,
}

impl ModelTarget {
    /// File-name prefix used by every saved figure.
    pub fn file_label(self) -> &'static str {
        match self {
            ModelTarget::Case => "INCCASE",
            ModelTarget::Death => "CUMDEATH",
        }
    }

    /// Title-case label for scatter/histogram chart titles.
    pub fn title_label(self) -> &'static str {
        match self {
            ModelTarget::Case => "Weekly Incidental Cases",
            ModelTarget::Death => "Cumulative Deaths",
        }
    }

    /// Lower-case noun used inside grouped-chart axis labels.
    pub fn series_noun(self) -> &'static str {
        match self {
            ModelTarget::Case => "weekly incidental cases",
            ModelTarget::Death => "cumulative deaths",
        }
    }

    /// Column of the actuals table this target is compared against.
    pub fn actual_label(self) -> &'static str {
        match self {
            ModelTarget::Case => "Cases",
            ModelTarget::Death => "Deaths",
        }
    }
}

impl std::fmt::Display for ModelTarget {
    // Matches the clap value names so `default_value_t` round-trips.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ModelTarget::Case => "case",
            ModelTarget::Death => "death",
        })
    }
}

impl FromStr for ModelTarget {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Case" | "case" => Ok(ModelTarget::Case),
            "Death" | "death" => Ok(ModelTarget::Death),
            other => Err(ChartError::invalid_model_target(other)),
        }
    }
}

/// One row of the long-format scoreboard: a single model's forecast for a
/// single target date, scored against what actually happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreboardRecord {
    pub model: String,
    pub forecast_date: NaiveDate,
    pub target_end_date: NaiveDate,

    /// Horizon in days between forecast issue and target end.
    pub delta: u32,
    /// Horizon in weeks; assumed (not enforced) to be ~`delta / 7`.
    pub delta_w: u32,

    /// Point estimate.
    pub pe: f64,
    /// Confidence interval bounds. `ci_lo <= pe <= ci_hi` is assumed
    /// upstream and not validated here.
    pub ci_lo: f64,
    pub ci_hi: f64,

    pub score: f64,

    /// Cumulative probability range covered by the forecast's quantiles.
    pub prange: f64,
    /// The same mass recovered by integrating the reconstructed density.
    /// `|prange - sumpdf|` near zero means the conversion was faithful.
    pub sumpdf: f64,
}

/// Maps a model identifier to its categorical group for chart clustering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTypeRecord {
    pub model: String,
    pub modeltype: String,
}

/// One observed real-world data point (the reference line on overlays).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActualObservation {
    pub date_observed: NaiveDate,
    pub cases: f64,
    pub deaths: f64,
}

impl ActualObservation {
    /// Select the observed value matching the chart's target.
    pub fn value_for(&self, target: ModelTarget) -> f64 {
        match target {
            ModelTarget::Case => self.cases,
            ModelTarget::Death => self.deaths,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub scoreboard_path: PathBuf,
    pub modeltypes_path: PathBuf,
    pub actuals_path: PathBuf,
    pub figures_dir: PathBuf,
    pub model_target: ModelTarget,

    /// Horizons (in weeks) rendered by the grouped-forecast and longitudinal
    /// chart families.
    pub horizon_weeks: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn model_target_labels() {
        assert_eq!(ModelTarget::Case.file_label(), "INCCASE");
        assert_eq!(ModelTarget::Death.file_label(), "CUMDEATH");
        assert_eq!(ModelTarget::Case.title_label(), "Weekly Incidental Cases");
        assert_eq!(ModelTarget::Death.series_noun(), "cumulative deaths");
    }

    #[test]
    fn model_target_rejects_unknown() {
        let err = "Flu".parse::<ModelTarget>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidModelTarget);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn model_target_parses_both_cases() {
        assert_eq!("Case".parse::<ModelTarget>().unwrap(), ModelTarget::Case);
        assert_eq!("death".parse::<ModelTarget>().unwrap(), ModelTarget::Death);
    }
}
