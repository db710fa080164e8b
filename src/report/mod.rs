//! Formatted terminal output for a charting run.
//!
//! Formatting lives in one place so the reshaping/rendering code stays clean
//! and output changes are localized.

use std::path::PathBuf;

use crate::charts::calibration::CalibrationReport;
use crate::domain::{ActualObservation, ModelTypeRecord, RunConfig, ScoreboardRecord};
use crate::error::ChartError;
use crate::io::ingest::RowError;
use crate::reshape::MergeDiagnostics;

/// Outcome of one chart family within a run: either the files it produced or
/// why it failed. Failures here never abort the run; they are reported at
/// the end.
#[derive(Debug, Clone)]
pub struct ChartOutcome {
    pub name: &'static str,
    pub result: Result<Vec<PathBuf>, ChartError>,
}

/// Header block: what was loaded and what the run will do.
pub fn format_run_summary(
    config: &RunConfig,
    scoreboard: &[ScoreboardRecord],
    modeltypes: &[ModelTypeRecord],
    actuals: &[ActualObservation],
) -> String {
    let mut out = String::new();

    out.push_str("=== scorecharts - forecast scoreboard charts ===\n");
    out.push_str(&format!("Target: {:?}\n", config.model_target));
    out.push_str(&format!(
        "Scoreboard: {} rows | model types: {} | actuals: {} observations\n",
        scoreboard.len(),
        modeltypes.len(),
        actuals.len()
    ));
    out.push_str(&format!("Figures: {}\n", config.figures_dir.display()));

    out
}

/// Row-level ingest problems for one input file.
pub fn format_row_errors(label: &str, rows_read: usize, errors: &[RowError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str(&format!(
        "{label}: skipped {} of {rows_read} row(s):\n",
        errors.len()
    ));
    for e in errors.iter().take(10) {
        out.push_str(&format!("  line {}: {}\n", e.line, e.message));
    }
    if errors.len() > 10 {
        out.push_str(&format!("  ... and {} more\n", errors.len() - 10));
    }
    out
}

/// What the model-type merge dropped. Zero drops still prints, so a clean
/// run is distinguishable from a run that never checked.
pub fn format_merge_diagnostics(label: &str, diag: &MergeDiagnostics) -> String {
    if diag.rows_dropped == 0 {
        return format!("{label}: 0 rows dropped (all models mapped)\n");
    }
    format!(
        "{label}: {} row(s) dropped; models missing a model-type mapping: {}\n",
        diag.rows_dropped,
        diag.missing_models
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    )
}

/// The calibration diagnostic, preserving the original percentage framing.
pub fn format_calibration(report: &CalibrationReport) -> String {
    let mut out = String::new();
    out.push_str("===========================\n");
    out.push_str("Maximum % conversion error:\n");
    out.push_str(&format!("{:.6}\n", 100.0 * report.max_abs_error));
    out
}

/// Per-chart outcomes at the end of a run.
pub fn format_outcomes(outcomes: &[ChartOutcome]) -> String {
    let mut out = String::new();
    out.push_str("\nCharts:\n");
    for outcome in outcomes {
        match &outcome.result {
            Ok(paths) => {
                for p in paths {
                    out.push_str(&format!("  ok   {:<18} {}\n", outcome.name, p.display()));
                }
            }
            Err(e) => {
                out.push_str(&format!("  FAIL {:<18} {e}\n", outcome.name));
            }
        }
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        out.push_str(&format!("\n{failed} chart famil(ies) failed.\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn zero_drop_diagnostic_is_explicit() {
        let diag = MergeDiagnostics::default();
        let s = format_merge_diagnostics("target-date merge", &diag);
        assert!(s.contains("0 rows dropped"));
    }

    #[test]
    fn drops_name_the_missing_models() {
        let mut missing = BTreeSet::new();
        missing.insert("ghost-model".to_string());
        let diag = MergeDiagnostics {
            rows_dropped: 3,
            missing_models: missing,
        };
        let s = format_merge_diagnostics("merge", &diag);
        assert!(s.contains("3 row(s) dropped"));
        assert!(s.contains("ghost-model"));
    }

    #[test]
    fn calibration_is_reported_as_percent() {
        let report = CalibrationReport {
            path: PathBuf::from("x.png"),
            max_abs_error: 0.0025,
        };
        let s = format_calibration(&report);
        assert!(s.contains("0.250000"));
    }
}
