//! Persist run diagnostics as JSON alongside the figures.
//!
//! The console output scrolls away; the JSON file is what a scheduled run
//! can archive next to the PNGs and diff between scoreboard updates.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ChartError;
use crate::reshape::MergeDiagnostics;

#[derive(Debug, Clone, Serialize)]
pub struct RunDiagnostics {
    pub tool: String,
    pub target: String,
    pub scoreboard_rows: usize,
    /// `max |prange - sumpdf|`, when the calibration chart rendered.
    pub max_conversion_error: Option<f64>,
    pub merges: Vec<MergeEntry>,
    pub charts_failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeEntry {
    pub label: String,
    #[serde(flatten)]
    pub diagnostics: MergeDiagnostics,
}

/// Write `run_diagnostics.json` into the figures directory.
pub fn write_diagnostics_json(dir: &Path, diag: &RunDiagnostics) -> Result<PathBuf, ChartError> {
    let path = dir.join("run_diagnostics.json");
    let file = File::create(&path).map_err(|e| {
        ChartError::render(format!(
            "Failed to create diagnostics JSON '{}': {e}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, diag).map_err(|e| {
        ChartError::render(format!(
            "Failed to write diagnostics JSON '{}': {e}",
            path.display()
        ))
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_serialize_with_flattened_merge() {
        let diag = RunDiagnostics {
            tool: "scorecharts".to_string(),
            target: "Case".to_string(),
            scoreboard_rows: 10,
            max_conversion_error: Some(0.0002),
            merges: vec![MergeEntry {
                label: "target-date merge".to_string(),
                diagnostics: MergeDiagnostics::default(),
            }],
            charts_failed: 0,
        };
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"rows_dropped\":0"));
        assert!(json.contains("target-date merge"));
    }
}
