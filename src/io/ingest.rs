//! CSV ingest and normalization.
//!
//! Turns the three input CSVs (scoreboard, model types, actual observations)
//! into clean domain records.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no reshaping or rendering logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{ActualObservation, ModelTypeRecord, ScoreboardRecord};
use crate::error::ChartError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed rows plus what was skipped.
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub rows: Vec<T>,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

const SCOREBOARD_COLUMNS: &[&str] = &[
    "model",
    "forecast_date",
    "target_end_date",
    "delta",
    "deltaw",
    "pe",
    "cilo",
    "cihi",
    "score",
    "prange",
    "sumpdf",
];

const MODELTYPE_COLUMNS: &[&str] = &["model", "modeltype"];

const ACTUALS_COLUMNS: &[&str] = &["dateobserved", "cases", "deaths"];

/// Load the long-format scoreboard.
pub fn load_scoreboard(path: &Path) -> Result<Ingested<ScoreboardRecord>, ChartError> {
    read_scoreboard(open(path)?).map_err(|e| at_path(path, e))
}

/// Load the model → modeltype mapping.
pub fn load_modeltypes(path: &Path) -> Result<Ingested<ModelTypeRecord>, ChartError> {
    read_modeltypes(open(path)?).map_err(|e| at_path(path, e))
}

/// Load the observed reference series.
pub fn load_actuals(path: &Path) -> Result<Ingested<ActualObservation>, ChartError> {
    read_actuals(open(path)?).map_err(|e| at_path(path, e))
}

fn open(path: &Path) -> Result<File, ChartError> {
    File::open(path)
        .map_err(|e| ChartError::ingest(format!("Failed to open CSV '{}': {e}", path.display())))
}

fn at_path(path: &Path, e: ChartError) -> ChartError {
    ChartError::ingest(format!("{} (in '{}')", e, path.display()))
}

pub(crate) fn read_scoreboard<R: Read>(input: R) -> Result<Ingested<ScoreboardRecord>, ChartError> {
    read_rows(input, SCOREBOARD_COLUMNS, |record, map| {
        Ok(ScoreboardRecord {
            model: field(record, map, "model")?.to_string(),
            forecast_date: parse_date(field(record, map, "forecast_date")?)?,
            target_end_date: parse_date(field(record, map, "target_end_date")?)?,
            delta: parse_num(field(record, map, "delta")?, "delta")?,
            delta_w: parse_num(field(record, map, "deltaw")?, "deltaW")?,
            pe: parse_f64(field(record, map, "pe")?, "PE")?,
            ci_lo: parse_f64(field(record, map, "cilo")?, "CILO")?,
            ci_hi: parse_f64(field(record, map, "cihi")?, "CIHI")?,
            score: parse_f64(field(record, map, "score")?, "score")?,
            prange: parse_f64(field(record, map, "prange")?, "prange")?,
            sumpdf: parse_f64(field(record, map, "sumpdf")?, "sumpdf")?,
        })
    })
}

pub(crate) fn read_modeltypes<R: Read>(input: R) -> Result<Ingested<ModelTypeRecord>, ChartError> {
    read_rows(input, MODELTYPE_COLUMNS, |record, map| {
        let model = field(record, map, "model")?.to_string();
        let modeltype = field(record, map, "modeltype")?.to_string();
        if model.is_empty() || modeltype.is_empty() {
            return Err("empty model or modeltype".to_string());
        }
        Ok(ModelTypeRecord { model, modeltype })
    })
}

pub(crate) fn read_actuals<R: Read>(input: R) -> Result<Ingested<ActualObservation>, ChartError> {
    read_rows(input, ACTUALS_COLUMNS, |record, map| {
        Ok(ActualObservation {
            date_observed: parse_date(field(record, map, "dateobserved")?)?,
            cases: parse_f64(field(record, map, "cases")?, "Cases")?,
            deaths: parse_f64(field(record, map, "deaths")?, "Deaths")?,
        })
    })
}

/// Shared CSV loop: header validation up front, then per-row parse with
/// errors collected (not fatal) so one bad row cannot sink the run.
fn read_rows<R, T, F>(
    input: R,
    required: &[&str],
    parse_row: F,
) -> Result<Ingested<T>, ChartError>
where
    R: Read,
    F: Fn(&StringRecord, &HashMap<String, usize>) -> Result<T, String>,
{
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| ChartError::ingest(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(*c))
        .collect();
    if !missing.is_empty() {
        return Err(ChartError::ingest(format!(
            "CSV is missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header row, and CSV line numbers
        // are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(row) => rows.push(row),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    Ok(Ingested {
        rows,
        rows_read,
        row_errors,
    })
}

/// Case-insensitive header → column index.
fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect()
}

fn field<'a>(
    record: &'a StringRecord,
    map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    map.get(name)
        .and_then(|&i| record.get(i))
        .ok_or_else(|| format!("missing field '{name}'"))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    s.parse::<NaiveDate>()
        .map_err(|e| format!("bad date '{s}': {e}"))
}

fn parse_num(s: &str, name: &str) -> Result<u32, String> {
    s.parse::<u32>()
        .map_err(|e| format!("bad {name} '{s}': {e}"))
}

fn parse_f64(s: &str, name: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|e| format!("bad {name} '{s}': {e}"))?;
    if !v.is_finite() {
        return Err(format!("non-finite {name} '{s}'"));
    }
    Ok(v)
}
