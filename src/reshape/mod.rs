//! Scoreboard reshaping: long-format records to wide per-model time series.
//!
//! The scoreboard arrives as one row per (model, forecast date, target date).
//! Every grouped chart wants the same data as a date-indexed table with one
//! column per model, under one of two alignments:
//!
//! - by **target end date**: all forecasts predicting the same real-world date
//! - by **forecast date**: all forecasts issued on the same day
//!
//! Design goals:
//! - missing cells stay missing (`None`), never zero, so renderers can skip them
//! - duplicate `(model, date)` keys are **averaged** (the upstream analysis
//!   left this to the dataframe library's defaults; averaging is the explicit
//!   policy here)
//! - models without a model-type mapping are dropped from the merge, but the
//!   drop is counted and reported instead of vanishing silently

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{ModelTypeRecord, ScoreboardRecord};

pub mod ticks;

/// A scoreboard row annotated with its model-type group.
#[derive(Debug, Clone)]
pub struct MergedRecord {
    pub record: ScoreboardRecord,
    pub modeltype: String,
}

/// What the merge step filtered out.
///
/// `rows_dropped` counts scoreboard rows whose model had no model-type
/// mapping; `missing_models` names the offending models.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeDiagnostics {
    pub rows_dropped: usize,
    pub missing_models: BTreeSet<String>,
}

/// A wide table: sorted date index, sorted model columns, optional cells.
#[derive(Debug, Clone)]
pub struct PivotTable {
    pub dates: Vec<NaiveDate>,
    pub models: Vec<String>,
    /// Row-major: `values[date_idx][model_idx]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl PivotTable {
    /// The (date, value) series for one model column, skipping missing cells.
    ///
    /// Returns an empty vector when the model has no column at all.
    pub fn column(&self, model: &str) -> Vec<(NaiveDate, f64)> {
        let Some(col) = self.models.iter().position(|m| m == model) else {
            return Vec::new();
        };
        self.dates
            .iter()
            .zip(self.values.iter())
            .filter_map(|(&date, row)| row[col].map(|v| (date, v)))
            .collect()
    }

    /// True when the model has a column but every cell in it is missing.
    pub fn column_is_empty(&self, model: &str) -> bool {
        match self.models.iter().position(|m| m == model) {
            Some(col) => self.values.iter().all(|row| row[col].is_none()),
            None => true,
        }
    }

    /// Min/max over all present cells, or `None` for an all-missing table.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for row in &self.values {
            for v in row.iter().flatten() {
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(*v), hi.max(*v)),
                    None => (*v, *v),
                });
            }
        }
        range
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// Output of a pivot: the annotated long rows, the wide table, and what was
/// dropped along the way.
#[derive(Debug, Clone)]
pub struct PivotResult {
    pub merged: Vec<MergedRecord>,
    pub table: PivotTable,
    pub diagnostics: MergeDiagnostics,
}

/// Which scoreboard date column a pivot groups on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateAxis {
    TargetEnd,
    Forecast,
}

/// Pivot scores into a table indexed by **target end date**.
pub fn pivot_by_target_date(
    scoreboard: &[ScoreboardRecord],
    modeltypes: &[ModelTypeRecord],
) -> PivotResult {
    pivot(scoreboard, modeltypes, DateAxis::TargetEnd)
}

/// Pivot scores into a table indexed by **forecast date**.
///
/// The caller is expected to pre-filter the scoreboard to a single horizon
/// (`delta_w`); without that, several horizons share a key and their scores
/// are averaged per the duplicate policy.
pub fn pivot_by_forecast_date(
    scoreboard: &[ScoreboardRecord],
    modeltypes: &[ModelTypeRecord],
) -> PivotResult {
    pivot(scoreboard, modeltypes, DateAxis::Forecast)
}

/// Pivot raw scores by forecast date without a model-type merge.
///
/// The interpolated score-vs-time charts plot every model and never group,
/// so they skip the mapping join (and its drop policy) entirely.
pub fn pivot_all_by_forecast_date(scoreboard: &[ScoreboardRecord]) -> PivotTable {
    let merged: Vec<MergedRecord> = scoreboard
        .iter()
        .map(|record| MergedRecord {
            record: record.clone(),
            modeltype: String::new(),
        })
        .collect();
    pivot_merged(&merged, DateAxis::Forecast)
}

fn pivot(
    scoreboard: &[ScoreboardRecord],
    modeltypes: &[ModelTypeRecord],
    axis: DateAxis,
) -> PivotResult {
    let type_of: BTreeMap<&str, &str> = modeltypes
        .iter()
        .map(|m| (m.model.as_str(), m.modeltype.as_str()))
        .collect();

    let mut merged = Vec::with_capacity(scoreboard.len());
    let mut diagnostics = MergeDiagnostics::default();

    for record in scoreboard {
        match type_of.get(record.model.as_str()) {
            Some(modeltype) => merged.push(MergedRecord {
                record: record.clone(),
                modeltype: (*modeltype).to_string(),
            }),
            None => {
                diagnostics.rows_dropped += 1;
                diagnostics.missing_models.insert(record.model.clone());
            }
        }
    }

    let table = pivot_merged(&merged, axis);

    PivotResult {
        merged,
        table,
        diagnostics,
    }
}

fn pivot_merged(merged: &[MergedRecord], axis: DateAxis) -> PivotTable {
    // Accumulate (sum, count) per cell so duplicates average.
    let mut cells: BTreeMap<(NaiveDate, &str), (f64, usize)> = BTreeMap::new();
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut models: BTreeSet<&str> = BTreeSet::new();

    for m in merged {
        let date = match axis {
            DateAxis::TargetEnd => m.record.target_end_date,
            DateAxis::Forecast => m.record.forecast_date,
        };
        dates.insert(date);
        models.insert(m.record.model.as_str());
        let cell = cells.entry((date, m.record.model.as_str())).or_insert((0.0, 0));
        cell.0 += m.record.score;
        cell.1 += 1;
    }

    let dates: Vec<NaiveDate> = dates.into_iter().collect();
    let models: Vec<String> = models.into_iter().map(str::to_string).collect();

    let values = dates
        .iter()
        .map(|&date| {
            models
                .iter()
                .map(|model| {
                    cells
                        .get(&(date, model.as_str()))
                        .map(|&(sum, n)| sum / n as f64)
                })
                .collect()
        })
        .collect();

    PivotTable {
        dates,
        models,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn record(model: &str, forecast: &str, target: &str, delta_w: u32, score: f64) -> ScoreboardRecord {
        ScoreboardRecord {
            model: model.to_string(),
            forecast_date: date(forecast),
            target_end_date: date(target),
            delta: delta_w * 7,
            delta_w,
            pe: 100.0,
            ci_lo: 90.0,
            ci_hi: 110.0,
            score,
            prange: 0.95,
            sumpdf: 0.95,
        }
    }

    fn mapping(pairs: &[(&str, &str)]) -> Vec<ModelTypeRecord> {
        pairs
            .iter()
            .map(|&(model, modeltype)| ModelTypeRecord {
                model: model.to_string(),
                modeltype: modeltype.to_string(),
            })
            .collect()
    }

    #[test]
    fn missing_cell_stays_missing() {
        // Model B skips the middle of three target dates.
        let scoreboard = vec![
            record("A", "2021-01-02", "2021-01-09", 1, 1.0),
            record("A", "2021-01-09", "2021-01-16", 1, 2.0),
            record("A", "2021-01-16", "2021-01-23", 1, 3.0),
            record("B", "2021-01-02", "2021-01-09", 1, 4.0),
            record("B", "2021-01-16", "2021-01-23", 1, 6.0),
        ];
        let types = mapping(&[("A", "ensemble"), ("B", "ensemble")]);

        let result = pivot_by_target_date(&scoreboard, &types);
        let t = &result.table;

        assert_eq!(t.dates.len(), 3);
        assert_eq!(t.models, vec!["A".to_string(), "B".to_string()]);

        let b = t.models.iter().position(|m| m == "B").unwrap();
        assert_eq!(t.values[0][b], Some(4.0));
        assert_eq!(t.values[1][b], None);
        assert_eq!(t.values[2][b], Some(6.0));
        assert_eq!(result.diagnostics.rows_dropped, 0);
    }

    #[test]
    fn unmapped_model_is_dropped_and_counted() {
        let scoreboard = vec![
            record("A", "2021-01-02", "2021-01-09", 1, 1.0),
            record("C", "2021-01-02", "2021-01-09", 1, 9.0),
            record("C", "2021-01-09", "2021-01-16", 1, 9.5),
        ];
        let types = mapping(&[("A", "ensemble"), ("B", "ensemble")]);

        let result = pivot_by_target_date(&scoreboard, &types);

        assert_eq!(result.merged.len(), 1);
        assert_eq!(result.merged[0].modeltype, "ensemble");
        assert_eq!(result.diagnostics.rows_dropped, 2);
        assert!(result.diagnostics.missing_models.contains("C"));
        // B is mapped but has no data: not a drop, just an absent column.
        assert!(!result.table.models.contains(&"B".to_string()));
        assert!(!result.diagnostics.missing_models.contains("B"));
        assert_eq!(result.table.models, vec!["A".to_string()]);
    }

    #[test]
    fn forecast_date_pivot_matches_inputs_exactly() {
        // 2 models x 4 weekly forecast dates at delta_w = 1, no duplicates.
        let mut scoreboard = Vec::new();
        let starts = ["2021-03-06", "2021-03-13", "2021-03-20", "2021-03-27"];
        for (i, s) in starts.iter().enumerate() {
            scoreboard.push(record("M1", s, "2021-04-03", 1, i as f64));
            scoreboard.push(record("M2", s, "2021-04-03", 1, 10.0 + i as f64));
        }
        // A second horizon that the caller filters away.
        scoreboard.push(record("M1", "2021-03-06", "2021-04-10", 2, 99.0));

        let filtered: Vec<_> = scoreboard
            .iter()
            .filter(|r| r.delta_w == 1)
            .cloned()
            .collect();
        let types = mapping(&[("M1", "stat"), ("M2", "mech")]);

        let result = pivot_by_forecast_date(&filtered, &types);
        let t = &result.table;

        assert_eq!(t.dates.len(), 4);
        assert_eq!(t.models.len(), 2);
        for (i, s) in starts.iter().enumerate() {
            let row = t.dates.iter().position(|d| *d == date(s)).unwrap();
            assert_eq!(t.values[row][0], Some(i as f64));
            assert_eq!(t.values[row][1], Some(10.0 + i as f64));
        }
    }

    #[test]
    fn duplicate_keys_average() {
        let scoreboard = vec![
            record("A", "2021-01-02", "2021-01-09", 1, 2.0),
            record("A", "2021-01-02", "2021-01-09", 1, 4.0),
        ];
        let types = mapping(&[("A", "ensemble")]);

        let result = pivot_by_forecast_date(&scoreboard, &types);
        assert_eq!(result.table.values[0][0], Some(3.0));
    }

    #[test]
    fn column_helpers() {
        let scoreboard = vec![
            record("A", "2021-01-02", "2021-01-09", 1, 1.0),
            record("B", "2021-01-09", "2021-01-16", 1, 5.0),
        ];
        let types = mapping(&[("A", "ensemble"), ("B", "ensemble")]);
        let t = pivot_by_target_date(&scoreboard, &types).table;

        assert_eq!(t.column("A"), vec![(date("2021-01-09"), 1.0)]);
        assert!(t.column("Z").is_empty());
        assert!(!t.column_is_empty("A"));
        assert!(t.column_is_empty("Z"));
        assert_eq!(t.value_range(), Some((1.0, 5.0)));
    }
}
