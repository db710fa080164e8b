//! Grouped time-series charts: one figure per model-type group.
//!
//! Each group's figure overlays the pivoted score series of its member
//! models. Two alignments exist, mirroring the two pivots:
//!
//! - by target end date: "Average Forward Scores" across all horizons
//! - by forecast date: scores for one chosen horizon (`numweeks`)
//!
//! Models whose whole pivoted series is missing are skipped; models missing
//! from the model-type mapping never reach the pivot at all, and that drop
//! is surfaced in the returned diagnostics rather than swallowed.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use plotters::coord::combinators::BindKeyPoints;
use plotters::prelude::*;

use crate::charts::palette::model_color;
use crate::charts::{WIDE, ensure_dir, figure_path, render_failure};
use crate::domain::{ModelTarget, ModelTypeRecord, ScoreboardRecord};
use crate::error::ChartError;
use crate::reshape::ticks::padded_ticks;
use crate::reshape::{MergeDiagnostics, PivotTable, pivot_by_forecast_date, pivot_by_target_date};

/// Result of a grouped-chart family: one file per model-type group plus the
/// merge diagnostics from the underlying pivot.
#[derive(Debug, Clone)]
pub struct GroupCharts {
    pub paths: Vec<PathBuf>,
    pub diagnostics: MergeDiagnostics,
}

/// Grouped score-vs-time charts aligned by **target end date**.
pub fn render_groups_by_target_date(
    scoreboard: &[ScoreboardRecord],
    modeltypes: &[ModelTypeRecord],
    figures_dir: &Path,
    model_target: ModelTarget,
) -> Result<GroupCharts, ChartError> {
    let result = pivot_by_target_date(scoreboard, modeltypes);
    let table = result.table;
    if table.dates.is_empty() {
        return Err(ChartError::data(
            "Cannot render grouped charts: pivot produced no dated rows",
        ));
    }

    let mut paths = Vec::new();
    for modeltype in modeltype_groups(modeltypes) {
        let members = group_members(modeltypes, &modeltype);
        let path = figure_path(
            figures_dir,
            &format!(
                "{}_Average_Forward_Scores_{modeltype}models.png",
                model_target.file_label()
            ),
        );
        draw_group(
            &table,
            &members,
            &path,
            &format!("{modeltype} models: Average Forward Scores"),
            &format!("Time-averaged score for {}", model_target.series_noun()),
            "Target End Date",
        )
        .map_err(|e| render_failure(&path, e))?;
        paths.push(path);
    }

    Ok(GroupCharts {
        paths,
        diagnostics: result.diagnostics,
    })
}

/// Grouped score-vs-time charts aligned by **forecast date**, for one
/// horizon. Figures land in a `<numweeks>Week/` subdirectory.
pub fn render_groups_by_forecast_date(
    scoreboard: &[ScoreboardRecord],
    modeltypes: &[ModelTypeRecord],
    figures_dir: &Path,
    numweeks: u32,
    model_target: ModelTarget,
) -> Result<GroupCharts, ChartError> {
    let filtered: Vec<ScoreboardRecord> = scoreboard
        .iter()
        .filter(|r| r.delta_w == numweeks)
        .cloned()
        .collect();

    let result = pivot_by_forecast_date(&filtered, modeltypes);
    let table = result.table;
    if table.dates.is_empty() {
        return Err(ChartError::data(format!(
            "Cannot render grouped charts: no {numweeks}-week-ahead forecasts after pivot"
        )));
    }

    let subdir = figures_dir.join(format!("{numweeks}Week"));
    ensure_dir(&subdir)?;

    let mut paths = Vec::new();
    for modeltype in modeltype_groups(modeltypes) {
        let members = group_members(modeltypes, &modeltype);
        let path = figure_path(
            &subdir,
            &format!(
                "{}_Forward_Scores_{modeltype}models.png",
                model_target.file_label()
            ),
        );
        draw_group(
            &table,
            &members,
            &path,
            &format!("{modeltype} models: {numweeks} wk ahead Scores"),
            &format!(
                "Score for {numweeks} wk ahead {}",
                model_target.series_noun()
            ),
            "Forecast Date",
        )
        .map_err(|e| render_failure(&path, e))?;
        paths.push(path);
    }

    Ok(GroupCharts {
        paths,
        diagnostics: result.diagnostics,
    })
}

/// Distinct model-type groups, in stable (sorted) order.
fn modeltype_groups(modeltypes: &[ModelTypeRecord]) -> Vec<String> {
    let unique: BTreeSet<&str> = modeltypes.iter().map(|m| m.modeltype.as_str()).collect();
    unique.into_iter().map(str::to_string).collect()
}

/// Member models of one group, in mapping order.
fn group_members(modeltypes: &[ModelTypeRecord], modeltype: &str) -> Vec<String> {
    modeltypes
        .iter()
        .filter(|m| m.modeltype == modeltype)
        .map(|m| m.model.clone())
        .collect()
}

fn draw_group(
    table: &PivotTable,
    members: &[String],
    path: &Path,
    title: &str,
    y_desc: &str,
    x_desc: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some((first, last)) = table.first_date().zip(table.last_date()) else {
        return Err("empty pivot table".into());
    };
    let ticks = padded_ticks(first, last)?;
    let (Some(&x_min), Some(&x_max)) = (ticks.first(), ticks.last()) else {
        return Err("empty tick range".into());
    };

    let (y_lo, y_hi) = table.value_range().unwrap_or((0.0, 1.0));

    let root = BitMapBackend::new(path, WIDE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 26))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        // Labels sit exactly on the generated weekly ticks, not wherever the
        // backend's own key-point pass would put them.
        .build_cartesian_2d(
            (x_min..x_max).with_key_points(ticks.clone()),
            (y_lo - 1.0)..(y_hi + 1.0),
        )?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_label_formatter(&|d| d.format("%b %d").to_string())
        .draw()?;

    for model in members {
        // Missing column or all-missing series: silently not drawn, same as
        // an absent legend entry.
        if table.column_is_empty(model) {
            continue;
        }
        let series = table.column(model);
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

    fn record(model: &str, target_end: &str, score: f64) -> ScoreboardRecord {
        ScoreboardRecord {
            model: model.to_string(),
            forecast_date: "2021-01-02".parse().unwrap(),
            target_end_date: target_end.parse().unwrap(),
            delta: 7,
            delta_w: 1,
            pe: 0.0,
            ci_lo: 0.0,
            ci_hi: 0.0,
            score,
            prange: 0.95,
            sumpdf: 0.95,
        }
    }

    #[test]
    fn target_date_groups_render_one_file_per_modeltype() {
        let scoreboard = vec![
            record("A", "2021-01-09", -1.0),
            record("A", "2021-01-16", -2.0),
            record("A", "2021-01-23", -1.5),
            record("B", "2021-01-09", -3.0),
            record("B", "2021-01-23", -2.5),
        ];
        let types = vec![
            ModelTypeRecord {
                model: "A".to_string(),
                modeltype: "ensemble".to_string(),
            },
            ModelTypeRecord {
                model: "B".to_string(),
                modeltype: "statistical".to_string(),
            },
        ];
        let dir = std::env::temp_dir().join(format!(
            "scorecharts-groups-{}",
            std::process::id()
        ));
        ensure_dir(&dir).unwrap();

        let out =
            render_groups_by_target_date(&scoreboard, &types, &dir, ModelTarget::Case).unwrap();

        assert_eq!(out.paths.len(), 2);
        assert_eq!(out.diagnostics.rows_dropped, 0);
        for p in &out.paths {
            assert!(p.exists(), "missing figure {}", p.display());
        }
    }

    #[test]
    fn groups_are_sorted_and_unique() {
        let types = vec![
            ModelTypeRecord {
                model: "B".to_string(),
                modeltype: "stat".to_string(),
            },
            ModelTypeRecord {
                model: "A".to_string(),
                modeltype: "ensemble".to_string(),
            },
            ModelTypeRecord {
                model: "C".to_string(),
                modeltype: "stat".to_string(),
            },
        ];
        assert_eq!(
            modeltype_groups(&types),
            vec!["ensemble".to_string(), "stat".to_string()]
        );
        assert_eq!(
            group_members(&types, "stat"),
            vec!["B".to_string(), "C".to_string()]
        );
    }
}
