//! Deterministic synthetic scoreboard generation.
//!
//! The `demo` subcommand needs a full input set (scoreboard, model types,
//! actuals) without any real forecast archive on disk. Everything here is
//! seeded, so the same seed reproduces the same figures.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{ActualObservation, ModelTypeRecord, ScoreboardRecord};
use crate::error::ChartError;

/// Synthetic models and their group labels.
const MODELS: &[(&str, &str)] = &[
    ("Hub-Ensemble", "ensemble"),
    ("Hub-Baseline", "ensemble"),
    ("State-SEIR", "mechanistic"),
    ("Uni-MechBayes", "mechanistic"),
    ("Lab-GrowthRate", "statistical"),
    ("Lab-ARIMA", "statistical"),
];

/// Horizons (weeks ahead) each model forecasts at.
const HORIZONS: &[u32] = &[1, 2, 3, 4];

/// Number of weekly forecast dates.
const WEEKS: usize = 16;

/// Probability a (model, date, horizon) forecast is simply absent, so the
/// pivoted tables contain genuine gaps like real archives do.
const DROPOUT: f64 = 0.08;

#[derive(Debug, Clone)]
pub struct DemoData {
    pub scoreboard: Vec<ScoreboardRecord>,
    pub modeltypes: Vec<ModelTypeRecord>,
    pub actuals: Vec<ActualObservation>,
}

/// Generate a full synthetic input set.
pub fn generate_demo(seed: u64) -> Result<DemoData, ChartError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0)
        .map_err(|e| ChartError::data(format!("Noise distribution error: {e}")))?;

    let start: NaiveDate = NaiveDate::from_ymd_opt(2021, 1, 2)
        .ok_or_else(|| ChartError::data("Invalid demo start date"))?;

    // Observed series: a smooth wave so overlays have visible shape.
    // Covers the forecast window plus the longest horizon.
    let mut actuals = Vec::new();
    for w in 0..(WEEKS + HORIZONS.len() + 1) {
        let t = w as f64;
        let cases = 120_000.0 + 60_000.0 * (t / 5.0).sin() + 2_000.0 * noise.sample(&mut rng);
        let deaths = 300_000.0 + 7_000.0 * t + 500.0 * noise.sample(&mut rng);
        actuals.push(ActualObservation {
            date_observed: start + Duration::weeks(w as i64),
            cases: cases.max(0.0),
            deaths: deaths.max(0.0),
        });
    }

    let modeltypes: Vec<ModelTypeRecord> = MODELS
        .iter()
        .map(|&(model, modeltype)| ModelTypeRecord {
            model: model.to_string(),
            modeltype: modeltype.to_string(),
        })
        .collect();

    let mut scoreboard = Vec::new();
    for (mi, &(model, _)) in MODELS.iter().enumerate() {
        // Per-model skill: later models in the list are noisier.
        let skill = 0.02 + 0.015 * mi as f64;

        for w in 0..WEEKS {
            let forecast_date = start + Duration::weeks(w as i64);
            for &h in HORIZONS {
                if rng.gen_bool(DROPOUT) {
                    continue;
                }
                let target_end_date = forecast_date + Duration::weeks(h as i64);
                let truth = actuals
                    .iter()
                    .find(|a| a.date_observed == target_end_date)
                    .map(|a| a.cases)
                    .unwrap_or(120_000.0);

                // Error grows with horizon.
                let rel_err = skill * h as f64 * noise.sample(&mut rng);
                let pe = truth * (1.0 + rel_err);
                let spread = truth * skill * h as f64 * 2.0;

                scoreboard.push(ScoreboardRecord {
                    model: model.to_string(),
                    forecast_date,
                    target_end_date,
                    delta: h * 7,
                    delta_w: h,
                    pe,
                    ci_lo: pe - spread,
                    ci_hi: pe + spread,
                    score: -(rel_err.abs() * 100.0) - 0.1 * h as f64,
                    prange: 0.95,
                    // Conversion error stays within the calibration tolerance.
                    sumpdf: 0.95 + 2e-4 * noise.sample(&mut rng).clamp(-1.0, 1.0),
                });
            }
        }
    }

    Ok(DemoData {
        scoreboard,
        modeltypes,
        actuals,
    })
}

/// Write the demo set as the three input CSVs, so a demo run leaves behind
/// files that can be re-rendered (or hand-edited) with the normal commands.
pub fn write_demo_csvs(data: &DemoData, dir: &Path) -> Result<(), ChartError> {
    let create = |name: &str| {
        File::create(dir.join(name)).map_err(|e| {
            ChartError::ingest(format!("Failed to create demo CSV '{name}': {e}"))
        })
    };
    let fail = |name: &str, e: std::io::Error| {
        ChartError::ingest(format!("Failed to write demo CSV '{name}': {e}"))
    };

    let mut f = create("scoreboard.csv")?;
    writeln!(
        f,
        "model,forecast_date,target_end_date,delta,deltaW,PE,CILO,CIHI,score,prange,sumpdf"
    )
    .map_err(|e| fail("scoreboard.csv", e))?;
    for r in &data.scoreboard {
        writeln!(
            f,
            "{},{},{},{},{},{:.4},{:.4},{:.4},{:.6},{:.8},{:.8}",
            r.model,
            r.forecast_date,
            r.target_end_date,
            r.delta,
            r.delta_w,
            r.pe,
            r.ci_lo,
            r.ci_hi,
            r.score,
            r.prange,
            r.sumpdf,
        )
        .map_err(|e| fail("scoreboard.csv", e))?;
    }

    let mut f = create("modeltypes.csv")?;
    writeln!(f, "model,modeltype").map_err(|e| fail("modeltypes.csv", e))?;
    for m in &data.modeltypes {
        writeln!(f, "{},{}", m.model, m.modeltype).map_err(|e| fail("modeltypes.csv", e))?;
    }

    let mut f = create("actuals.csv")?;
    writeln!(f, "DateObserved,Cases,Deaths").map_err(|e| fail("actuals.csv", e))?;
    for a in &data.actuals {
        writeln!(f, "{},{:.2},{:.2}", a.date_observed, a.cases, a.deaths)
            .map_err(|e| fail("actuals.csv", e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_is_deterministic_for_a_seed() {
        let a = generate_demo(42).unwrap();
        let b = generate_demo(42).unwrap();
        assert_eq!(a.scoreboard.len(), b.scoreboard.len());
        for (x, y) in a.scoreboard.iter().zip(b.scoreboard.iter()) {
            assert_eq!(x.model, y.model);
            assert_eq!(x.forecast_date, y.forecast_date);
            assert_eq!(x.score, y.score);
        }
    }

    #[test]
    fn demo_covers_all_models_and_horizons() {
        let data = generate_demo(7).unwrap();
        assert_eq!(data.modeltypes.len(), MODELS.len());
        for &(model, _) in MODELS {
            assert!(data.scoreboard.iter().any(|r| r.model == model));
        }
        for &h in HORIZONS {
            assert!(data.scoreboard.iter().any(|r| r.delta_w == h));
        }
        // Dropout leaves genuine gaps.
        let full = MODELS.len() * WEEKS * HORIZONS.len();
        assert!(data.scoreboard.len() < full);
    }

    #[test]
    fn demo_calibration_stays_within_tolerance() {
        let data = generate_demo(42).unwrap();
        let worst = data
            .scoreboard
            .iter()
            .map(|r| (r.prange - r.sumpdf).abs())
            .fold(0.0_f64, f64::max);
        assert!(worst < 1e-3, "worst conversion error {worst}");
    }
}
