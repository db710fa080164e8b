//! Shared domain types for the scoreboard charting pipeline.

mod types;

pub use types::{
    ActualObservation, ModelTarget, ModelTypeRecord, RunConfig, ScoreboardRecord,
};
