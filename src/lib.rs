//! `score-charts` library crate.
//!
//! The binary (`scorecharts`) is a thin wrapper around this library so that:
//!
//! - reshaping and rendering logic is testable without spawning processes
//! - modules are reusable (e.g., notebooks or a future report generator)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod charts;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
pub mod reshape;
