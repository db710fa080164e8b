//! File input/output: CSV loading and diagnostics export.

pub mod diag;
pub mod ingest;
