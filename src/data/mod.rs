//! Synthetic demo data.

mod sample;

pub use sample::{DemoData, generate_demo, write_demo_csvs};
