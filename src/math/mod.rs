//! Numeric helpers: small least-squares solves and series interpolation.

pub mod interp;
pub mod ols;
