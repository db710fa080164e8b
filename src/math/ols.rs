//! Least squares solver for tiny regression problems.
//!
//! The polynomial display-smoothing fit solves systems with 3 columns and a
//! handful of rows, so robustness matters far more than speed:
//!
//! - We use SVD to solve the least-squares problem even when the design
//!   matrix is tall (more rows than columns). Nalgebra's `QR::solve` is
//!   intended for square systems and will panic otherwise.
//! - Date-indexed polynomial bases can be poorly conditioned when the
//!   series is short, so we retry with progressively looser tolerances.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn least_squares_handles_tall_quadratic() {
        // y = 1 - 2x + x^2 on five points.
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let mut rows = Vec::new();
        let mut ys = Vec::new();
        for &x in &xs {
            rows.extend_from_slice(&[1.0, x, x * x]);
            ys.push(1.0 - 2.0 * x + x * x);
        }
        let x = DMatrix::from_row_slice(5, 3, &rows);
        let y = DVector::from_row_slice(&ys);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 1.0).abs() < 1e-8);
        assert!((beta[1] + 2.0).abs() < 1e-8);
        assert!((beta[2] - 1.0).abs() < 1e-8);
    }
}
