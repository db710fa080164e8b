//! Display-smoothing interpolation over date-indexed series with gaps.
//!
//! The score-vs-time charts fill interior missing values before plotting so
//! the per-model lines stay connected. Two methods exist:
//!
//! - `Linear`: straight segment between the nearest present neighbors.
//! - `Poly2`: a single order-2 polynomial fitted (least squares) to the
//!   present points, evaluated at the missing positions.
//!
//! The day-horizon chart uses linear and the week-horizon chart uses poly2.
//! That split is inherited from the source analysis as-is; see DESIGN.md.
//!
//! Only interior gaps are filled. Leading and trailing missing values stay
//! missing: extrapolating off the ends of a score series invents data.

use nalgebra::{DMatrix, DVector};

use crate::math::ols::solve_least_squares;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpMethod {
    Linear,
    Poly2,
}

/// Fill interior `None`s of `values`, where `xs[i]` is the numeric position
/// of sample `i` (e.g. days since the first date). Returns a new vector;
/// the input is untouched.
///
/// Series with fewer present points than the method needs (2 for linear,
/// 3 for poly2) are returned unchanged.
pub fn fill_missing(xs: &[f64], values: &[Option<f64>], method: InterpMethod) -> Vec<Option<f64>> {
    debug_assert_eq!(xs.len(), values.len());

    let present: Vec<(f64, f64)> = xs
        .iter()
        .zip(values.iter())
        .filter_map(|(&x, v)| v.map(|v| (x, v)))
        .collect();

    let needed = match method {
        InterpMethod::Linear => 2,
        InterpMethod::Poly2 => 3,
    };
    if present.len() < needed {
        return values.to_vec();
    }

    let first_x = present.first().map(|&(x, _)| x).unwrap_or(0.0);
    let last_x = present.last().map(|&(x, _)| x).unwrap_or(0.0);

    let poly = match method {
        InterpMethod::Poly2 => fit_poly2(&present),
        InterpMethod::Linear => None,
    };

    xs.iter()
        .zip(values.iter())
        .map(|(&x, v)| {
            if v.is_some() {
                return *v;
            }
            // Interior gaps only.
            if x <= first_x || x >= last_x {
                return None;
            }
            match method {
                InterpMethod::Linear => Some(linear_at(&present, x)),
                InterpMethod::Poly2 => poly.map(|[c0, c1, c2]| c0 + c1 * x + c2 * x * x),
            }
        })
        .collect()
}

fn linear_at(present: &[(f64, f64)], x: f64) -> f64 {
    // `present` is sorted by x; find the bracketing pair.
    let mut left = present[0];
    for &(px, pv) in present {
        if px > x {
            let (lx, lv) = left;
            let t = (x - lx) / (px - lx);
            return lv + t * (pv - lv);
        }
        left = (px, pv);
    }
    left.1
}

fn fit_poly2(present: &[(f64, f64)]) -> Option<[f64; 3]> {
    let n = present.len();
    let mut rows = Vec::with_capacity(n * 3);
    let mut ys = Vec::with_capacity(n);
    for &(x, y) in present {
        rows.extend_from_slice(&[1.0, x, x * x]);
        ys.push(y);
    }
    let x = DMatrix::from_row_slice(n, 3, &rows);
    let y = DVector::from_row_slice(&ys);
    let beta = solve_least_squares(&x, &y)?;
    Some([beta[0], beta[1], beta[2]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_fills_midpoint_exactly() {
        let xs = [0.0, 1.0, 2.0];
        let values = [Some(10.0), None, Some(20.0)];
        let filled = fill_missing(&xs, &values, InterpMethod::Linear);
        assert_eq!(filled, vec![Some(10.0), Some(15.0), Some(20.0)]);
    }

    #[test]
    fn poly2_recovers_points_on_a_quadratic() {
        // y = x^2 sampled at 0,1,3,4 with a gap at 2.
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let values = [Some(0.0), Some(1.0), None, Some(9.0), Some(16.0)];
        let filled = fill_missing(&xs, &values, InterpMethod::Poly2);
        let v = filled[2].unwrap();
        assert!((v - 4.0).abs() < 1e-8, "expected ~4.0, got {v}");
    }

    #[test]
    fn edges_are_not_extrapolated() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let values = [None, Some(1.0), Some(2.0), None];
        let filled = fill_missing(&xs, &values, InterpMethod::Linear);
        assert_eq!(filled[0], None);
        assert_eq!(filled[3], None);
        assert_eq!(filled[1], Some(1.0));
    }

    #[test]
    fn too_few_points_is_a_no_op() {
        let xs = [0.0, 1.0, 2.0];
        let values = [Some(5.0), None, None];
        let filled = fill_missing(&xs, &values, InterpMethod::Linear);
        assert_eq!(filled, values.to_vec());

        let values = [Some(5.0), None, Some(6.0)];
        let filled = fill_missing(&xs, &values, InterpMethod::Poly2);
        assert_eq!(filled, values.to_vec());
    }
}
