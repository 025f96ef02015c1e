//! Least squares step solver.
//!
//! The curve fitter repeatedly solves small, tall linear systems of the form:
//!
//! ```text
//! minimize || J δ - r ||^2
//! ```
//!
//! where `J` is the model Jacobian (optionally stacked with damping rows).
//!
//! Implementation choices:
//! - SVD rather than normal equations, so a nearly rank-deficient Jacobian
//!   (e.g. `a ≈ 0` zeroes the `b` column) degrades gracefully.
//! - Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices, so it is not used here.
//! - The parameter dimension is 3, so SVD cost is negligible next to the
//!   simulation that produced the data.

use nalgebra::{DMatrix, DVector};

/// Progressively looser singular-value cutoffs.
const SVD_CUTOFFS: [f64; 3] = [1e-12, 1e-10, 1e-8];

/// Minimise `|| a x - b ||` via SVD.
///
/// Returns `None` when no cutoff yields a finite solution.
pub fn solve_least_squares(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = a.clone().svd(true, true);

    SVD_CUTOFFS.iter().find_map(|&eps| {
        svd.solve(b, eps)
            .ok()
            .filter(|x| x.iter().all(|v| v.is_finite()))
    })
}
