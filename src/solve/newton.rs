//! Newton-Raphson root finder.
//!
//! Uses the classic update `x_new = x - f(x) / df(x)` and stops once two
//! successive iterates are closer than `tol`. The derivative must be supplied
//! analytically; there is no finite-difference fallback.

use log::{debug, info, warn};

use crate::domain::Status;
use crate::solve::SolveError;

/// Configuration for [`newton_raphson`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonConfig {
    /// Stop once `|x_new - x| < tol`.
    pub tol: f64,
    pub max_iter: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            tol: 1e-6,
            max_iter: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonSolution {
    pub root: f64,
    /// Iterations used; equals `max_iter` when the solver gave up.
    pub iterations: usize,
    pub status: Status,
}

/// Solve `f(x) = 0` starting from `x0`.
///
/// # Errors
///
/// Returns [`SolveError::ZeroDerivative`] if `df` is exactly zero at any
/// iterate. No perturbation or retry is attempted.
pub fn newton_raphson<F, D>(
    mut f: F,
    mut df: D,
    x0: f64,
    config: &NewtonConfig,
) -> Result<NewtonSolution, SolveError>
where
    F: FnMut(f64) -> f64,
    D: FnMut(f64) -> f64,
{
    let mut x = x0;

    for i in 0..config.max_iter {
        let iteration = i + 1;
        let fx = f(x);
        let dfx = df(x);

        #[allow(clippy::float_cmp)]
        if dfx == 0.0 {
            return Err(SolveError::ZeroDerivative { x, iteration });
        }

        let x_new = x - fx / dfx;
        debug!("newton iter={iteration} x={x} f={fx:e} df={dfx:e} x_new={x_new}");

        if (x_new - x).abs() < config.tol {
            info!("Newton-Raphson converged after {iteration} iterations");
            return Ok(NewtonSolution {
                root: x_new,
                iterations: iteration,
                status: Status::Converged,
            });
        }

        x = x_new;
    }

    warn!(
        "Newton-Raphson did not converge in {} iterations; last iterate {x}",
        config.max_iter
    );

    Ok(NewtonSolution {
        root: x,
        iterations: config.max_iter,
        status: Status::MaxIters,
    })
}
