//! Levenberg-Marquardt fit of the exponential decay model.
//!
//! Given samples `(t_i, C_i)` we minimize
//!
//! ```text
//! SSE(a, b, c) = Σ (C_i - a*exp(-b*t_i) - c)^2
//! ```
//!
//! Each iteration linearizes the model around the current parameters and
//! solves the damped system
//!
//! ```text
//! [ J              ]       [ r ]
//! [ sqrt(λ) * D    ] δ  ≈  [ 0 ]      D = diag(sqrt(diag(JᵀJ)))
//! ```
//!
//! with the SVD solver from `math::ols`. Accepted steps shrink λ by 10,
//! rejected ones grow it by 10.
//!
//! The covariance follows the unweighted curve-fit convention
//! `inv(JᵀJ) * SSE / (n - p)`; with `n <= p` it is reported as `+inf`.

use log::{debug, info};
use nalgebra::{DMatrix, DVector, Vector3};

use crate::domain::FitResult;
use crate::math::{exp_decay, exp_decay_gradient, solve_least_squares};
use crate::solve::SolveError;

/// Number of model parameters `(a, b, c)`.
const N_PARAMS: usize = 3;

/// Relative SSE reduction / step size below which the fit is converged.
pub const DEFAULT_TOL: f64 = 1.49012e-8;

const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_MIN: f64 = 1e-15;
const LAMBDA_MAX: f64 = 1e15;

/// Fitting options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Starting point `(a0, b0, c0)`.
    pub initial_guess: [f64; 3],
    /// Converged once an accepted step reduces SSE by less than `ftol * SSE`.
    pub ftol: f64,
    /// Converged once `|δ| <= xtol * (|p| + xtol)`.
    pub xtol: f64,
    pub max_iter: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            initial_guess: [100.0, 0.1, 0.0],
            ftol: DEFAULT_TOL,
            xtol: DEFAULT_TOL,
            max_iter: 200 * (N_PARAMS + 1),
        }
    }
}

/// Fit `C(t) = a*exp(-b*t) + c` starting from `(100, 0.1, 0)`.
///
/// # Errors
///
/// - [`SolveError::InvalidInput`] for mismatched or non-finite data, or fewer
///   than three points
/// - [`SolveError::FitDidNotConverge`] for a singular Jacobian, runaway
///   damping, or an exhausted iteration budget
pub fn fit_exponential(t_vals: &[f64], c_vals: &[f64]) -> Result<FitResult, SolveError> {
    fit_exponential_with(t_vals, c_vals, &FitOptions::default())
}

/// [`fit_exponential`] with explicit options.
///
/// # Errors
///
/// See [`fit_exponential`].
pub fn fit_exponential_with(
    t_vals: &[f64],
    c_vals: &[f64],
    opts: &FitOptions,
) -> Result<FitResult, SolveError> {
    validate_series(t_vals, c_vals)?;
    if opts.initial_guess.iter().any(|v| !v.is_finite()) {
        return Err(SolveError::input("initial guess must be finite"));
    }

    let mut p = Vector3::from(opts.initial_guess);
    let mut sse = sum_squared_residuals(t_vals, c_vals, &p);
    if !sse.is_finite() {
        return Err(SolveError::fit("non-finite residuals at the initial guess"));
    }

    let mut lambda = LAMBDA_INIT;

    for iter in 1..=opts.max_iter {
        if sse == 0.0 {
            return finish(t_vals, c_vals, p, sse, iter - 1);
        }

        let (jac, r) = linearize(t_vals, c_vals, &p);
        let delta = damped_step(&jac, &r, lambda)
            .ok_or_else(|| SolveError::fit("singular Jacobian: damped step has no solution"))?;

        let trial = p + delta;
        let trial_sse = sum_squared_residuals(t_vals, c_vals, &trial);
        let improved = trial_sse.is_finite() && trial_sse < sse;
        let small_step = delta.norm() <= opts.xtol * (p.norm() + opts.xtol);

        debug!(
            "lm iter={iter} lambda={lambda:e} sse={sse:e} trial_sse={trial_sse:e} |δ|={:e}",
            delta.norm()
        );

        if improved {
            let reduction = sse - trial_sse;
            let previous = sse;
            p = trial;
            sse = trial_sse;

            if lambda <= 1.0 && (reduction <= opts.ftol * previous || small_step) {
                return finish(t_vals, c_vals, p, sse, iter);
            }
            lambda = (lambda / 10.0).max(LAMBDA_MIN);
        } else {
            // A rejected step only means "stationary" if the undamped step is negligible too.
            let gauss_newton = damped_step(&jac, &r, 0.0)
                .ok_or_else(|| SolveError::fit("singular Jacobian: Gauss-Newton step has no solution"))?;
            if gauss_newton.norm() <= opts.xtol * (p.norm() + opts.xtol) {
                return finish(t_vals, c_vals, p, sse, iter);
            }
            lambda = grow_damping(lambda, sse)?;
        }
    }

    Err(SolveError::fit(format!(
        "no convergence within {} iterations (sse={sse:e})",
        opts.max_iter
    )))
}

fn grow_damping(lambda: f64, sse: f64) -> Result<f64, SolveError> {
    let next = lambda * 10.0;
    if next > LAMBDA_MAX {
        return Err(SolveError::fit(format!(
            "damping exceeded {LAMBDA_MAX:e} without reducing SSE (sse={sse:e})"
        )));
    }
    Ok(next)
}

fn validate_series(t_vals: &[f64], c_vals: &[f64]) -> Result<(), SolveError> {
    if t_vals.len() != c_vals.len() {
        return Err(SolveError::input(format!(
            "time and concentration series differ in length ({} vs {})",
            t_vals.len(),
            c_vals.len()
        )));
    }
    if t_vals.len() < N_PARAMS {
        return Err(SolveError::input(format!(
            "need at least {N_PARAMS} data points to fit, got {}",
            t_vals.len()
        )));
    }
    if t_vals.iter().chain(c_vals).any(|v| !v.is_finite()) {
        return Err(SolveError::input("data contains non-finite values"));
    }
    Ok(())
}

fn sum_squared_residuals(t_vals: &[f64], c_vals: &[f64], p: &Vector3<f64>) -> f64 {
    t_vals
        .iter()
        .zip(c_vals)
        .map(|(&t, &c)| {
            let r = c - exp_decay(t, p[0], p[1], p[2]);
            r * r
        })
        .sum()
}

/// Model Jacobian and residual vector `r = C - model` at `p`.
fn linearize(t_vals: &[f64], c_vals: &[f64], p: &Vector3<f64>) -> (DMatrix<f64>, DVector<f64>) {
    let n = t_vals.len();
    let mut jac = DMatrix::<f64>::zeros(n, N_PARAMS);
    let mut r = DVector::<f64>::zeros(n);

    for (i, (&t, &c)) in t_vals.iter().zip(c_vals).enumerate() {
        let row = exp_decay_gradient(t, p[0], p[1]);
        for (j, &g) in row.iter().enumerate() {
            jac[(i, j)] = g;
        }
        r[i] = c - exp_decay(t, p[0], p[1], p[2]);
    }

    (jac, r)
}

fn damped_step(jac: &DMatrix<f64>, r: &DVector<f64>, lambda: f64) -> Option<Vector3<f64>> {
    let n = jac.nrows();
    let mut x = DMatrix::<f64>::zeros(n + N_PARAMS, N_PARAMS);
    let mut y = DVector::<f64>::zeros(n + N_PARAMS);

    x.rows_mut(0, n).copy_from(jac);
    y.rows_mut(0, n).copy_from(r);

    let sqrt_lambda = lambda.sqrt();
    for j in 0..N_PARAMS {
        x[(n + j, j)] = sqrt_lambda * jac.column(j).norm();
    }

    let delta = solve_least_squares(&x, &y)?;
    Some(Vector3::new(delta[0], delta[1], delta[2]))
}

fn finish(
    t_vals: &[f64],
    c_vals: &[f64],
    p: Vector3<f64>,
    sse: f64,
    iterations: usize,
) -> Result<FitResult, SolveError> {
    let n = t_vals.len();
    let (jac, _) = linearize(t_vals, c_vals, &p);

    let singular_values = jac.clone().svd(false, false).singular_values;
    let s_max = singular_values.max();
    let s_min = singular_values.min();
    if !(s_min > s_max * f64::EPSILON * n as f64) {
        return Err(SolveError::fit(format!(
            "singular Jacobian at the optimum (σ_min={s_min:e}, σ_max={s_max:e})"
        )));
    }

    let jtj = jac.transpose() * &jac;
    let inv = jtj
        .try_inverse()
        .ok_or_else(|| SolveError::fit("JᵀJ is not invertible at the optimum"))?;

    let covariance = if n > N_PARAMS {
        inv * (sse / (n - N_PARAMS) as f64)
    } else {
        DMatrix::from_element(N_PARAMS, N_PARAMS, f64::INFINITY)
    };

    let mut cov = [[0.0; 3]; 3];
    for (i, row) in cov.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = covariance[(i, j)];
        }
    }

    let fit = FitResult {
        a: p[0],
        b: p[1],
        c: p[2],
        covariance: cov,
        sse,
        rmse: (sse / n as f64).sqrt(),
        iterations,
        n,
    };
    info!(
        "Fitted parameters: a={:.3}, b={:.4}, c={:.3} ({} iterations)",
        fit.a, fit.b, fit.c, fit.iterations
    );
    Ok(fit)
}
