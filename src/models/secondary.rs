//! Pollutant decay with an added quadratic internal-decay term.
//!
//! Holding the disinfectant at the calibrated dosage, the pollutant approaches
//! its asymptote exponentially. A secondary loss mechanism that the coupled
//! ODE does not capture is modelled as a `D_int * t^2` penalty:
//!
//! ```text
//! r     = Q / (Q * V_new_factor)
//! k_eff = k0 + alpha * u_in
//! A     = r * Cin / (r + k_eff)
//! B     = C0 - A
//! k     = r + k_eff
//!
//! C(t)  = A + B * exp(-k t) - D_int * t^2
//! f(t)  = C(t) - C_target
//! f'(t) = -B k exp(-k t) - 2 D_int t
//! ```
//!
//! The time-to-target is the root of `f`, found with Newton-Raphson.

use log::info;

use crate::domain::{ModelParameters, SecondaryDecayConfig, SecondaryDecayResult};
use crate::solve::{NewtonConfig, NewtonSolution, SolveError, newton_raphson};

/// Coefficients of the closed-form internal-decay model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondaryDecayModel {
    /// Asymptote of the exponential part.
    pub a: f64,
    /// Initial excess over the asymptote.
    pub b: f64,
    /// Combined approach rate.
    pub k: f64,
    pub d_int: f64,
    pub c_target: f64,
}

impl SecondaryDecayModel {
    /// Derive the model coefficients at dosage `u_in`.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::InvalidParameter`] for invalid `params`, a
    /// non-positive `v_new_factor` or a non-finite `d_int`.
    pub fn new(
        params: &ModelParameters,
        u_in: f64,
        config: &SecondaryDecayConfig,
    ) -> Result<Self, SolveError> {
        params.validate()?;
        if !(config.v_new_factor.is_finite() && config.v_new_factor > 0.0) {
            return Err(SolveError::InvalidParameter {
                name: "v_new_factor",
                value: config.v_new_factor,
                reason: "must be finite and > 0",
            });
        }
        if !config.d_int.is_finite() {
            return Err(SolveError::InvalidParameter {
                name: "d_int",
                value: config.d_int,
                reason: "must be finite",
            });
        }

        let v_new = params.flow_rate * config.v_new_factor;
        let r = params.flow_rate / v_new;
        let k_eff = params.effective_decay(u_in);
        let a = r * params.c_in / (r + k_eff);

        Ok(Self {
            a,
            b: params.c0 - a,
            k: r + k_eff,
            d_int: config.d_int,
            c_target: params.c_target,
        })
    }

    /// `C(t)`, unclamped.
    pub fn concentration(&self, t: f64) -> f64 {
        self.a + self.b * (-self.k * t).exp() - self.d_int * t * t
    }

    /// `f(t) = C(t) - C_target`.
    pub fn residual(&self, t: f64) -> f64 {
        self.concentration(t) - self.c_target
    }

    /// Exact derivative of [`SecondaryDecayModel::residual`].
    pub fn derivative(&self, t: f64) -> f64 {
        -self.b * self.k * (-self.k * t).exp() - 2.0 * self.d_int * t
    }

    /// Root of `f` by Newton-Raphson from `t0`.
    ///
    /// # Errors
    ///
    /// Propagates [`SolveError::ZeroDerivative`].
    pub fn time_to_target(&self, t0: f64, config: &NewtonConfig) -> Result<NewtonSolution, SolveError> {
        newton_raphson(|t| self.residual(t), |t| self.derivative(t), t0, config)
    }

    /// Closed-form root for the pure exponential approach (`D_int` ignored).
    ///
    /// `None` when the target lies outside the range the exponential sweeps.
    pub fn exponential_time_to_target(&self) -> Option<f64> {
        let ratio = (self.c_target - self.a) / self.b;
        if ratio > 0.0 && ratio.is_finite() {
            Some(-ratio.ln() / self.k)
        } else {
            None
        }
    }

    /// `samples` evenly spaced points over `[0, horizon]` (endpoints included),
    /// with the concentration clamped at zero.
    pub fn sample_curve(&self, horizon: f64, samples: usize) -> (Vec<f64>, Vec<f64>) {
        let times: Vec<f64> = match samples {
            0 => Vec::new(),
            1 => vec![0.0],
            n => (0..n)
                .map(|i| horizon * i as f64 / (n - 1) as f64)
                .collect(),
        };
        let concentrations = times
            .iter()
            .map(|&t| self.concentration(t).max(0.0))
            .collect();
        (times, concentrations)
    }
}

/// Time to reach `C_target` at dosage `u_in` once internal decay is included.
///
/// # Errors
///
/// Fails on invalid parameters or a zero derivative during Newton-Raphson.
/// Non-convergence is reported through the result's `status`.
pub fn time_to_target_with_internal_decay(
    params: &ModelParameters,
    u_in: f64,
    config: &SecondaryDecayConfig,
) -> Result<SecondaryDecayResult, SolveError> {
    let model = SecondaryDecayModel::new(params, u_in, config)?;
    let newton = NewtonConfig {
        tol: config.tol,
        max_iter: config.max_iter,
    };
    let solution = model.time_to_target(config.t0, &newton)?;
    info!(
        "Time to reach C_target with internal decay (Newton-Raphson): {:.4} hr",
        solution.root
    );

    let (times, concentrations) = model.sample_curve(config.horizon, config.samples);

    Ok(SecondaryDecayResult {
        t_root: solution.root,
        iterations: solution.iterations,
        status: solution.status,
        times,
        concentrations,
    })
}
