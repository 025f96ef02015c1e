//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed by reference into every numerical component
//! - handed to reporting/plotting code without further processing
//! - built from partial JSON by embedding code (`#[serde(default)]`)

use serde::{Deserialize, Serialize};

use crate::solve::SolveError;

/// Reactor and dosing constants for one run.
///
/// Units: concentrations in mg/L, time in hours, flow in L/hr, rates in 1/hr.
/// The reactor volume is not stored; it is derived as `Q * t_target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    /// Initial pollutant concentration `C0`.
    pub c0: f64,
    /// Influent pollutant concentration `Cin`.
    pub c_in: f64,
    /// Flow rate `Q`.
    pub flow_rate: f64,
    /// Natural pollutant decay rate `k0`.
    pub k0: f64,
    /// Disinfectant effectiveness `alpha` (1/hr per mg/L).
    pub alpha: f64,
    /// Target contact time.
    pub t_target: f64,
    /// Target pollutant concentration at `t_target`.
    pub c_target: f64,
    /// Disinfectant self-decay rate `k_chl`.
    pub k_chl: f64,
    /// Advisory disinfectant safety limit. Reported, never enforced.
    pub u_limit: f64,
    /// Euler step size.
    pub dt: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            c0: 100.0,
            c_in: 20.0,
            flow_rate: 12_500_000.0,
            k0: 0.05,
            alpha: 0.05,
            t_target: 12.0,
            c_target: 10.0,
            k_chl: 0.14,
            u_limit: 5.0,
            dt: 0.01,
        }
    }
}

impl ModelParameters {
    /// Reactor volume `V = Q * t_target` (L).
    pub fn volume(&self) -> f64 {
        self.flow_rate * self.t_target
    }

    /// Advective exchange rate `Q / V` (1/hr).
    pub fn dilution_rate(&self) -> f64 {
        self.flow_rate / self.volume()
    }

    /// Effective pollutant decay rate `k0 + alpha * u`.
    pub fn effective_decay(&self, u: f64) -> f64 {
        self.k0 + self.alpha * u
    }

    /// Check that every constant is finite and physically meaningful.
    pub fn validate(&self) -> Result<(), SolveError> {
        let positive = [
            ("flow_rate", self.flow_rate),
            ("t_target", self.t_target),
            ("dt", self.dt),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SolveError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite and > 0",
                });
            }
        }

        let non_negative = [
            ("c0", self.c0),
            ("c_in", self.c_in),
            ("k0", self.k0),
            ("alpha", self.alpha),
            ("c_target", self.c_target),
            ("k_chl", self.k_chl),
            ("u_limit", self.u_limit),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SolveError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite and >= 0",
                });
            }
        }

        Ok(())
    }
}

/// One recorded point of the coupled pollutant/disinfectant system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub t: f64,
    /// Pollutant concentration.
    pub c: f64,
    /// Disinfectant concentration.
    pub u: f64,
}

/// Time series produced by a single integrator run.
///
/// The three columns always have equal length and at least one entry (the
/// initial condition at `t = 0`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    t: Vec<f64>,
    c: Vec<f64>,
    u: Vec<f64>,
}

impl Trajectory {
    /// Start a trajectory from its initial condition.
    pub fn starting_at(initial: SimulationState, capacity: usize) -> Self {
        let mut t = Vec::with_capacity(capacity);
        let mut c = Vec::with_capacity(capacity);
        let mut u = Vec::with_capacity(capacity);
        t.push(initial.t);
        c.push(initial.c);
        u.push(initial.u);
        Self { t, c, u }
    }

    pub fn push(&mut self, state: SimulationState) {
        self.t.push(state.t);
        self.c.push(state.c);
        self.u.push(state.u);
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn times(&self) -> &[f64] {
        &self.t
    }

    pub fn pollutant(&self) -> &[f64] {
        &self.c
    }

    pub fn disinfectant(&self) -> &[f64] {
        &self.u
    }

    pub fn state(&self, idx: usize) -> Option<SimulationState> {
        Some(SimulationState {
            t: *self.t.get(idx)?,
            c: *self.c.get(idx)?,
            u: *self.u.get(idx)?,
        })
    }

    /// Last recorded state.
    pub fn final_state(&self) -> SimulationState {
        let last = self.t.len() - 1;
        SimulationState {
            t: self.t[last],
            c: self.c[last],
            u: self.u[last],
        }
    }

    /// Peak disinfectant concentration over the run.
    pub fn peak_disinfectant(&self) -> f64 {
        self.u.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Termination status of an iterative root finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Tolerance met.
    Converged,
    /// Iteration budget exhausted; the result is a best-effort estimate.
    MaxIters,
}

impl Status {
    pub fn is_converged(self) -> bool {
        self == Status::Converged
    }
}

/// Best-fit coefficients of `C(t) = a*exp(-b*t) + c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// Parameter covariance estimate, ordered `(a, b, c)`.
    pub covariance: [[f64; 3]; 3],
    pub sse: f64,
    pub rmse: f64,
    /// Number of Levenberg-Marquardt iterations performed.
    pub iterations: usize,
    /// Number of observations used.
    pub n: usize,
}

impl FitResult {
    /// Evaluate the fitted curve at `t`.
    pub fn predict(&self, t: f64) -> f64 {
        crate::math::exp_decay(t, self.a, self.b, self.c)
    }

    /// One-sigma parameter uncertainties `sqrt(diag(covariance))`.
    pub fn std_errors(&self) -> [f64; 3] {
        [
            self.covariance[0][0].sqrt(),
            self.covariance[1][1].sqrt(),
            self.covariance[2][2].sqrt(),
        ]
    }
}

/// Time-to-target under the internal-decay model, plus a dense curve for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryDecayResult {
    pub t_root: f64,
    pub iterations: usize,
    pub status: Status,
    /// Sample times over `[0, horizon]`.
    pub times: Vec<f64>,
    /// Closed-form concentration at `times`, clamped at zero.
    pub concentrations: Vec<f64>,
}

/// Residuals around the calibrated dosage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub offset: f64,
    /// Residual at the calibrated dosage.
    pub residual: f64,
    /// Residual at `dosage - offset`.
    pub below: f64,
    /// Residual at `dosage + offset`.
    pub above: f64,
    /// Whether the residual changes sign across `[dosage - offset, dosage + offset]`.
    pub sign_change: bool,
}

/// Settings for the internal-decay (secondary) analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryDecayConfig {
    /// Quadratic internal-decay coefficient `D_int`.
    pub d_int: f64,
    /// Reactor volume as a multiple of `Q` (`V_new = Q * v_new_factor`).
    pub v_new_factor: f64,
    /// Newton-Raphson initial guess.
    pub t0: f64,
    pub tol: f64,
    pub max_iter: usize,
    /// End of the sampled reporting curve.
    pub horizon: f64,
    pub samples: usize,
}

impl Default for SecondaryDecayConfig {
    fn default() -> Self {
        Self {
            d_int: 0.01,
            v_new_factor: 12.0,
            t0: 10.0,
            tol: 1e-6,
            max_iter: 100,
            horizon: 30.0,
            samples: 500,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Dosage bracket passed to bisection.
    pub bracket: [f64; 2],
    pub bisection_tol: f64,
    pub bisection_max_iter: usize,
    /// Dosage offset used by the verification step.
    pub verify_offset: f64,
    /// Length of the reporting simulation.
    pub report_horizon: f64,
    /// Initial guess `(a, b, c)` for the exponential fit.
    pub fit_guess: [f64; 3],
    pub secondary: SecondaryDecayConfig,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    /// Keep every n-th simulated sample in the regression overlay.
    pub plot_skip: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bracket: [0.0, 20.0],
            bisection_tol: 1e-6,
            bisection_max_iter: 50,
            verify_offset: 0.1,
            report_horizon: 24.0,
            fit_guess: [100.0, 0.1, 0.0],
            secondary: SecondaryDecayConfig::default(),
            plot: true,
            plot_width: 72,
            plot_height: 18,
            plot_skip: 50,
        }
    }
}
