//! Calibration objective: pollutant error at the target contact time.
//!
//! `residual(u_in) = C(t_target; u_in) - C_target`
//!
//! Every evaluation runs a full fixed-step simulation, so one call costs
//! `O(t_target / dt)` steps. The root of this function in dosage space is the
//! minimum dosage that meets the target.

use crate::domain::ModelParameters;
use crate::reactor::Integrator;
use crate::solve::SolveError;

/// Scalar function of dosage suitable for [`bisection`](crate::solve::bisection).
///
/// Holds no state between calls; repeated evaluations at the same dosage
/// return the same bits.
#[derive(Debug, Clone, Copy)]
pub struct ResidualObjective<'a> {
    integrator: Integrator<'a>,
}

impl<'a> ResidualObjective<'a> {
    /// # Errors
    ///
    /// Returns [`SolveError::InvalidParameter`] if `params` fails validation.
    pub fn new(params: &'a ModelParameters) -> Result<Self, SolveError> {
        Ok(Self {
            integrator: Integrator::new(params)?,
        })
    }

    /// `C_final - C_target` after simulating `[0, t_target]` at dosage `u_in`.
    ///
    /// A negative dosage is simulated as given; the first step clamps the
    /// disinfectant back to zero.
    pub fn eval(&self, u_in: f64) -> f64 {
        let p = self.integrator.params();
        let last = self.integrator.final_state(u_in, p.t_target, p.dt);
        last.c - p.c_target
    }
}

/// One-shot residual evaluation.
///
/// # Errors
///
/// Returns [`SolveError::InvalidParameter`] if `params` fails validation.
pub fn residual(params: &ModelParameters, u_in: f64) -> Result<f64, SolveError> {
    Ok(ResidualObjective::new(params)?.eval(u_in))
}
