//! Forward Euler integration of the coupled pollutant/disinfectant system.
//!
//! Each step uses the derivatives of the *current* state for both updates,
//! then clamps both concentrations at zero:
//!
//! ```text
//! C_{n+1} = max(C_n + dt * dC/dt(C_n, u_n), 0)
//! u_{n+1} = max(u_n + dt * du/dt(u_n),      0)
//! t_{n+1} = t_n + dt
//! ```
//!
//! The loop runs while `t < t_end`. Because `t` accumulates by repeated
//! addition, the last recorded time can overshoot `t_end` by up to one `dt`.

use crate::domain::{ModelParameters, SimulationState, Trajectory};
use crate::solve::SolveError;

/// Fixed-step explicit integrator bound to one parameter set.
#[derive(Debug, Clone, Copy)]
pub struct Integrator<'a> {
    params: &'a ModelParameters,
}

impl<'a> Integrator<'a> {
    /// # Errors
    ///
    /// Returns [`SolveError::InvalidParameter`] if `params` fails validation.
    pub fn new(params: &'a ModelParameters) -> Result<Self, SolveError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &'a ModelParameters {
        self.params
    }

    /// Time derivatives `(dC/dt, du/dt)` at `state` for dosage `u_in`.
    pub fn derivatives(&self, state: &SimulationState, u_in: f64) -> (f64, f64) {
        let p = self.params;
        let r = p.dilution_rate();
        let k_eff = p.effective_decay(state.u);
        let dc = r * (p.c_in - state.c) - k_eff * state.c;
        let du = r * (u_in - state.u) - p.k_chl * state.u;
        (dc, du)
    }

    /// Simulate `[0, t_end]` with the configured step `params.dt`.
    ///
    /// # Errors
    ///
    /// See [`Integrator::run_with_step`].
    pub fn run(&self, u_in: f64, t_end: f64) -> Result<Trajectory, SolveError> {
        self.run_with_step(u_in, t_end, self.params.dt)
    }

    /// Simulate `[0, t_end]` with an explicit step size.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::InvalidInput`] unless `t_end > 0`, `dt > 0` and
    /// `u_in >= 0`, all finite.
    pub fn run_with_step(&self, u_in: f64, t_end: f64, dt: f64) -> Result<Trajectory, SolveError> {
        check_run_inputs(u_in, t_end, dt)?;

        let initial = self.initial_state(u_in);
        let capacity = (t_end / dt).ceil() as usize + 2;
        let mut trajectory = Trajectory::starting_at(initial, capacity);

        let mut state = initial;
        while state.t < t_end {
            state = self.step(&state, u_in, dt);
            trajectory.push(state);
        }

        Ok(trajectory)
    }

    /// Final state of the same stepping sequence as [`Integrator::run_with_step`],
    /// without materializing the trajectory. Inputs are not re-checked.
    pub(crate) fn final_state(&self, u_in: f64, t_end: f64, dt: f64) -> SimulationState {
        let mut state = self.initial_state(u_in);
        while state.t < t_end {
            state = self.step(&state, u_in, dt);
        }
        state
    }

    fn initial_state(&self, u_in: f64) -> SimulationState {
        SimulationState {
            t: 0.0,
            c: self.params.c0,
            u: u_in,
        }
    }

    fn step(&self, state: &SimulationState, u_in: f64, dt: f64) -> SimulationState {
        let (dc, du) = self.derivatives(state, u_in);
        SimulationState {
            t: state.t + dt,
            c: (state.c + dc * dt).max(0.0),
            u: (state.u + du * dt).max(0.0),
        }
    }
}

/// Run one simulation: `integrate(u_in, t_end, dt) -> Trajectory`.
///
/// # Errors
///
/// Fails on invalid parameters or run inputs; see [`Integrator`].
pub fn integrate(
    params: &ModelParameters,
    u_in: f64,
    t_end: f64,
    dt: f64,
) -> Result<Trajectory, SolveError> {
    Integrator::new(params)?.run_with_step(u_in, t_end, dt)
}

fn check_run_inputs(u_in: f64, t_end: f64, dt: f64) -> Result<(), SolveError> {
    if !(t_end.is_finite() && t_end > 0.0) {
        return Err(SolveError::input(format!("t_end must be finite and > 0, got {t_end}")));
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SolveError::input(format!("dt must be finite and > 0, got {dt}")));
    }
    if !(u_in.is_finite() && u_in >= 0.0) {
        return Err(SolveError::input(format!("u_in must be finite and >= 0, got {u_in}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn params() -> ModelParameters {
        ModelParameters::default()
    }

    #[test]
    fn trajectory_starts_at_initial_condition() {
        let p = params();
        let traj = integrate(&p, 2.5, 12.0, 0.01).unwrap();
        assert_eq!(
            traj.state(0),
            Some(SimulationState { t: 0.0, c: 100.0, u: 2.5 })
        );
        assert_eq!(traj.times().len(), traj.pollutant().len());
        assert_eq!(traj.times().len(), traj.disinfectant().len());
    }

    #[test]
    fn times_increase_and_concentrations_stay_non_negative() {
        let p = params();
        for &(u_in, t_end, dt) in &[(0.0, 5.0, 0.1), (20.0, 24.0, 0.01), (3.0, 1.0, 0.3)] {
            let traj = integrate(&p, u_in, t_end, dt).unwrap();
            assert!(traj.times().windows(2).all(|w| w[1] > w[0]));
            assert!(traj.pollutant().iter().all(|&c| c >= 0.0));
            assert!(traj.disinfectant().iter().all(|&u| u >= 0.0));
        }
    }

    #[test]
    fn final_time_overshoots_by_at_most_one_step() {
        let p = params();
        let dt = 0.3;
        let traj = integrate(&p, 1.0, 1.0, dt).unwrap();
        let t_last = traj.final_state().t;
        assert!(t_last >= 1.0);
        assert!(t_last < 1.0 + dt + 1e-12);
        // 0.3, 0.6, 0.9, 1.2
        assert_eq!(traj.len(), 5);
    }

    #[test]
    fn single_step_uses_pre_update_state() {
        let p = params();
        let traj = integrate(&p, 2.0, 0.5, 0.5).unwrap();
        assert_eq!(traj.len(), 2);

        let s1 = traj.final_state();
        // dC/dt = (1/12)(20 - 100) - (0.05 + 0.05*2)*100
        let dc = (20.0 - 100.0) / 12.0 - 0.15 * 100.0;
        // du/dt = (1/12)(2 - 2) - 0.14*2
        let du = -0.28;
        assert_relative_eq!(s1.c, 100.0 + 0.5 * dc, epsilon = 1e-12);
        assert_relative_eq!(s1.u, 2.0 + 0.5 * du, epsilon = 1e-12);
        assert_relative_eq!(s1.t, 0.5);
    }

    #[test]
    fn oversized_step_is_clamped_at_zero() {
        let p = params();
        let traj = integrate(&p, 0.0, 10.0, 10.0).unwrap();
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.final_state().c, 0.0);
        assert_eq!(traj.final_state().u, 0.0);
    }

    #[test]
    fn identical_inputs_give_bit_identical_runs() {
        let p = params();
        let a = integrate(&p, 2.7, 24.0, 0.01).unwrap();
        let b = integrate(&p, 2.7, 24.0, 0.01).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn final_state_matches_materialized_run() {
        let p = params();
        let integrator = Integrator::new(&p).unwrap();
        let traj = integrator.run(4.2, 12.0).unwrap();
        let last = integrator.final_state(4.2, 12.0, p.dt);
        assert_eq!(traj.final_state(), last);
    }

    #[test]
    fn long_run_settles_on_analytic_fixed_point() {
        let p = params();
        let u_in = 3.0;
        let traj = integrate(&p, u_in, 400.0, 0.01).unwrap();

        let r = p.dilution_rate();
        let u_ss = r * u_in / (r + p.k_chl);
        let k_eff = p.effective_decay(u_ss);
        let c_ss = r * p.c_in / (r + k_eff);

        let last = traj.final_state();
        assert_relative_eq!(last.u, u_ss, epsilon = 1e-9);
        assert_relative_eq!(last.c, c_ss, epsilon = 1e-9);
    }

    #[test]
    fn rejects_non_positive_horizon_and_step() {
        let p = params();
        assert!(matches!(
            integrate(&p, 1.0, 0.0, 0.01),
            Err(SolveError::InvalidInput { .. })
        ));
        assert!(matches!(
            integrate(&p, 1.0, 12.0, -0.01),
            Err(SolveError::InvalidInput { .. })
        ));
        assert!(matches!(
            integrate(&p, f64::NAN, 12.0, 0.01),
            Err(SolveError::InvalidInput { .. })
        ));
    }

    #[test]
    fn rejects_invalid_parameters() {
        let p = ModelParameters {
            flow_rate: 0.0,
            ..params()
        };
        assert!(matches!(
            Integrator::new(&p),
            Err(SolveError::InvalidParameter { name: "flow_rate", .. })
        ));
    }
}
