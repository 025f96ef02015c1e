//! Continuous-flow reactor model.
//!
//! Two coupled quantities evolve under mixing with the inflow:
//!
//! ```text
//! k_eff = k0 + alpha * u
//! dC/dt = (Q/V) * (Cin - C) - k_eff * C
//! du/dt = (Q/V) * (u_in - u) - k_chl * u
//! ```
//!
//! - [`integrator`]: fixed-step forward Euler over `[0, t_end]`
//! - [`residual`]: final-concentration error as a scalar function of dosage

pub mod integrator;
pub mod residual;

pub use integrator::*;
pub use residual::*;
