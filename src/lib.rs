//! `chlorine-dose` library crate.
//!
//! Models pollutant decay in a continuous-flow reactor dosed with chlorine,
//! calibrates the minimum dosage that meets a target concentration within a
//! fixed contact time, and estimates time-to-target once a secondary internal
//! decay term is added.
//!
//! The binary (`dose`) is a thin wrapper around this library so that:
//!
//! - the numerical core is testable without spawning processes
//! - reporting and plotting stay separate from the math
//!
//! Data flow:
//!
//! ```text
//! reactor::ResidualObjective -> solve::bisection -> dosage
//! dosage -> reactor::Integrator -> Trajectory -> fit::fit_exponential
//! dosage -> models::SecondaryDecayModel -> solve::newton_raphson
//! ```

pub mod app;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod models;
pub mod plot;
pub mod reactor;
pub mod report;
pub mod solve;
