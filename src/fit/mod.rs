//! Curve fitting.
//!
//! Responsibilities:
//!
//! - fit `C(t) = a*exp(-b*t) + c` to a simulated pollutant series
//! - estimate the parameter covariance at the optimum
//! - surface non-convergence as an error instead of a silent best guess

pub mod fitter;

pub use fitter::*;
