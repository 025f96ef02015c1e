//! Scalar root finders.
//!
//! Both solvers are generic over plain closures and know nothing about the
//! reactor; the calibration code adapts the simulation into an `f64 -> f64`
//! objective before handing it over.
//!
//! - [`bisection`]: bracketing, needs a sign change across `[a, b]`
//! - [`newton_raphson`]: derivative-based, needs an analytic `df`

pub mod bisection;
pub mod error;
pub mod newton;

pub use bisection::*;
pub use error::SolveError;
pub use newton::*;
