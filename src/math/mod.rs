//! Mathematical utilities: the exponential decay model and a least-squares step solver.

pub mod exp_model;
pub mod ols;

pub use exp_model::*;
pub use ols::*;
