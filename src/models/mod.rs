//! Closed-form pollutant models that sit beside the ODE simulation.
//!
//! Models are small, pure functions of the calibrated dosage so that root
//! finding and reporting code can stay generic.

pub mod secondary;

pub use secondary::*;
