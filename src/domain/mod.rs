//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - process parameters (`ModelParameters`) and run settings (`PipelineConfig`)
//! - simulation output (`SimulationState`, `Trajectory`)
//! - fit and solver outputs (`FitResult`, `SecondaryDecayResult`, `Status`)

pub mod types;

pub use types::*;
