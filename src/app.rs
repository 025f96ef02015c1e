//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs the terminal logger
//! - runs the calibration pipeline with the built-in constants
//! - prints the report and plots

use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

use crate::domain::{ModelParameters, PipelineConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `dose` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();

    let params = ModelParameters::default();
    let config = PipelineConfig::default();
    let run = pipeline::run_pipeline(&params, &config)?;

    println!("{}", crate::report::format_run_summary(&run, &params));

    if config.plot {
        println!("{}", crate::plot::render_run_plots(&run, &params, &config));
    }

    Ok(())
}

fn init_logging() {
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    // A logger may already be installed when the library is embedded.
    let _ = TermLogger::init(LevelFilter::Info, config, TerminalMode::Stderr, ColorChoice::Auto);
}
