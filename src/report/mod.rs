//! Reporting utilities: formatted terminal output for a calibration run.
//!
//! We keep formatting code in one place so:
//! - the numerical code stays free of presentation concerns
//! - output changes are localized (important for snapshot tests)

mod format;

pub use format::*;
