//! Terminal plots for a calibration run.

mod ascii;
mod figures;

pub use ascii::{Figure, Glyph, RefLine, Series, render_figure};
pub use figures::*;
