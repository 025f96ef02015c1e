use thiserror::Error;

/// Hard failures of the numerical core.
///
/// Running out of iterations is not an error: solvers report it through
/// [`Status::MaxIters`](crate::domain::Status) on their solution instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("f(a) and f(b) must have opposite signs: f({a})={fa}, f({b})={fb}")]
    InvalidBracket { a: f64, b: f64, fa: f64, fb: f64 },

    #[error("derivative is zero at x = {x} (iteration {iteration})")]
    ZeroDerivative { x: f64, iteration: usize },

    #[error("curve fit did not converge: {reason}")]
    FitDidNotConverge { reason: String },

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl SolveError {
    pub(crate) fn fit(reason: impl Into<String>) -> Self {
        Self::FitDidNotConverge {
            reason: reason.into(),
        }
    }

    pub(crate) fn input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
