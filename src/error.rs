//! Application-level error carrying a process exit code.
//!
//! Numerical failures are typed as [`SolveError`]; at the application
//! boundary they are folded into an [`AppError`] so `main` only needs one
//! path to stderr and the exit status.
//!
//! Exit codes:
//! - `2`: invalid parameters or inputs
//! - `4`: numerical failure (bracket, derivative, fit)

use crate::solve::SolveError;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<SolveError> for AppError {
    fn from(err: SolveError) -> Self {
        let exit_code = match err {
            SolveError::InvalidParameter { .. } | SolveError::InvalidInput { .. } => 2,
            SolveError::InvalidBracket { .. }
            | SolveError::ZeroDerivative { .. }
            | SolveError::FitDidNotConverge { .. } => 4,
        };
        Self::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
