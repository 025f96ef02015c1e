//! Interval-halving root finder.
//!
//! The iteration mirrors the textbook method:
//!
//! ```text
//! c = (a + b) / 2
//! |f(c)| < tol           -> done
//! f(c) * f(a) < 0        -> b = c
//! otherwise              -> a = c
//! ```
//!
//! Every midpoint is recorded so callers can plot convergence. Running out of
//! iterations is reported through [`Status::MaxIters`], not as an error.

use log::{debug, warn};

use crate::domain::Status;
use crate::solve::SolveError;

/// Configuration for [`bisection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BisectionConfig {
    /// Stop once `|f(c)| < tol`.
    pub tol: f64,
    pub max_iter: usize,
}

impl Default for BisectionConfig {
    fn default() -> Self {
        Self {
            tol: 1e-6,
            max_iter: 50,
        }
    }
}

/// Root estimate plus the midpoint visited at each iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct BisectionSolution {
    pub root: f64,
    pub trace: Vec<f64>,
    pub status: Status,
}

impl BisectionSolution {
    pub fn iterations(&self) -> usize {
        self.trace.len()
    }
}

/// Find a root of `f` inside `bracket = [a, b]`.
///
/// # Errors
///
/// Returns [`SolveError::InvalidBracket`] unless `f(a) * f(b) < 0`. The check
/// runs once, before the first iteration.
pub fn bisection<F>(
    mut f: F,
    bracket: [f64; 2],
    config: &BisectionConfig,
) -> Result<BisectionSolution, SolveError>
where
    F: FnMut(f64) -> f64,
{
    let [mut a, mut b] = bracket;

    let fa = f(a);
    let fb = f(b);
    // Written as a negation so a NaN product is rejected too.
    if !(fa * fb < 0.0) {
        return Err(SolveError::InvalidBracket { a, b, fa, fb });
    }

    let mut trace = Vec::with_capacity(config.max_iter);

    for iter in 1..=config.max_iter {
        let c = (a + b) / 2.0;
        let fc = f(c);
        trace.push(c);
        debug!("bisection iter={iter} bracket=[{a}, {b}] c={c} f(c)={fc:e}");

        if fc.abs() < config.tol {
            return Ok(BisectionSolution {
                root: c,
                trace,
                status: Status::Converged,
            });
        }

        // Both factors are evaluated afresh: three objective calls per iteration.
        if f(c) * f(a) < 0.0 {
            b = c;
        } else {
            a = c;
        }
    }

    let root = (a + b) / 2.0;
    warn!(
        "bisection did not reach tol={} in {} iterations; returning {root}",
        config.tol, config.max_iter
    );

    Ok(BisectionSolution {
        root,
        trace,
        status: Status::MaxIters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_root_inside_bracket() {
        let sol = bisection(|x| x - 5.0, [0.0, 20.0], &BisectionConfig::default()).unwrap();
        assert_abs_diff_eq!(sol.root, 5.0, epsilon = 1e-6);
        assert_eq!(sol.status, Status::Converged);
        assert!(!sol.trace.is_empty());
    }

    #[test]
    fn rejects_bracket_without_sign_change() {
        let err = bisection(|x| x - 5.0, [6.0, 20.0], &BisectionConfig::default()).unwrap_err();
        match err {
            SolveError::InvalidBracket { a, b, fa, fb } => {
                assert_eq!((a, b), (6.0, 20.0));
                assert_eq!((fa, fb), (1.0, 15.0));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_root_on_endpoint() {
        // f(a) * f(b) == 0 is not a strict sign change.
        let err = bisection(|x| x - 5.0, [5.0, 20.0], &BisectionConfig::default());
        assert!(matches!(err, Err(SolveError::InvalidBracket { .. })));
    }

    #[test]
    fn rejects_nan_objective() {
        let err = bisection(|_| f64::NAN, [0.0, 1.0], &BisectionConfig::default());
        assert!(matches!(err, Err(SolveError::InvalidBracket { .. })));
    }

    #[test]
    fn trace_is_bounded_by_max_iter() {
        let config = BisectionConfig {
            tol: 1e-300,
            max_iter: 12,
        };
        let sol = bisection(|x| x * x - 2.0, [0.0, 2.0], &config).unwrap();
        assert_eq!(sol.trace.len(), 12);
        assert_eq!(sol.status, Status::MaxIters);
        // Best-effort root is still inside the final bracket.
        assert_abs_diff_eq!(sol.root, 2.0_f64.sqrt(), epsilon = 2.0 / 2f64.powi(12));
    }

    #[test]
    fn first_midpoint_is_bracket_center() {
        let sol = bisection(|x| x - 1.0, [0.0, 8.0], &BisectionConfig::default()).unwrap();
        assert_eq!(sol.trace[0], 4.0);
        assert_eq!(sol.trace[1], 2.0);
        assert_eq!(sol.trace[2], 1.0);
        assert_eq!(sol.root, 1.0);
        assert_eq!(sol.iterations(), 3);
    }

    #[test]
    fn objective_call_count_matches_three_per_iteration() {
        let mut calls = 0usize;
        let config = BisectionConfig {
            tol: 1e-300,
            max_iter: 7,
        };
        let sol = bisection(
            |x| {
                calls += 1;
                x - 0.3
            },
            [0.0, 1.0],
            &config,
        )
        .unwrap();
        assert_eq!(sol.status, Status::MaxIters);
        // Two bracket checks, then f(c) + f(c) + f(a) per iteration.
        assert_eq!(calls, 2 + 3 * 7);
    }

    #[test]
    fn decreasing_objective_is_supported() {
        let sol = bisection(|x| 3.0 - x, [0.0, 10.0], &BisectionConfig::default()).unwrap();
        assert_abs_diff_eq!(sol.root, 3.0, epsilon = 1e-6);
    }
}
