//! Three-parameter exponential decay toward an asymptote.
//!
//! ```text
//! C(t) = a * exp(-b * t) + c
//! ```
//!
//! Partial derivatives (Jacobian row, ordered `a, b, c`):
//!
//! ```text
//! ∂C/∂a = exp(-b t)
//! ∂C/∂b = -a t exp(-b t)
//! ∂C/∂c = 1
//! ```

/// Evaluate `a * exp(-b * t) + c`.
pub fn exp_decay(t: f64, a: f64, b: f64, c: f64) -> f64 {
    a * (-b * t).exp() + c
}

/// Fill the Jacobian row of [`exp_decay`] with respect to `(a, b, c)`.
pub fn exp_decay_gradient(t: f64, a: f64, b: f64) -> [f64; 3] {
    let e = (-b * t).exp();
    [e, -a * t * e, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_limits() {
        assert!((exp_decay(0.0, 80.0, 0.3, 5.0) - 85.0).abs() < 1e-12);
        assert!((exp_decay(1e4, 80.0, 0.3, 5.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn gradient_matches_central_differences() {
        let (t, a, b, c) = (2.5, 90.0, 0.2, 3.0);
        let g = exp_decay_gradient(t, a, b);
        let h = 1e-6;

        let da = (exp_decay(t, a + h, b, c) - exp_decay(t, a - h, b, c)) / (2.0 * h);
        let db = (exp_decay(t, a, b + h, c) - exp_decay(t, a, b - h, c)) / (2.0 * h);
        let dc = (exp_decay(t, a, b, c + h) - exp_decay(t, a, b, c - h)) / (2.0 * h);

        assert!((g[0] - da).abs() < 1e-6, "da: {} vs {da}", g[0]);
        assert!((g[1] - db).abs() < 1e-4, "db: {} vs {db}", g[1]);
        assert!((g[2] - dc).abs() < 1e-6, "dc: {} vs {dc}", g[2]);
    }
}
