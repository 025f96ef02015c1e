//! Shared calibration pipeline.
//!
//! Keeping the workflow in one place lets the binary and integration tests
//! drive exactly the same steps:
//! bisection on the residual -> verification -> reporting simulation ->
//! exponential fit -> internal-decay time-to-target
//!
//! The caller decides how to present the outputs (report text, plots).

use log::{info, warn};

use crate::domain::{
    FitResult, ModelParameters, PipelineConfig, SecondaryDecayResult, Trajectory, Verification,
};
use crate::error::AppError;
use crate::fit::{FitOptions, fit_exponential_with};
use crate::models::time_to_target_with_internal_decay;
use crate::reactor::{Integrator, ResidualObjective};
use crate::solve::{BisectionConfig, BisectionSolution, bisection};

/// All computed outputs of a single calibration run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Bisection result; `dosage.root` is the calibrated inflow dosage.
    pub dosage: BisectionSolution,
    pub verification: Verification,
    /// Reporting simulation at the calibrated dosage over `report_horizon`.
    pub trajectory: Trajectory,
    pub fit: FitResult,
    pub secondary: SecondaryDecayResult,
}

impl RunOutput {
    pub fn u_opt(&self) -> f64 {
        self.dosage.root
    }
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_pipeline(
    params: &ModelParameters,
    config: &PipelineConfig,
) -> Result<RunOutput, AppError> {
    // 1) Calibrate the dosage.
    let objective = ResidualObjective::new(params)?;
    let bisection_config = BisectionConfig {
        tol: config.bisection_tol,
        max_iter: config.bisection_max_iter,
    };
    let dosage = bisection(|u| objective.eval(u), config.bracket, &bisection_config)?;
    info!(
        "Optimal chlorine dosage for target {} hr: {:.4} mg/L",
        params.t_target, dosage.root
    );

    // 2) Check the residual straddles zero around the dosage.
    let verification = verify(&objective, dosage.root, config.verify_offset);

    // 3) Simulate past the contact time for reporting and fitting.
    let trajectory = Integrator::new(params)?.run(dosage.root, config.report_horizon)?;
    info!(
        "Simulated {} samples over {} hr at u_in = {:.4} mg/L",
        trajectory.len(),
        config.report_horizon,
        dosage.root
    );

    // 4) Summarise the pollutant curve with an exponential decay.
    let options = FitOptions {
        initial_guess: config.fit_guess,
        ..FitOptions::default()
    };
    let fit = fit_exponential_with(trajectory.times(), trajectory.pollutant(), &options)?;

    // 5) Time-to-target once internal decay is switched on.
    let secondary = time_to_target_with_internal_decay(params, dosage.root, &config.secondary)?;
    if !secondary.status.is_converged() {
        warn!(
            "Internal-decay time-to-target did not converge after {} iterations",
            secondary.iterations
        );
    }

    Ok(RunOutput {
        dosage,
        verification,
        trajectory,
        fit,
        secondary,
    })
}

/// Evaluate the residual at the dosage and at `dosage ± offset`.
pub fn verify(objective: &ResidualObjective<'_>, dosage: f64, offset: f64) -> Verification {
    let residual = objective.eval(dosage);
    let below = objective.eval(dosage - offset);
    let above = objective.eval(dosage + offset);
    let sign_change = below * above <= 0.0;

    info!("Verification: residual at u_opt = {residual:.6e}");
    info!("Residual just below root: {below:.6}, above root: {above:.6}");
    if !sign_change {
        warn!("Sign change not detected around u_opt; check the bracket or tolerance");
    }

    Verification {
        offset,
        residual,
        below,
        above,
        sign_change,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_straddles_the_calibrated_dosage() {
        let params = ModelParameters::default();
        let run = run_pipeline(&params, &PipelineConfig::default()).unwrap();

        let v = run.verification;
        assert!(v.residual.abs() < 1e-6);
        assert!(v.below > 0.0);
        assert!(v.above < 0.0);
        assert!(v.sign_change);
    }

    #[test]
    fn verification_flags_a_one_sided_window() {
        let params = ModelParameters::default();
        let objective = ResidualObjective::new(&params).unwrap();

        // Both probes sit at dosages far above the root.
        let v = verify(&objective, 15.0, 0.1);
        assert!(v.below < 0.0 && v.above < 0.0);
        assert!(!v.sign_change);
    }

    #[test]
    fn bad_bracket_surfaces_as_numerical_failure() {
        let params = ModelParameters::default();
        let config = PipelineConfig {
            bracket: [15.0, 20.0],
            ..PipelineConfig::default()
        };
        let err = run_pipeline(&params, &config).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn invalid_parameters_surface_as_exit_code_2() {
        let params = ModelParameters {
            flow_rate: -1.0,
            ..ModelParameters::default()
        };
        let err = run_pipeline(&params, &PipelineConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
