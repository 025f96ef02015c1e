use crate::app::pipeline::RunOutput;
use crate::domain::{ModelParameters, Status};

/// Format the full run summary (dosage, verification, fit, internal decay).
pub fn format_run_summary(run: &RunOutput, params: &ModelParameters) -> String {
    let mut out = String::new();

    out.push_str("=== dose - Chlorine Dosage Calibration ===\n");
    out.push_str(&format!(
        "Reactor: Q={:.3e} L/hr | V={:.3e} L | C0={} mg/L | Cin={} mg/L\n",
        params.flow_rate,
        params.volume(),
        params.c0,
        params.c_in,
    ));
    out.push_str(&format!(
        "Target: C={} mg/L at t={} hr | dt={} hr\n",
        params.c_target, params.t_target, params.dt,
    ));

    out.push_str("\nDosage (bisection):\n");
    out.push_str(&format!(
        "Optimal chlorine dosage for target {} hr: {:.4} mg/L\n",
        params.t_target,
        run.u_opt(),
    ));
    out.push_str(&format!(
        "Iterations: {} ({})\n",
        run.dosage.iterations(),
        status_label(run.dosage.status),
    ));

    let v = &run.verification;
    out.push_str(&format!("Verification: residual at u_opt = {:.6e}\n", v.residual));
    out.push_str(&format!(
        "Residual at u_opt - {off}: {:.6} | at u_opt + {off}: {:.6}\n",
        v.below,
        v.above,
        off = v.offset,
    ));
    if !v.sign_change {
        out.push_str("Warning: sign change not detected; check the bracket or tolerance.\n");
    }

    let peak = run.trajectory.peak_disinfectant();
    let flag = if peak > params.u_limit { "ABOVE" } else { "within" };
    out.push_str(&format!(
        "Peak disinfectant: {peak:.4} mg/L ({flag} advisory limit {} mg/L)\n",
        params.u_limit,
    ));

    let fit = &run.fit;
    let [se_a, se_b, se_c] = fit.std_errors();
    out.push_str("\nRegression C(t) = a*exp(-b*t) + c:\n");
    out.push_str(&format!("- a = {:>12.6} ± {:.3e}\n", fit.a, se_a));
    out.push_str(&format!("- b = {:>12.6} ± {:.3e}\n", fit.b, se_b));
    out.push_str(&format!("- c = {:>12.6} ± {:.3e}\n", fit.c, se_c));
    out.push_str(&format!(
        "SSE: {:.6e} | RMSE: {:.6e} | n={} | iterations={}\n",
        fit.sse, fit.rmse, fit.n, fit.iterations,
    ));

    let s = &run.secondary;
    out.push_str("\nInternal decay (Newton-Raphson):\n");
    out.push_str(&format!(
        "Time to reach C_target with internal decay: {:.4} hr\n",
        s.t_root,
    ));
    out.push_str(&format!(
        "Iterations: {} ({})\n",
        s.iterations,
        status_label(s.status),
    ));

    out
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Converged => "converged",
        Status::MaxIters => "did not converge; best estimate shown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::{FitResult, SecondaryDecayResult, SimulationState, Trajectory, Verification};
    use crate::solve::BisectionSolution;

    fn sample_run(sign_change: bool, peak_u: f64) -> RunOutput {
        let mut trajectory =
            Trajectory::starting_at(SimulationState { t: 0.0, c: 100.0, u: peak_u }, 2);
        trajectory.push(SimulationState { t: 1.0, c: 50.0, u: 1.0 });

        RunOutput {
            dosage: BisectionSolution {
                root: 4.25,
                trace: vec![10.0, 5.0, 2.5, 3.75, 4.375, 4.0625, 4.25],
                status: Status::Converged,
            },
            verification: Verification {
                offset: 0.1,
                residual: 1e-7,
                below: 0.25,
                above: -0.25,
                sign_change,
            },
            trajectory,
            fit: FitResult {
                a: 85.0,
                b: 0.3,
                c: 6.0,
                covariance: [[0.04, 0.0, 0.0], [0.0, 1e-6, 0.0], [0.0, 0.0, 0.01]],
                sse: 12.5,
                rmse: 0.072,
                iterations: 9,
                n: 2401,
            },
            secondary: SecondaryDecayResult {
                t_root: 10.5,
                iterations: 100,
                status: Status::MaxIters,
                times: vec![0.0, 30.0],
                concentrations: vec![100.0, 0.0],
            },
        }
    }

    #[test]
    fn summary_reports_dosage_fit_and_secondary_root() {
        let params = ModelParameters::default();
        let txt = format_run_summary(&sample_run(true, 2.0), &params);

        assert!(txt.contains("Optimal chlorine dosage for target 12 hr: 4.2500 mg/L"));
        assert!(txt.contains("Iterations: 7 (converged)"));
        assert!(txt.contains("- a =    85.000000 ± 2.000e-1"));
        assert!(txt.contains("Time to reach C_target with internal decay: 10.5000 hr"));
        assert!(txt.contains("Iterations: 100 (did not converge; best estimate shown)"));
        assert!(txt.contains("(within advisory limit 5 mg/L)"));
        assert!(!txt.contains("Warning"));
    }

    #[test]
    fn summary_flags_missing_sign_change_and_high_disinfectant() {
        let params = ModelParameters::default();
        let txt = format_run_summary(&sample_run(false, 6.0), &params);

        assert!(txt.contains("Warning: sign change not detected"));
        assert!(txt.contains("Peak disinfectant: 6.0000 mg/L (ABOVE advisory limit 5 mg/L)"));
    }
}
