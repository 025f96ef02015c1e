//! Figures drawn for a calibration run.

use crate::app::pipeline::RunOutput;
use crate::domain::{FitResult, ModelParameters, PipelineConfig, SecondaryDecayResult, Trajectory};

use super::ascii::{Figure, Glyph, RefLine, Series, render_figure};

/// Bisection midpoints by iteration, with the final dosage marked.
pub fn bisection_figure(trace: &[f64], root: f64) -> Figure {
    let points: Vec<(f64, f64)> = trace
        .iter()
        .enumerate()
        .map(|(i, &m)| ((i + 1) as f64, m))
        .collect();

    Figure::new("Bisection convergence (iteration vs u_in mg/L)")
        .with_series(Series::new("midpoint path", Glyph::Line('-'), points.clone()))
        .with_series(Series::new("midpoint", Glyph::Points('o'), points))
        .with_ref(RefLine::horizontal(format!("u_opt = {root:.4}"), root))
}

/// Pollutant concentration over time with the target window marked.
pub fn pollutant_figure(trajectory: &Trajectory, params: &ModelParameters) -> Figure {
    Figure::new("Pollutant C(t) (hr vs mg/L)")
        .with_series(Series::new(
            "C(t)",
            Glyph::Line('-'),
            zip(trajectory.times(), trajectory.pollutant()),
        ))
        .with_ref(RefLine::horizontal("C_target", params.c_target))
        .with_ref(RefLine::vertical("t_target", params.t_target))
}

/// Disinfectant concentration over time against the advisory limit.
pub fn disinfectant_figure(trajectory: &Trajectory, params: &ModelParameters) -> Figure {
    Figure::new("Disinfectant u(t) (hr vs mg/L)")
        .with_series(Series::new(
            "u(t)",
            Glyph::Line('-'),
            zip(trajectory.times(), trajectory.disinfectant()),
        ))
        .with_ref(RefLine::horizontal("u_limit (advisory)", params.u_limit))
}

/// Every `skip`-th simulated sample overlaid on the fitted exponential.
pub fn regression_figure(trajectory: &Trajectory, fit: &FitResult, skip: usize) -> Figure {
    let skip = skip.max(1);
    let t = trajectory.times();
    let c = trajectory.pollutant();

    let observed: Vec<(f64, f64)> = t
        .iter()
        .zip(c)
        .step_by(skip)
        .map(|(&t, &c)| (t, c))
        .collect();
    let fitted: Vec<(f64, f64)> = t.iter().map(|&t| (t, fit.predict(t))).collect();

    Figure::new("Regression fit a*exp(-b*t) + c (hr vs mg/L)")
        .with_series(Series::new("fit", Glyph::Line('-'), fitted))
        .with_series(Series::new("simulated", Glyph::Points('o'), observed))
}

/// Closed-form internal-decay curve with the Newton-Raphson root marked.
pub fn internal_decay_figure(secondary: &SecondaryDecayResult, params: &ModelParameters) -> Figure {
    Figure::new("Internal decay C(t) (hr vs mg/L)")
        .with_series(Series::new(
            "C(t) with D_int",
            Glyph::Line('-'),
            zip(&secondary.times, &secondary.concentrations),
        ))
        .with_series(Series::new(
            "root",
            Glyph::Points('X'),
            vec![(secondary.t_root, params.c_target)],
        ))
        .with_ref(RefLine::horizontal("C_target", params.c_target))
        .with_ref(RefLine::vertical(
            format!("t = {:.4}", secondary.t_root),
            secondary.t_root,
        ))
}

/// All run figures, rendered and separated by blank lines.
pub fn render_run_plots(run: &RunOutput, params: &ModelParameters, config: &PipelineConfig) -> String {
    let figures = [
        bisection_figure(&run.dosage.trace, run.u_opt()),
        pollutant_figure(&run.trajectory, params),
        disinfectant_figure(&run.trajectory, params),
        regression_figure(&run.trajectory, &run.fit, config.plot_skip),
        internal_decay_figure(&run.secondary, params),
    ];

    figures
        .iter()
        .map(|fig| render_figure(fig, config.plot_width, config.plot_height))
        .collect::<Vec<_>>()
        .join("\n")
}

fn zip(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter().copied().zip(y.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::SimulationState;

    #[test]
    fn bisection_figure_numbers_iterations_from_one() {
        let fig = bisection_figure(&[10.0, 5.0, 7.5], 7.5);
        assert_eq!(fig.series[1].points, vec![(1.0, 10.0), (2.0, 5.0), (3.0, 7.5)]);
        assert_eq!(fig.refs, vec![RefLine::horizontal("u_opt = 7.5000", 7.5)]);
    }

    #[test]
    fn regression_figure_thins_observed_points() {
        let mut traj = Trajectory::starting_at(SimulationState { t: 0.0, c: 100.0, u: 1.0 }, 8);
        for i in 1..=6 {
            traj.push(SimulationState {
                t: i as f64,
                c: 100.0 - i as f64,
                u: 1.0,
            });
        }
        let fit = FitResult {
            a: 100.0,
            b: 0.01,
            c: 0.0,
            covariance: [[0.0; 3]; 3],
            sse: 0.0,
            rmse: 0.0,
            iterations: 1,
            n: 7,
        };

        let fig = regression_figure(&traj, &fit, 3);
        let observed = &fig.series[1];
        assert_eq!(observed.glyph, Glyph::Points('o'));
        assert_eq!(observed.points, vec![(0.0, 100.0), (3.0, 97.0), (6.0, 94.0)]);
        assert_eq!(fig.series[0].points.len(), 7);
    }
}
