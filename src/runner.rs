use std::fmt::{self, Display};
use std::path::PathBuf;

use clap::Parser;
use log::{info, LevelFilter};

use crate::error::SirError;
use crate::integrator::{simulate, Method};
use crate::log::set_log_level;
use crate::plot::{FigureData, LogRenderer, PlotRenderer, PlotStyle};
use crate::scenario::Scenario;
use crate::trajectory::Trajectory;

/// Default cli arguments for the sirsim runner
#[derive(Parser, Debug)]
#[command(name = "sirsim", about = "Simulate the SIR epidemic model")]
pub struct BaseArgs {
    /// Optional path for a scenario config file. The built-in scenario is used without one
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Integration method, overriding the one in the scenario file
    #[arg(short, long, value_enum)]
    pub method: Option<Method>,

    /// Log level (off, error, warn, info, debug, trace). Logging is off unless given
    #[arg(short, long)]
    pub log_level: Option<LevelFilter>,
}

/// Everything a run produced.
#[derive(Debug)]
pub struct RunOutput {
    pub scenario: Scenario,
    pub trajectory: Trajectory,
    pub figure: FigureData,
}

impl RunOutput {
    /// A short plain-text report of the run.
    #[must_use]
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl Display for RunOutput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let trajectory = &self.trajectory;
        writeln!(f, "method: {}", trajectory.method())?;
        writeln!(f, "samples: {}", trajectory.len())?;
        if let Some((day, peak)) = trajectory.peak_infectious() {
            writeln!(f, "peak infectious: {peak:.0} on day {day:.0}")?;
        }
        if let (Some(total), Some(fraction)) = (
            trajectory.total_infections(),
            trajectory.total_infections_fraction(),
        ) {
            writeln!(
                f,
                "total infections: {total:.0} ({:.2} % of population)",
                fraction * 100.0
            )?;
        }
        if let Some(state) = trajectory.final_state() {
            writeln!(
                f,
                "final state: S = {:.1}, I = {:.1}, R = {:.1}",
                state.susceptible, state.infectious, state.removed
            )?;
        }
        Ok(())
    }
}

/// Parses the command line and runs the scenario it names.
///
/// Exits with a usage message if the arguments do not parse.
///
/// # Errors
/// Returns an error if scenario loading or the simulation fails
pub fn run_with_args() -> Result<RunOutput, Box<dyn std::error::Error>> {
    let args = BaseArgs::parse();
    Ok(run_with_args_internal(args)?)
}

fn run_with_args_internal(args: BaseArgs) -> Result<RunOutput, SirError> {
    if let Some(level) = args.log_level {
        set_log_level(level);
    }

    let mut scenario = match &args.config {
        Some(path) => {
            info!("Loading scenario from: {}", path.display());
            Scenario::from_json_file(path)?
        }
        None => Scenario::default(),
    };
    if let Some(method) = args.method {
        scenario.method = method;
    }

    let trajectory = simulate(&scenario)?;
    let figure = FigureData::from_trajectory(&trajectory)?;
    LogRenderer.render(&figure, &PlotStyle::default())?;

    Ok(RunOutput {
        scenario,
        trajectory,
        figure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(config: Option<PathBuf>, method: Option<Method>) -> BaseArgs {
        BaseArgs {
            config,
            method,
            log_level: None,
        }
    }

    #[test]
    fn test_run_default_scenario() {
        let output = run_with_args_internal(args(None, Some(Method::ForwardEuler))).unwrap();
        assert_eq!(output.scenario.horizon, 750.0);
        assert_eq!(output.trajectory.len(), 750);
        assert!(output.summary().starts_with("method: forward Euler\nsamples: 750\n"));
    }

    #[test]
    fn test_summary_lists_every_line() {
        let output = run_with_args_internal(args(None, Some(Method::ForwardEuler))).unwrap();
        let summary = output.summary();
        assert_eq!(summary, format!("{output}"));
        let labels: Vec<&str> = summary
            .lines()
            .filter_map(|line| line.split(':').next())
            .collect();
        assert_eq!(
            labels,
            [
                "method",
                "samples",
                "peak infectious",
                "total infections",
                "final state"
            ]
        );
    }

    #[test]
    fn test_run_with_config_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"initial_susceptible": 999, "initial_infectious": 1, "initial_removed": 0,
                "beta": 0.3, "gamma": 0.1, "horizon": 100, "method": "euler"}}"#
        )
        .unwrap();
        let output = run_with_args_internal(args(Some(file.path().to_path_buf()), None)).unwrap();
        assert_eq!(output.trajectory.method(), Method::ForwardEuler);
        assert_eq!(output.trajectory.len(), 100);
        assert!(output.figure.infectious.annotation.is_some());
    }

    #[test]
    fn test_method_flag_overrides_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"initial_susceptible": 999, "initial_infectious": 1, "initial_removed": 0,
                "beta": 0.3, "gamma": 0.1, "horizon": 50, "method": "euler"}}"#
        )
        .unwrap();
        let output = run_with_args_internal(args(
            Some(file.path().to_path_buf()),
            Some(Method::AdaptiveSolver),
        ))
        .unwrap();
        assert_eq!(output.trajectory.method(), Method::AdaptiveSolver);
        assert_eq!(output.trajectory.time().last(), Some(&50.0));
    }

    #[test]
    fn test_invalid_scenario_is_reported() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"initial_susceptible": 0, "initial_infectious": 0, "initial_removed": 0,
                "beta": 0.3, "gamma": 0.1, "horizon": 50}}"#
        )
        .unwrap();
        let result = run_with_args_internal(args(Some(file.path().to_path_buf()), None));
        assert!(matches!(result, Err(SirError::DegeneratePopulation { .. })));
    }

    #[test]
    fn test_parse_args() {
        let parsed = BaseArgs::try_parse_from(["sirsim", "--method", "euler", "-l", "debug"])
            .unwrap();
        assert_eq!(parsed.method, Some(Method::ForwardEuler));
        assert_eq!(parsed.log_level, Some(LevelFilter::Debug));
        assert!(parsed.config.is_none());
    }
}
