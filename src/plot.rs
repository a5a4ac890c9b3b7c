//! Data handed to the visualization stage.
//!
//! Rendering is done elsewhere. This module turns a [`Trajectory`] into the four panels of the
//! standard epidemic figure, and carries the colours and line width in a [`PlotStyle`] value
//! rather than process-wide constants. Renderers implement [`PlotRenderer`].
//!
//! Panels, in figure order:
//! 1. proportion of the population in each compartment;
//! 2. cumulative cases (`R`), annotated with the total and its share of the population;
//! 3. infectious population, annotated with the peak and the day it occurs;
//! 4. change in infectious population between consecutive samples.

use log::{info, trace};
use serde::{Deserialize, Serialize};

use crate::error::SirError;
use crate::trajectory::Trajectory;

/// Colours, line width and figure size used by renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    pub susceptible: String,
    pub infectious: String,
    pub removed: String,
    pub susceptible_light: String,
    pub infectious_light: String,
    pub removed_light: String,
    pub line_width: f64,
    /// Figure width and height in inches.
    pub figure_size: (f64, f64),
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            susceptible: "#1b9e77".to_string(),
            infectious: "#d95f02".to_string(),
            removed: "#7570b3".to_string(),
            susceptible_light: "#66c2a5".to_string(),
            infectious_light: "#fc8d62".to_string(),
            removed_light: "#8da0cb".to_string(),
            line_width: 2.0,
            figure_size: (10.0, 6.0),
        }
    }
}

/// Which style colour a series is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesColor {
    Susceptible,
    Infectious,
    Removed,
    SusceptibleLight,
    InfectiousLight,
    RemovedLight,
}

impl SeriesColor {
    #[must_use]
    pub fn resolve(self, style: &PlotStyle) -> &str {
        match self {
            SeriesColor::Susceptible => &style.susceptible,
            SeriesColor::Infectious => &style.infectious,
            SeriesColor::Removed => &style.removed,
            SeriesColor::SusceptibleLight => &style.susceptible_light,
            SeriesColor::InfectiousLight => &style.infectious_light,
            SeriesColor::RemovedLight => &style.removed_light,
        }
    }
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesKind {
    Line,
    /// Area between zero and the series.
    Filled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: Option<&'static str>,
    pub color: SeriesColor,
    pub kind: SeriesKind,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Free text placed on a panel, anchored at `(x, y)` in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub series: Vec<Series>,
    /// Dashed horizontal reference line.
    pub reference_level: Option<f64>,
    pub annotation: Option<Annotation>,
}

/// The four panels of the standard figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureData {
    pub proportions: Panel,
    pub cumulative_cases: Panel,
    pub infectious: Panel,
    pub infectious_change: Panel,
}

const TIME_LABEL: &str = "Time (days)";

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Integer part, as printed in figure annotations.
#[allow(clippy::cast_possible_truncation)]
fn whole(value: f64) -> i64 {
    value.trunc() as i64
}

impl FigureData {
    /// Builds the panels for `trajectory`.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty trajectory, which has no peak or total to annotate.
    pub fn from_trajectory(trajectory: &Trajectory) -> Result<Self, SirError> {
        let (Some((peak_time, peak)), Some(total)) = (
            trajectory.peak_infectious(),
            trajectory.total_infections(),
        ) else {
            return Err("cannot plot an empty trajectory".into());
        };
        let time = trajectory.time().to_vec();
        let last_time = time.last().copied().unwrap_or(0.0);
        let (s, i, r) = trajectory.proportions();

        let line = |label, color, y| Series {
            label: Some(label),
            color,
            kind: SeriesKind::Line,
            x: time.clone(),
            y,
        };
        let proportions = Panel {
            x_label: TIME_LABEL,
            y_label: "Proportion of population",
            series: vec![
                line("Healthy", SeriesColor::Susceptible, s),
                line("Infectious", SeriesColor::Infectious, i),
                line("Removed", SeriesColor::Removed, r),
            ],
            reference_level: None,
            annotation: None,
        };

        let cumulative_cases = Panel {
            x_label: TIME_LABEL,
            y_label: "Cumulative cases",
            series: vec![Series {
                label: None,
                color: SeriesColor::RemovedLight,
                kind: SeriesKind::Filled,
                x: time.clone(),
                y: trajectory.removed().to_vec(),
            }],
            reference_level: Some(total),
            annotation: Some(Annotation {
                x: 0.0,
                y: 0.8 * total,
                text: format!(
                    "{} total infections \n({} % of population)",
                    whole(total),
                    round_to(total / trajectory.population() * 100.0, 2)
                ),
            }),
        };

        let infectious = Panel {
            x_label: TIME_LABEL,
            y_label: "Infectious population",
            series: vec![Series {
                label: None,
                color: SeriesColor::Infectious,
                kind: SeriesKind::Filled,
                x: time.clone(),
                y: trajectory.infectious().to_vec(),
            }],
            reference_level: None,
            annotation: Some(Annotation {
                x: last_time,
                y: 0.95 * peak,
                text: format!(
                    "Maximum number of \nsimultaneous patients:\n{} on day {}",
                    whole(peak),
                    whole(peak_time)
                ),
            }),
        };

        let (delta_time, delta): (Vec<f64>, Vec<f64>) =
            trajectory.infectious_deltas().into_iter().unzip();
        let infectious_change = Panel {
            x_label: TIME_LABEL,
            y_label: "\u{0394} Infectious population",
            series: vec![Series {
                label: None,
                color: SeriesColor::InfectiousLight,
                kind: SeriesKind::Filled,
                x: delta_time,
                y: delta,
            }],
            reference_level: None,
            annotation: None,
        };

        Ok(Self {
            proportions,
            cumulative_cases,
            infectious,
            infectious_change,
        })
    }

    /// Panels in figure order.
    #[must_use]
    pub fn panels(&self) -> [&Panel; 4] {
        [
            &self.proportions,
            &self.cumulative_cases,
            &self.infectious,
            &self.infectious_change,
        ]
    }
}

/// The seam to an external plotting backend.
pub trait PlotRenderer {
    /// Draws `figure` using `style`.
    ///
    /// # Errors
    ///
    /// Backend specific.
    fn render(&mut self, figure: &FigureData, style: &PlotStyle) -> Result<(), SirError>;
}

/// Writes each panel's axis labels and annotation through the logging facade at `info` level.
#[derive(Debug, Default)]
pub struct LogRenderer;

impl PlotRenderer for LogRenderer {
    fn render(&mut self, figure: &FigureData, style: &PlotStyle) -> Result<(), SirError> {
        for panel in figure.panels() {
            let colors: Vec<&str> = panel
                .series
                .iter()
                .map(|series| series.color.resolve(style))
                .collect();
            info!(
                "{} vs {} [{}]",
                panel.y_label,
                panel.x_label,
                colors.join(", ")
            );
            for series in &panel.series {
                trace!(
                    "{}: {} points, last = {:?}",
                    series.label.unwrap_or(panel.y_label),
                    series.y.len(),
                    series.y.last()
                );
            }
            if let Some(annotation) = &panel.annotation {
                info!("{}", annotation.text.replace('\n', " "));
            }
        }
        Ok(())
    }
}
