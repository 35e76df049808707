use std::fs;
use std::path::{Path, PathBuf};

use cvg_core::{CvgError, ErrorInfo, ExperimentContext, PlotKind, MIN_BUDGET};
use cvg_metrics::{ExperimentMetrics, QueryMetrics};
use tracing::{debug, info};

use crate::figures::{render_line_chart_svg, FigureConfig, LineChart};
use crate::spheres::{render_overlapping_svg, render_side_by_side_svg, spheres};

const NMODELS_LABEL: &str = "Number of Models (nmodels)";

/// Consumer of the derived metrics of one experiment.
pub trait Renderer {
    /// Emits the figures for `metrics` and returns the written paths.
    fn render(
        &self,
        ctx: &ExperimentContext,
        metrics: &ExperimentMetrics,
    ) -> Result<Vec<PathBuf>, CvgError>;
}

/// Writes every figure family as standalone SVG.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    config: FigureConfig,
}

impl SvgRenderer {
    /// Renderer using the provided canvas geometry for line charts.
    pub fn new(config: FigureConfig) -> Self {
        Self { config }
    }

    fn series(budgets: &[u64], values: &[f64]) -> Vec<(f64, f64)> {
        budgets
            .iter()
            .zip(values)
            .map(|(budget, value)| (*budget as f64, *value))
            .collect()
    }

    fn query_charts(&self, query: &QueryMetrics) -> [LineChart; 3] {
        let number = query.query + 1;
        [
            LineChart {
                title: format!("Probability vs. nmodels for Query {number}"),
                x_label: NMODELS_LABEL.to_string(),
                y_label: "Probability".to_string(),
                log_x: true,
                color: "#1f77b4",
                series_label: "Approximate Probability".to_string(),
                points: Self::series(&query.budgets, &query.probabilities),
                reference: Some(("Exact Probability".to_string(), query.ground_truth)),
            },
            LineChart {
                title: format!("Absolute Error vs. nmodels for Query {number}"),
                x_label: NMODELS_LABEL.to_string(),
                y_label: "Absolute Error".to_string(),
                log_x: true,
                color: "#ff7f0e",
                series_label: "Absolute Error".to_string(),
                points: Self::series(&query.budgets, &query.abs_errors),
                reference: None,
            },
            LineChart {
                title: format!("Relative Error vs. nmodels for Query {number}"),
                x_label: NMODELS_LABEL.to_string(),
                y_label: "Relative Error".to_string(),
                log_x: true,
                color: "#9467bd",
                series_label: "Relative Error".to_string(),
                points: Self::series(&query.budgets, &query.rel_errors),
                reference: None,
            },
        ]
    }
}

fn write_figure(path: &Path, svg: &str) -> Result<PathBuf, CvgError> {
    let render_error = |code: &str, err: std::io::Error, target: &Path| {
        CvgError::Render(
            ErrorInfo::new(code, err.to_string())
                .with_context("path", target.display().to_string()),
        )
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| render_error("figure-mkdir", err, parent))?;
    }
    fs::write(path, svg).map_err(|err| render_error("figure-write", err, path))?;
    debug!(path = %path.display(), "figure written");
    Ok(path.to_path_buf())
}

impl Renderer for SvgRenderer {
    fn render(
        &self,
        ctx: &ExperimentContext,
        metrics: &ExperimentMetrics,
    ) -> Result<Vec<PathBuf>, CvgError> {
        let estimated_models = metrics.schedule.last().copied().unwrap_or(MIN_BUDGET);
        let gallery = ctx.gallery_dir();
        let mut written = Vec::new();

        for query in &metrics.queries {
            let idx = query.query;
            let file = format!("query_{}.svg", idx + 1);
            let [probability, absolute, relative] = self.query_charts(query);

            let probability_svg = render_line_chart_svg(&probability, &self.config);
            written.push(write_figure(
                &ctx.plot_dir(PlotKind::ExactVsApprox).join(&file),
                &probability_svg,
            )?);
            written.push(write_figure(
                &gallery.join(format!("{}_eva{idx}.svg", ctx.name)),
                &probability_svg,
            )?);

            written.push(write_figure(
                &ctx.plot_dir(PlotKind::AbsError).join(&file),
                &render_line_chart_svg(&absolute, &self.config),
            )?);

            let relative_svg = render_line_chart_svg(&relative, &self.config);
            written.push(write_figure(
                &ctx.plot_dir(PlotKind::ErrorVsNmodels).join(&file),
                &relative_svg,
            )?);
            written.push(write_figure(
                &gallery.join(format!("{}_rel{idx}.svg", ctx.name)),
                &relative_svg,
            )?);

            let balls = spheres(&query.convergence, estimated_models);
            let spheres_dir = ctx.plot_dir(PlotKind::Spheres);
            written.push(write_figure(
                &spheres_dir.join(format!("query_{}_overlapping.svg", idx + 1)),
                &render_overlapping_svg(
                    &format!("Convergence Spheres (Overlapping) for {}", ctx.name),
                    &balls,
                    estimated_models,
                ),
            )?);
            written.push(write_figure(
                &spheres_dir.join(format!("query_{}_side_by_side.svg", idx + 1)),
                &render_side_by_side_svg(
                    &format!("Convergence Spheres (Side by Side) for {}", ctx.name),
                    &balls,
                    estimated_models,
                ),
            )?);
        }

        let runtime = LineChart {
            title: "Runtime vs. nmodels".to_string(),
            x_label: NMODELS_LABEL.to_string(),
            y_label: "Runtime (seconds)".to_string(),
            log_x: false,
            color: "#d62728",
            series_label: "Runtime".to_string(),
            points: Self::series(&metrics.budgets, &metrics.runtimes),
            reference: None,
        };
        written.push(write_figure(
            &ctx.plot_dir(PlotKind::Runtime).join("runtime_vs_nmodels.svg"),
            &render_line_chart_svg(&runtime, &self.config),
        )?);

        info!(experiment = %ctx.name, figures = written.len(), "figures rendered");
        Ok(written)
    }
}
