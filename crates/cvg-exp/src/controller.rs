use std::fs;
use std::path::PathBuf;

use cvg_core::serde::to_canonical_json_bytes;
use cvg_core::{Budget, CvgError, ErrorInfo, ExperimentContext, TrialHistory, TrialLabel};
use cvg_metrics::{compute_metrics, ExperimentMetrics};
use cvg_plot::Renderer;
use cvg_runner::TrialEngine;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::ExperimentCache;
use crate::config::LabConfig;
use crate::schedule::generate_schedule;

/// Lifecycle of one controller run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    /// Schedule built, exact policy decided.
    Init,
    /// History restored from the cache; no trial runs.
    CacheHit,
    /// Trials are being executed.
    Executing,
    /// Metrics derived (or found to be underivable).
    MetricsComputed,
    /// Figures handed to the renderer. Terminal.
    Rendered,
}

/// One logic program under study.
#[derive(Debug, Clone)]
pub struct Experiment {
    /// Where the experiment's artefacts go.
    pub ctx: ExperimentContext,
    /// Program text, copied into every trial file.
    pub program_text: String,
    /// Number of probabilities every trial should report.
    pub num_queries: usize,
    /// Budget believed sufficient for near-exact answers.
    pub estimated_models: Budget,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    /// State the controller stopped in.
    pub state: ControllerState,
    /// Whether the history came from the cache.
    pub from_cache: bool,
    /// Trials and schedule used for metrics.
    pub history: TrialHistory,
    /// Derived metrics; `None` when nothing could serve as ground truth.
    pub metrics: Option<ExperimentMetrics>,
    /// Figures written by the renderer.
    pub figures: Vec<PathBuf>,
}

/// Drives one experiment from schedule to figures.
///
/// Trials run one at a time in schedule order. A failed trial leaves a gap
/// and the run continues; setup, cache, report and render failures abort.
pub struct ExperimentController<'a> {
    config: &'a LabConfig,
    engine: &'a dyn TrialEngine,
    renderer: &'a dyn Renderer,
    state: ControllerState,
}

impl<'a> ExperimentController<'a> {
    /// Creates a controller in the `Init` state.
    pub fn new(
        config: &'a LabConfig,
        engine: &'a dyn TrialEngine,
        renderer: &'a dyn Renderer,
    ) -> Self {
        Self {
            config,
            engine,
            renderer,
            state: ControllerState::Init,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    fn advance(&mut self, next: ControllerState) {
        debug!(from = ?self.state, to = ?next, "controller transition");
        self.state = next;
    }

    /// Runs (or resumes from cache) the experiment.
    pub fn run(&mut self, experiment: &Experiment) -> Result<ExperimentOutcome, CvgError> {
        self.state = ControllerState::Init;
        let ctx = &experiment.ctx;
        ctx.prepare()?;
        let schedule = generate_schedule(experiment.estimated_models, &self.config.schedule);
        let skip_exact = self.config.skip_exact.skips(&ctx.name);
        info!(
            experiment = %ctx.name,
            budgets = schedule.len(),
            skip_exact,
            "experiment initialised"
        );

        let cache = ExperimentCache::new(ctx);
        let (history, from_cache) = match cache.load()? {
            Some(cached) => {
                self.advance(ControllerState::CacheHit);
                if !cached.matches_program(&experiment.program_text) {
                    warn!(
                        experiment = %ctx.name,
                        path = %cache.path().display(),
                        "program changed since the cache was written, using cached trials anyway"
                    );
                }
                info!(experiment = %ctx.name, "results loaded from cache, skipping execution");
                (cached.history, true)
            }
            None => {
                self.advance(ControllerState::Executing);
                let (history, fatal) = self.execute(experiment, schedule, skip_exact);
                cache.save(&history, &experiment.program_text)?;
                if let Some(err) = fatal {
                    return Err(err);
                }
                (history, false)
            }
        };

        let metrics = compute_metrics(&history, experiment.num_queries, &self.config.thresholds);
        self.advance(ControllerState::MetricsComputed);
        let Some(metrics) = metrics else {
            warn!(experiment = %ctx.name, "no trial results available, nothing to compare against");
            return Ok(ExperimentOutcome {
                state: self.state,
                from_cache,
                history,
                metrics: None,
                figures: Vec::new(),
            });
        };
        write_report(ctx, &metrics)?;

        let figures = self.renderer.render(ctx, &metrics)?;
        self.advance(ControllerState::Rendered);
        Ok(ExperimentOutcome {
            state: self.state,
            from_cache,
            history,
            metrics: Some(metrics),
            figures,
        })
    }

    /// Runs every trial in order. A fatal engine error stops the loop and is
    /// handed back next to the trials recorded so far.
    fn execute(
        &self,
        experiment: &Experiment,
        schedule: Vec<Budget>,
        skip_exact: bool,
    ) -> (TrialHistory, Option<CvgError>) {
        let mut history = TrialHistory::new(schedule.clone());
        let mut labels = Vec::with_capacity(schedule.len() + 1);
        if skip_exact {
            info!(experiment = %experiment.ctx.name, "skipping exact inference");
        } else {
            labels.push(TrialLabel::Exact);
        }
        labels.extend(schedule.into_iter().map(TrialLabel::Budget));

        for label in labels {
            info!(experiment = %experiment.ctx.name, trial = %label, "running trial");
            match self.engine.run_trial(label, &experiment.program_text) {
                Ok(result) => history.record(result),
                Err(err) if err.is_fatal() => {
                    warn!(
                        experiment = %experiment.ctx.name,
                        trial = %label,
                        recorded = history.trials.len(),
                        "fatal engine error, keeping completed trials"
                    );
                    return (history, Some(err));
                }
                Err(err) => warn!(
                    experiment = %experiment.ctx.name,
                    trial = %label,
                    error = %err,
                    "trial failed, leaving a gap"
                ),
            }
        }
        (history, None)
    }
}

/// Writes the canonical JSON metrics report for an experiment.
pub fn write_report(ctx: &ExperimentContext, metrics: &ExperimentMetrics) -> Result<PathBuf, CvgError> {
    let path = ctx.report_path();
    let bytes = to_canonical_json_bytes(metrics)?;
    fs::write(&path, bytes).map_err(|err| {
        CvgError::Serde(
            ErrorInfo::new("report-write", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    info!(path = %path.display(), "metrics report written");
    Ok(path)
}
