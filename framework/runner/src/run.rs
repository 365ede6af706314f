use std::path::{Path, PathBuf};

use anyhow::Context;
use hydration_bench_instruments::{EvaluationEvent, ReportConfig, Reporter};
use hydration_bench_summary_model::{append_run_summary, write_report, AggregatedReport, RunSummary};

use crate::cli::ReporterOpt;
use crate::context::RunnerContext;
use crate::definition::EvaluationDefinition;
use crate::engine::{AuditEngine, Browser, BrowserLauncher};
use crate::executor::Executor;
use crate::scenario::run_scenario;
use crate::warmup::warm_up;

/// File the aggregated medians are written to, inside the results directory.
pub const SUMMARY_FILE_NAME: &str = "summary_results.json";
/// File each run appends its [RunSummary] to, inside the results directory.
pub const RUN_SUMMARY_FILE_NAME: &str = "run_summary.jsonl";

/// The stages of an evaluation.
///
/// `Failed` can be entered from any stage before `Closing`, after which the evaluation still
/// closes the browser and reports what it collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum EvaluationState {
    Idle,
    Launching,
    Warmup,
    #[display("Running({index} of {total})")]
    Running {
        index: usize,
        total: usize,
    },
    Failed,
    Closing,
    Reporting,
    Done,
}

/// What an evaluation produced.
#[derive(Debug)]
pub struct EvaluationOutcome {
    /// Results of every scenario that ran, complete or not.
    pub report: AggregatedReport,
    /// Set if the evaluation stopped before running every scenario.
    pub failure: Option<anyhow::Error>,
    /// Where the summary was written, if writing it succeeded.
    pub summary_path: Option<PathBuf>,
    /// Every state the evaluation passed through, in order.
    pub states: Vec<EvaluationState>,
}

impl EvaluationOutcome {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Turn the outcome into a process result.
    ///
    /// By default an evaluation that finished, even with failed runs, is a success. With
    /// `fail_on_empty` an early stop or a scenario without a single successful run is an error.
    pub fn check(&self, fail_on_empty: bool) -> anyhow::Result<()> {
        if !fail_on_empty {
            return Ok(());
        }

        if let Some(failure) = &self.failure {
            anyhow::bail!("Evaluation stopped early: {failure:#}");
        }

        let empty = self.report.scenarios_without_samples();
        if !empty.is_empty() {
            anyhow::bail!(
                "{} scenario(s) recorded no successful runs: {}",
                empty.len(),
                empty.join(", ")
            );
        }

        Ok(())
    }
}

struct StateTracker {
    states: Vec<EvaluationState>,
}

impl StateTracker {
    fn new() -> Self {
        Self {
            states: vec![EvaluationState::Idle],
        }
    }

    fn transition(&mut self, next: EvaluationState) {
        if let Some(current) = self.states.last() {
            log::debug!("Evaluation state: {current} -> {next}");
        }
        self.states.push(next);
    }
}

/// Run an evaluation with the reporters selected on the command line.
pub fn run<L: BrowserLauncher, E: AuditEngine>(
    definition: EvaluationDefinition,
    launcher: &L,
    engine: &mut E,
) -> anyhow::Result<EvaluationOutcome> {
    let mut config = ReportConfig::default().enable_summary();
    if definition.reporter == ReporterOpt::Log {
        config = config.enable_log();
    }
    if !definition.no_progress {
        config = config.enable_progress();
    }

    run_with_reporter(definition, launcher, engine, config.init())
}

/// Run an evaluation, sending its events to `reporter`.
///
/// Only returns an error if the evaluation could not be started at all. Once the browser launch
/// is attempted every failure is caught, the browser is closed if it was launched, and whatever
/// results were collected are reported and persisted.
pub fn run_with_reporter<L: BrowserLauncher, E: AuditEngine>(
    definition: EvaluationDefinition,
    launcher: &L,
    engine: &mut E,
    mut reporter: Reporter,
) -> anyhow::Result<EvaluationOutcome> {
    log::info!("Running evaluation: {}", definition.name);

    let started_at = chrono::Utc::now().timestamp();
    let ctx = RunnerContext::new(
        Executor::new()?,
        definition.browser.debugging_port,
        definition.run_id.clone(),
    );
    let mut state = StateTracker::new();
    let mut report = AggregatedReport::new();
    let mut browser: Option<L::Browser> = None;

    reporter.report(EvaluationEvent::EvaluationStarted {
        name: definition.name.clone(),
        scenarios: definition.scenarios.len(),
        runs_per_scenario: definition.run_count,
    });

    let evaluated = evaluate(
        &definition,
        &ctx,
        launcher,
        engine,
        &mut browser,
        &mut report,
        &mut reporter,
        &mut state,
    );
    if let Err(e) = &evaluated {
        state.transition(EvaluationState::Failed);
        log::error!("Evaluation failed: {e:?}");
        reporter.report(EvaluationEvent::EvaluationFailed {
            error: format!("{e:#}"),
        });
    }

    state.transition(EvaluationState::Closing);
    if let Some(browser) = browser.take() {
        match browser.close() {
            Ok(()) => log::info!("Browser closed"),
            Err(e) => log::warn!("Failed to close browser: {e:?}"),
        }
    }

    state.transition(EvaluationState::Reporting);
    reporter.report(EvaluationEvent::EvaluationCompleted {
        report: report.clone(),
    });
    reporter.finalize();

    let summary_path = persist_summary(&definition.results_dir, &report);
    record_run(&definition, started_at, &report, evaluated.is_ok());

    state.transition(EvaluationState::Done);
    log::info!("Evaluation complete");

    Ok(EvaluationOutcome {
        report,
        failure: evaluated.err(),
        summary_path,
        states: state.states,
    })
}

#[allow(clippy::too_many_arguments)]
fn evaluate<L: BrowserLauncher, E: AuditEngine>(
    definition: &EvaluationDefinition,
    ctx: &RunnerContext,
    launcher: &L,
    engine: &mut E,
    browser: &mut Option<L::Browser>,
    report: &mut AggregatedReport,
    reporter: &mut Reporter,
    state: &mut StateTracker,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(&definition.results_dir).with_context(|| {
        format!(
            "Failed to create results directory {}",
            definition.results_dir.display()
        )
    })?;
    log::info!(
        "Results will be saved in: {}",
        definition.results_dir.display()
    );

    state.transition(EvaluationState::Launching);
    let launched = launcher
        .launch(&definition.browser)
        .context("Failed to launch browser")?;
    log::info!(
        "Browser launched with debugging port {}",
        definition.browser.debugging_port
    );
    let browser = browser.insert(launched);

    state.transition(EvaluationState::Warmup);
    if !definition.warmup_targets.is_empty() {
        warm_up(
            browser,
            &definition.warmup_targets,
            definition.warmup_timeout,
            reporter,
        );
    }

    let total = definition.scenarios.len();
    for (i, scenario) in definition.scenarios.iter().enumerate() {
        state.transition(EvaluationState::Running {
            index: i + 1,
            total,
        });
        let result = run_scenario(
            ctx,
            engine,
            scenario,
            definition.run_count,
            definition.inter_run_delay,
            reporter,
        );
        report.insert(scenario.name.clone(), result);
    }

    Ok(())
}

fn persist_summary(results_dir: &Path, report: &AggregatedReport) -> Option<PathBuf> {
    let path = results_dir.join(SUMMARY_FILE_NAME);
    let written = std::fs::create_dir_all(results_dir)
        .with_context(|| format!("Failed to create results directory {}", results_dir.display()))
        .and_then(|_| write_report(report, &path));

    match written {
        Ok(()) => {
            log::info!("Summary results saved to: {}", path.display());
            Some(path)
        }
        Err(e) => {
            log::error!("Failed to write summary results file: {e:?}");
            None
        }
    }
}

fn record_run(
    definition: &EvaluationDefinition,
    started_at: i64,
    report: &AggregatedReport,
    completed: bool,
) {
    let mut summary = RunSummary::new(
        definition.run_id.clone(),
        definition.name.clone(),
        started_at,
        definition.run_count,
        definition.scenarios.iter().map(|s| s.name.clone()).collect(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    for (key, value) in &definition.recorded_env {
        summary.add_env(key.clone(), value.clone());
    }
    summary.record_report(report);
    summary.set_completed(completed);

    let path = definition.results_dir.join(RUN_SUMMARY_FILE_NAME);
    match append_run_summary(&summary, &path) {
        Ok(()) => log::debug!(
            "Recorded run {} ({}) in {}",
            summary.run_id,
            summary.fingerprint(),
            path.display()
        ),
        Err(e) => log::warn!("Failed to record run history in {}: {e:?}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydration_bench_summary_model::SampleBuffer;

    #[test]
    fn running_state_displays_progress() {
        let state = EvaluationState::Running { index: 2, total: 4 };
        assert_eq!(state.to_string(), "Running(2 of 4)");
        assert_eq!(EvaluationState::Closing.to_string(), "Closing");
    }

    #[test]
    fn check_passes_partial_results_by_default() {
        let mut report = AggregatedReport::new();
        report.insert("empty", SampleBuffer::new().summarise());
        let outcome = EvaluationOutcome {
            report,
            failure: Some(anyhow::anyhow!("launch failed")),
            summary_path: None,
            states: vec![],
        };

        assert!(outcome.check(false).is_ok());
        assert!(outcome.check(true).is_err());
    }

    #[test]
    fn check_rejects_scenario_without_samples() {
        let mut report = AggregatedReport::new();
        report.insert("empty", SampleBuffer::new().summarise());
        let outcome = EvaluationOutcome {
            report,
            failure: None,
            summary_path: None,
            states: vec![],
        };

        let err = outcome.check(true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "1 scenario(s) recorded no successful runs: empty"
        );
    }
}
