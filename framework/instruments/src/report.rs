mod in_memory_reporter;
mod log_reporter;
mod progress_reporter;
mod summary_report;

use hydration_bench_core::prelude::RunSample;
use hydration_bench_summary_model::{AggregatedReport, ScenarioResult};

pub use in_memory_reporter::InMemoryReporter;
pub use log_reporter::LogReporter;
pub use progress_reporter::ProgressReporter;
pub use summary_report::{print_summary, summary_table, SummaryReporter};

/// Something that happened during an evaluation.
///
/// The orchestrator emits these instead of writing to the console, so that the presentation is
/// chosen by whoever configures the [Reporter].
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationEvent {
    EvaluationStarted {
        name: String,
        scenarios: usize,
        runs_per_scenario: usize,
    },
    WarmupSucceeded {
        target: String,
        url: String,
    },
    WarmupFailed {
        target: String,
        url: String,
        error: String,
    },
    ScenarioStarted {
        scenario: String,
        runs: usize,
    },
    /// `run` is 1-based.
    RunCompleted {
        scenario: String,
        run: usize,
        runs: usize,
        sample: RunSample,
    },
    /// `run` is 1-based.
    RunFailed {
        scenario: String,
        run: usize,
        runs: usize,
        error: String,
    },
    ScenarioCompleted {
        scenario: String,
        result: ScenarioResult,
    },
    /// The evaluation stopped early. Whatever was collected is still reported.
    EvaluationFailed {
        error: String,
    },
    EvaluationCompleted {
        report: AggregatedReport,
    },
}

pub trait EventReporter {
    fn report(&mut self, event: &EvaluationEvent);

    /// Called once, after the final [EvaluationEvent::EvaluationCompleted].
    fn finalize(&mut self) {}
}

/// Fans events out to every configured [EventReporter].
#[derive(Default)]
pub struct Reporter {
    inner: Vec<Box<dyn EventReporter + Send>>,
}

impl Reporter {
    pub fn report(&mut self, event: EvaluationEvent) {
        for reporter in &mut self.inner {
            reporter.report(&event);
        }
    }

    pub fn finalize(&mut self) {
        for reporter in &mut self.inner {
            reporter.finalize();
        }
    }
}

/// Choose which reporters receive evaluation events.
#[derive(Default)]
pub struct ReportConfig {
    enable_log: bool,
    enable_progress: bool,
    enable_summary: bool,
    additional: Vec<Box<dyn EventReporter + Send>>,
}

impl ReportConfig {
    /// Log every event through the `log` facade.
    pub fn enable_log(mut self) -> Self {
        self.enable_log = true;
        self
    }

    /// Show a progress bar of completed audit runs.
    pub fn enable_progress(mut self) -> Self {
        self.enable_progress = true;
        self
    }

    /// Print the table of scenario medians when the evaluation finishes.
    pub fn enable_summary(mut self) -> Self {
        self.enable_summary = true;
        self
    }

    /// Add a custom reporter, such as an [InMemoryReporter] used by tests.
    pub fn with_reporter(mut self, reporter: impl EventReporter + Send + 'static) -> Self {
        self.additional.push(Box::new(reporter));
        self
    }

    pub fn init(self) -> Reporter {
        let mut inner: Vec<Box<dyn EventReporter + Send>> = Vec::new();
        if self.enable_progress {
            inner.push(Box::new(ProgressReporter::new()));
        }
        if self.enable_log {
            inner.push(Box::new(LogReporter));
        }
        if self.enable_summary {
            inner.push(Box::new(SummaryReporter::new()));
        }
        inner.extend(self.additional);

        Reporter { inner }
    }
}
