use crate::report::{EvaluationEvent, EventReporter};
use hydration_bench_summary_model::ScenarioResult;

/// Writes each event as a log line.
pub struct LogReporter;

impl EventReporter for LogReporter {
    fn report(&mut self, event: &EvaluationEvent) {
        match event {
            EvaluationEvent::EvaluationStarted {
                name,
                scenarios,
                runs_per_scenario,
            } => {
                log::info!(
                    "Starting evaluation {name}: {scenarios} scenarios, {runs_per_scenario} runs each"
                );
            }
            EvaluationEvent::WarmupSucceeded { target, url } => {
                log::info!("{target} is running at {url}");
            }
            EvaluationEvent::WarmupFailed { target, url, error } => {
                log::warn!("Could not reach {target} at {url}. Is it running? Error: {error}");
            }
            EvaluationEvent::ScenarioStarted { scenario, runs } => {
                log::info!("--- Running scenario: {scenario} ({runs} runs) ---");
            }
            EvaluationEvent::RunCompleted {
                scenario,
                run,
                runs,
                sample,
            } => {
                log::info!("Run {run}/{runs} for {scenario}: {sample}");
            }
            EvaluationEvent::RunFailed {
                scenario,
                run,
                runs,
                error,
            } => {
                log::error!("Run {run}/{runs} for {scenario} failed: {error}");
            }
            EvaluationEvent::ScenarioCompleted { scenario, result } => {
                log::info!(
                    "Median results for {scenario} from {} runs: {}",
                    result.successful_runs(),
                    join_medians(result)
                );
            }
            EvaluationEvent::EvaluationFailed { error } => {
                log::error!("Evaluation failed: {error}");
            }
            EvaluationEvent::EvaluationCompleted { report } => {
                log::info!("Evaluation complete with {} scenario results", report.len());
            }
        }
    }
}

fn join_medians(result: &ScenarioResult) -> String {
    result
        .medians()
        .iter()
        .map(|(metric, value)| format!("{metric}={value:.3}"))
        .collect::<Vec<_>>()
        .join(" ")
}
