use crate::context::RunnerContext;
use crate::definition::Scenario;
use crate::engine::{AuditEngine, AuditRequest};
use hydration_bench_core::prelude::{EmptyAuditResultError, RunSample};
use hydration_bench_instruments::{extract_metrics, EvaluationEvent, Reporter};
use hydration_bench_summary_model::{SampleBuffer, ScenarioResult};
use std::time::Duration;

/// Audit a scenario `run_count` times and reduce the runs to their medians.
///
/// A failed run is reported and skipped. It adds nothing to the sample buffers, so the medians are
/// taken over the successful runs only.
pub(crate) fn run_scenario<E: AuditEngine>(
    ctx: &RunnerContext,
    engine: &mut E,
    scenario: &Scenario,
    run_count: usize,
    inter_run_delay: Duration,
    reporter: &mut Reporter,
) -> ScenarioResult {
    reporter.report(EvaluationEvent::ScenarioStarted {
        scenario: scenario.name.clone(),
        runs: run_count,
    });

    let mut buffer = SampleBuffer::new();
    for run in 1..=run_count {
        match audit_once(ctx, engine, scenario) {
            Ok(sample) => {
                buffer.push(&sample);
                reporter.report(EvaluationEvent::RunCompleted {
                    scenario: scenario.name.clone(),
                    run,
                    runs: run_count,
                    sample,
                });
            }
            Err(e) => {
                log::debug!("Run {run} of {} failed: {e:?}", scenario.name);
                reporter.report(EvaluationEvent::RunFailed {
                    scenario: scenario.name.clone(),
                    run,
                    runs: run_count,
                    error: format!("{e:#}"),
                });
            }
        }

        if run < run_count {
            ctx.executor().sleep(inter_run_delay);
        }
    }

    let result = buffer.summarise();
    reporter.report(EvaluationEvent::ScenarioCompleted {
        scenario: scenario.name.clone(),
        result: result.clone(),
    });

    result
}

fn audit_once<E: AuditEngine>(
    ctx: &RunnerContext,
    engine: &mut E,
    scenario: &Scenario,
) -> anyhow::Result<RunSample> {
    let request = AuditRequest {
        url: &scenario.target_url,
        config: &scenario.audit_config,
    };
    let result = engine
        .audit(ctx, &request)?
        .ok_or_else(|| anyhow::Error::new(EmptyAuditResultError::default()))?;

    if let Some(runtime_error) = result.runtime_error() {
        log::warn!(
            "Lighthouse reported a runtime error for {}: {runtime_error}",
            scenario.name
        );
    }

    Ok(extract_metrics(&result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit_config::AuditConfig;
    use crate::executor::Executor;
    use hydration_bench_core::prelude::Metric;
    use hydration_bench_instruments::{AuditResult, InMemoryReporter, ReportConfig};
    use serde_json::json;
    use url::Url;

    /// Reports an increasing FCP on every call and fails on the listed calls.
    struct CountingEngine {
        calls: usize,
        fail_on: Vec<usize>,
        empty_on: Vec<usize>,
    }

    impl AuditEngine for CountingEngine {
        fn audit(
            &mut self,
            _ctx: &RunnerContext,
            _request: &AuditRequest<'_>,
        ) -> anyhow::Result<Option<AuditResult>> {
            self.calls += 1;
            if self.fail_on.contains(&self.calls) {
                anyhow::bail!("Lighthouse exited with status 1");
            }
            if self.empty_on.contains(&self.calls) {
                return Ok(None);
            }
            Ok(Some(AuditResult::new(json!({
                "audits": {
                    "first-contentful-paint": { "numericValue": self.calls as f64 * 100.0 }
                }
            }))))
        }
    }

    fn context() -> RunnerContext {
        RunnerContext::new(Executor::new().unwrap(), 9222, "test".to_string())
    }

    fn scenario() -> Scenario {
        Scenario::new(
            "Baseline - Desktop Fast Network",
            Url::parse("http://localhost:3000/products/123").unwrap(),
            AuditConfig::desktop_fast(),
        )
    }

    #[test]
    fn failed_run_is_skipped_and_later_runs_continue() {
        let events = InMemoryReporter::new();
        let mut reporter = ReportConfig::default().with_reporter(events.clone()).init();
        let mut engine = CountingEngine {
            calls: 0,
            fail_on: vec![2],
            empty_on: vec![],
        };

        let result = run_scenario(
            &context(),
            &mut engine,
            &scenario(),
            5,
            Duration::ZERO,
            &mut reporter,
        );

        assert_eq!(engine.calls, 5);
        for metric in Metric::ALL {
            assert_eq!(result.sample_count(metric), 4);
        }
        // Runs 1, 3, 4 and 5 succeeded.
        assert_eq!(result.median(Metric::FirstContentfulPaint), 350.0);

        let failures = events
            .events()
            .into_iter()
            .filter(|e| matches!(e, EvaluationEvent::RunFailed { run: 2, .. }))
            .count();
        assert_eq!(failures, 1);
    }

    #[test]
    fn empty_result_counts_as_failure() {
        let events = InMemoryReporter::new();
        let mut reporter = ReportConfig::default().with_reporter(events.clone()).init();
        let mut engine = CountingEngine {
            calls: 0,
            fail_on: vec![],
            empty_on: vec![1, 2, 3],
        };

        let result = run_scenario(
            &context(),
            &mut engine,
            &scenario(),
            3,
            Duration::ZERO,
            &mut reporter,
        );

        assert_eq!(result.successful_runs(), 0);
        assert_eq!(result.median(Metric::FirstContentfulPaint), 0.0);
        assert!(events.events().iter().any(|e| matches!(
            e,
            EvaluationEvent::RunFailed { error, .. } if error == "Audit engine returned no result"
        )));
    }
}
