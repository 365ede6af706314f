use hydration_bench_runner::prelude::{
    run_with_reporter, AuditConfig, AuditEngine, AuditRequest, AuditResult, Browser,
    BrowserLauncher, BrowserOptions, EvaluationDefinition, EvaluationDefinitionBuilder,
    EvaluationEvent, EvaluationState, HydrationBenchCli, InMemoryReporter, Metric, ReportConfig,
    ReporterOpt, RunnerContext, Scenario, RUN_SUMMARY_FILE_NAME, SUMMARY_FILE_NAME,
};
use hydration_bench_summary_model::{load_report, load_summary_runs};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Default, Clone)]
struct BrowserCalls {
    launched: Arc<AtomicUsize>,
    navigated: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

struct StubLauncher {
    fail_launch: bool,
    unreachable_port: Option<u16>,
    calls: BrowserCalls,
}

struct StubBrowser {
    unreachable_port: Option<u16>,
    calls: BrowserCalls,
}

impl BrowserLauncher for StubLauncher {
    type Browser = StubBrowser;

    fn launch(&self, _options: &BrowserOptions) -> anyhow::Result<Self::Browser> {
        self.calls.launched.fetch_add(1, Ordering::SeqCst);
        if self.fail_launch {
            anyhow::bail!("Could not find a Chrome executable");
        }
        Ok(StubBrowser {
            unreachable_port: self.unreachable_port,
            calls: self.calls.clone(),
        })
    }
}

impl Browser for StubBrowser {
    fn navigate(&mut self, url: &Url, _timeout: Duration) -> anyhow::Result<()> {
        self.calls.navigated.fetch_add(1, Ordering::SeqCst);
        if url.port().is_some() && url.port() == self.unreachable_port {
            anyhow::bail!("net::ERR_CONNECTION_REFUSED");
        }
        Ok(())
    }

    fn close(self) -> anyhow::Result<()> {
        self.calls.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Returns FCP values 100, 200, 300... across every call, failing on the listed calls.
struct SequenceEngine {
    calls: usize,
    fail_on: Vec<usize>,
}

impl AuditEngine for SequenceEngine {
    fn audit(
        &mut self,
        _ctx: &RunnerContext,
        request: &AuditRequest<'_>,
    ) -> anyhow::Result<Option<AuditResult>> {
        self.calls += 1;
        if self.fail_on.contains(&self.calls) {
            anyhow::bail!("Lighthouse exited with status 1");
        }
        Ok(Some(AuditResult::new(json!({
            "finalUrl": request.url.as_str(),
            "audits": {
                "first-contentful-paint": { "numericValue": self.calls as f64 * 100.0 },
                "total-blocking-time": { "numericValue": 50.0 },
                "cumulative-layout-shift": { "numericValue": 0.01 },
                "network-requests": {
                    "details": {
                        "items": [
                            { "resourceType": "Script", "transferSize": 2048 },
                            { "resourceType": "Image", "transferSize": 9000 }
                        ]
                    }
                }
            }
        }))))
    }
}

fn definition(results_dir: &Path, scenarios: &[&str]) -> EvaluationDefinition {
    let cli = HydrationBenchCli {
        no_progress: true,
        reporter: ReporterOpt::Noop,
        results_dir: Some(results_dir.to_path_buf()),
        ..Default::default()
    };

    let mut builder = EvaluationDefinitionBuilder::new("evaluation_flow", cli)
        .with_inter_run_delay(Duration::ZERO)
        .add_warmup_target("Baseline app", Url::parse("http://localhost:3000/").unwrap())
        .add_warmup_target("MRAH app", Url::parse("http://localhost:3001/").unwrap());
    for name in scenarios {
        builder = builder.add_scenario(Scenario::new(
            *name,
            Url::parse("http://localhost:3000/products/123").unwrap(),
            AuditConfig::desktop_fast(),
        ));
    }

    builder.build().unwrap()
}

fn read_summary(results_dir: &Path) -> hydration_bench_summary_model::PersistedSummary {
    let file = std::fs::File::open(results_dir.join(SUMMARY_FILE_NAME)).unwrap();
    load_report(file).unwrap()
}

#[test]
fn medians_are_persisted_for_every_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let calls = BrowserCalls::default();
    let launcher = StubLauncher {
        fail_launch: false,
        unreachable_port: None,
        calls: calls.clone(),
    };
    let mut engine = SequenceEngine {
        calls: 0,
        fail_on: vec![],
    };
    let events = InMemoryReporter::new();
    let reporter = ReportConfig::default().with_reporter(events.clone()).init();

    let outcome = run_with_reporter(
        definition(dir.path(), &["Baseline - Desktop Fast Network"]),
        &launcher,
        &mut engine,
        reporter,
    )
    .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(engine.calls, 5);
    assert_eq!(calls.launched.load(Ordering::SeqCst), 1);
    assert_eq!(calls.navigated.load(Ordering::SeqCst), 2);
    assert_eq!(calls.closed.load(Ordering::SeqCst), 1);
    assert!(events.is_finalized());

    let summary = read_summary(dir.path());
    let medians = summary.get("Baseline - Desktop Fast Network").unwrap();
    assert_eq!(medians[&Metric::FirstContentfulPaint], 300.0);
    assert_eq!(medians[&Metric::TotalBlockingTime], 50.0);
    assert_eq!(medians[&Metric::CumulativeLayoutShift], 0.01);
    assert_eq!(medians[&Metric::LargestContentfulPaint], 0.0);
    assert_eq!(medians[&Metric::ScriptBytes], 2048.0);

    assert_eq!(
        outcome.states,
        vec![
            EvaluationState::Idle,
            EvaluationState::Launching,
            EvaluationState::Warmup,
            EvaluationState::Running { index: 1, total: 1 },
            EvaluationState::Closing,
            EvaluationState::Reporting,
            EvaluationState::Done,
        ]
    );
    assert!(outcome.check(true).is_ok());
}

#[test]
fn scenarios_keep_their_configured_order() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = StubLauncher {
        fail_launch: false,
        unreachable_port: None,
        calls: BrowserCalls::default(),
    };
    let mut engine = SequenceEngine {
        calls: 0,
        fail_on: vec![],
    };

    let names = [
        "MRAH - Mobile Slow 3G",
        "Baseline - Desktop Fast Network",
        "Baseline - Mobile Slow 3G",
    ];
    run_with_reporter(
        definition(dir.path(), &names),
        &launcher,
        &mut engine,
        ReportConfig::default().init(),
    )
    .unwrap();

    let summary = read_summary(dir.path());
    let persisted: Vec<&str> = summary.0.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(persisted, names.to_vec());

    // Runs are numbered across scenarios, so the second scenario sees calls 6 to 10.
    assert_eq!(
        summary.get("Baseline - Desktop Fast Network").unwrap()[&Metric::FirstContentfulPaint],
        800.0
    );
}

#[test]
fn failed_runs_are_excluded_from_medians() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = StubLauncher {
        fail_launch: false,
        unreachable_port: None,
        calls: BrowserCalls::default(),
    };
    let mut engine = SequenceEngine {
        calls: 0,
        fail_on: vec![2],
    };

    let outcome = run_with_reporter(
        definition(dir.path(), &["Baseline - Desktop Fast Network"]),
        &launcher,
        &mut engine,
        ReportConfig::default().init(),
    )
    .unwrap();

    let result = outcome
        .report
        .get("Baseline - Desktop Fast Network")
        .unwrap();
    assert_eq!(result.sample_count(Metric::FirstContentfulPaint), 4);
    assert_eq!(result.median(Metric::FirstContentfulPaint), 350.0);
    assert!(outcome.is_complete());
}

#[test]
fn unreachable_warmup_target_does_not_stop_evaluation() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = StubLauncher {
        fail_launch: false,
        unreachable_port: Some(3001),
        calls: BrowserCalls::default(),
    };
    let mut engine = SequenceEngine {
        calls: 0,
        fail_on: vec![],
    };
    let events = InMemoryReporter::new();

    let outcome = run_with_reporter(
        definition(dir.path(), &["Baseline - Desktop Fast Network"]),
        &launcher,
        &mut engine,
        ReportConfig::default().with_reporter(events.clone()).init(),
    )
    .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(engine.calls, 5);
    assert!(events.events().iter().any(|e| matches!(
        e,
        EvaluationEvent::WarmupFailed { target, .. } if target == "MRAH app"
    )));
}

#[test]
fn launch_failure_still_writes_summary() {
    let dir = tempfile::tempdir().unwrap();
    let calls = BrowserCalls::default();
    let launcher = StubLauncher {
        fail_launch: true,
        unreachable_port: None,
        calls: calls.clone(),
    };
    let mut engine = SequenceEngine {
        calls: 0,
        fail_on: vec![],
    };
    let events = InMemoryReporter::new();

    let outcome = run_with_reporter(
        definition(dir.path(), &["Baseline - Desktop Fast Network"]),
        &launcher,
        &mut engine,
        ReportConfig::default().with_reporter(events.clone()).init(),
    )
    .unwrap();

    assert!(!outcome.is_complete());
    assert!(outcome.report.is_empty());
    assert_eq!(engine.calls, 0);
    assert_eq!(calls.closed.load(Ordering::SeqCst), 0);
    assert_eq!(
        outcome.summary_path.as_deref(),
        Some(dir.path().join(SUMMARY_FILE_NAME).as_path())
    );
    assert!(read_summary(dir.path()).0.is_empty());

    assert_eq!(
        outcome.states,
        vec![
            EvaluationState::Idle,
            EvaluationState::Launching,
            EvaluationState::Failed,
            EvaluationState::Closing,
            EvaluationState::Reporting,
            EvaluationState::Done,
        ]
    );
    assert!(events
        .events()
        .iter()
        .any(|e| matches!(e, EvaluationEvent::EvaluationFailed { .. })));
    assert!(outcome.check(false).is_ok());
    assert!(outcome.check(true).is_err());
}

#[test]
fn run_history_is_appended() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = StubLauncher {
        fail_launch: false,
        unreachable_port: None,
        calls: BrowserCalls::default(),
    };

    for _ in 0..2 {
        let mut engine = SequenceEngine {
            calls: 0,
            fail_on: vec![1, 2, 3, 4, 5],
        };
        let outcome = run_with_reporter(
            definition(dir.path(), &["Baseline - Desktop Fast Network"]),
            &launcher,
            &mut engine,
            ReportConfig::default().init(),
        )
        .unwrap();
        assert!(outcome.check(true).is_err());
    }

    let runs = load_summary_runs(&dir.path().join(RUN_SUMMARY_FILE_NAME)).unwrap();
    assert_eq!(runs.len(), 2);
    assert!(runs.iter().all(|r| r.completed));
    assert_eq!(runs[0].fingerprint(), runs[1].fingerprint());
    assert_eq!(
        runs[0].sample_counts["Baseline - Desktop Fast Network"][&Metric::FirstContentfulPaint],
        0
    );
}

#[test]
fn unusable_results_dir_stops_before_launch() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let calls = BrowserCalls::default();
    let launcher = StubLauncher {
        fail_launch: false,
        unreachable_port: None,
        calls: calls.clone(),
    };
    let mut engine = SequenceEngine {
        calls: 0,
        fail_on: vec![],
    };

    let outcome = run_with_reporter(
        definition(&blocker.join("results"), &["Baseline - Desktop Fast Network"]),
        &launcher,
        &mut engine,
        ReportConfig::default().init(),
    )
    .unwrap();

    assert!(!outcome.is_complete());
    assert!(outcome.summary_path.is_none());
    assert_eq!(engine.calls, 0);
    assert_eq!(calls.launched.load(Ordering::SeqCst), 0);
    assert_eq!(calls.closed.load(Ordering::SeqCst), 0);
    assert_eq!(
        outcome.states,
        vec![
            EvaluationState::Idle,
            EvaluationState::Failed,
            EvaluationState::Closing,
            EvaluationState::Reporting,
            EvaluationState::Done,
        ]
    );
}

#[test]
fn summary_write_failure_still_completes() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the summary file should go makes the write fail.
    std::fs::create_dir(dir.path().join(SUMMARY_FILE_NAME)).unwrap();
    let calls = BrowserCalls::default();
    let launcher = StubLauncher {
        fail_launch: false,
        unreachable_port: None,
        calls: calls.clone(),
    };
    let mut engine = SequenceEngine {
        calls: 0,
        fail_on: vec![],
    };

    let outcome = run_with_reporter(
        definition(dir.path(), &["Baseline - Desktop Fast Network"]),
        &launcher,
        &mut engine,
        ReportConfig::default().init(),
    )
    .unwrap();

    assert!(outcome.is_complete());
    assert!(outcome.summary_path.is_none());
    assert_eq!(calls.closed.load(Ordering::SeqCst), 1);
    assert_eq!(
        outcome
            .report
            .get("Baseline - Desktop Fast Network")
            .unwrap()
            .median(Metric::FirstContentfulPaint),
        300.0
    );
    assert_eq!(outcome.states.last(), Some(&EvaluationState::Done));
    assert!(outcome.check(true).is_ok());

    let runs = load_summary_runs(&dir.path().join(RUN_SUMMARY_FILE_NAME)).unwrap();
    assert_eq!(runs.len(), 1);
}
