use crate::definition::WarmupTarget;
use crate::engine::Browser;
use hydration_bench_instruments::{EvaluationEvent, Reporter};
use std::time::Duration;

/// Load each target once so that an application that is not running shows up before any
/// measurements are taken.
///
/// Never fails. Unreachable targets are reported as warnings and the evaluation carries on.
/// Returns the number of targets that responded.
pub(crate) fn warm_up<B: Browser>(
    browser: &mut B,
    targets: &[WarmupTarget],
    timeout: Duration,
    reporter: &mut Reporter,
) -> usize {
    let mut reachable = 0;
    for target in targets {
        log::debug!("Checking if {} is running at {}", target.name, target.url);
        match browser.navigate(&target.url, timeout) {
            Ok(()) => {
                reachable += 1;
                reporter.report(EvaluationEvent::WarmupSucceeded {
                    target: target.name.clone(),
                    url: target.url.to_string(),
                });
            }
            Err(e) => {
                reporter.report(EvaluationEvent::WarmupFailed {
                    target: target.name.clone(),
                    url: target.url.to_string(),
                    error: format!("{e:#}"),
                });
            }
        }
    }

    log::info!(
        "Warmup complete, {reachable} of {} targets responded",
        targets.len()
    );
    reachable
}
