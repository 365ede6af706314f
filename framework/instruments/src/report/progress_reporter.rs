use crate::report::{EvaluationEvent, EventReporter};
use indicatif::{ProgressBar, ProgressStyle};

/// Displays a progress bar of audit runs while the evaluation is running.
///
/// Failed runs count as progress too, the bar tracks how many runs are left rather than how many
/// succeeded.
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self { bar: None }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventReporter for ProgressReporter {
    fn report(&mut self, event: &EvaluationEvent) {
        match event {
            EvaluationEvent::EvaluationStarted {
                scenarios,
                runs_per_scenario,
                ..
            } => {
                let bar = ProgressBar::new((scenarios * runs_per_scenario) as u64);
                match ProgressStyle::with_template(
                    "{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} runs [{elapsed_precise}] {msg}",
                ) {
                    Ok(style) => bar.set_style(style.progress_chars("#>-")),
                    Err(e) => log::trace!("Falling back to default progress style: {e}"),
                }
                self.bar = Some(bar);
            }
            EvaluationEvent::ScenarioStarted { scenario, .. } => {
                if let Some(bar) = &self.bar {
                    bar.set_message(scenario.clone());
                }
            }
            EvaluationEvent::RunCompleted { .. } | EvaluationEvent::RunFailed { .. } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                }
            }
            EvaluationEvent::EvaluationFailed { .. }
            | EvaluationEvent::EvaluationCompleted { .. } => self.finish(),
            _ => {}
        }
    }

    fn finalize(&mut self) {
        self.finish();
    }
}
