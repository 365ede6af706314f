use crate::report::{EvaluationEvent, EventReporter};
use parking_lot::Mutex;
use std::sync::Arc;

/// Keeps every event in memory.
///
/// Clones share the same event list, so keep a clone before handing the reporter to a
/// [crate::ReportConfig] and inspect it once the evaluation is over.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReporter {
    events: Arc<Mutex<Vec<EvaluationEvent>>>,
    finalized: Arc<Mutex<bool>>,
}

impl InMemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EvaluationEvent> {
        self.events.lock().clone()
    }

    pub fn is_finalized(&self) -> bool {
        *self.finalized.lock()
    }
}

impl EventReporter for InMemoryReporter {
    fn report(&mut self, event: &EvaluationEvent) {
        self.events.lock().push(event.clone());
    }

    fn finalize(&mut self) {
        *self.finalized.lock() = true;
    }
}
