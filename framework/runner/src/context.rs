use crate::executor::Executor;

/// Shared state for one evaluation, handed to the [crate::engine::AuditEngine] on every run.
#[derive(Debug)]
pub struct RunnerContext {
    executor: Executor,
    debugging_port: u16,
    run_id: String,
}

impl RunnerContext {
    pub fn new(executor: Executor, debugging_port: u16, run_id: String) -> Self {
        Self {
            executor,
            debugging_port,
            run_id,
        }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// The port the shared browser exposes its debugging protocol on.
    pub fn debugging_port(&self) -> u16 {
        self.debugging_port
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}
