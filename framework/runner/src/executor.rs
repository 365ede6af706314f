use anyhow::Context;
use std::future::Future;
use std::time::Duration;

/// Runs the async parts of an evaluation, such as audit subprocesses, one at a time.
///
/// Nothing runs in the background. Every future is driven to completion before the caller
/// continues.
#[derive(Debug)]
pub struct Executor {
    runtime: tokio::runtime::Runtime,
}

impl Executor {
    pub fn new() -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
        Ok(Self { runtime })
    }

    /// Run async code in place, blocking until it completes.
    pub fn execute_in_place<T>(
        &self,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> anyhow::Result<T> {
        self.runtime.block_on(fut)
    }

    /// Pause the evaluation.
    pub fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        self.runtime.block_on(tokio::time::sleep(duration));
    }
}
