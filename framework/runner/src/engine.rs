use crate::audit_config::AuditConfig;
use crate::context::RunnerContext;
use hydration_bench_instruments::AuditResult;
use std::time::Duration;
use url::Url;

/// One audit to perform.
#[derive(Debug, Clone, Copy)]
pub struct AuditRequest<'a> {
    pub url: &'a Url,
    pub config: &'a AuditConfig,
}

/// Audits a page against the browser listening on [RunnerContext::debugging_port].
pub trait AuditEngine {
    /// Run a single audit.
    ///
    /// Return `Ok(None)` if the engine finished without producing a result. Both that and an error
    /// cause the run to be skipped.
    fn audit(
        &mut self,
        ctx: &RunnerContext,
        request: &AuditRequest<'_>,
    ) -> anyhow::Result<Option<AuditResult>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserOptions {
    pub headless: bool,
    /// Fixed so that the audit engine can attach to the same browser.
    pub debugging_port: u16,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            debugging_port: 9222,
        }
    }
}

pub trait BrowserLauncher {
    type Browser: Browser;

    fn launch(&self, options: &BrowserOptions) -> anyhow::Result<Self::Browser>;
}

/// A running browser process.
pub trait Browser {
    /// Navigate to `url` and wait until the page has loaded and the network is quiet.
    fn navigate(&mut self, url: &Url, timeout: Duration) -> anyhow::Result<()>;

    /// Shut the browser down. Consumes the handle so it cannot be closed twice.
    fn close(self) -> anyhow::Result<()>
    where
        Self: Sized;
}
