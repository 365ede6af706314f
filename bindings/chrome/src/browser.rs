use crate::quiet::QuietTracker;
use anyhow::Context;
use headless_chrome::Tab;
use hydration_bench_runner::prelude::Browser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

const NETWORK_QUIET_WINDOW: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(100);
const RESOURCE_COUNT_SCRIPT: &str = "performance.getEntriesByType('resource').length";

/// The shared Chrome process, with one tab used for warmup navigation.
///
/// The process is killed when this is dropped.
pub struct ChromeBrowser {
    browser: headless_chrome::Browser,
    tab: Arc<Tab>,
}

impl ChromeBrowser {
    pub(crate) fn new(browser: headless_chrome::Browser, tab: Arc<Tab>) -> Self {
        Self { browser, tab }
    }

    fn resource_count(&self) -> anyhow::Result<u64> {
        let value = self
            .tab
            .evaluate(RESOURCE_COUNT_SCRIPT, false)
            .context("Failed to read resource timing entries")?
            .value;

        Ok(value.and_then(|v| v.as_u64()).unwrap_or_default())
    }

    fn wait_for_network_quiet(&self, deadline: Instant) -> anyhow::Result<()> {
        let mut tracker = QuietTracker::new(NETWORK_QUIET_WINDOW, Instant::now());
        loop {
            if tracker.observe(self.resource_count()?, Instant::now()) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                anyhow::bail!("Network did not go quiet before the timeout");
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Browser for ChromeBrowser {
    fn navigate(&mut self, url: &Url, timeout: Duration) -> anyhow::Result<()> {
        let deadline = Instant::now() + timeout;

        self.tab
            .set_default_timeout(timeout)
            .navigate_to(url.as_str())
            .with_context(|| format!("Failed to navigate to {url}"))?
            .wait_until_navigated()
            .with_context(|| format!("Navigation did not complete for {url}"))?;

        self.wait_for_network_quiet(deadline)
            .with_context(|| format!("Page at {url} did not settle"))
    }

    fn close(self) -> anyhow::Result<()> {
        let closed = self.tab.close(false).context("Failed to close tab");
        log::debug!("Stopping Chrome");
        drop(self.browser);
        closed.map(|_| ())
    }
}
