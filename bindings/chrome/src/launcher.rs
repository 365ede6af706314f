use crate::browser::ChromeBrowser;
use anyhow::Context;
use headless_chrome::LaunchOptionsBuilder;
use hydration_bench_runner::prelude::{BrowserLauncher, BrowserOptions};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;

/// How long the browser connection may sit idle.
///
/// Lighthouse drives the browser between warmup navigations, so the connection this process holds
/// stays idle for the whole evaluation.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(60 * 60 * 6);

/// Launches Chrome with its remote debugging port open for the audit engine.
#[derive(Debug, Clone, Default)]
pub struct HeadlessChromeLauncher {
    chrome_path: Option<PathBuf>,
}

impl HeadlessChromeLauncher {
    /// Use the Chrome found by `headless_chrome`'s usual lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the Chrome or Chromium executable at `path`.
    pub fn with_chrome_path(mut self, path: Option<PathBuf>) -> Self {
        self.chrome_path = path;
        self
    }
}

impl BrowserLauncher for HeadlessChromeLauncher {
    type Browser = ChromeBrowser;

    fn launch(&self, options: &BrowserOptions) -> anyhow::Result<Self::Browser> {
        let mut builder = LaunchOptionsBuilder::default();
        builder
            .headless(options.headless)
            .sandbox(false)
            .port(Some(options.debugging_port))
            .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
            .args(vec![
                OsStr::new("--disable-background-networking"),
                OsStr::new("--disable-component-update"),
                OsStr::new("--disable-default-apps"),
                OsStr::new("--disable-sync"),
                OsStr::new("--mute-audio"),
                OsStr::new("--no-first-run"),
            ]);
        if let Some(path) = &self.chrome_path {
            builder.path(Some(path.clone()));
        }
        let launch_options = builder
            .build()
            .context("Unable to construct Chrome launch options")?;

        log::debug!(
            "Launching Chrome with debugging port {}",
            options.debugging_port
        );
        let browser =
            headless_chrome::Browser::new(launch_options).context("Failed to launch Chrome")?;
        let tab = browser.new_tab().context("Failed to open a tab")?;

        Ok(ChromeBrowser::new(browser, tab))
    }
}
