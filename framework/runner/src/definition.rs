use crate::audit_config::AuditConfig;
use crate::cli::{HydrationBenchCli, ReporterOpt};
use crate::engine::BrowserOptions;
use crate::scenario_file::ScenarioFile;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// One measurement case: a page and the conditions it is audited under.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Unique within an evaluation. Used as the key of the persisted results.
    pub name: String,
    pub target_url: Url,
    pub audit_config: AuditConfig,
}

impl Scenario {
    pub fn new(name: impl Into<String>, target_url: Url, audit_config: AuditConfig) -> Self {
        Self {
            name: name.into(),
            target_url,
            audit_config,
        }
    }
}

/// An application that is checked for a response before any scenario runs.
#[derive(Debug, Clone, PartialEq)]
pub struct WarmupTarget {
    pub name: String,
    pub url: Url,
}

impl WarmupTarget {
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }
}

/// The builder for an evaluation definition.
///
/// The builder holds the defaults chosen by the evaluation binary, the command line can then
/// override them.
pub struct EvaluationDefinitionBuilder {
    /// The name of the evaluation, recorded in the run history.
    ///
    /// Recommended value is `env!("CARGO_PKG_NAME")`.
    name: String,
    cli: HydrationBenchCli,
    default_run_count: usize,
    scenarios: Vec<Scenario>,
    warmup_targets: Vec<WarmupTarget>,
    results_dir: PathBuf,
    inter_run_delay: Duration,
    warmup_timeout: Duration,
    browser: BrowserOptions,
    recorded_env: Vec<(String, String)>,
}

/// A validated evaluation, ready to [crate::run::run].
#[derive(Debug, Clone)]
pub struct EvaluationDefinition {
    pub name: String,
    pub run_count: usize,
    pub scenarios: Vec<Scenario>,
    pub warmup_targets: Vec<WarmupTarget>,
    pub results_dir: PathBuf,
    pub inter_run_delay: Duration,
    pub warmup_timeout: Duration,
    pub browser: BrowserOptions,
    pub run_id: String,
    pub reporter: ReporterOpt,
    pub no_progress: bool,
    pub recorded_env: Vec<(String, String)>,
}

impl EvaluationDefinitionBuilder {
    pub fn new(name: &str, cli: HydrationBenchCli) -> Self {
        Self {
            name: name.to_string(),
            cli,
            default_run_count: 5,
            scenarios: Vec::new(),
            warmup_targets: Vec::new(),
            results_dir: PathBuf::from("results"),
            inter_run_delay: Duration::from_millis(500),
            warmup_timeout: Duration::from_secs(30),
            browser: BrowserOptions::default(),
            recorded_env: Vec::new(),
        }
    }

    /// Number of audit runs per scenario unless the command line sets `--runs`.
    pub fn with_default_run_count(mut self, run_count: usize) -> Self {
        self.default_run_count = run_count;
        self
    }

    pub fn add_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    pub fn add_warmup_target(mut self, name: &str, url: Url) -> Self {
        self.warmup_targets.push(WarmupTarget::new(name, url));
        self
    }

    pub fn with_results_dir(mut self, results_dir: impl Into<PathBuf>) -> Self {
        self.results_dir = results_dir.into();
        self
    }

    /// Pause between consecutive runs of a scenario to let the browser settle.
    pub fn with_inter_run_delay(mut self, delay: Duration) -> Self {
        self.inter_run_delay = delay;
        self
    }

    pub fn with_warmup_timeout(mut self, timeout: Duration) -> Self {
        self.warmup_timeout = timeout;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.browser.headless = headless;
        self
    }

    /// Record a configuration value in the run history, where it also contributes to the
    /// configuration fingerprint.
    pub fn record_env(mut self, key: &str, value: impl ToString) -> Self {
        self.recorded_env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> anyhow::Result<EvaluationDefinition> {
        let mut scenarios = self.scenarios;
        let mut warmup_targets = self.warmup_targets;
        let mut run_count = self.default_run_count;

        if let Some(path) = &self.cli.scenarios {
            let file = ScenarioFile::load(path)?;
            log::info!(
                "Loaded {} scenarios from {}",
                file.scenarios.len(),
                path.display()
            );
            scenarios = file.scenarios();
            if !file.warmup.is_empty() {
                warmup_targets = file.warmup_targets();
            }
            if let Some(file_run_count) = file.run_count {
                run_count = file_run_count;
            }
        }

        if let Some(runs) = self.cli.runs {
            run_count = runs;
        }
        if run_count == 0 {
            anyhow::bail!("The run count must be at least 1");
        }

        if scenarios.is_empty() {
            anyhow::bail!("No scenarios configured for evaluation [{}]", self.name);
        }
        let mut seen = HashSet::new();
        for scenario in &scenarios {
            if !seen.insert(scenario.name.as_str()) {
                anyhow::bail!("Scenario [{}] is defined more than once", scenario.name);
            }
        }

        if self.cli.no_warmup {
            warmup_targets.clear();
        }

        let mut browser = self.browser;
        if let Some(port) = self.cli.debugging_port {
            browser.debugging_port = port;
        }

        Ok(EvaluationDefinition {
            name: self.name,
            run_count,
            scenarios,
            warmup_targets,
            results_dir: self.cli.results_dir.unwrap_or(self.results_dir),
            inter_run_delay: self.inter_run_delay,
            warmup_timeout: self.warmup_timeout,
            browser,
            run_id: self.cli.run_id.unwrap_or_else(|| nanoid::nanoid!()),
            reporter: self.cli.reporter,
            no_progress: self.cli.no_progress,
            recorded_env: self.recorded_env,
        })
    }
}
