mod aggregate;
mod report;

pub use aggregate::{median, SampleBuffer};
pub use report::{
    load_report, store_report, write_report, AggregatedReport, PersistedSummary, ScenarioResult,
};

use hydration_bench_core::prelude::Metric;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sha3::Digest;
use std::collections::{BTreeMap, HashMap};
use std::io::{BufRead, Write};
use std::path::Path;

/// Summary of one evaluation run, kept as a history of runs next to the summary results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// The unique run id
    ///
    /// Chosen by the runner unless provided on the command line.
    pub run_id: String,
    /// The name of the evaluation that was run
    pub evaluation_name: String,
    /// The time the run started
    ///
    /// This is a Unix timestamp in seconds.
    pub started_at: i64,
    /// The number of audit runs configured per scenario
    pub run_count: usize,
    /// The scenarios that were configured, in the order they were run
    pub scenarios: Vec<String>,
    /// The number of samples behind each median, by scenario
    ///
    /// A scenario that was never reached, for example because the browser failed to launch, is
    /// absent from this map.
    pub sample_counts: HashMap<String, BTreeMap<Metric, usize>>,
    /// Whether the evaluation reached the end of its scenario list
    pub completed: bool,
    /// Environment variables set for the run
    ///
    /// Only the ones the runner is aware of are captured.
    pub env: HashMap<String, String>,
    /// The version of the harness that produced this run
    pub harness_version: String,
}

impl RunSummary {
    /// Create a new run summary
    pub fn new(
        run_id: String,
        evaluation_name: String,
        started_at: i64,
        run_count: usize,
        scenarios: Vec<String>,
        harness_version: String,
    ) -> Self {
        Self {
            run_id,
            evaluation_name,
            started_at,
            run_count,
            scenarios,
            sample_counts: HashMap::new(),
            completed: false,
            env: HashMap::with_capacity(0),
            harness_version,
        }
    }

    /// Record the sample counts of every scenario in the report
    pub fn record_report(&mut self, report: &AggregatedReport) {
        for (name, result) in report.iter() {
            self.sample_counts
                .insert(name.to_string(), result.sample_counts().clone());
        }
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Add an environment variable
    pub fn add_env(&mut self, key: String, value: String) {
        self.env.insert(key, value);
    }

    /// Compute a fingerprint for this run summary
    ///
    /// The fingerprint identifies the configuration used for the run, so that results of runs with
    /// the same configuration can be compared. It uses the
    ///     - Evaluation name
    ///     - Run count
    ///     - Scenario names, in order
    ///     - Selected environment variables
    ///     - Harness version
    ///
    /// The fingerprint is computed using [sha3::Sha3_256].
    pub fn fingerprint(&self) -> String {
        let mut hasher = sha3::Sha3_256::new();
        Digest::update(&mut hasher, self.evaluation_name.as_bytes());
        Digest::update(&mut hasher, (self.run_count as u64).to_le_bytes());
        for scenario in &self.scenarios {
            Digest::update(&mut hasher, scenario.as_bytes());
        }
        self.env
            .iter()
            .sorted_by_key(|(k, _)| k.to_owned())
            .for_each(|(k, v)| {
                Digest::update(&mut hasher, k.as_bytes());
                Digest::update(&mut hasher, v.as_bytes());
            });
        Digest::update(&mut hasher, self.harness_version.as_bytes());

        format!("{:x}", hasher.finalize())
    }
}

/// Append the run summary to a file
///
/// The summary will be serialized to JSON and output as a single line followed by a newline. The
/// recommended file extension is `.jsonl`.
pub fn append_run_summary(run_summary: &RunSummary, path: &Path) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;
    store_run_summary(run_summary, &mut file)?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Serialize the run summary to a writer
pub fn store_run_summary<W: Write>(run_summary: &RunSummary, writer: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer(writer, run_summary)?;
    Ok(())
}

/// Load run summaries from a file
///
/// The file should contain one JSON object per line. This is the format produced by
/// [append_run_summary].
pub fn load_summary_runs(path: &Path) -> anyhow::Result<Vec<RunSummary>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut runs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let run: RunSummary = serde_json::from_str(&line)?;
        runs.push(run);
    }
    Ok(runs)
}
