use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReporterOpt {
    /// Log every evaluation event.
    Log,
    /// Only print the final summary table.
    Noop,
}

#[derive(Parser, Debug, Clone)]
#[command(about, long_about = None)]
pub struct HydrationBenchCli {
    /// The number of audit runs per scenario. The median of the runs is reported.
    ///
    /// Overrides the default configured by the evaluation and any `run_count` in a scenario file.
    #[clap(long)]
    pub runs: Option<usize>,

    /// Directory to write `summary_results.json` and the run history to.
    #[clap(long)]
    pub results_dir: Option<PathBuf>,

    /// Load the scenarios from a TOML file instead of using the ones built into the evaluation.
    #[clap(long)]
    pub scenarios: Option<PathBuf>,

    /// Skip checking that the target applications respond before measuring.
    #[clap(long, default_value = "false")]
    pub no_warmup: bool,

    /// Do not show a progress bar on the CLI.
    ///
    /// This is recommended for CI/CD environments where the progress bar isn't being looked at by anyone and is just adding noise to the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,

    /// The reporter to use.
    #[arg(long, value_enum, default_value_t = ReporterOpt::Log)]
    pub reporter: ReporterOpt,

    /// The remote debugging port the browser is launched with and Lighthouse connects to.
    #[clap(long)]
    pub debugging_port: Option<u16>,

    /// Set the ID of this run
    ///
    /// If not set, a random ID is used.
    #[arg(long, short)]
    pub run_id: Option<String>,

    /// Exit with an error if the evaluation stopped early or any scenario has no successful runs.
    #[clap(long, default_value = "false")]
    pub fail_on_empty: bool,
}

impl Default for HydrationBenchCli {
    fn default() -> Self {
        Self {
            runs: None,
            results_dir: None,
            scenarios: None,
            no_warmup: false,
            no_progress: false,
            reporter: ReporterOpt::Log,
            debugging_port: None,
            run_id: None,
            fail_on_empty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_keeps_defaults() {
        let cli = HydrationBenchCli::try_parse_from(["hydration_comparison"]).unwrap();

        assert_eq!(cli.runs, None);
        assert_eq!(cli.reporter, ReporterOpt::Log);
        assert!(!cli.no_warmup);
        assert!(!cli.fail_on_empty);
    }

    #[test]
    fn parses_overrides() {
        let cli = HydrationBenchCli::try_parse_from([
            "hydration_comparison",
            "--runs",
            "3",
            "--reporter",
            "noop",
            "--no-progress",
            "--debugging-port",
            "9333",
            "-r",
            "nightly",
        ])
        .unwrap();

        assert_eq!(cli.runs, Some(3));
        assert_eq!(cli.reporter, ReporterOpt::Noop);
        assert!(cli.no_progress);
        assert_eq!(cli.debugging_port, Some(9333));
        assert_eq!(cli.run_id.as_deref(), Some("nightly"));
    }
}
