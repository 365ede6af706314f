mod audit_config;
mod cli;
mod context;
mod definition;
mod engine;
mod executor;
mod init;
mod run;
mod scenario;
mod scenario_file;
mod types;
mod warmup;

pub mod prelude {
    pub use crate::audit_config::{
        AuditConfig, FormFactor, ScreenEmulation, ThrottlingMethod, ThrottlingProfile,
        ThrottlingSettings,
    };
    pub use crate::cli::{HydrationBenchCli, ReporterOpt};
    pub use crate::context::RunnerContext;
    pub use crate::definition::{
        EvaluationDefinition, EvaluationDefinitionBuilder, Scenario, WarmupTarget,
    };
    pub use crate::engine::{AuditEngine, AuditRequest, Browser, BrowserLauncher, BrowserOptions};
    pub use crate::executor::Executor;
    pub use crate::init::init;
    pub use crate::run::{
        run, run_with_reporter, EvaluationOutcome, EvaluationState, RUN_SUMMARY_FILE_NAME,
        SUMMARY_FILE_NAME,
    };
    pub use crate::types::HydrationBenchResult;

    pub use hydration_bench_core::prelude::*;
    pub use hydration_bench_instruments::{
        AuditResult, EvaluationEvent, EventReporter, InMemoryReporter, ReportConfig, Reporter,
    };
    pub use hydration_bench_summary_model::{AggregatedReport, ScenarioResult};
}
