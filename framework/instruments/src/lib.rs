mod audit_result;
mod extract;
mod report;

pub use audit_result::AuditResult;
pub use extract::extract_metrics;
pub use report::{
    print_summary, summary_table, EvaluationEvent, EventReporter, InMemoryReporter, LogReporter,
    ProgressReporter, ReportConfig, Reporter, SummaryReporter,
};
