use crate::report::{EvaluationEvent, EventReporter};
use hydration_bench_core::prelude::Metric;
use hydration_bench_summary_model::AggregatedReport;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ScenarioRow {
    #[tabled(rename = "Scenario")]
    scenario: String,
    #[tabled(rename = "FCP (ms)", display = "float0")]
    fcp: f64,
    #[tabled(rename = "LCP (ms)", display = "float0")]
    lcp: f64,
    #[tabled(rename = "CLS", display = "float3")]
    cls: f64,
    #[tabled(rename = "TBT (ms)", display = "float0")]
    tbt: f64,
    #[tabled(rename = "TTI (ms)", display = "float0")]
    tti: f64,
    #[tabled(rename = "JS (kB)", display = "float1")]
    script_kb: f64,
    #[tabled(rename = "Samples")]
    samples: usize,
}

fn float0(n: &f64) -> String {
    format!("{:.0}", n)
}

fn float1(n: &f64) -> String {
    format!("{:.1}", n)
}

fn float3(n: &f64) -> String {
    format!("{:.3}", n)
}

/// Build the table of medians, one row per scenario.
pub fn summary_table(report: &AggregatedReport) -> Table {
    let rows = report
        .iter()
        .map(|(scenario, result)| ScenarioRow {
            scenario: scenario.to_string(),
            fcp: result.median(Metric::FirstContentfulPaint),
            lcp: result.median(Metric::LargestContentfulPaint),
            cls: result.median(Metric::CumulativeLayoutShift),
            tbt: result.median(Metric::TotalBlockingTime),
            tti: result.median(Metric::TimeToInteractive),
            script_kb: result.median(Metric::ScriptBytes) / 1024.0,
            samples: result.successful_runs(),
        })
        .collect::<Vec<_>>();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table
}

pub fn print_summary(report: &AggregatedReport) {
    println!("\nFinal median results summary");
    println!("{}", summary_table(report));
}

/// Prints the summary table once the evaluation has finished.
///
/// The table is printed even when the evaluation failed part way, using whatever results were
/// collected.
pub struct SummaryReporter {
    report: Option<AggregatedReport>,
}

impl SummaryReporter {
    pub fn new() -> Self {
        Self { report: None }
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventReporter for SummaryReporter {
    fn report(&mut self, event: &EvaluationEvent) {
        if let EvaluationEvent::EvaluationCompleted { report } = event {
            self.report = Some(report.clone());
        }
    }

    fn finalize(&mut self) {
        print_summary(&self.report.take().unwrap_or_default());
    }
}
