use crate::AuditResult;
use hydration_bench_core::prelude::{Metric, RunSample};
use serde_json::Value;

const NETWORK_REQUESTS_AUDIT: &str = "network-requests";
const TOTAL_BYTE_WEIGHT_AUDIT: &str = "total-byte-weight";

/// Extract the [Metric]s of one audit run.
///
/// Extraction never fails. A metric whose audit is missing, or that has no numeric value, is
/// recorded as `0`.
pub fn extract_metrics(result: &AuditResult) -> RunSample {
    if !result.has_audits() {
        log::warn!("Lighthouse audits object not found in result");
        return RunSample::new();
    }

    let mut sample = RunSample::new();
    for metric in Metric::ALL {
        let value = match metric.audit_id() {
            Some(audit_id) => result.numeric_value(audit_id).unwrap_or_default(),
            None => script_bytes(result),
        };
        sample.set(metric, value);
    }

    sample
}

/// Transferred JavaScript bytes.
///
/// Prefer the sum of script requests from the network requests audit. Some result shapes do not
/// classify requests there, so fall back to the script row of the total byte weight breakdown.
fn script_bytes(result: &AuditResult) -> f64 {
    let from_requests = result
        .detail_items(NETWORK_REQUESTS_AUDIT)
        .iter()
        .filter(|item| resource_type(item) == Some("Script"))
        .map(|item| number_field(item, "transferSize"))
        .sum::<f64>();

    if from_requests > 0.0 {
        return from_requests;
    }

    result
        .detail_items(TOTAL_BYTE_WEIGHT_AUDIT)
        .iter()
        .find(|item| matches!(resource_type(item), Some("script") | Some("Script")))
        .map(|item| number_field(item, "totalBytes"))
        .unwrap_or_default()
}

fn resource_type(item: &Value) -> Option<&str> {
    item.get("resourceType").and_then(Value::as_str)
}

fn number_field(item: &Value, field: &str) -> f64 {
    item.get(field).and_then(Value::as_f64).unwrap_or_default()
}
