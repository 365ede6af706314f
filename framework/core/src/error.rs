use std::time::Duration;

/// Return this error when the audit engine finished without producing a result.
///
/// The scenario runner treats it like any other audit failure: the run is skipped and contributes
/// no samples.
#[derive(derive_more::Error, derive_more::Display, Debug)]
pub struct EmptyAuditResultError {
    msg: String,
}

impl Default for EmptyAuditResultError {
    fn default() -> Self {
        Self {
            msg: "Audit engine returned no result".to_string(),
        }
    }
}

/// The audit did not finish within its configured bound.
#[derive(derive_more::Error, derive_more::Display, Debug)]
#[display("Audit did not complete within {timeout_ms}ms")]
pub struct AuditTimeoutError {
    timeout_ms: u128,
}

impl AuditTimeoutError {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout_ms: timeout.as_millis(),
        }
    }
}
