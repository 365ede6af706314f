use serde_json::Value;

/// A read-only view over a Lighthouse result (LHR).
///
/// The result is kept as untyped JSON because different Lighthouse versions report the audit
/// details in different shapes. Every accessor tolerates missing or mistyped fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditResult(Value);

impl AuditResult {
    pub fn new(lhr: Value) -> Self {
        Self(lhr)
    }

    /// Parse the JSON printed by `lighthouse --output=json`.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        Ok(Self(serde_json::from_str(json)?))
    }

    pub fn has_audits(&self) -> bool {
        self.0.get("audits").is_some_and(Value::is_object)
    }

    /// The `numericValue` of an audit, if the audit exists and reported one.
    pub fn numeric_value(&self, audit_id: &str) -> Option<f64> {
        self.audit(audit_id)?.get("numericValue")?.as_f64()
    }

    /// The `details.items` of an audit, or nothing if the audit has no item list.
    pub fn detail_items(&self, audit_id: &str) -> &[Value] {
        self.audit(audit_id)
            .and_then(|audit| audit.get("details"))
            .and_then(|details| details.get("items"))
            .and_then(Value::as_array)
            .map(|items| items.as_slice())
            .unwrap_or_default()
    }

    /// The URL Lighthouse finally audited, after redirects.
    pub fn final_url(&self) -> Option<&str> {
        self.0
            .get("finalDisplayedUrl")
            .or_else(|| self.0.get("finalUrl"))
            .and_then(Value::as_str)
    }

    /// A fatal error Lighthouse recorded while still producing a result, such as a page that
    /// failed to load.
    pub fn runtime_error(&self) -> Option<&str> {
        self.0
            .get("runtimeError")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
    }

    fn audit(&self, audit_id: &str) -> Option<&Value> {
        self.0.get("audits")?.get(audit_id)
    }
}
