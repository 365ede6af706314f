use serde::{Deserialize, Serialize};
use std::fmt;

/// The performance signals measured for every audit run.
///
/// The declaration order is the order metrics appear in reports and in the persisted summary.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Metric {
    /// First contentful paint, in milliseconds.
    #[serde(rename = "FCP")]
    #[display("FCP")]
    FirstContentfulPaint,
    /// Largest contentful paint, in milliseconds.
    #[serde(rename = "LCP")]
    #[display("LCP")]
    LargestContentfulPaint,
    /// Cumulative layout shift, unitless.
    #[serde(rename = "CLS")]
    #[display("CLS")]
    CumulativeLayoutShift,
    /// Total blocking time, in milliseconds.
    #[serde(rename = "TBT")]
    #[display("TBT")]
    TotalBlockingTime,
    /// Time to interactive, in milliseconds.
    #[serde(rename = "TTI")]
    #[display("TTI")]
    TimeToInteractive,
    /// Transferred bytes of JavaScript resources.
    #[serde(rename = "ScriptBytes")]
    #[display("ScriptBytes")]
    ScriptBytes,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::FirstContentfulPaint,
        Metric::LargestContentfulPaint,
        Metric::CumulativeLayoutShift,
        Metric::TotalBlockingTime,
        Metric::TimeToInteractive,
        Metric::ScriptBytes,
    ];

    /// The Lighthouse audit whose `numericValue` holds this metric.
    ///
    /// [Metric::ScriptBytes] is derived from several audits, so it has no single audit id.
    pub fn audit_id(&self) -> Option<&'static str> {
        match self {
            Metric::FirstContentfulPaint => Some("first-contentful-paint"),
            Metric::LargestContentfulPaint => Some("largest-contentful-paint"),
            Metric::CumulativeLayoutShift => Some("cumulative-layout-shift"),
            Metric::TotalBlockingTime => Some("total-blocking-time"),
            Metric::TimeToInteractive => Some("interactive"),
            Metric::ScriptBytes => None,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// One value per [Metric], captured from a single audit run.
///
/// Values are always finite and non-negative. Anything else is stored as `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSample {
    values: [f64; Metric::ALL.len()],
}

impl RunSample {
    /// A sample with every metric set to `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style version of [RunSample::set].
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, value);
        self
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        self.values[metric.index()] = if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        };
    }

    pub fn get(&self, metric: Metric) -> f64 {
        self.values[metric.index()]
    }

    /// Iterate the metrics in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.iter().map(|m| (*m, self.get(*m)))
    }
}

impl fmt::Display for RunSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FCP={:.0} TBT={:.0} TTI={:.0} LCP={:.0} CLS={:.3} JS={:.1}kB",
            self.get(Metric::FirstContentfulPaint),
            self.get(Metric::TotalBlockingTime),
            self.get(Metric::TimeToInteractive),
            self.get(Metric::LargestContentfulPaint),
            self.get(Metric::CumulativeLayoutShift),
            self.get(Metric::ScriptBytes) / 1024.0,
        )
    }
}
