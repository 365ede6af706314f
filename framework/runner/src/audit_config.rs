use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Margin on top of [AuditConfig::max_wait_for_load] for Lighthouse to process the trace and
/// produce its result.
const AUDIT_PROCESSING_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormFactor {
    Desktop,
    Mobile,
}

impl FormFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormFactor::Desktop => "desktop",
            FormFactor::Mobile => "mobile",
        }
    }
}

/// The viewport the page is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreenEmulation {
    pub mobile: bool,
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
}

impl ScreenEmulation {
    pub fn desktop() -> Self {
        Self {
            mobile: false,
            width: 1350,
            height: 940,
            device_scale_factor: 1.0,
        }
    }

    pub fn mobile() -> Self {
        Self {
            mobile: true,
            width: 360,
            height: 640,
            device_scale_factor: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottlingMethod {
    /// No throttling is applied by Lighthouse, the network is used as provided.
    Provided,
    /// Lighthouse loads the page unthrottled and simulates the throttled timings.
    Simulate,
}

impl ThrottlingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThrottlingMethod::Provided => "provided",
            ThrottlingMethod::Simulate => "simulate",
        }
    }
}

/// Named network and CPU throttling presets, matching the ones Lighthouse ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThrottlingProfile {
    #[serde(rename = "mobileSlow4G")]
    MobileSlow4G,
    #[serde(rename = "mobileRegular3G")]
    MobileRegular3G,
    #[serde(rename = "desktopDense4G")]
    DesktopDense4G,
}

/// The values behind a [ThrottlingProfile].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottlingSettings {
    pub rtt_ms: f64,
    pub throughput_kbps: f64,
    pub request_latency_ms: f64,
    pub download_throughput_kbps: f64,
    pub upload_throughput_kbps: f64,
    pub cpu_slowdown_multiplier: f64,
}

impl ThrottlingProfile {
    pub fn name(&self) -> &'static str {
        match self {
            ThrottlingProfile::MobileSlow4G => "mobileSlow4G",
            ThrottlingProfile::MobileRegular3G => "mobileRegular3G",
            ThrottlingProfile::DesktopDense4G => "desktopDense4G",
        }
    }

    pub fn settings(&self) -> ThrottlingSettings {
        // DevTools throttling needs request latency and throughput adjusted to behave like the
        // simulated round trip time and throughput.
        const RTT_ADJUSTMENT: f64 = 3.75;
        const THROUGHPUT_ADJUSTMENT: f64 = 0.9;

        match self {
            ThrottlingProfile::MobileSlow4G => ThrottlingSettings {
                rtt_ms: 150.0,
                throughput_kbps: 1.6 * 1024.0,
                request_latency_ms: 150.0 * RTT_ADJUSTMENT,
                download_throughput_kbps: 1.6 * 1024.0 * THROUGHPUT_ADJUSTMENT,
                upload_throughput_kbps: 750.0 * THROUGHPUT_ADJUSTMENT,
                cpu_slowdown_multiplier: 4.0,
            },
            ThrottlingProfile::MobileRegular3G => ThrottlingSettings {
                rtt_ms: 300.0,
                throughput_kbps: 700.0,
                request_latency_ms: 300.0 * RTT_ADJUSTMENT,
                download_throughput_kbps: 700.0 * THROUGHPUT_ADJUSTMENT,
                upload_throughput_kbps: 700.0 * THROUGHPUT_ADJUSTMENT,
                cpu_slowdown_multiplier: 4.0,
            },
            ThrottlingProfile::DesktopDense4G => ThrottlingSettings {
                rtt_ms: 40.0,
                throughput_kbps: 10.0 * 1024.0,
                request_latency_ms: 0.0,
                download_throughput_kbps: 0.0,
                upload_throughput_kbps: 0.0,
                cpu_slowdown_multiplier: 1.0,
            },
        }
    }
}

/// How a scenario's page is audited.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditConfig {
    pub form_factor: FormFactor,
    pub screen_emulation: ScreenEmulation,
    pub throttling_method: ThrottlingMethod,
    /// Only used with [ThrottlingMethod::Simulate]. Lighthouse's own default applies when unset.
    pub throttling: Option<ThrottlingProfile>,
    pub only_categories: Vec<String>,
    pub max_wait_for_fcp: Duration,
    pub max_wait_for_load: Duration,
    pub skip_audits: Vec<String>,
}

impl AuditConfig {
    /// Desktop viewport on an unthrottled network.
    pub fn desktop_fast() -> Self {
        Self {
            form_factor: FormFactor::Desktop,
            screen_emulation: ScreenEmulation::desktop(),
            throttling_method: ThrottlingMethod::Provided,
            throttling: None,
            only_categories: vec!["performance".to_string()],
            max_wait_for_fcp: Duration::from_secs(30),
            max_wait_for_load: Duration::from_secs(60),
            skip_audits: Vec::new(),
        }
    }

    /// Mobile viewport with a simulated slow 4G network and a 4x CPU slowdown.
    pub fn mobile_slow() -> Self {
        Self {
            form_factor: FormFactor::Mobile,
            screen_emulation: ScreenEmulation::mobile(),
            throttling_method: ThrottlingMethod::Simulate,
            throttling: Some(ThrottlingProfile::MobileSlow4G),
            only_categories: vec!["performance".to_string()],
            max_wait_for_fcp: Duration::from_secs(45),
            max_wait_for_load: Duration::from_secs(90),
            skip_audits: Vec::new(),
        }
    }

    /// The longest a single audit may take before it is abandoned as a failed run.
    pub fn audit_timeout(&self) -> Duration {
        self.max_wait_for_load + AUDIT_PROCESSING_MARGIN
    }
}
