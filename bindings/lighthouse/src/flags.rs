use hydration_bench_runner::prelude::{AuditConfig, ThrottlingMethod};
use url::Url;

/// Build the `lighthouse` command line for auditing `url` in the Chrome listening on `port`.
///
/// The result is printed as JSON on stdout.
pub fn audit_flags(url: &Url, config: &AuditConfig, port: u16, headless: bool) -> Vec<String> {
    let mut flags = vec![
        url.to_string(),
        format!("--port={port}"),
        "--output=json".to_string(),
        "--output-path=stdout".to_string(),
        "--quiet".to_string(),
        format!("--form-factor={}", config.form_factor.as_str()),
        format!("--screenEmulation.mobile={}", config.screen_emulation.mobile),
        format!("--screenEmulation.width={}", config.screen_emulation.width),
        format!("--screenEmulation.height={}", config.screen_emulation.height),
        format!(
            "--screenEmulation.deviceScaleFactor={}",
            config.screen_emulation.device_scale_factor
        ),
        format!("--throttling-method={}", config.throttling_method.as_str()),
    ];

    if config.throttling_method == ThrottlingMethod::Simulate {
        if let Some(profile) = config.throttling {
            let settings = profile.settings();
            flags.extend([
                format!("--throttling.rttMs={}", settings.rtt_ms),
                format!("--throttling.throughputKbps={}", settings.throughput_kbps),
                format!("--throttling.requestLatencyMs={}", settings.request_latency_ms),
                format!(
                    "--throttling.downloadThroughputKbps={}",
                    settings.download_throughput_kbps
                ),
                format!(
                    "--throttling.uploadThroughputKbps={}",
                    settings.upload_throughput_kbps
                ),
                format!(
                    "--throttling.cpuSlowdownMultiplier={}",
                    settings.cpu_slowdown_multiplier
                ),
            ]);
        }
    }

    if !config.only_categories.is_empty() {
        flags.push(format!(
            "--only-categories={}",
            config.only_categories.join(",")
        ));
    }
    flags.push(format!(
        "--max-wait-for-fcp={}",
        config.max_wait_for_fcp.as_millis()
    ));
    flags.push(format!(
        "--max-wait-for-load={}",
        config.max_wait_for_load.as_millis()
    ));
    if !config.skip_audits.is_empty() {
        flags.push(format!("--skip-audits={}", config.skip_audits.join(",")));
    }
    // Only applies if Lighthouse has to start its own Chrome because nothing answers on `port`.
    if headless {
        flags.push("--chrome-flags=--headless=new".to_string());
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn url() -> Url {
        Url::parse("http://localhost:3000/products/123").unwrap()
    }

    #[test]
    fn desktop_preset_uses_provided_network() {
        let flags = audit_flags(&url(), &AuditConfig::desktop_fast(), 9222, true);

        assert_eq!(
            flags,
            vec![
                "http://localhost:3000/products/123",
                "--port=9222",
                "--output=json",
                "--output-path=stdout",
                "--quiet",
                "--form-factor=desktop",
                "--screenEmulation.mobile=false",
                "--screenEmulation.width=1350",
                "--screenEmulation.height=940",
                "--screenEmulation.deviceScaleFactor=1",
                "--throttling-method=provided",
                "--only-categories=performance",
                "--max-wait-for-fcp=30000",
                "--max-wait-for-load=60000",
                "--chrome-flags=--headless=new",
            ]
        );
    }

    #[test]
    fn mobile_preset_passes_throttling_settings() {
        let flags = audit_flags(&url(), &AuditConfig::mobile_slow(), 9333, false);

        for expected in [
            "--port=9333",
            "--form-factor=mobile",
            "--screenEmulation.mobile=true",
            "--screenEmulation.width=360",
            "--screenEmulation.deviceScaleFactor=2",
            "--throttling-method=simulate",
            "--throttling.rttMs=150",
            "--throttling.throughputKbps=1638.4",
            "--throttling.cpuSlowdownMultiplier=4",
            "--max-wait-for-fcp=45000",
            "--max-wait-for-load=90000",
        ] {
            assert!(
                flags.iter().any(|f| f == expected),
                "missing {expected} in {flags:?}"
            );
        }
        assert!(!flags.iter().any(|f| f.starts_with("--chrome-flags")));
    }

    #[test]
    fn throttling_profile_is_ignored_without_simulation() {
        let mut config = AuditConfig::mobile_slow();
        config.throttling_method = ThrottlingMethod::Provided;

        let flags = audit_flags(&url(), &config, 9222, true);
        assert!(!flags.iter().any(|f| f.starts_with("--throttling.")));
    }

    #[test]
    fn skipped_audits_are_joined() {
        let mut config = AuditConfig::desktop_fast();
        config.skip_audits = vec![
            "screenshot-thumbnails".to_string(),
            "final-screenshot".to_string(),
        ];

        let flags = audit_flags(&url(), &config, 9222, true);
        assert!(flags
            .iter()
            .any(|f| f == "--skip-audits=screenshot-thumbnails,final-screenshot"));
    }
}
