use crate::audit_config::{
    AuditConfig, FormFactor, ScreenEmulation, ThrottlingMethod, ThrottlingProfile,
};
use crate::definition::{Scenario, WarmupTarget};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Scenarios loaded from a TOML file.
///
/// ```toml
/// run_count = 3
///
/// [[warmup]]
/// name = "Baseline app"
/// url = "http://localhost:3000/"
///
/// [[scenario]]
/// name = "Baseline - Mobile Slow 3G"
/// url = "http://localhost:3000/products/123"
/// preset = "mobile_slow"
/// throttling = "mobileRegular3G"
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScenarioFile {
    pub run_count: Option<usize>,
    #[serde(default)]
    pub warmup: Vec<WarmupEntry>,
    #[serde(default, rename = "scenario")]
    pub scenarios: Vec<ScenarioEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct WarmupEntry {
    pub name: String,
    pub url: Url,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Preset {
    DesktopFast,
    MobileSlow,
}

/// A scenario built from a preset, with optional overrides of individual settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScenarioEntry {
    pub name: String,
    pub url: Url,
    pub preset: Preset,
    pub form_factor: Option<FormFactor>,
    pub screen_emulation: Option<ScreenEmulation>,
    pub throttling_method: Option<ThrottlingMethod>,
    pub throttling: Option<ThrottlingProfile>,
    pub only_categories: Option<Vec<String>>,
    pub max_wait_for_fcp_ms: Option<u64>,
    pub max_wait_for_load_ms: Option<u64>,
    pub skip_audits: Option<Vec<String>>,
}

impl ScenarioFile {
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid scenario file {}", path.display()))
    }

    pub(crate) fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub(crate) fn warmup_targets(&self) -> Vec<WarmupTarget> {
        self.warmup
            .iter()
            .map(|w| WarmupTarget::new(w.name.clone(), w.url.clone()))
            .collect()
    }

    pub(crate) fn scenarios(&self) -> Vec<Scenario> {
        self.scenarios.iter().map(ScenarioEntry::to_scenario).collect()
    }
}

impl ScenarioEntry {
    fn to_scenario(&self) -> Scenario {
        let mut config = match self.preset {
            Preset::DesktopFast => AuditConfig::desktop_fast(),
            Preset::MobileSlow => AuditConfig::mobile_slow(),
        };

        if let Some(form_factor) = self.form_factor {
            config.form_factor = form_factor;
        }
        if let Some(screen) = self.screen_emulation {
            config.screen_emulation = screen;
        }
        if let Some(method) = self.throttling_method {
            config.throttling_method = method;
        }
        if let Some(throttling) = self.throttling {
            config.throttling = Some(throttling);
        }
        if let Some(categories) = &self.only_categories {
            config.only_categories = categories.clone();
        }
        if let Some(ms) = self.max_wait_for_fcp_ms {
            config.max_wait_for_fcp = Duration::from_millis(ms);
        }
        if let Some(ms) = self.max_wait_for_load_ms {
            config.max_wait_for_load = Duration::from_millis(ms);
        }
        if let Some(skip) = &self.skip_audits {
            config.skip_audits = skip.clone();
        }

        Scenario::new(self.name.clone(), self.url.clone(), config)
    }
}
