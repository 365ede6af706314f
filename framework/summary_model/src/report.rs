use anyhow::Context;
use hydration_bench_core::prelude::Metric;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

/// The aggregated result of all successful runs of one scenario.
///
/// Serializes as a map of metric name to median. The sample counts are kept alongside so that the
/// confidence behind each median can be inspected, but they are not part of the persisted summary
/// format.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    medians: BTreeMap<Metric, f64>,
    sample_counts: BTreeMap<Metric, usize>,
}

impl ScenarioResult {
    pub fn new(medians: BTreeMap<Metric, f64>, sample_counts: BTreeMap<Metric, usize>) -> Self {
        Self {
            medians,
            sample_counts,
        }
    }

    pub fn median(&self, metric: Metric) -> f64 {
        self.medians.get(&metric).copied().unwrap_or_default()
    }

    pub fn sample_count(&self, metric: Metric) -> usize {
        self.sample_counts.get(&metric).copied().unwrap_or_default()
    }

    pub fn medians(&self) -> &BTreeMap<Metric, f64> {
        &self.medians
    }

    pub fn sample_counts(&self) -> &BTreeMap<Metric, usize> {
        &self.sample_counts
    }

    /// Every successful run contributes one sample to each metric, so this is the largest count.
    pub fn successful_runs(&self) -> usize {
        self.sample_counts
            .values()
            .copied()
            .max()
            .unwrap_or_default()
    }
}

impl Serialize for ScenarioResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.medians.serialize(serializer)
    }
}

/// Scenario results keyed by scenario name, kept in the order the scenarios were run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedReport {
    scenarios: Vec<(String, ScenarioResult)>,
}

impl AggregatedReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result for a scenario, replacing any earlier result with the same name.
    pub fn insert(&mut self, scenario_name: impl Into<String>, result: ScenarioResult) {
        let scenario_name = scenario_name.into();
        match self
            .scenarios
            .iter_mut()
            .find(|(name, _)| *name == scenario_name)
        {
            Some((_, existing)) => *existing = result,
            None => self.scenarios.push((scenario_name, result)),
        }
    }

    pub fn get(&self, scenario_name: &str) -> Option<&ScenarioResult> {
        self.scenarios
            .iter()
            .find(|(name, _)| name == scenario_name)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScenarioResult)> {
        self.scenarios
            .iter()
            .map(|(name, result)| (name.as_str(), result))
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Names of the scenarios that did not record a single successful run.
    pub fn scenarios_without_samples(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, result)| result.successful_runs() == 0)
            .map(|(name, _)| name)
            .collect()
    }
}

impl Serialize for AggregatedReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.scenarios.len()))?;
        for (name, result) in &self.scenarios {
            map.serialize_entry(name, result)?;
        }
        map.end()
    }
}

/// A persisted summary as read back from disk: scenario name to metric medians, in file order.
///
/// Sample counts are not persisted in the summary file, so this is not an [AggregatedReport].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedSummary(pub Vec<(String, BTreeMap<Metric, f64>)>);

impl PersistedSummary {
    pub fn get(&self, scenario_name: &str) -> Option<&BTreeMap<Metric, f64>> {
        self.0
            .iter()
            .find(|(name, _)| name == scenario_name)
            .map(|(_, medians)| medians)
    }
}

impl<'de> Deserialize<'de> for PersistedSummary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SummaryVisitor;

        impl<'de> Visitor<'de> for SummaryVisitor {
            type Value = PersistedSummary;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of scenario name to metric medians")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or_default());
                while let Some((name, medians)) = access.next_entry()? {
                    entries.push((name, medians));
                }
                Ok(PersistedSummary(entries))
            }
        }

        deserializer.deserialize_map(SummaryVisitor)
    }
}

/// Serialize the report to a writer as pretty printed JSON.
pub fn store_report<W: Write>(report: &AggregatedReport, writer: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

/// Write the report to `path`, replacing any previous summary.
pub fn write_report(report: &AggregatedReport, path: &Path) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create summary file {}", path.display()))?;
    store_report(report, &mut file)?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Load a summary previously written by [write_report].
pub fn load_report<R: Read>(reader: R) -> anyhow::Result<PersistedSummary> {
    let reader = std::io::BufReader::new(reader);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SampleBuffer;
    use hydration_bench_core::prelude::RunSample;
    use pretty_assertions::assert_eq;

    fn result_with_fcp(values: &[f64]) -> ScenarioResult {
        let mut buffer = SampleBuffer::new();
        for v in values {
            buffer.push(&RunSample::new().with(Metric::FirstContentfulPaint, *v));
        }
        buffer.summarise()
    }

    #[test]
    fn report_serializes_scenarios_in_run_order() {
        let mut report = AggregatedReport::new();
        report.insert("Zeta", result_with_fcp(&[1.0]));
        report.insert("Alpha", result_with_fcp(&[2.0]));

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.find("Zeta").unwrap() < json.find("Alpha").unwrap());
        assert_eq!(
            json,
            r#"{"Zeta":{"FCP":1.0,"LCP":0.0,"CLS":0.0,"TBT":0.0,"TTI":0.0,"ScriptBytes":0.0},"Alpha":{"FCP":2.0,"LCP":0.0,"CLS":0.0,"TBT":0.0,"TTI":0.0,"ScriptBytes":0.0}}"#
        );
    }

    #[test]
    fn insert_replaces_existing_scenario() {
        let mut report = AggregatedReport::new();
        report.insert("Baseline", result_with_fcp(&[1.0]));
        report.insert("Baseline", result_with_fcp(&[9.0]));

        assert_eq!(report.len(), 1);
        assert_eq!(
            report
                .get("Baseline")
                .unwrap()
                .median(Metric::FirstContentfulPaint),
            9.0
        );
    }

    #[test]
    fn scenarios_without_samples_are_listed() {
        let mut report = AggregatedReport::new();
        report.insert("ok", result_with_fcp(&[1.0, 2.0]));
        report.insert("empty", SampleBuffer::new().summarise());

        assert_eq!(report.scenarios_without_samples(), vec!["empty"]);
    }

    #[test]
    fn written_summary_is_overwritten_and_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary_results.json");

        let mut first = AggregatedReport::new();
        first.insert("old", result_with_fcp(&[5.0]));
        write_report(&first, &path).unwrap();

        let mut second = AggregatedReport::new();
        second.insert("MRAH - Desktop Fast Network", result_with_fcp(&[100.0, 300.0]));
        write_report(&second, &path).unwrap();

        let loaded = load_report(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(loaded.0.len(), 1);
        assert_eq!(
            loaded.get("MRAH - Desktop Fast Network").unwrap()[&Metric::FirstContentfulPaint],
            200.0
        );
        assert!(loaded.get("old").is_none());
    }
}
