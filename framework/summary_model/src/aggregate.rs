use crate::ScenarioResult;
use hydration_bench_core::prelude::{Metric, RunSample};
use itertools::Itertools;
use std::collections::BTreeMap;

/// Calculate the median of a set of samples.
///
/// An empty input has a median of `0`. For an even number of samples the median is the mean of the
/// two central values. Samples are sorted numerically, so the input order does not matter.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let sorted = values
        .iter()
        .copied()
        .sorted_by(f64::total_cmp)
        .collect::<Vec<_>>();
    let half = sorted.len() / 2;

    if sorted.len() % 2 == 1 {
        sorted[half]
    } else {
        (sorted[half - 1] + sorted[half]) / 2.0
    }
}

/// Accumulates the samples of every successful run of one scenario, one buffer per [Metric].
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: BTreeMap<Metric, Vec<f64>>,
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self {
            samples: Metric::ALL.iter().map(|m| (*m, Vec::new())).collect(),
        }
    }

    /// Append every metric of a run to its buffer.
    pub fn push(&mut self, sample: &RunSample) {
        for (metric, value) in sample.iter() {
            self.samples.entry(metric).or_default().push(value);
        }
    }

    /// The samples collected so far for a metric.
    pub fn samples(&self, metric: Metric) -> &[f64] {
        self.samples
            .get(&metric)
            .map(|s| s.as_slice())
            .unwrap_or_default()
    }

    /// Number of runs pushed into this buffer.
    pub fn runs(&self) -> usize {
        self.samples
            .values()
            .map(|s| s.len())
            .max()
            .unwrap_or_default()
    }

    /// Reduce each metric buffer to its median.
    pub fn summarise(&self) -> ScenarioResult {
        let mut medians = BTreeMap::new();
        let mut sample_counts = BTreeMap::new();
        for metric in Metric::ALL {
            let samples = self.samples(metric);
            medians.insert(metric, median(samples));
            sample_counts.insert(metric, samples.len());
        }

        ScenarioResult::new(medians, sample_counts)
    }
}
