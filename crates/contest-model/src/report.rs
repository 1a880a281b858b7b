//! Batch Report Types
//!
//! Aggregated results of many independent trials.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Outcome;

/// Frequency count of outcome labels.
///
/// Keys are kept sorted so the histogram reads as an ordered list of
/// `(label, count)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Histogram {
    counts: BTreeMap<String, u64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of an outcome
    pub fn record(&mut self, outcome: &Outcome) {
        self.add(outcome.label(), 1);
    }

    /// Add `count` occurrences of a label
    pub fn add(&mut self, label: &str, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(label.to_string()).or_insert(0) += count;
    }

    /// Fold another histogram into this one
    pub fn merge(&mut self, other: Histogram) {
        for (label, count) in other.counts {
            *self.counts.entry(label).or_insert(0) += count;
        }
    }

    pub fn get(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(label, &count)| (label.as_str(), count))
    }

    /// Pairs ordered by label
    pub fn to_pairs(&self) -> Vec<(String, u64)> {
        self.counts
            .iter()
            .map(|(label, &count)| (label.clone(), count))
            .collect()
    }

    /// Pairs ordered by descending count, ties broken by label
    pub fn ranked(&self) -> Vec<(String, u64)> {
        let mut pairs = self.to_pairs();
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        pairs
    }
}

/// A trial that did not produce an outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialFailure {
    pub trial_index: u64,
    /// Seed the trial ran with, for replaying it in isolation
    pub seed: u64,
    pub reason: String,
}

/// Everything a batch run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Trials dispatched
    pub trial_count: u64,
    pub master_seed: u64,
    pub histogram: Histogram,
    /// Failed trials, ordered by index
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<TrialFailure>,
    /// Rounds summed over completed trials
    pub total_rounds: u64,
}

impl BatchReport {
    /// Trials that produced an outcome
    pub fn completed(&self) -> u64 {
        self.histogram.total()
    }

    pub fn failed(&self) -> u64 {
        self.failures.len() as u64
    }

    /// True when every dispatched trial produced an outcome
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.completed() == self.trial_count
    }

    /// Mean rounds per completed trial
    pub fn mean_rounds(&self) -> f64 {
        let completed = self.completed();
        if completed == 0 {
            return 0.0;
        }
        self.total_rounds as f64 / completed as f64
    }

    /// Share of completed trials that reported `label`
    pub fn share(&self, label: &str) -> f64 {
        let completed = self.completed();
        if completed == 0 {
            return 0.0;
        }
        self.histogram.get(label) as f64 / completed as f64
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
