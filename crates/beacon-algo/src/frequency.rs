use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::aggregate::AggregateCounts;

/// Empirical probability per group: its share of all historical incidents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbabilityMap(BTreeMap<String, f64>);

impl ProbabilityMap {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(key, p)| (key.as_str(), *p))
    }

    /// Largest probability, or 0 for an empty map.
    pub fn max_probability(&self) -> f64 {
        self.0.values().copied().fold(0.0, f64::max)
    }

    /// The `n` most likely groups, probability descending.
    ///
    /// Equal probabilities are ordered by group name ascending.
    pub fn ranked(&self, n: usize) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> =
            self.0.iter().map(|(key, p)| (key.clone(), *p)).collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(n);
        ranked
    }
}

/// Normalize counts into frequencies (`count / total`).
///
/// An empty count map produces an empty probability map.
pub fn frequency_forecast(counts: &AggregateCounts) -> ProbabilityMap {
    let total = counts.total();
    if total == 0 {
        return ProbabilityMap::default();
    }
    let total = total as f64;
    ProbabilityMap(
        counts
            .iter()
            .map(|(key, count)| (key.to_string(), count as f64 / total))
            .collect(),
    )
}
