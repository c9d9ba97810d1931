use beacon_core::IncidentRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Incident counts keyed by group (feeder label, area name, cause).
///
/// Keys are kept sorted so iteration, and every ranking derived from it, is
/// deterministic regardless of input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateCounts(BTreeMap<String, u64>);

impl AggregateCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: &str) {
        *self.0.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(key, count)| (key.as_str(), *count))
    }

    /// The `n` largest groups, count descending, name ascending on ties.
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked: Vec<(String, u64)> = self
            .0
            .iter()
            .map(|(key, count)| (key.clone(), *count))
            .collect();
        // BTreeMap order is already name-ascending and sort_by is stable.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl FromIterator<(String, u64)> for AggregateCounts {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        let mut counts = AggregateCounts::new();
        for (key, count) in iter {
            *counts.0.entry(key).or_insert(0) += count;
        }
        counts
    }
}

/// Feeder and area counts for one incident window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentCounts {
    pub by_feeder: AggregateCounts,
    pub by_area: AggregateCounts,
}

/// Group incidents by feeder label and by affected area.
///
/// Incidents without a feeder id are left out of the feeder counts. Each
/// listed area is incremented once, so an incident affecting N areas adds N
/// area events.
pub fn aggregate_incidents(incidents: &[IncidentRecord]) -> IncidentCounts {
    let mut counts = IncidentCounts::default();
    for incident in incidents {
        if let Some(label) = incident.feeder_label() {
            counts.by_feeder.increment(&label);
        }
        for area in &incident.affected_areas {
            counts.by_area.increment(area);
        }
    }
    counts
}

/// Incident counts by cause, with missing causes grouped under "Unknown".
pub fn count_by_cause(incidents: &[IncidentRecord]) -> AggregateCounts {
    let mut counts = AggregateCounts::new();
    for incident in incidents {
        counts.increment(incident.cause_label());
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::FeederId;

    #[test]
    fn empty_input_yields_empty_maps() {
        let counts = aggregate_incidents(&[]);
        assert!(counts.by_feeder.is_empty());
        assert!(counts.by_area.is_empty());
    }

    #[test]
    fn area_fan_out_counts_each_area_once() {
        let incident = IncidentRecord::new("a")
            .with_feeder(FeederId::new(1), Some("F1"))
            .with_areas(["A", "B"]);
        let counts = aggregate_incidents(&[incident]);

        assert_eq!(counts.by_area.get("A"), 1);
        assert_eq!(counts.by_area.get("B"), 1);
        assert_eq!(counts.by_feeder.get("F1"), 1);
        assert_eq!(counts.by_feeder.total(), 1);
    }

    #[test]
    fn unassigned_feeder_still_counts_areas() {
        let incident = IncidentRecord::new("a").with_areas(["Aurora Hill"]);
        let counts = aggregate_incidents(&[incident]);

        assert!(counts.by_feeder.is_empty());
        assert_eq!(counts.by_area.get("Aurora Hill"), 1);
    }

    #[test]
    fn unresolved_feeder_name_uses_synthetic_label() {
        let incidents = vec![
            IncidentRecord::new("a").with_feeder(FeederId::new(9), None),
            IncidentRecord::new("b").with_feeder(FeederId::new(9), None),
        ];
        let counts = aggregate_incidents(&incidents);
        assert_eq!(counts.by_feeder.get("Feeder 9"), 2);
    }

    #[test]
    fn top_breaks_ties_by_name() {
        let counts: AggregateCounts = vec![
            ("Loakan".to_string(), 2),
            ("Bakakeng".to_string(), 2),
            ("Camp 7".to_string(), 5),
        ]
        .into_iter()
        .collect();

        let top = counts.top(2);
        assert_eq!(top, vec![("Camp 7".to_string(), 5), ("Bakakeng".to_string(), 2)]);
    }

    #[test]
    fn causes_default_to_unknown() {
        let incidents = vec![
            IncidentRecord::new("a").with_cause("Vegetation"),
            IncidentRecord::new("b"),
            IncidentRecord::new("c").with_cause("Vegetation"),
        ];
        let counts = count_by_cause(&incidents);
        assert_eq!(counts.get("Vegetation"), 2);
        assert_eq!(counts.get("Unknown"), 1);
    }
}
