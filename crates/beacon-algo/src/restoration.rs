use beacon_core::IncidentRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Restoration durations in hours, in input order.
///
/// Only incidents with both timestamps and a finite, non-negative duration
/// contribute; see [`IncidentRecord::restoration_hours`].
pub fn sample_restoration_hours(incidents: &[IncidentRecord]) -> Vec<f64> {
    incidents
        .iter()
        .filter_map(IncidentRecord::restoration_hours)
        .collect()
}

/// Mean time to restore over a sample set, `None` when there are no samples.
pub fn mean_time_to_restore(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Average restoration time of a single feeder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeederRestoration {
    pub feeder: String,
    pub mean_hours: f64,
    pub samples: usize,
}

#[derive(Default)]
struct RestorationStats {
    sum: f64,
    count: usize,
}

/// Mean restoration hours per feeder label, slowest first.
pub fn restoration_by_feeder(incidents: &[IncidentRecord]) -> Vec<FeederRestoration> {
    let mut stats: BTreeMap<String, RestorationStats> = BTreeMap::new();
    for incident in incidents {
        let (Some(label), Some(hours)) = (incident.feeder_label(), incident.restoration_hours())
        else {
            continue;
        };
        let entry = stats.entry(label).or_default();
        entry.sum += hours;
        entry.count += 1;
    }

    let mut rows: Vec<FeederRestoration> = stats
        .into_iter()
        .map(|(feeder, stats)| FeederRestoration {
            feeder,
            mean_hours: stats.sum / stats.count as f64,
            samples: stats.count,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.mean_hours
            .partial_cmp(&a.mean_hours)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::FeederId;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 6, 0, 0).unwrap()
    }

    fn restored_after(id: &str, feeder: u32, hours: i64) -> IncidentRecord {
        IncidentRecord::new(id)
            .with_feeder(FeederId::new(feeder), None)
            .with_times(Some(t0()), Some(t0() + Duration::hours(hours)))
    }

    #[test]
    fn negative_durations_are_never_sampled() {
        let incidents = vec![
            restored_after("ok", 1, 3),
            restored_after("backwards", 1, -2),
            IncidentRecord::new("open").with_times(Some(t0()), None),
        ];
        let samples = sample_restoration_hours(&incidents);
        assert_eq!(samples, vec![3.0]);
        assert!(samples.iter().all(|h| *h >= 0.0));
    }

    #[test]
    fn samples_preserve_input_order() {
        let incidents = vec![restored_after("a", 1, 9), restored_after("b", 1, 1)];
        assert_eq!(sample_restoration_hours(&incidents), vec![9.0, 1.0]);
    }

    #[test]
    fn mttr_of_empty_sample_is_none() {
        assert_eq!(mean_time_to_restore(&[]), None);
        assert_eq!(mean_time_to_restore(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn feeder_averages_sorted_slowest_first() {
        let incidents = vec![
            restored_after("a", 1, 2),
            restored_after("b", 1, 4),
            restored_after("c", 2, 12),
            IncidentRecord::new("d").with_times(Some(t0()), Some(t0() + Duration::hours(50))),
        ];
        let rows = restoration_by_feeder(&incidents);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].feeder, "Feeder 2");
        assert_eq!(rows[0].mean_hours, 12.0);
        assert_eq!(rows[1].feeder, "Feeder 1");
        assert_eq!(rows[1].mean_hours, 3.0);
        assert_eq!(rows[1].samples, 2);
    }
}
