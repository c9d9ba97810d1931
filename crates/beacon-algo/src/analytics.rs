//! Descriptive dashboard analytics over an incident window.
//!
//! These complement the forecast: cause and area frequency, when outages
//! cluster during the week, how long each feeder takes to come back, and how
//! the public feels about each cause.

use beacon_core::{IncidentRecord, SentimentSample};
use chrono::{Datelike, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::aggregate::{aggregate_incidents, count_by_cause, AggregateCounts};
use crate::restoration::{
    mean_time_to_restore, restoration_by_feeder, sample_restoration_hours, FeederRestoration,
};

pub const TOP_CAUSES: usize = 5;
pub const TOP_AREAS: usize = 8;

/// Cause label used for sentiment samples without a cause.
pub const OTHER_CAUSE: &str = "Other";

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    pub name: String,
    pub count: u64,
}

fn count_rows(counts: &AggregateCounts, n: usize) -> Vec<CountRow> {
    counts
        .top(n)
        .into_iter()
        .map(|(name, count)| CountRow { name, count })
        .collect()
}

/// Incident count for one (weekday, hour) slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakCell {
    /// 0 = Sunday.
    pub weekday: u32,
    pub hour: u32,
    pub count: u64,
}

impl PeakCell {
    pub fn weekday_name(&self) -> &'static str {
        WEEKDAYS[self.weekday as usize % 7]
    }
}

/// Count incidents by weekday and hour of their report time in `offset`.
///
/// Cells are ordered Sunday first, then by hour; empty slots are omitted.
pub fn peak_time_matrix(incidents: &[IncidentRecord], offset: FixedOffset) -> Vec<PeakCell> {
    let mut cells: BTreeMap<(u32, u32), u64> = BTreeMap::new();
    for created in incidents.iter().filter_map(|incident| incident.created_at) {
        let local = created.with_timezone(&offset);
        let key = (local.weekday().num_days_from_sunday(), local.hour());
        *cells.entry(key).or_insert(0) += 1;
    }
    cells
        .into_iter()
        .map(|((weekday, hour), count)| PeakCell {
            weekday,
            hour,
            count,
        })
        .collect()
}

/// Busiest slot; the earliest one wins a tie.
pub fn busiest_slot(cells: &[PeakCell]) -> Option<&PeakCell> {
    cells.iter().fold(None, |best: Option<&PeakCell>, cell| match best {
        Some(current) if current.count >= cell.count => Some(current),
        _ => Some(cell),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseSentiment {
    pub cause: String,
    pub mean_score: f64,
    pub samples: usize,
}

/// Mean sentiment per cause, most negative first.
pub fn sentiment_by_cause(samples: &[SentimentSample]) -> Vec<CauseSentiment> {
    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for sample in samples.iter().filter(|s| s.score.is_finite()) {
        let cause = match sample.cause.as_deref().map(str::trim) {
            Some(cause) if !cause.is_empty() => cause.to_string(),
            _ => OTHER_CAUSE.to_string(),
        };
        let entry = groups.entry(cause).or_insert((0.0, 0));
        entry.0 += sample.score;
        entry.1 += 1;
    }
    let mut rows: Vec<CauseSentiment> = groups
        .into_iter()
        .map(|(cause, (total, count))| CauseSentiment {
            cause,
            mean_score: total / count as f64,
            samples: count,
        })
        .collect();
    rows.sort_by(|a, b| {
        a.mean_score
            .partial_cmp(&b.mean_score)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

/// Everything the dashboard charts besides the forecast itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardAnalytics {
    pub incident_count: usize,
    pub feeder_counts: Vec<CountRow>,
    pub root_causes: Vec<CountRow>,
    pub area_impact: Vec<CountRow>,
    pub peak_times: Vec<PeakCell>,
    pub restoration_by_feeder: Vec<FeederRestoration>,
    pub mttr_hours: Option<f64>,
    pub sentiment: Vec<CauseSentiment>,
}

pub fn build_analytics(
    incidents: &[IncidentRecord],
    sentiment: &[SentimentSample],
    offset: FixedOffset,
) -> DashboardAnalytics {
    let counts = aggregate_incidents(incidents);
    DashboardAnalytics {
        incident_count: incidents.len(),
        feeder_counts: count_rows(&counts.by_feeder, counts.by_feeder.len()),
        root_causes: count_rows(&count_by_cause(incidents), TOP_CAUSES),
        area_impact: count_rows(&counts.by_area, TOP_AREAS),
        peak_times: peak_time_matrix(incidents, offset),
        restoration_by_feeder: restoration_by_feeder(incidents),
        mttr_hours: mean_time_to_restore(&sample_restoration_hours(incidents)),
        sentiment: sentiment_by_cause(sentiment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(day: u32, hour: u32) -> IncidentRecord {
        // June 2, 2024 is a Sunday
        IncidentRecord::new(format!("{day}-{hour}"))
            .with_times(Some(Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()), None)
    }

    #[test]
    fn peak_matrix_groups_by_weekday_and_hour() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let cells = peak_time_matrix(&[at(2, 14), at(9, 14), at(3, 8)], utc);

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0], PeakCell { weekday: 0, hour: 14, count: 2 });
        assert_eq!(cells[1].weekday_name(), "Mon");
        assert_eq!(busiest_slot(&cells).map(|c| c.count), Some(2));
    }

    #[test]
    fn peak_matrix_honours_offset() {
        let manila = FixedOffset::east_opt(8 * 3600).unwrap();
        let cells = peak_time_matrix(&[at(2, 20)], manila);
        // 20:00Z Sunday is 04:00 Monday in UTC+8
        assert_eq!(cells[0].weekday, 1);
        assert_eq!(cells[0].hour, 4);
    }

    #[test]
    fn busiest_slot_of_nothing() {
        assert!(busiest_slot(&[]).is_none());
    }

    #[test]
    fn sentiment_sorted_most_negative_first() {
        let samples = vec![
            SentimentSample { cause: Some("Vegetation".into()), score: -1.0 },
            SentimentSample { cause: Some("Equipment".into()), score: -6.0 },
            SentimentSample { cause: Some("Equipment".into()), score: -4.0 },
            SentimentSample { cause: None, score: 2.0 },
        ];
        let rows = sentiment_by_cause(&samples);

        assert_eq!(rows[0].cause, "Equipment");
        assert_eq!(rows[0].mean_score, -5.0);
        assert_eq!(rows[0].samples, 2);
        assert_eq!(rows[2].cause, OTHER_CAUSE);
    }

    #[test]
    fn analytics_caps_cause_and_area_lists() {
        let incidents: Vec<IncidentRecord> = (0..10)
            .map(|i| {
                IncidentRecord::new(i.to_string())
                    .with_cause(&format!("Cause {i}"))
                    .with_areas([format!("Area {i}")])
            })
            .collect();
        let utc = FixedOffset::east_opt(0).unwrap();
        let analytics = build_analytics(&incidents, &[], utc);

        assert_eq!(analytics.root_causes.len(), TOP_CAUSES);
        assert_eq!(analytics.area_impact.len(), TOP_AREAS);
        assert!(analytics.feeder_counts.is_empty());
        assert!(analytics.peak_times.is_empty());
        assert_eq!(analytics.mttr_hours, None);
    }
}
