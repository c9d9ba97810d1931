use beacon_core::{BeaconResult, IncidentRecord, IncidentStatus, ReportingWindow};
use serde::{Deserialize, Serialize};

/// Which direction of change is good news for a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    LowerIsBetter,
    HigherIsBetter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiTile {
    pub name: String,
    pub current: u64,
    pub previous: u64,
    pub trend_percent: f64,
    pub polarity: Polarity,
}

impl KpiTile {
    fn new(name: &str, current: u64, previous: u64, polarity: Polarity) -> Self {
        Self {
            name: name.to_string(),
            current,
            previous,
            trend_percent: trend_percent(current, previous),
            polarity,
        }
    }

    pub fn is_improving(&self) -> bool {
        match self.polarity {
            Polarity::LowerIsBetter => self.trend_percent <= 0.0,
            Polarity::HigherIsBetter => self.trend_percent >= 0.0,
        }
    }
}

/// Percent change from `previous` to `current`.
///
/// A rise from zero is reported as +100%; zero to zero is 0%.
pub fn trend_percent(current: u64, previous: u64) -> f64 {
    if previous > 0 {
        (current as f64 - previous as f64) / previous as f64 * 100.0
    } else if current > 0 {
        100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodKpis {
    pub window: ReportingWindow,
    pub previous_window: ReportingWindow,
    pub pending_reports: KpiTile,
    pub active_outages: KpiTile,
    pub completed_repairs: KpiTile,
}

impl PeriodKpis {
    pub fn tiles(&self) -> [&KpiTile; 3] {
        [
            &self.pending_reports,
            &self.active_outages,
            &self.completed_repairs,
        ]
    }
}

struct PeriodCounts {
    pending: u64,
    active: u64,
    completed: u64,
}

fn count_period(incidents: &[IncidentRecord], window: &ReportingWindow) -> PeriodCounts {
    let created_in = |incident: &IncidentRecord| incident.created_at.is_some_and(|ts| window.contains(ts));
    let mut counts = PeriodCounts {
        pending: 0,
        active: 0,
        completed: 0,
    };
    for incident in incidents {
        if created_in(incident) {
            match incident.status {
                Some(IncidentStatus::Pending) => counts.pending += 1,
                Some(status) if status.is_active() => counts.active += 1,
                _ => {}
            }
        }
        // completed repairs are dated by restoration, not by report
        if incident.status == Some(IncidentStatus::Completed)
            && incident.restored_at.is_some_and(|ts| window.contains(ts))
        {
            counts.completed += 1;
        }
    }
    counts
}

/// Compare `window` against the equally long window right before it.
///
/// `incidents` must cover both periods, so this takes the unfiltered set.
/// Fails when the previous window would start before the earliest
/// representable date.
pub fn period_kpis(
    incidents: &[IncidentRecord],
    window: &ReportingWindow,
) -> BeaconResult<PeriodKpis> {
    let previous_window = window.previous()?;
    let current = count_period(incidents, window);
    let previous = count_period(incidents, &previous_window);

    Ok(PeriodKpis {
        window: *window,
        previous_window,
        pending_reports: KpiTile::new(
            "Pending reports",
            current.pending,
            previous.pending,
            Polarity::LowerIsBetter,
        ),
        active_outages: KpiTile::new(
            "Active outages",
            current.active,
            previous.active,
            Polarity::LowerIsBetter,
        ),
        completed_repairs: KpiTile::new(
            "Completed repairs",
            current.completed,
            previous.completed,
            Polarity::HigherIsBetter,
        ),
    })
}
