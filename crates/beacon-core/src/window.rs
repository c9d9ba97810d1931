use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BeaconError, BeaconResult};
use crate::incident::IncidentRecord;

/// Inclusive range of calendar days (UTC) used to select incidents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportingWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> BeaconResult<Self> {
        if end < start {
            return Err(BeaconError::Validation(format!(
                "reporting window ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// The `days`-long window ending on `end` (inclusive).
    pub fn last_days(end: NaiveDate, days: u32) -> BeaconResult<Self> {
        if days == 0 {
            return Err(BeaconError::Validation(
                "reporting window must span at least one day".into(),
            ));
        }
        let start = shift_back(end, i64::from(days) - 1)?;
        Self::new(start, end)
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Window of equal length ending the day before this one starts.
    ///
    /// Fails when the earlier window would fall before the first
    /// representable date.
    pub fn previous(&self) -> BeaconResult<Self> {
        let end = shift_back(self.start, 1)?;
        let start = shift_back(end, self.days() - 1)?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let day = instant.date_naive();
        self.start <= day && day <= self.end
    }

    /// Incidents created inside the window; records without `created_at` are dropped.
    pub fn filter(&self, incidents: &[IncidentRecord]) -> Vec<IncidentRecord> {
        incidents
            .iter()
            .filter(|incident| incident.created_at.is_some_and(|ts| self.contains(ts)))
            .cloned()
            .collect()
    }
}

fn shift_back(day: NaiveDate, days: i64) -> BeaconResult<NaiveDate> {
    Duration::try_days(days)
        .and_then(|span| day.checked_sub_signed(span))
        .ok_or_else(|| {
            BeaconError::Validation(format!(
                "{days} days before {day} is out of the supported date range"
            ))
        })
}

impl fmt::Display for ReportingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
