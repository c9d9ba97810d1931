use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Milliseconds per hour, the divisor for restoration durations.
pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Cause label used when an incident carries no cause.
pub const UNKNOWN_CAUSE: &str = "Unknown";

/// Identifier of a distribution feeder circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeederId(u32);

impl FeederId {
    #[inline]
    pub fn new(value: u32) -> Self {
        FeederId(value)
    }
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FeederId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of an outage announcement.
///
/// Parsing is case-insensitive; anything unrecognised maps to
/// [`IncidentStatus::Unknown`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IncidentStatus {
    Reported,
    Ongoing,
    Completed,
    Pending,
    Unknown,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Reported => "Reported",
            IncidentStatus::Ongoing => "Ongoing",
            IncidentStatus::Completed => "Completed",
            IncidentStatus::Pending => "Pending",
            IncidentStatus::Unknown => "Unknown",
        }
    }

    /// Reported and ongoing outages are still affecting customers.
    pub fn is_active(&self) -> bool {
        matches!(self, IncidentStatus::Reported | IncidentStatus::Ongoing)
    }
}

impl FromStr for IncidentStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim().to_ascii_lowercase().as_str() {
            "reported" => IncidentStatus::Reported,
            "ongoing" => IncidentStatus::Ongoing,
            "completed" => IncidentStatus::Completed,
            "pending" => IncidentStatus::Pending,
            _ => IncidentStatus::Unknown,
        };
        Ok(status)
    }
}

impl From<String> for IncidentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(IncidentStatus::Unknown)
    }
}

impl From<IncidentStatus> for String {
    fn from(value: IncidentStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outage incident as delivered by the data-access layer.
///
/// Timestamps are `None` when absent *or* when the upstream value could not be
/// parsed; such records still count toward frequency statistics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub id: String,
    #[serde(default)]
    pub feeder_id: Option<FeederId>,
    #[serde(default)]
    pub feeder_name: Option<String>,
    #[serde(default)]
    pub affected_areas: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub restored_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub status: Option<IncidentStatus>,
}

impl IncidentRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_feeder(mut self, id: FeederId, name: Option<&str>) -> Self {
        self.feeder_id = Some(id);
        self.feeder_name = name.map(str::to_string);
        self
    }

    pub fn with_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affected_areas = areas.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_times(
        mut self,
        created_at: Option<DateTime<Utc>>,
        restored_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_at = created_at;
        self.restored_at = restored_at;
        self
    }

    pub fn with_cause(mut self, cause: &str) -> Self {
        self.cause = Some(cause.to_string());
        self
    }

    pub fn with_status(mut self, status: IncidentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Display label of the feeder, or `None` when no feeder is assigned.
    ///
    /// Falls back to `"Feeder {id}"` when the name was not resolved.
    pub fn feeder_label(&self) -> Option<String> {
        let id = self.feeder_id?;
        Some(match self.feeder_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Feeder {id}"),
        })
    }

    pub fn cause_label(&self) -> &str {
        match self.cause.as_deref().map(str::trim) {
            Some(cause) if !cause.is_empty() => cause,
            _ => UNKNOWN_CAUSE,
        }
    }

    /// Hours from report to restoration.
    ///
    /// `None` unless both timestamps exist and the duration is finite and
    /// non-negative.
    pub fn restoration_hours(&self) -> Option<f64> {
        let created = self.created_at?;
        let restored = self.restored_at?;
        let hours = (restored - created).num_milliseconds() as f64 / MILLIS_PER_HOUR;
        (hours.is_finite() && hours >= 0.0).then_some(hours)
    }
}

/// A scored public report used for sentiment-by-cause analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSample {
    #[serde(default)]
    pub cause: Option<String>,
    pub score: f64,
}
