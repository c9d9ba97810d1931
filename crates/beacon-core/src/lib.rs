//! # beacon-core: Outage Incident Model
//!
//! Shared data structures for the Beacon outage forecasting toolkit.
//!
//! An [`IncidentRecord`] is one outage announcement: the feeder circuit it
//! happened on, the areas (barangays) that lost service, when it was reported
//! and when service came back. Everything downstream (aggregation, risk
//! forecasting, reporting) consumes slices of these records and never mutates
//! them.
//!
//! ## Quick Start
//!
//! ```rust
//! use beacon_core::*;
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let reported = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
//! let incident = IncidentRecord::new("ann-001")
//!     .with_feeder(FeederId::new(4), Some("Irisan"))
//!     .with_areas(["Pinsao Proper", "Guisad Central"])
//!     .with_times(Some(reported), Some(reported + Duration::hours(3)));
//!
//! assert_eq!(incident.feeder_label().as_deref(), Some("Irisan"));
//! assert_eq!(incident.restoration_hours(), Some(3.0));
//! ```
//!
//! ## Core Data Structures
//!
//! - [`IncidentRecord`] - one outage announcement
//! - [`FeederId`] - newtype id of a distribution feeder
//! - [`IncidentStatus`] - announcement lifecycle (Reported, Ongoing, Completed, ...)
//! - [`ReportingWindow`] - inclusive calendar-day window used for filtering
//! - [`SentimentSample`] - scored public report for sentiment analysis
//! - [`BeaconError`] / [`BeaconResult`] - unified error type

pub mod error;
pub mod incident;
pub mod window;

pub use error::{BeaconError, BeaconResult};
pub use incident::{
    FeederId, IncidentRecord, IncidentStatus, SentimentSample, MILLIS_PER_HOUR, UNKNOWN_CAUSE,
};
pub use window::ReportingWindow;
