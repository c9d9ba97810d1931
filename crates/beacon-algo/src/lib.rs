//! # beacon-algo: Outage Risk Forecasting
//!
//! Pure transformations from a window of [`beacon_core::IncidentRecord`]s to
//! the summaries the dashboard and reports present.
//!
//! ## Pipeline
//!
//! ```text
//! incidents ──> aggregate ──> frequency ──> risk ──┐
//!          └──> restoration ──> buckets ───────────┴──> ForecastSummary
//! ```
//!
//! - [`aggregate`] counts incidents per feeder label and per affected area
//! - [`restoration`] extracts valid restoration durations in hours
//! - [`frequency`] normalizes counts into empirical probabilities
//! - [`buckets`] sorts durations into <4h / 4-8h / 8-24h / >24h
//! - [`risk`] maps a probability to HIGH / MEDIUM / LOW / NONE
//! - [`forecast`] composes the above into a [`ForecastSummary`]
//!
//! Around the forecast sit [`analytics`] (cause, area, peak-time and
//! sentiment breakdowns), [`kpi`] (period-over-period tiles) and
//! [`narrative`] (report text).
//!
//! Nothing here performs I/O or keeps state between calls.
//!
//! ```rust
//! use beacon_algo::{build_forecast, RiskLabel};
//! use chrono::Utc;
//!
//! let summary = build_forecast(&[], Utc::now());
//! assert!(summary.top_feeders.is_empty());
//! assert_eq!(summary.overall_risk, RiskLabel::None);
//! ```

pub mod aggregate;
pub mod analytics;
pub mod buckets;
pub mod forecast;
pub mod frequency;
pub mod kpi;
pub mod narrative;
pub mod restoration;
pub mod risk;

pub use aggregate::{aggregate_incidents, count_by_cause, AggregateCounts, IncidentCounts};
pub use analytics::{build_analytics, CauseSentiment, CountRow, DashboardAnalytics, PeakCell};
pub use buckets::{RestorationBucket, RestorationBuckets};
pub use forecast::{
    build_forecast, build_forecast_with, BucketShare, ForecastOptions,
    ForecastSummary, RankedRisk, RestorationOutlook,
};
pub use frequency::{frequency_forecast, ProbabilityMap};
pub use kpi::{period_kpis, trend_percent, KpiTile, PeriodKpis, Polarity};
pub use narrative::{build_narrative, NarrativeSection, ReportNarrative};
pub use restoration::{
    mean_time_to_restore, restoration_by_feeder, sample_restoration_hours, FeederRestoration,
};
pub use risk::{classify_risk, RiskLabel, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
