use beacon_core::IncidentRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::aggregate_incidents;
use crate::buckets::{RestorationBucket, RestorationBuckets};
use crate::frequency::{frequency_forecast, ProbabilityMap};
use crate::restoration::{mean_time_to_restore, sample_restoration_hours};
use crate::risk::{classify_risk, RiskLabel};

/// Number of feeders/areas kept in each ranked list.
pub const DEFAULT_TOP_N: usize = 6;
/// Horizon quoted in forecast narratives ("next 7 days").
pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// Knobs for [`build_forecast_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastOptions {
    pub top_n: usize,
    pub horizon_days: u32,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

/// One ranked group with its probability and label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRisk {
    pub name: String,
    pub probability: f64,
    pub label: RiskLabel,
}

impl RankedRisk {
    pub fn percent(&self) -> f64 {
        self.probability * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketShare {
    pub bucket: RestorationBucket,
    pub count: u64,
    /// Share of valid samples, in percent.
    pub percent: f64,
}

/// Restoration likelihood derived from historical durations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestorationOutlook {
    pub sample_count: usize,
    pub mttr_hours: Option<f64>,
    pub buckets: Vec<BucketShare>,
}

impl RestorationOutlook {
    fn from_samples(samples: &[f64]) -> Self {
        let buckets = RestorationBuckets::from_samples(samples);
        Self {
            sample_count: samples.len(),
            mttr_hours: mean_time_to_restore(samples),
            buckets: buckets
                .shares()
                .into_iter()
                .map(|(bucket, share)| BucketShare {
                    bucket,
                    count: buckets.count(bucket),
                    percent: share * 100.0,
                })
                .collect(),
        }
    }

    pub fn percent(&self, bucket: RestorationBucket) -> f64 {
        self.buckets
            .iter()
            .find(|share| share.bucket == bucket)
            .map_or(0.0, |share| share.percent)
    }

    /// Percent of outages restored in under eight hours.
    pub fn within_eight_hours_percent(&self) -> f64 {
        self.percent(RestorationBucket::UnderFourHours)
            + self.percent(RestorationBucket::FourToEightHours)
    }
}

/// Output of one forecast run; consumed by renderers and report writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub generated_at: DateTime<Utc>,
    pub horizon_days: u32,
    pub incident_count: usize,
    pub top_feeders: Vec<RankedRisk>,
    pub top_areas: Vec<RankedRisk>,
    pub restoration: RestorationOutlook,
    pub overall_risk: RiskLabel,
}

fn rank_with_labels(probabilities: &ProbabilityMap, n: usize) -> Vec<RankedRisk> {
    probabilities
        .ranked(n)
        .into_iter()
        .map(|(name, probability)| RankedRisk {
            name,
            probability,
            label: classify_risk(probability),
        })
        .collect()
}

/// Forecast with the default options (top 6, 7-day horizon).
pub fn build_forecast(incidents: &[IncidentRecord], generated_at: DateTime<Utc>) -> ForecastSummary {
    build_forecast_with(incidents, &ForecastOptions::default(), generated_at)
}

/// Run the full forecasting pipeline over an already-windowed incident slice.
///
/// **Algorithm:**
/// 1. Count incidents per feeder label and per affected area
/// 2. Sample valid restoration durations
/// 3. Normalize both count maps into probabilities
/// 4. Rank each map (probability descending, name ascending) and keep `top_n`
/// 5. Bucket the restoration samples into <4h / 4-8h / 8-24h / >24h
/// 6. Overall risk = label of the largest feeder probability (0 when none)
///
/// Pure: `generated_at` is supplied by the caller and nothing is retained
/// between calls. Empty input yields empty lists, zero shares and `NONE`.
pub fn build_forecast_with(
    incidents: &[IncidentRecord],
    options: &ForecastOptions,
    generated_at: DateTime<Utc>,
) -> ForecastSummary {
    let counts = aggregate_incidents(incidents);
    let samples = sample_restoration_hours(incidents);

    let feeder_probabilities = frequency_forecast(&counts.by_feeder);
    let area_probabilities = frequency_forecast(&counts.by_area);

    ForecastSummary {
        generated_at,
        horizon_days: options.horizon_days,
        incident_count: incidents.len(),
        top_feeders: rank_with_labels(&feeder_probabilities, options.top_n),
        top_areas: rank_with_labels(&area_probabilities, options.top_n),
        restoration: RestorationOutlook::from_samples(&samples),
        overall_risk: classify_risk(feeder_probabilities.max_probability()),
    }
}
