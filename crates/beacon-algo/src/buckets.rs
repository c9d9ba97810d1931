use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed restoration-time ranges, half-open on the upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestorationBucket {
    #[serde(rename = "<4h")]
    UnderFourHours,
    #[serde(rename = "4-8h")]
    FourToEightHours,
    #[serde(rename = "8-24h")]
    EightToTwentyFourHours,
    #[serde(rename = ">24h")]
    OverTwentyFourHours,
}

impl RestorationBucket {
    pub const ALL: [RestorationBucket; 4] = [
        RestorationBucket::UnderFourHours,
        RestorationBucket::FourToEightHours,
        RestorationBucket::EightToTwentyFourHours,
        RestorationBucket::OverTwentyFourHours,
    ];

    pub fn for_hours(hours: f64) -> Self {
        if hours < 4.0 {
            RestorationBucket::UnderFourHours
        } else if hours < 8.0 {
            RestorationBucket::FourToEightHours
        } else if hours < 24.0 {
            RestorationBucket::EightToTwentyFourHours
        } else {
            RestorationBucket::OverTwentyFourHours
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RestorationBucket::UnderFourHours => "<4h",
            RestorationBucket::FourToEightHours => "4-8h",
            RestorationBucket::EightToTwentyFourHours => "8-24h",
            RestorationBucket::OverTwentyFourHours => ">24h",
        }
    }

    fn index(&self) -> usize {
        match self {
            RestorationBucket::UnderFourHours => 0,
            RestorationBucket::FourToEightHours => 1,
            RestorationBucket::EightToTwentyFourHours => 2,
            RestorationBucket::OverTwentyFourHours => 3,
        }
    }
}

impl fmt::Display for RestorationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sample counts for the four restoration buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestorationBuckets {
    counts: [u64; 4],
}

impl RestorationBuckets {
    pub fn from_samples(samples: &[f64]) -> Self {
        let mut buckets = Self::default();
        for hours in samples {
            buckets.counts[RestorationBucket::for_hours(*hours).index()] += 1;
        }
        buckets
    }

    pub fn count(&self, bucket: RestorationBucket) -> u64 {
        self.counts[bucket.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Fraction of samples in `bucket`; 0 when there are no samples.
    pub fn share(&self, bucket: RestorationBucket) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(bucket) as f64 / total as f64
    }

    pub fn shares(&self) -> [(RestorationBucket, f64); 4] {
        RestorationBucket::ALL.map(|bucket| (bucket, self.share(bucket)))
    }

    /// Fraction restored in under eight hours.
    pub fn within_eight_hours(&self) -> f64 {
        self.share(RestorationBucket::UnderFourHours)
            + self.share(RestorationBucket::FourToEightHours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_half_open() {
        assert_eq!(RestorationBucket::for_hours(3.999), RestorationBucket::UnderFourHours);
        assert_eq!(RestorationBucket::for_hours(4.0), RestorationBucket::FourToEightHours);
        assert_eq!(RestorationBucket::for_hours(8.0), RestorationBucket::EightToTwentyFourHours);
        assert_eq!(RestorationBucket::for_hours(23.99), RestorationBucket::EightToTwentyFourHours);
        assert_eq!(RestorationBucket::for_hours(24.0), RestorationBucket::OverTwentyFourHours);
    }

    #[test]
    fn empty_samples_have_zero_shares() {
        let buckets = RestorationBuckets::from_samples(&[]);
        assert_eq!(buckets.total(), 0);
        for (_, share) in buckets.shares() {
            assert_eq!(share, 0.0);
        }
        assert_eq!(buckets.within_eight_hours(), 0.0);
    }

    #[test]
    fn shares_follow_counts() {
        let buckets = RestorationBuckets::from_samples(&[2.0, 10.0, 1.0, 30.0]);
        assert_eq!(buckets.count(RestorationBucket::UnderFourHours), 2);
        assert_eq!(buckets.count(RestorationBucket::FourToEightHours), 0);
        assert_eq!(buckets.share(RestorationBucket::UnderFourHours), 0.5);
        assert_eq!(buckets.share(RestorationBucket::OverTwentyFourHours), 0.25);
        assert_eq!(buckets.within_eight_hours(), 0.5);
    }

    #[test]
    fn labels_serialize_as_ranges() {
        let json = serde_json::to_string(&RestorationBucket::ALL).unwrap();
        assert_eq!(json, r#"["<4h","4-8h","8-24h",">24h"]"#);
    }
}
