//! Risk label classification
//!
//! Maps an empirical incident share onto a four-level label. Thresholds are
//! fixed; they are not read from configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability at or above which a group is HIGH risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.35;
/// Probability at or above which a group is MEDIUM risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLabel {
    None,
    Low,
    Medium,
    High,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::High => "HIGH",
            RiskLabel::Medium => "MEDIUM",
            RiskLabel::Low => "LOW",
            RiskLabel::None => "NONE",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a probability.
///
/// - HIGH: p >= 0.35
/// - MEDIUM: 0.20 <= p < 0.35
/// - LOW: 0 < p < 0.20
/// - NONE: p == 0
///
/// Inputs outside [0, 1] are clamped first, and NaN counts as 0.
pub fn classify_risk(probability: f64) -> RiskLabel {
    let p = if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    };
    if p >= HIGH_RISK_THRESHOLD {
        RiskLabel::High
    } else if p >= MEDIUM_RISK_THRESHOLD {
        RiskLabel::Medium
    } else if p > 0.0 {
        RiskLabel::Low
    } else {
        RiskLabel::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_boundaries() {
        assert_eq!(classify_risk(0.35), RiskLabel::High);
        assert_eq!(classify_risk(0.349999), RiskLabel::Medium);
        assert_eq!(classify_risk(0.2), RiskLabel::Medium);
        assert_eq!(classify_risk(0.199999), RiskLabel::Low);
        assert_eq!(classify_risk(0.0001), RiskLabel::Low);
        assert_eq!(classify_risk(0.0), RiskLabel::None);
        assert_eq!(classify_risk(1.0), RiskLabel::High);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(classify_risk(-0.5), RiskLabel::None);
        assert_eq!(classify_risk(1.7), RiskLabel::High);
        assert_eq!(classify_risk(f64::INFINITY), RiskLabel::High);
        assert_eq!(classify_risk(f64::NEG_INFINITY), RiskLabel::None);
        assert_eq!(classify_risk(f64::NAN), RiskLabel::None);
    }

    #[test]
    fn labels_order_by_severity() {
        assert!(RiskLabel::High > RiskLabel::Medium);
        assert!(RiskLabel::Low > RiskLabel::None);
    }

    #[test]
    fn serializes_upper_case() {
        assert_eq!(serde_json::to_string(&RiskLabel::None).unwrap(), "\"NONE\"");
        assert_eq!(serde_json::to_string(&RiskLabel::Medium).unwrap(), "\"MEDIUM\"");
    }
}
