//! Plain-language text derived from forecasts and analytics.
//!
//! Every generator has a fixed fallback sentence for empty input so report
//! writers never have to special-case missing data.

use serde::{Deserialize, Serialize};

use crate::analytics::{busiest_slot, CauseSentiment, CountRow, DashboardAnalytics, PeakCell};
use crate::forecast::{ForecastSummary, RestorationOutlook};
use crate::restoration::FeederRestoration;

/// Sentiment below this is flagged as critical.
pub const CRITICAL_SENTIMENT: f64 = -2.0;

pub fn feeder_forecast_headline(summary: &ForecastSummary) -> String {
    match summary.top_feeders.first() {
        Some(top) => format!(
            "Highest risk feeder: {} (~{:.1}% of historical incidents).",
            top.name,
            top.percent()
        ),
        None => "Not enough historical data to estimate feeder risk.".to_string(),
    }
}

pub fn area_forecast_headline(summary: &ForecastSummary) -> String {
    match summary.top_areas.first() {
        Some(top) => format!(
            "Area with highest expected risk: {} (~{:.1}% of historical incidents).",
            top.name,
            top.percent()
        ),
        None => "Not enough historical data to estimate area risk.".to_string(),
    }
}

pub fn restoration_headline(outlook: &RestorationOutlook) -> String {
    if outlook.sample_count == 0 {
        return "Not enough completed outage history to estimate restoration probabilities."
            .to_string();
    }
    format!(
        "Historically, {:.1}% of outages are restored in less than 8 hours.",
        outlook.within_eight_hours_percent()
    )
}

pub fn overall_risk_line(summary: &ForecastSummary) -> String {
    format!("Overall risk: {}", summary.overall_risk)
}

pub fn feeder_forecast_analysis(summary: &ForecastSummary) -> String {
    match summary.top_feeders.first() {
        Some(top) => format!(
            "Forecast: {} has the highest estimated probability of experiencing an outage in the next {} days. Consider proactive inspection.",
            top.name, summary.horizon_days
        ),
        None => "Forecast: Risk data inconclusive.".to_string(),
    }
}

pub fn area_forecast_analysis(summary: &ForecastSummary) -> String {
    match summary.top_areas.first() {
        Some(top) => format!(
            "Forecast: {} is the area most at risk in the short term. Plan readiness with local officials.",
            top.name
        ),
        None => "Forecast: Risk data inconclusive.".to_string(),
    }
}

pub fn restoration_forecast_analysis(outlook: &RestorationOutlook) -> String {
    if outlook.sample_count == 0 {
        return "Forecast: No restoration history available.".to_string();
    }
    format!(
        "Forecast: Approximately {:.1}% of incidents are expected to be resolved within 8 hours based on historical performance.",
        outlook.within_eight_hours_percent()
    )
}

pub fn root_cause_analysis(root_causes: &[CountRow]) -> String {
    let Some(top) = root_causes.first().filter(|row| row.count > 0) else {
        return "No incidents reported yet.".to_string();
    };
    if top.name.contains("Vegetation") {
        "Recommendation: Increase tree trimming schedule in high-risk corridors.".to_string()
    } else if top.name.contains("Equipment") {
        "Recommendation: Audit aging transformers and schedule preventive maintenance.".to_string()
    } else {
        format!("Recommendation: Investigate high frequency of {} outages.", top.name)
    }
}

pub fn feeder_volume_analysis(feeder_counts: &[CountRow]) -> String {
    match feeder_counts.first().filter(|row| row.count > 0) {
        Some(top) => format!(
            "{} accounts for the highest volume of reports ({}). Prioritize infrastructure inspection on this line.",
            top.name, top.count
        ),
        None => "No outage data by feeder available.".to_string(),
    }
}

pub fn feeder_restoration_analysis(rows: &[FeederRestoration]) -> String {
    match rows.first().filter(|row| row.mean_hours > 0.0) {
        Some(slowest) => format!(
            "{} has the slowest recovery time ({:.2} hrs avg). Check for access issues or equipment faults.",
            slowest.feeder, slowest.mean_hours
        ),
        None => "No restoration time data available.".to_string(),
    }
}

pub fn area_impact_analysis(area_impact: &[CountRow]) -> String {
    match area_impact.first().filter(|row| row.count > 0) {
        Some(top) => format!(
            "{} is the most frequently affected community. Engage with community leaders regarding upcoming improvements.",
            top.name
        ),
        None => "No area impact data available.".to_string(),
    }
}

pub fn peak_time_analysis(cells: &[PeakCell]) -> String {
    match busiest_slot(cells) {
        Some(cell) => format!(
            "Highest outage frequency observed on {}s around {}:00 hours. Schedule additional standby crews during this window.",
            cell.weekday_name(),
            cell.hour
        ),
        None => "No peak data recorded.".to_string(),
    }
}

pub fn sentiment_analysis(rows: &[CauseSentiment]) -> String {
    let Some(worst) = rows.first() else {
        return "No sentiment data available.".to_string();
    };
    let mut text = String::from("Analysis: Public sentiment varies across categories. ");
    if worst.mean_score < CRITICAL_SENTIMENT {
        text.push_str(&format!(
            "CRITICAL: \"{}\" is generating significant negative feedback (Score: {:.1}). Users are highly frustrated. ",
            worst.cause, worst.mean_score
        ));
        text.push_str(&format!(
            "Recommendation: Prioritize communication and faster response times for {} issues immediately.",
            worst.cause
        ));
    } else if worst.mean_score < 0.0 {
        text.push_str(&format!("\"{}\" is showing mild negative sentiment.", worst.cause));
    } else {
        text.push_str("Overall sentiment is neutral or positive.");
    }
    text
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeSection {
    pub title: String,
    pub analysis: String,
}

/// Ordered report sections with their analysis text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportNarrative {
    pub overall: String,
    pub sections: Vec<NarrativeSection>,
}

pub fn build_narrative(summary: &ForecastSummary, analytics: &DashboardAnalytics) -> ReportNarrative {
    let horizon = summary.horizon_days;
    let mut sections = vec![
        ("Outages by Feeder".to_string(), feeder_volume_analysis(&analytics.feeder_counts)),
        (
            "Avg Restoration Time by Feeder".to_string(),
            feeder_restoration_analysis(&analytics.restoration_by_feeder),
        ),
        ("Root Cause Analysis".to_string(), root_cause_analysis(&analytics.root_causes)),
        ("Most Affected Areas".to_string(), area_impact_analysis(&analytics.area_impact)),
        ("Peak Outage Times".to_string(), peak_time_analysis(&analytics.peak_times)),
    ];
    // sentiment comes from a separate feed and is left out when absent
    if !analytics.sentiment.is_empty() {
        sections.push((
            "Root Cause Sentiment Analysis".to_string(),
            sentiment_analysis(&analytics.sentiment),
        ));
    }
    sections.push((
        format!("Feeder Risk Forecast (Next {horizon} Days)"),
        feeder_forecast_analysis(summary),
    ));
    sections.push((
        format!("Area Risk Forecast (Next {horizon} Days)"),
        area_forecast_analysis(summary),
    ));
    sections.push((
        "Restoration Likelihood".to_string(),
        restoration_forecast_analysis(&summary.restoration),
    ));

    ReportNarrative {
        overall: overall_risk_line(summary),
        sections: sections
            .into_iter()
            .map(|(title, analysis)| NarrativeSection { title, analysis })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::build_analytics;
    use crate::forecast::build_forecast;
    use beacon_core::{FeederId, IncidentRecord};
    use chrono::{Duration, FixedOffset, TimeZone, Utc};

    fn row(name: &str, count: u64) -> CountRow {
        CountRow {
            name: name.to_string(),
            count,
        }
    }

    #[test]
    fn empty_forecast_uses_fallbacks() {
        let summary = build_forecast(&[], Utc::now());
        assert_eq!(
            feeder_forecast_headline(&summary),
            "Not enough historical data to estimate feeder risk."
        );
        assert_eq!(feeder_forecast_analysis(&summary), "Forecast: Risk data inconclusive.");
        assert_eq!(
            restoration_forecast_analysis(&summary.restoration),
            "Forecast: No restoration history available."
        );
        assert_eq!(overall_risk_line(&summary), "Overall risk: NONE");
    }

    #[test]
    fn headlines_quote_top_share() {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let incidents = vec![
            IncidentRecord::new("1")
                .with_feeder(FeederId::new(1), Some("F1"))
                .with_times(Some(t0), Some(t0 + Duration::hours(2))),
            IncidentRecord::new("2")
                .with_feeder(FeederId::new(1), Some("F1"))
                .with_times(Some(t0), Some(t0 + Duration::hours(10))),
            IncidentRecord::new("3").with_feeder(FeederId::new(2), Some("F2")),
        ];
        let summary = build_forecast(&incidents, t0);

        assert_eq!(
            feeder_forecast_headline(&summary),
            "Highest risk feeder: F1 (~66.7% of historical incidents)."
        );
        assert_eq!(
            restoration_headline(&summary.restoration),
            "Historically, 50.0% of outages are restored in less than 8 hours."
        );
        assert!(feeder_forecast_analysis(&summary).contains("next 7 days"));
    }

    #[test]
    fn root_cause_recommendations() {
        assert!(root_cause_analysis(&[row("Vegetation Contact", 4)]).contains("tree trimming"));
        assert!(root_cause_analysis(&[row("Equipment Failure", 4)]).contains("transformers"));
        assert_eq!(
            root_cause_analysis(&[row("Lightning", 2)]),
            "Recommendation: Investigate high frequency of Lightning outages."
        );
        assert_eq!(root_cause_analysis(&[]), "No incidents reported yet.");
    }

    #[test]
    fn sentiment_severity_levels() {
        let sample = |score: f64| {
            vec![CauseSentiment {
                cause: "Equipment".into(),
                mean_score: score,
                samples: 3,
            }]
        };
        assert!(sentiment_analysis(&sample(-4.5)).contains("CRITICAL"));
        assert!(sentiment_analysis(&sample(-1.0)).contains("mild negative"));
        assert!(sentiment_analysis(&sample(1.0)).contains("neutral or positive"));
        assert_eq!(sentiment_analysis(&[]), "No sentiment data available.");
    }

    #[test]
    fn narrative_skips_sentiment_without_samples() {
        let summary = build_forecast(&[], Utc::now());
        let analytics = build_analytics(&[], &[], FixedOffset::east_opt(0).unwrap());
        let narrative = build_narrative(&summary, &analytics);

        assert_eq!(narrative.sections.len(), 8);
        assert!(narrative
            .sections
            .iter()
            .all(|s| !s.title.contains("Sentiment")));
        assert_eq!(narrative.sections[5].title, "Feeder Risk Forecast (Next 7 Days)");
    }
}
