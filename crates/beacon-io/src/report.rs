//! Markdown report rendering.
//!
//! Sections come from [`ReportNarrative`]; each may be paired with a chart
//! image found under an optional chart directory. A missing or unreadable
//! image is replaced by a placeholder line so the report always completes.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use beacon_algo::{
    narrative::{area_forecast_headline, feeder_forecast_headline, restoration_headline},
    DashboardAnalytics, ForecastSummary, PeriodKpis, ReportNarrative,
};
use beacon_core::ReportingWindow;
use chrono::{DateTime, FixedOffset};
use tracing::warn;

/// Inputs for one rendered report.
#[derive(Debug, Clone)]
pub struct ReportDocument<'a> {
    pub organization: &'a str,
    pub window: Option<ReportingWindow>,
    pub summary: &'a ForecastSummary,
    pub analytics: &'a DashboardAnalytics,
    pub narrative: &'a ReportNarrative,
    pub kpis: Option<&'a PeriodKpis>,
    /// Directory searched for `<section-slug>.png`.
    pub chart_dir: Option<&'a Path>,
    /// Offset used when printing the generation time.
    pub utc_offset: FixedOffset,
}

/// Lowercase a section title into a file stem: `"Peak Outage Times"` ->
/// `"peak_outage_times"`.
pub fn chart_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_end_matches('_').to_string()
}

fn chart_line(dir: &Path, title: &str) -> String {
    let path: PathBuf = dir.join(format!("{}.png", chart_slug(title)));
    match fs::metadata(&path) {
        Ok(meta) if meta.is_file() => format!("![{title}]({})", path.display()),
        Ok(_) | Err(_) => {
            warn!(chart = %path.display(), "chart image unavailable; using placeholder");
            format!("_Chart unavailable: {}_", path.display())
        }
    }
}

fn format_generated(at: DateTime<chrono::Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%Y-%m-%d %H:%M %:z").to_string()
}

/// `"3.50 h"`, or `"n/a"` when there were no restoration samples.
pub fn format_hours(hours: Option<f64>) -> String {
    hours.map_or_else(|| "n/a".to_string(), |h| format!("{h:.2} h"))
}

/// Make free text safe inside a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

pub fn render_markdown(doc: &ReportDocument<'_>) -> String {
    let summary = doc.summary;
    let mut out = String::new();

    let _ = writeln!(out, "# {} Outage Report", doc.organization);
    let _ = writeln!(out);
    if let Some(window) = doc.window {
        let _ = writeln!(out, "Reporting window: {window}  ");
    }
    let _ = writeln!(
        out,
        "Generated: {}  ",
        format_generated(summary.generated_at, doc.utc_offset)
    );
    let _ = writeln!(out, "Incidents analysed: {}", summary.incident_count);
    let _ = writeln!(out);

    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out);
    let _ = writeln!(out, "- {}", doc.narrative.overall);
    let _ = writeln!(out, "- {}", feeder_forecast_headline(summary));
    let _ = writeln!(out, "- {}", area_forecast_headline(summary));
    let _ = writeln!(out, "- {}", restoration_headline(&summary.restoration));
    let _ = writeln!(
        out,
        "- Mean time to restore: {}",
        format_hours(doc.analytics.mttr_hours)
    );
    let _ = writeln!(out);

    if let Some(kpis) = doc.kpis {
        let _ = writeln!(out, "## Key Indicators");
        let _ = writeln!(out);
        let _ = writeln!(out, "| Indicator | Current | Previous | Trend |");
        let _ = writeln!(out, "|---|---:|---:|---:|");
        for tile in kpis.tiles() {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {:+.1}% |",
                escape_cell(&tile.name),
                tile.current,
                tile.previous,
                tile.trend_percent
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "## Feeder Risk");
    let _ = writeln!(out);
    render_ranked(&mut out, &summary.top_feeders);

    let _ = writeln!(out, "## Area Risk");
    let _ = writeln!(out);
    render_ranked(&mut out, &summary.top_areas);

    let _ = writeln!(out, "## Restoration Likelihood");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Duration | Outages | Share |");
    let _ = writeln!(out, "|---|---:|---:|");
    for share in &summary.restoration.buckets {
        let _ = writeln!(
            out,
            "| {} | {} | {:.1}% |",
            share.bucket, share.count, share.percent
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Analysis");
    for section in &doc.narrative.sections {
        let _ = writeln!(out);
        let _ = writeln!(out, "### {}", section.title);
        let _ = writeln!(out);
        if let Some(dir) = doc.chart_dir {
            let _ = writeln!(out, "{}", chart_line(dir, &section.title));
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "{}", section.analysis);
    }
    out
}

fn render_ranked(out: &mut String, rows: &[beacon_algo::RankedRisk]) {
    if rows.is_empty() {
        let _ = writeln!(out, "_No historical data._");
        let _ = writeln!(out);
        return;
    }
    let _ = writeln!(out, "| # | Name | Probability | Risk |");
    let _ = writeln!(out, "|---:|---|---:|---|");
    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {:.1}% | {} |",
            i + 1,
            escape_cell(&row.name),
            row.percent(),
            row.label
        );
    }
    let _ = writeln!(out);
}

/// Render and write the report to `path`.
pub fn write_report(doc: &ReportDocument<'_>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::write(path, render_markdown(doc)).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_algo::{build_analytics, build_forecast, build_narrative};
    use beacon_core::{FeederId, IncidentRecord};
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;

    fn fixtures() -> (ForecastSummary, DashboardAnalytics) {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 3, 1, 0, 0).unwrap();
        let incidents = vec![
            IncidentRecord::new("1")
                .with_feeder(FeederId::new(1), Some("Irisan"))
                .with_areas(["Pinsao Proper"])
                .with_times(Some(t0), Some(t0 + Duration::hours(3)))
                .with_cause("Vegetation"),
            IncidentRecord::new("2")
                .with_feeder(FeederId::new(2), None)
                .with_areas(["Camp 7"])
                .with_times(Some(t0), None),
        ];
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        (
            build_forecast(&incidents, t0),
            build_analytics(&incidents, &[], offset),
        )
    }

    #[test]
    fn slugs_section_titles() {
        assert_eq!(chart_slug("Peak Outage Times"), "peak_outage_times");
        assert_eq!(
            chart_slug("Feeder Risk Forecast (Next 7 Days)"),
            "feeder_risk_forecast_next_7_days"
        );
    }

    #[test]
    fn renders_all_sections() {
        let (summary, analytics) = fixtures();
        let narrative = build_narrative(&summary, &analytics);
        let doc = ReportDocument {
            organization: "BENECO",
            window: None,
            summary: &summary,
            analytics: &analytics,
            narrative: &narrative,
            kpis: None,
            chart_dir: None,
            utc_offset: FixedOffset::east_opt(8 * 3600).unwrap(),
        };
        let text = render_markdown(&doc);

        assert!(text.starts_with("# BENECO Outage Report"));
        assert!(text.contains("Generated: 2024-06-03 09:00 +08:00"));
        assert!(text.contains("| 1 | Feeder 2 | 50.0% | HIGH |"));
        assert!(text.contains("| <4h | 1 | 100.0% |"));
        assert!(text.contains("### Restoration Likelihood"));
        assert!(!text.contains("Chart unavailable"));
    }

    #[test]
    fn pipes_in_names_do_not_split_table_cells() {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 3, 1, 0, 0).unwrap();
        let incidents = vec![IncidentRecord::new("1")
            .with_feeder(FeederId::new(4), Some("North|South"))
            .with_areas(["Camp 7 | Loakan"])
            .with_times(Some(t0), None)];
        let summary = build_forecast(&incidents, t0);
        let analytics = build_analytics(&incidents, &[], FixedOffset::east_opt(0).unwrap());
        let narrative = build_narrative(&summary, &analytics);
        let doc = ReportDocument {
            organization: "BENECO",
            window: None,
            summary: &summary,
            analytics: &analytics,
            narrative: &narrative,
            kpis: None,
            chart_dir: None,
            utc_offset: FixedOffset::east_opt(0).unwrap(),
        };
        let text = render_markdown(&doc);

        assert!(text.contains("| 1 | North\\|South | 100.0% | HIGH |"));
        assert!(text.contains("| 1 | Camp 7 \\| Loakan | 100.0% | HIGH |"));
        assert_eq!(escape_cell("a\nb"), "a b");
    }

    #[test]
    fn formats_optional_hours() {
        assert_eq!(format_hours(Some(3.5)), "3.50 h");
        assert_eq!(format_hours(None), "n/a");
    }

    #[test]
    fn missing_chart_becomes_placeholder() {
        let (summary, analytics) = fixtures();
        let narrative = build_narrative(&summary, &analytics);
        let charts = tempdir().unwrap();
        fs::write(charts.path().join("peak_outage_times.png"), b"png").unwrap();

        let out = tempdir().unwrap();
        let path = out.path().join("report.md");
        let doc = ReportDocument {
            organization: "BENECO",
            window: None,
            summary: &summary,
            analytics: &analytics,
            narrative: &narrative,
            kpis: None,
            chart_dir: Some(charts.path()),
            utc_offset: FixedOffset::east_opt(0).unwrap(),
        };
        write_report(&doc, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert!(text.contains("![Peak Outage Times]("));
        assert!(text.contains("_Chart unavailable:"));
        assert!(text.contains("outages_by_feeder.png"));
    }
}
