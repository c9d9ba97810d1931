use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use beacon_algo::{build_analytics, build_forecast_with, build_narrative, period_kpis};
use beacon_cli::{
    cli::WindowArgs,
    config::{expand_home, BeaconConfig},
};
use beacon_io::{load_incidents, load_sentiment, write_report, ReportDocument};
use chrono::Utc;
use tracing::info;

use crate::commands::telemetry::record_run_timed;

pub struct ReportArgs<'a> {
    pub input: &'a Path,
    pub window: &'a WindowArgs,
    pub sentiment: Option<&'a Path>,
    pub charts: Option<&'a Path>,
    pub organization: Option<&'a str>,
    pub out: Option<&'a Path>,
}

pub fn handle(config: &BeaconConfig, args: &ReportArgs<'_>) -> Result<()> {
    let start = Instant::now();
    let out = match args.out {
        Some(path) => path.to_path_buf(),
        None => default_report_path(config)?,
    };
    let result = run(config, args, &out);

    let input = args.input.display().to_string();
    record_run_timed(
        &[out.as_path()],
        "report",
        &[("input", input.as_str())],
        start,
        &result,
    );
    if result.is_ok() {
        println!("Wrote report to {}", out.display());
    }
    result
}

fn default_report_path(config: &BeaconConfig) -> Result<PathBuf> {
    let dir = expand_home(&config.data.results_dir)?;
    Ok(dir.join(format!("report-{}.md", Utc::now().format("%Y%m%d-%H%M%S"))))
}

fn run(config: &BeaconConfig, args: &ReportArgs<'_>, out: &Path) -> Result<()> {
    let all = load_incidents(args.input)?;
    let window = args.window.resolve(config.forecast.window_days)?;
    let incidents = match &window {
        Some(window) => window.filter(&all),
        None => all.clone(),
    };
    let sentiment = match args.sentiment {
        Some(path) => load_sentiment(path)?,
        None => Vec::new(),
    };
    let offset = config.report.utc_offset()?;

    let summary = build_forecast_with(&incidents, &config.forecast.options(), Utc::now());
    let analytics = build_analytics(&incidents, &sentiment, offset);
    let narrative = build_narrative(&summary, &analytics);
    // trends need the unfiltered history to see the previous period
    let kpis = window.as_ref().map(|w| period_kpis(&all, w)).transpose()?;

    let doc = ReportDocument {
        organization: args.organization.unwrap_or(&config.report.organization),
        window,
        summary: &summary,
        analytics: &analytics,
        narrative: &narrative,
        kpis: kpis.as_ref(),
        chart_dir: args.charts,
        utc_offset: offset,
    };
    write_report(&doc, out)?;
    info!(
        path = %out.display(),
        incidents = incidents.len(),
        sections = narrative.sections.len(),
        "wrote report"
    );
    Ok(())
}
