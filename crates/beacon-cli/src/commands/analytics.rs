use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use beacon_algo::{analytics::busiest_slot, build_analytics, CountRow, DashboardAnalytics};
use beacon_cli::{cli::WindowArgs, config::BeaconConfig};
use beacon_io::{
    analytics_tables, format_hours, load_sentiment, write_json, write_tables, TableFormat,
};
use tabwriter::TabWriter;
use tracing::info;

use crate::commands::telemetry::record_run_timed;
use crate::commands::util::select_incidents;

pub struct AnalyticsArgs<'a> {
    pub input: &'a Path,
    pub window: &'a WindowArgs,
    pub sentiment: Option<&'a Path>,
    pub out: Option<&'a Path>,
    pub tables: Option<&'a Path>,
    pub format: TableFormat,
}

pub fn handle(config: &BeaconConfig, args: &AnalyticsArgs<'_>) -> Result<()> {
    let start = Instant::now();
    let mut outputs: Vec<PathBuf> = Vec::new();
    let result = run(config, args, &mut outputs);

    let input = args.input.display().to_string();
    let sentiment = args
        .sentiment
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let output_refs: Vec<&Path> = outputs.iter().map(PathBuf::as_path).collect();
    record_run_timed(
        &output_refs,
        "analytics",
        &[("input", input.as_str()), ("sentiment", sentiment.as_str())],
        start,
        &result,
    );
    result
}

fn run(config: &BeaconConfig, args: &AnalyticsArgs<'_>, outputs: &mut Vec<PathBuf>) -> Result<()> {
    let selection = select_incidents(args.input, args.window, config.forecast.window_days)?;
    let sentiment = match args.sentiment {
        Some(path) => load_sentiment(path)?,
        None => Vec::new(),
    };
    let offset = config.report.utc_offset()?;
    let analytics = build_analytics(&selection.incidents, &sentiment, offset);

    if let Some(window) = selection.window {
        println!("Reporting window: {window}");
    }
    print_analytics(&analytics)?;

    if let Some(path) = args.out {
        write_json(&analytics, path)?;
        info!(path = %path.display(), "wrote analytics");
        outputs.push(path.to_path_buf());
    }
    if let Some(dir) = args.tables {
        outputs.extend(write_tables(analytics_tables(&analytics)?, dir, args.format)?);
    }
    Ok(())
}

fn print_counts(heading: &str, rows: &[CountRow]) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "{heading}\tINCIDENTS")?;
    for row in rows {
        writeln!(writer, "{}\t{}", row.name, row.count)?;
    }
    writer.flush()?;
    println!();
    Ok(())
}

fn print_analytics(analytics: &DashboardAnalytics) -> Result<()> {
    println!("Analytics over {} incidents", analytics.incident_count);
    println!();
    print_counts("FEEDER", &analytics.feeder_counts)?;
    print_counts("ROOT CAUSE", &analytics.root_causes)?;
    print_counts("AREA", &analytics.area_impact)?;

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "FEEDER\tAVG RESTORATION\tSAMPLES")?;
    for row in &analytics.restoration_by_feeder {
        writeln!(writer, "{}\t{:.2} h\t{}", row.feeder, row.mean_hours, row.samples)?;
    }
    writer.flush()?;
    println!();

    println!("Mean time to restore: {}", format_hours(analytics.mttr_hours));
    if let Some(cell) = busiest_slot(&analytics.peak_times) {
        println!(
            "Busiest slot: {} {:02}:00 ({} incidents)",
            cell.weekday_name(),
            cell.hour,
            cell.count
        );
    }

    if !analytics.sentiment.is_empty() {
        println!();
        let mut writer = TabWriter::new(io::stdout());
        writeln!(writer, "CAUSE\tSENTIMENT\tREPORTS")?;
        for row in &analytics.sentiment {
            writeln!(writer, "{}\t{:.2}\t{}", row.cause, row.mean_score, row.samples)?;
        }
        writer.flush()?;
    }
    Ok(())
}
