use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use beacon_algo::{build_forecast_with, narrative, ForecastSummary};
use beacon_cli::{cli::WindowArgs, config::BeaconConfig};
use beacon_io::{forecast_tables, format_hours, write_json, write_tables, TableFormat};
use chrono::Utc;
use tabwriter::TabWriter;
use tracing::info;

use crate::commands::telemetry::record_run_timed;
use crate::commands::util::{print_ranked, select_incidents};

pub struct ForecastArgs<'a> {
    pub input: &'a Path,
    pub window: &'a WindowArgs,
    pub top_n: Option<usize>,
    pub out: Option<&'a Path>,
    pub tables: Option<&'a Path>,
    pub format: TableFormat,
}

pub fn handle(config: &BeaconConfig, args: &ForecastArgs<'_>) -> Result<()> {
    let start = Instant::now();
    let mut outputs: Vec<PathBuf> = Vec::new();
    let result = run(config, args, &mut outputs);

    let top = args
        .top_n
        .unwrap_or(config.forecast.top_n)
        .to_string();
    let input = args.input.display().to_string();
    let format = args.format.to_string();
    let output_refs: Vec<&Path> = outputs.iter().map(PathBuf::as_path).collect();
    record_run_timed(
        &output_refs,
        "forecast",
        &[
            ("input", input.as_str()),
            ("top", top.as_str()),
            ("format", format.as_str()),
        ],
        start,
        &result,
    );
    result
}

fn run(config: &BeaconConfig, args: &ForecastArgs<'_>, outputs: &mut Vec<PathBuf>) -> Result<()> {
    let selection = select_incidents(args.input, args.window, config.forecast.window_days)?;
    let mut options = config.forecast.options();
    if let Some(top_n) = args.top_n {
        options.top_n = top_n;
    }
    info!(
        incidents = selection.incidents.len(),
        top_n = options.top_n,
        "running forecast"
    );
    let summary = build_forecast_with(&selection.incidents, &options, Utc::now());

    if let Some(window) = selection.window {
        println!("Reporting window: {window}");
    }
    print_summary(&summary)?;

    if let Some(path) = args.out {
        write_json(&summary, path)?;
        info!(path = %path.display(), "wrote forecast summary");
        outputs.push(path.to_path_buf());
    }
    if let Some(dir) = args.tables {
        outputs.extend(write_tables(forecast_tables(&summary)?, dir, args.format)?);
    }
    Ok(())
}

fn print_summary(summary: &ForecastSummary) -> Result<()> {
    println!("Forecast over {} incidents", summary.incident_count);
    println!();
    print_ranked("FEEDER", &summary.top_feeders)?;
    println!();
    print_ranked("AREA", &summary.top_areas)?;
    println!();

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "RESTORATION\tOUTAGES\tSHARE")?;
    for share in &summary.restoration.buckets {
        writeln!(writer, "{}\t{}\t{:.1}%", share.bucket, share.count, share.percent)?;
    }
    writer.flush()?;
    println!();

    println!(
        "Mean time to restore: {}",
        format_hours(summary.restoration.mttr_hours)
    );
    println!("{}", narrative::feeder_forecast_headline(summary));
    println!("{}", narrative::area_forecast_headline(summary));
    println!("{}", narrative::restoration_headline(&summary.restoration));
    println!("{}", narrative::overall_risk_line(summary));
    Ok(())
}
