use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use beacon_algo::{period_kpis, PeriodKpis};
use beacon_cli::{cli::WindowArgs, config::BeaconConfig};
use beacon_io::load_incidents;
use tabwriter::TabWriter;
use tracing::info;

/// KPIs compare two windows, so the full history is loaded unfiltered.
pub fn handle(config: &BeaconConfig, input: &Path, window: &WindowArgs, json: bool) -> Result<()> {
    let window = window.resolve_or_default(config.forecast.window_days)?;
    let incidents = load_incidents(input)?;
    info!(window = %window, incidents = incidents.len(), "computing period KPIs");
    let kpis = period_kpis(&incidents, &window)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&kpis)?);
    } else {
        print_kpis(&kpis)?;
    }
    Ok(())
}

fn print_kpis(kpis: &PeriodKpis) -> Result<()> {
    println!("Current window:  {}", kpis.window);
    println!("Previous window: {}", kpis.previous_window);
    println!();
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "INDICATOR\tCURRENT\tPREVIOUS\tTREND\t")?;
    for tile in kpis.tiles() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{:+.1}%\t{}",
            tile.name,
            tile.current,
            tile.previous,
            tile.trend_percent,
            if tile.is_improving() { "improving" } else { "worsening" }
        )?;
    }
    writer.flush()?;
    Ok(())
}
