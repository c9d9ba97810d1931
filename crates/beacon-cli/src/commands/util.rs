use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use beacon_algo::RankedRisk;
use beacon_cli::cli::WindowArgs;
use beacon_core::{IncidentRecord, ReportingWindow};
use beacon_io::{load_incidents, load_window};
use tabwriter::TabWriter;
use tracing::info;

/// Incidents selected by the window flags, plus the resolved window.
pub struct Selection {
    pub incidents: Vec<IncidentRecord>,
    pub window: Option<ReportingWindow>,
}

pub fn select_incidents(input: &Path, window: &WindowArgs, default_days: u32) -> Result<Selection> {
    let window = window.resolve(default_days)?;
    let incidents = match &window {
        Some(window) => load_window(input, window)?,
        None => load_incidents(input)?,
    };
    info!(
        input = %input.display(),
        incidents = incidents.len(),
        "loaded incident history"
    );
    Ok(Selection { incidents, window })
}

pub fn print_ranked(heading: &str, rows: &[RankedRisk]) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "{heading}\tPROBABILITY\tRISK")?;
    if rows.is_empty() {
        writeln!(writer, "(no data)\t-\t-")?;
    }
    for row in rows {
        writeln!(writer, "{}\t{:.1}%\t{}", row.name, row.percent(), row.label)?;
    }
    writer.flush()?;
    Ok(())
}
