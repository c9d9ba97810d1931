use anyhow::Result;
use beacon_core::ReportingWindow;
use beacon_io::TableFormat;
use chrono::{NaiveDate, Utc};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "beacon", author, version, about = "Outage risk forecasting for distribution feeders", long_about = None)]
pub struct Cli {
    /// Set the logging level (overrides `[logging] level` in the config file)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// Read configuration from this file instead of ~/.beacon/config/beacon.toml
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Date range selection shared by the analysis commands.
///
/// With no flags every incident in the input is used.
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// First day of the reporting window (YYYY-MM-DD)
    #[arg(long, conflicts_with = "days")]
    pub start: Option<NaiveDate>,
    /// Last day of the reporting window (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub end: Option<NaiveDate>,
    /// Window length in days, ending at --end
    #[arg(long)]
    pub days: Option<u32>,
}

impl WindowArgs {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.days.is_none()
    }

    /// Resolve the flags into a window; `None` when no flag was given.
    pub fn resolve(&self, default_days: u32) -> Result<Option<ReportingWindow>> {
        if self.is_empty() {
            return Ok(None);
        }
        self.resolve_or_default(default_days).map(Some)
    }

    /// Like [`resolve`](Self::resolve) but falls back to the last
    /// `default_days` ending today.
    pub fn resolve_or_default(&self, default_days: u32) -> Result<ReportingWindow> {
        let end = self.end.unwrap_or_else(|| Utc::now().date_naive());
        let window = match self.start {
            Some(start) => ReportingWindow::new(start, end)?,
            None => ReportingWindow::last_days(end, self.days.unwrap_or(default_days))?,
        };
        Ok(window)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableFormatArg {
    #[default]
    Csv,
    Parquet,
}

impl From<TableFormatArg> for TableFormat {
    fn from(arg: TableFormatArg) -> Self {
        match arg {
            TableFormatArg::Csv => TableFormat::Csv,
            TableFormatArg::Parquet => TableFormat::Parquet,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank feeders and areas by outage risk and estimate restoration times
    Forecast {
        /// Incident file (.json or .csv)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        #[command(flatten)]
        window: WindowArgs,
        /// Number of feeders/areas to list (defaults to [forecast] top_n)
        #[arg(long = "top")]
        top_n: Option<usize>,
        /// Write the forecast summary as JSON
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Write feeder/area/restoration tables into this directory
        #[arg(long, value_hint = ValueHint::DirPath)]
        tables: Option<PathBuf>,
        /// Table format for --tables
        #[arg(long, value_enum, default_value_t = TableFormatArg::Csv)]
        format: TableFormatArg,
    },
    /// Cause, area, peak-time, restoration and sentiment breakdowns
    Analytics {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        #[command(flatten)]
        window: WindowArgs,
        /// Scored public reports (.json or .csv with cause, sentiment_score)
        #[arg(long, value_hint = ValueHint::FilePath)]
        sentiment: Option<PathBuf>,
        /// Write the analytics as JSON
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Write analytics tables into this directory
        #[arg(long, value_hint = ValueHint::DirPath)]
        tables: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = TableFormatArg::Csv)]
        format: TableFormatArg,
    },
    /// Compare a reporting window with the period right before it
    Kpi {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        #[command(flatten)]
        window: WindowArgs,
        /// Print the tiles as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Render a Markdown outage report
    Report {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long, value_hint = ValueHint::FilePath)]
        sentiment: Option<PathBuf>,
        /// Directory with chart images named after report sections
        #[arg(long, value_hint = ValueHint::DirPath)]
        charts: Option<PathBuf>,
        /// Organization named in the report title
        #[arg(long)]
        organization: Option<String>,
        /// Output Markdown file (defaults to a timestamped file in [data] results_dir)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Print the configuration file location
    Path,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
