use std::process::ExitCode;

use anyhow::Result;
use beacon_cli::{
    cli::{Cli, Commands, ConfigCommands},
    config::{load_config, BeaconConfig},
};
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::{analytics::AnalyticsArgs, forecast::ForecastArgs, report::ReportArgs};

fn run(cli: &Cli, config: Result<BeaconConfig>) -> Result<()> {
    let explicit = cli.config.as_deref();
    match &cli.command {
        Commands::Forecast {
            input,
            window,
            top_n,
            out,
            tables,
            format,
        } => commands::forecast::handle(
            &config?,
            &ForecastArgs {
                input,
                window,
                top_n: *top_n,
                out: out.as_deref(),
                tables: tables.as_deref(),
                format: (*format).into(),
            },
        ),
        Commands::Analytics {
            input,
            window,
            sentiment,
            out,
            tables,
            format,
        } => commands::analytics::handle(
            &config?,
            &AnalyticsArgs {
                input,
                window,
                sentiment: sentiment.as_deref(),
                out: out.as_deref(),
                tables: tables.as_deref(),
                format: (*format).into(),
            },
        ),
        Commands::Kpi {
            input,
            window,
            json,
        } => commands::kpi::handle(&config?, input, window, *json),
        Commands::Report {
            input,
            window,
            sentiment,
            charts,
            organization,
            out,
        } => commands::report::handle(
            &config?,
            &ReportArgs {
                input,
                window,
                sentiment: sentiment.as_deref(),
                charts: charts.as_deref(),
                organization: organization.as_deref(),
                out: out.as_deref(),
            },
        ),
        Commands::Config { command } => match command {
            // init and path must work even when the current file is broken
            ConfigCommands::Init { force } => commands::config::init(explicit, *force),
            ConfigCommands::Show => commands::config::show(explicit),
            ConfigCommands::Path => commands::config::path(explicit),
        },
        Commands::Completions { shell, out } => commands::completions::handle(*shell, out.as_deref()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let level = cli.log_level.unwrap_or_else(|| {
        config
            .as_ref()
            .ok()
            .and_then(|c| c.logging.tracing_level().ok())
            .unwrap_or(Level::INFO)
    });
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("beacon v{}", env!("CARGO_PKG_VERSION"));

    match run(&cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
