//! File I/O around the forecasting pipeline: incident and sentiment loaders,
//! JSON/CSV/Parquet exports, and Markdown reports.

pub mod export;
pub mod incidents;
pub mod report;

pub use export::{
    analytics_tables, forecast_tables, write_json, write_table, write_tables, TableFormat,
};
pub use incidents::{
    load_incidents, load_sentiment, load_window, parse_incidents_csv, parse_incidents_json,
    parse_timestamp,
};
pub use report::{chart_slug, format_hours, render_markdown, write_report, ReportDocument};
