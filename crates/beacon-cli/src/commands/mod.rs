pub mod analytics;
pub mod completions;
pub mod config;
pub mod forecast;
pub mod kpi;
pub mod report;
pub mod telemetry;
pub mod util;
