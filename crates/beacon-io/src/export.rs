use std::{
    fmt,
    fs::{self, File},
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{anyhow, Context, Result};
use beacon_algo::{DashboardAnalytics, ForecastSummary, RankedRisk};
use polars::prelude::*;
#[cfg(feature = "parquet")]
use polars::prelude::ParquetWriter;
use serde::Serialize;
use tracing::info;

/// On-disk format for tabular exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    #[default]
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Parquet => "parquet",
        }
    }
}

impl FromStr for TableFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "csv" => Ok(TableFormat::Csv),
            "parquet" => Ok(TableFormat::Parquet),
            other => Err(anyhow!("unknown table format '{}'; use csv or parquet", other)),
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Pretty-print any serializable value to `path`, creating parent directories.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn ranked_frame(rows: &[RankedRisk]) -> Result<DataFrame> {
    let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
    let probabilities: Vec<f64> = rows.iter().map(|row| row.probability).collect();
    let labels: Vec<&str> = rows.iter().map(|row| row.label.as_str()).collect();
    let df = DataFrame::new(vec![
        Series::new("rank", (1..=rows.len() as u32).collect::<Vec<u32>>()),
        Series::new("name", names),
        Series::new("probability", probabilities),
        Series::new("risk", labels),
    ])?;
    Ok(df)
}

fn bucket_frame(summary: &ForecastSummary) -> Result<DataFrame> {
    let shares = &summary.restoration.buckets;
    let df = DataFrame::new(vec![
        Series::new(
            "bucket",
            shares.iter().map(|s| s.bucket.label()).collect::<Vec<&str>>(),
        ),
        Series::new("count", shares.iter().map(|s| s.count).collect::<Vec<u64>>()),
        Series::new("percent", shares.iter().map(|s| s.percent).collect::<Vec<f64>>()),
    ])?;
    Ok(df)
}

/// Forecast tables keyed by file stem: `feeder_risk`, `area_risk`,
/// `restoration_buckets`.
pub fn forecast_tables(summary: &ForecastSummary) -> Result<Vec<(&'static str, DataFrame)>> {
    Ok(vec![
        ("feeder_risk", ranked_frame(&summary.top_feeders)?),
        ("area_risk", ranked_frame(&summary.top_areas)?),
        ("restoration_buckets", bucket_frame(summary)?),
    ])
}

/// Analytics tables: feeder volume, root causes, area impact, peak times
/// and per-feeder restoration.
pub fn analytics_tables(analytics: &DashboardAnalytics) -> Result<Vec<(&'static str, DataFrame)>> {
    let count_frame = |rows: &[beacon_algo::CountRow]| -> Result<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new(
                "name",
                rows.iter().map(|r| r.name.as_str()).collect::<Vec<&str>>(),
            ),
            Series::new("count", rows.iter().map(|r| r.count).collect::<Vec<u64>>()),
        ])?)
    };
    let peaks = DataFrame::new(vec![
        Series::new(
            "weekday",
            analytics
                .peak_times
                .iter()
                .map(|c| c.weekday_name())
                .collect::<Vec<&str>>(),
        ),
        Series::new(
            "hour",
            analytics.peak_times.iter().map(|c| c.hour).collect::<Vec<u32>>(),
        ),
        Series::new(
            "count",
            analytics.peak_times.iter().map(|c| c.count).collect::<Vec<u64>>(),
        ),
    ])?;
    let restoration = DataFrame::new(vec![
        Series::new(
            "feeder",
            analytics
                .restoration_by_feeder
                .iter()
                .map(|r| r.feeder.as_str())
                .collect::<Vec<&str>>(),
        ),
        Series::new(
            "mean_hours",
            analytics
                .restoration_by_feeder
                .iter()
                .map(|r| r.mean_hours)
                .collect::<Vec<f64>>(),
        ),
        Series::new(
            "samples",
            analytics
                .restoration_by_feeder
                .iter()
                .map(|r| r.samples as u64)
                .collect::<Vec<u64>>(),
        ),
    ])?;
    Ok(vec![
        ("feeder_counts", count_frame(&analytics.feeder_counts)?),
        ("root_causes", count_frame(&analytics.root_causes)?),
        ("area_impact", count_frame(&analytics.area_impact)?),
        ("peak_times", peaks),
        ("restoration_by_feeder", restoration),
    ])
}

/// Write one frame as `<dir>/<stem>.<ext>`.
pub fn write_table(df: &mut DataFrame, dir: &Path, stem: &str, format: TableFormat) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating directory {}", dir.display()))?;
    let path = dir.join(format!("{stem}.{}", format.extension()));
    let mut file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    match format {
        TableFormat::Csv => CsvWriter::new(&mut file)
            .finish(df)
            .context("writing CSV file")?,
        #[cfg(feature = "parquet")]
        TableFormat::Parquet => ParquetWriter::new(&mut file)
            .finish(df)
            .map(|_| ())
            .context("writing Parquet file")?,
        #[cfg(not(feature = "parquet"))]
        TableFormat::Parquet => {
            return Err(anyhow!(
                "parquet support is disabled; rebuild with the 'parquet' feature"
            ))
        }
    }
    Ok(path)
}

/// Write every table in `tables` under `dir` and return the written paths.
pub fn write_tables(
    tables: Vec<(&'static str, DataFrame)>,
    dir: &Path,
    format: TableFormat,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(tables.len());
    for (stem, mut df) in tables {
        let path = write_table(&mut df, dir, stem, format)?;
        info!(table = stem, rows = df.height(), path = %path.display(), "wrote table");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_algo::build_forecast;
    use beacon_core::{FeederId, IncidentRecord};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn summary() -> ForecastSummary {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let incidents = vec![
            IncidentRecord::new("1")
                .with_feeder(FeederId::new(1), Some("F1"))
                .with_areas(["Irisan"]),
            IncidentRecord::new("2")
                .with_feeder(FeederId::new(2), Some("F2"))
                .with_areas(["Irisan", "Camp 7"]),
        ];
        build_forecast(&incidents, t0)
    }

    #[test]
    fn parses_table_formats() {
        assert_eq!("CSV".parse::<TableFormat>().unwrap(), TableFormat::Csv);
        assert_eq!("parquet".parse::<TableFormat>().unwrap(), TableFormat::Parquet);
        assert!("xlsx".parse::<TableFormat>().is_err());
    }

    #[test]
    fn forecast_tables_have_expected_shapes() {
        let tables = forecast_tables(&summary()).unwrap();
        let heights: Vec<(&str, usize)> = tables.iter().map(|(n, df)| (*n, df.height())).collect();
        assert_eq!(
            heights,
            vec![("feeder_risk", 2), ("area_risk", 2), ("restoration_buckets", 4)]
        );
    }

    #[test]
    fn writes_csv_tables() {
        let dir = tempdir().unwrap();
        let written =
            write_tables(forecast_tables(&summary()).unwrap(), dir.path(), TableFormat::Csv).unwrap();
        assert_eq!(written.len(), 3);

        let feeders = fs::read_to_string(dir.path().join("feeder_risk.csv")).unwrap();
        let mut lines = feeders.lines();
        assert_eq!(lines.next(), Some("rank,name,probability,risk"));
        assert!(lines.next().unwrap().starts_with("1,F1,0.5,HIGH"));
    }

    #[test]
    fn writes_pretty_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("summary.json");
        write_json(&summary(), &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["incident_count"], 2);
    }
}
