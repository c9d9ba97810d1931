//! Incident loaders.
//!
//! Two layouts are accepted:
//!
//! - **JSON**: an array of announcement rows as exported from the operations
//!   database (`id`, `feeder_id`, `feeders.name` or `feeder_name`,
//!   `areas_affected`, `created_at`, `restored_at`, `cause`, `status`).
//! - **CSV**: one row per incident with the same column names; areas are
//!   separated by `;` inside `areas_affected`.
//!
//! Timestamps that cannot be parsed become `None` and are reported at `warn`
//! level; the record itself is kept so it still counts toward frequencies.

use anyhow::{anyhow, Context, Result};
use beacon_core::{FeederId, IncidentRecord, IncidentStatus, ReportingWindow, SentimentSample};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info, warn};

const AREA_SEPARATOR: char = ';';

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawFeeder {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawIncident {
    id: RawId,
    #[serde(default)]
    feeder_id: Option<u32>,
    #[serde(default)]
    feeders: Option<RawFeeder>,
    #[serde(default)]
    feeder_name: Option<String>,
    #[serde(default, alias = "affected_areas")]
    areas_affected: Option<Vec<String>>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    restored_at: Option<String>,
    #[serde(default)]
    cause: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CsvIncident {
    id: String,
    #[serde(default)]
    feeder_id: Option<u32>,
    #[serde(default)]
    feeder_name: Option<String>,
    #[serde(default, alias = "affected_areas")]
    areas_affected: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    restored_at: Option<String>,
    #[serde(default)]
    cause: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the timestamp shapes seen in exports.
///
/// RFC 3339 with offset, naive `YYYY-MM-DD[T ]HH:MM:SS[.fff]` (taken as UTC),
/// or a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f%#z"] {
        if let Ok(ts) = DateTime::parse_from_str(raw, format) {
            return Some(ts.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn timestamp_field(id: &str, field: &str, raw: Option<String>) -> Option<DateTime<Utc>> {
    let raw = non_empty(raw)?;
    let parsed = parse_timestamp(&raw);
    if parsed.is_none() {
        warn!(incident = id, field, value = %raw, "unparsable timestamp; ignoring it");
    }
    parsed
}

#[allow(clippy::too_many_arguments)]
fn build_record(
    id: String,
    feeder_id: Option<u32>,
    feeder_name: Option<String>,
    areas: Vec<String>,
    created_at: Option<String>,
    restored_at: Option<String>,
    cause: Option<String>,
    status: Option<String>,
) -> IncidentRecord {
    let created_at = timestamp_field(&id, "created_at", created_at);
    let restored_at = timestamp_field(&id, "restored_at", restored_at);
    IncidentRecord {
        feeder_id: feeder_id.map(FeederId::new),
        feeder_name: non_empty(feeder_name),
        affected_areas: areas
            .into_iter()
            .map(|area| area.trim().to_string())
            .filter(|area| !area.is_empty())
            .collect(),
        created_at,
        restored_at,
        cause: non_empty(cause),
        status: non_empty(status).map(IncidentStatus::from),
        id,
    }
}

impl From<RawIncident> for IncidentRecord {
    fn from(raw: RawIncident) -> Self {
        let feeder_name = raw
            .feeders
            .and_then(|feeder| feeder.name)
            .or(raw.feeder_name);
        build_record(
            raw.id.into_string(),
            raw.feeder_id,
            feeder_name,
            raw.areas_affected.unwrap_or_default(),
            raw.created_at,
            raw.restored_at,
            raw.cause,
            raw.status,
        )
    }
}

impl From<CsvIncident> for IncidentRecord {
    fn from(raw: CsvIncident) -> Self {
        let areas = raw
            .areas_affected
            .map(|cell| cell.split(AREA_SEPARATOR).map(str::to_string).collect())
            .unwrap_or_default();
        build_record(
            raw.id,
            raw.feeder_id,
            raw.feeder_name,
            areas,
            raw.created_at,
            raw.restored_at,
            raw.cause,
            raw.status,
        )
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}

pub fn parse_incidents_json(text: &str) -> Result<Vec<IncidentRecord>> {
    let rows: Vec<RawIncident> =
        serde_json::from_str(text).context("parsing incident JSON array")?;
    Ok(rows.into_iter().map(IncidentRecord::from).collect())
}

pub fn parse_incidents_csv<R: std::io::Read>(reader: R) -> Result<Vec<IncidentRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for (line, row) in csv_reader.deserialize::<CsvIncident>().enumerate() {
        let row = row.with_context(|| format!("parsing incident CSV row {}", line + 1))?;
        records.push(IncidentRecord::from(row));
    }
    Ok(records)
}

/// Load every incident in `path` (`.json` or `.csv`).
pub fn load_incidents(path: &Path) -> Result<Vec<IncidentRecord>> {
    let incidents = match extension_of(path).as_str() {
        "json" => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("opening {}", path.display()))?;
            parse_incidents_json(&text)?
        }
        "csv" => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            parse_incidents_csv(file)?
        }
        other => {
            return Err(anyhow!(
                "unsupported incident file extension '{}'; use .json or .csv",
                other
            ))
        }
    };
    debug!(path = %path.display(), count = incidents.len(), "loaded incidents");
    Ok(incidents)
}

/// Load incidents and keep those created inside `window`.
pub fn load_window(path: &Path, window: &ReportingWindow) -> Result<Vec<IncidentRecord>> {
    let all = load_incidents(path)?;
    let kept = window.filter(&all);
    info!(
        window = %window,
        loaded = all.len(),
        kept = kept.len(),
        "selected incidents for reporting window"
    );
    Ok(kept)
}

#[derive(Debug, Deserialize)]
struct RawSentiment {
    #[serde(default)]
    cause: Option<String>,
    #[serde(alias = "score")]
    sentiment_score: Option<f64>,
}

/// Load scored public reports (`cause`, `sentiment_score`) from JSON or CSV.
///
/// Rows without a score are skipped.
pub fn load_sentiment(path: &Path) -> Result<Vec<SentimentSample>> {
    let rows: Vec<RawSentiment> = match extension_of(path).as_str() {
        "json" => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_str(&text).context("parsing sentiment JSON array")?
        }
        "csv" => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(file)
                .deserialize::<RawSentiment>()
                .collect::<Result<_, _>>()
                .context("parsing sentiment CSV")?
        }
        other => {
            return Err(anyhow!(
                "unsupported sentiment file extension '{}'; use .json or .csv",
                other
            ))
        }
    };
    let total = rows.len();
    let samples: Vec<SentimentSample> = rows
        .into_iter()
        .filter_map(|row| {
            row.sentiment_score.map(|score| SentimentSample {
                cause: non_empty(row.cause),
                score,
            })
        })
        .collect();
    if samples.len() < total {
        debug!(skipped = total - samples.len(), "sentiment rows without a score");
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_common_timestamp_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-06-01T08:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01T16:00:00+08:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01T08:00:00.000000+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01 08:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01T08:00:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-06-01"),
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn json_rows_resolve_joined_feeder_name() {
        let incidents = parse_incidents_json(
            r#"[
                {"id": 1, "feeder_id": 3, "feeders": {"name": "Irisan"},
                 "areas_affected": ["Pinsao Proper", " "], "created_at": "2024-06-01T08:00:00Z",
                 "restored_at": null, "cause": "Vegetation", "status": "ongoing"},
                {"id": "b-2", "feeder_id": 5, "feeders": null, "areas_affected": null,
                 "created_at": "not a date"}
            ]"#,
        )
        .unwrap();

        assert_eq!(incidents[0].id, "1");
        assert_eq!(incidents[0].feeder_label().as_deref(), Some("Irisan"));
        assert_eq!(incidents[0].affected_areas, vec!["Pinsao Proper".to_string()]);
        assert_eq!(incidents[0].status, Some(IncidentStatus::Ongoing));

        assert_eq!(incidents[1].feeder_label().as_deref(), Some("Feeder 5"));
        assert!(incidents[1].affected_areas.is_empty());
        assert_eq!(incidents[1].created_at, None);
    }

    #[test]
    fn csv_rows_split_areas() {
        let data = "\
id,feeder_id,feeder_name,areas_affected,created_at,restored_at,cause,status
a1,2,Camp 7,Camp 7;Loakan Proper,2024-06-01T08:00:00Z,2024-06-01T11:00:00Z,Equipment,Completed
a2,,,,2024-06-02T08:00:00Z,,,
";
        let incidents = parse_incidents_csv(data.as_bytes()).unwrap();

        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].affected_areas.len(), 2);
        assert_eq!(incidents[0].restoration_hours(), Some(3.0));
        assert_eq!(incidents[1].feeder_id, None);
        assert_eq!(incidents[1].cause, None);
        assert_eq!(incidents[1].cause_label(), "Unknown");
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_incidents(Path::new("incidents.xlsx")).unwrap_err();
        assert!(err.to_string().contains("unsupported incident file extension"));
    }
}
