use std::{fs, path::Path};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub run_id: String,
    pub command: String,
    pub version: String,
    pub timestamp: String,
    pub outputs: Vec<String>,
    pub params: Vec<Param>,
    #[serde(default)]
    pub telemetry: Option<ManifestTelemetry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestTelemetry {
    pub status: String,
    pub duration_ms: Option<u128>,
    #[serde(default)]
    pub env: Vec<Param>,
}

/// Write `run-<uuid>.json` next to the first output and return its path.
pub fn record_manifest(
    outputs: &[&Path],
    command: &str,
    params: &[(&str, &str)],
    telemetry: ManifestTelemetry,
) -> Result<std::path::PathBuf> {
    let run_id = Uuid::new_v4().to_string();
    let dir = outputs
        .first()
        .and_then(|out| out.parent())
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    fs::create_dir_all(&dir)?;
    let manifest = ManifestEntry {
        run_id: run_id.clone(),
        command: command.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        outputs: outputs.iter().map(|p| p.display().to_string()).collect(),
        params: params
            .iter()
            .map(|(k, v)| Param {
                name: k.to_string(),
                value: v.to_string(),
            })
            .collect(),
        telemetry: Some(telemetry),
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    let path = dir.join(format!("run-{}.json", run_id));
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
