use beacon_cli::manifest::{record_manifest, ManifestTelemetry, Param};
use std::{env, path::Path, time::Instant};
use tracing::{debug, warn};

const TELEMETRY_ENV_KEYS: &[&str] = &["BEACON_ENV", "GITHUB_RUN_ID", "GITHUB_WORKFLOW", "GITHUB_SHA"];

fn collect_telemetry_env() -> Vec<Param> {
    TELEMETRY_ENV_KEYS
        .iter()
        .filter_map(|key| {
            env::var(key).ok().map(|value| Param {
                name: key.to_string(),
                value,
            })
        })
        .collect()
}

/// Record a run manifest for `outputs`; failures are logged, never fatal.
pub fn record_run_timed(
    outputs: &[&Path],
    command: &str,
    params: &[(&str, &str)],
    start: Instant,
    result: &anyhow::Result<()>,
) {
    if outputs.is_empty() {
        return;
    }
    let telemetry = ManifestTelemetry {
        status: if result.is_ok() { "success" } else { "failure" }.to_string(),
        duration_ms: Some(start.elapsed().as_millis()),
        env: collect_telemetry_env(),
    };
    match record_manifest(outputs, command, params, telemetry) {
        Ok(path) => debug!(manifest = %path.display(), "recorded run manifest"),
        Err(err) => warn!("failed to record run manifest: {err:#}"),
    }
}
