//! Configuration for the `beacon` tool.
//! The default file lives at ~/.beacon/config/beacon.toml.

use anyhow::{anyhow, Context, Result};
use beacon_algo::ForecastOptions;
use beacon_core::{BeaconError, BeaconResult};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BeaconConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Default destination for reports written without `--out`
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
        }
    }
}

fn default_results_dir() -> String {
    "~/.beacon/results".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Horizon quoted in narratives; does not change the computation
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// Window length used when only `--end` (or nothing) is given to `kpi`
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            horizon_days: default_horizon_days(),
            window_days: default_window_days(),
        }
    }
}

impl ForecastConfig {
    pub fn options(&self) -> ForecastOptions {
        ForecastOptions {
            top_n: self.top_n,
            horizon_days: self.horizon_days,
        }
    }
}

fn default_top_n() -> usize {
    6
}

fn default_horizon_days() -> u32 {
    7
}

fn default_window_days() -> u32 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    #[serde(default = "default_organization")]
    pub organization: String,
    /// Local time zone for peak-time analysis and report timestamps
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl ReportConfig {
    pub fn utc_offset(&self) -> BeaconResult<FixedOffset> {
        parse_utc_offset(self.utc_offset_hours)
    }
}

/// Whole-hour offset east of UTC; anything beyond +/-23 hours is rejected.
pub fn parse_utc_offset(hours: i32) -> BeaconResult<FixedOffset> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            BeaconError::Config(format!("[report] utc_offset_hours {hours} is out of range"))
        })
}

fn default_organization() -> String {
    "BENECO".to_string()
}

fn default_utc_offset_hours() -> i32 {
    8
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    pub fn tracing_level(&self) -> BeaconResult<tracing::Level> {
        self.level
            .parse()
            .map_err(|_| BeaconError::Config(format!("invalid [logging] level '{}'", self.level)))
    }
}

/// Get the Beacon home directory (~/.beacon)
pub fn beacon_home() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| anyhow!("Cannot determine home directory"))
        .map(|h| h.join(".beacon"))
}

/// Location: ~/.beacon/config/beacon.toml
pub fn default_config_path() -> Result<PathBuf> {
    Ok(beacon_home()?.join("config").join("beacon.toml"))
}

/// Resolve the config file path: `explicit` if given, else the default.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path(),
    }
}

/// Load configuration.
///
/// A missing default file yields defaults; a missing explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<BeaconConfig> {
    let path = config_path(explicit)?;
    if !path.exists() {
        if explicit.is_some() {
            return Err(anyhow!("config file {} does not exist", path.display()));
        }
        return Ok(BeaconConfig::default());
    }
    let contents =
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let config: BeaconConfig = toml::from_str(&contents)
        .map_err(|e| BeaconError::Config(format!("parsing {}: {e}", path.display())))?;
    Ok(config)
}

pub fn save_config(config: &BeaconConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .ok_or_else(|| anyhow!("Cannot determine home directory"))
            .map(|h| h.join(rest)),
        None => Ok(PathBuf::from(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_path_is_under_beacon_home() {
        let path = default_config_path().unwrap();
        assert!(path.to_string_lossy().contains(".beacon/config"));
        assert!(path.to_string_lossy().ends_with("beacon.toml"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: BeaconConfig = toml::from_str(
            r#"
            [forecast]
            top_n = 3

            [report]
            organization = "Baguio Electric"
            "#,
        )
        .unwrap();
        assert_eq!(config.forecast.top_n, 3);
        assert_eq!(config.forecast.horizon_days, 7);
        assert_eq!(config.forecast.window_days, 30);
        assert_eq!(config.report.organization, "Baguio Electric");
        assert_eq!(config.report.utc_offset_hours, 8);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("beacon.toml");
        let mut config = BeaconConfig::default();
        config.logging.level = "debug".into();
        save_config(&config, &path).unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.logging.tracing_level().unwrap(), tracing::Level::DEBUG);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("beacon.toml");
        fs::write(&path, "[forecast]\ntop_n = \"six\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BeaconError>(),
            Some(BeaconError::Config(_))
        ));
    }

    #[test]
    fn invalid_log_level_is_reported() {
        let logging = LoggingConfig {
            level: "loud".into(),
        };
        assert!(matches!(logging.tracing_level(), Err(BeaconError::Config(_))));
    }

    #[test]
    fn utc_offsets_are_range_checked() {
        assert_eq!(parse_utc_offset(8).unwrap().local_minus_utc(), 8 * 3600);
        assert_eq!(parse_utc_offset(-5).unwrap().local_minus_utc(), -5 * 3600);
        assert!(matches!(parse_utc_offset(24), Err(BeaconError::Config(_))));
        assert!(matches!(parse_utc_offset(1_000_000), Err(BeaconError::Config(_))));
        assert!(matches!(parse_utc_offset(i32::MIN), Err(BeaconError::Config(_))));

        let report = ReportConfig {
            utc_offset_hours: 1_000_000,
            ..ReportConfig::default()
        };
        assert!(report.utc_offset().is_err());
    }

    #[test]
    fn expands_home_prefix() {
        assert_eq!(expand_home("/var/beacon").unwrap(), PathBuf::from("/var/beacon"));
        assert!(!expand_home("~/results").unwrap().starts_with("~"));
    }
}
