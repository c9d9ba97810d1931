use std::path::Path;

use anyhow::{anyhow, Result};
use beacon_cli::config::{config_path, load_config, save_config, BeaconConfig};
use tracing::info;

pub fn init(explicit: Option<&Path>, force: bool) -> Result<()> {
    let path = config_path(explicit)?;
    if path.exists() && !force {
        return Err(anyhow!(
            "{} already exists; pass --force to overwrite",
            path.display()
        ));
    }
    save_config(&BeaconConfig::default(), &path)?;
    info!(path = %path.display(), "wrote default configuration");
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

pub fn show(explicit: Option<&Path>) -> Result<()> {
    let config = load_config(explicit)?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub fn path(explicit: Option<&Path>) -> Result<()> {
    println!("{}", config_path(explicit)?.display());
    Ok(())
}
