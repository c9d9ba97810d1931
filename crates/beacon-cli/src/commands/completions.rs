use std::{
    fs::{self, File},
    io::{self, Write},
    path::Path,
};

use anyhow::{Context, Result};
use clap_complete::{generate, Shell};

use beacon_cli::cli::build_cli_command;

const BIN_NAME: &str = "beacon";

pub fn handle(shell: Shell, out: Option<&Path>) -> Result<()> {
    let mut sink: Box<dyn Write> = match out {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            Box::new(File::create(path).with_context(|| format!("creating {}", path.display()))?)
        }
        None => Box::new(io::stdout()),
    };
    generate(shell, &mut build_cli_command(), BIN_NAME, &mut sink);
    sink.flush()?;
    if let Some(path) = out {
        println!("Wrote {shell} completions to {}", path.display());
    }
    Ok(())
}
