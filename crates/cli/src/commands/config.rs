//! Config command - write an example gazette.toml

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

use crate::args::{ConfigArgs, ConfigCommands};
use crate::config::AppConfig;

pub async fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init { path, force } => init_config(&path, force),
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, AppConfig::example_toml())
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote example configuration");

    println!("Created config file: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Choose a gateway in [gateway] and set your identity in [session]");
    println!("  2. Export the API key env vars named in the file");
    println!("  3. Run 'gazette doctor' to validate your setup");
    println!("  4. Run 'gazette feed' to list published articles");

    Ok(())
}
