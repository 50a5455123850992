//! `assetlib config`: print the effective configuration.

use std::path::Path;

use anyhow::{Context, Result};

use assetlib::config::Config;

/// Execute the config command.
///
/// Validation problems are printed rather than returned, so a broken file
/// can still be inspected.
pub fn execute(config: &Config, loaded_from: Option<&Path>) -> Result<()> {
    match loaded_from {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!("# No config file found; showing defaults"),
    }
    let text = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{text}");

    match config.validate() {
        Ok(result) if result.has_warnings() => {
            println!("Warnings:");
            for warning in &result.warnings {
                println!("  - {warning}");
            }
        },
        Ok(_) => println!("Configuration is valid"),
        Err(e) => println!("{e}"),
    }
    Ok(())
}
