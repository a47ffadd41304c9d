//! Preference management command
//!
//! Provides CLI interface to view and edit the uploader preferences.

use crate::util;
use anyhow::{Context, Result};
use camli_core::prefs::{self, PreferenceKey};
use camli_core::UploaderConfig;
use owo_colors::OwoColorize;
use std::path::PathBuf;

/// Shown instead of secret values
const MASK: &str = "********";

/// List all preference values
pub async fn run_list(config_path: Option<PathBuf>) -> Result<()> {
    let config_path = util::resolve_config_path(config_path)?;
    let config = UploaderConfig::load(&config_path)?;

    println!("{}", "Uploader Preferences".bold());
    println!("{}: {}\n", "Location".dimmed(), config_path.display().dimmed());

    println!("{}", format!("[{}]", prefs::NAME).yellow());
    for key in PreferenceKey::ALL {
        println!("  {} = {}", key.as_str().cyan(), display_value(&config, key));
    }

    if let Err(e) = config.validate() {
        println!("\n{} {}", "Warning:".yellow(), e);
    }

    Ok(())
}

/// List recognized keys
pub async fn run_keys() -> Result<()> {
    for key in PreferenceKey::ALL {
        let kind = if key.is_switch() { "switch" } else { "text" };
        println!("{}\t{}", key, kind);
    }
    Ok(())
}

/// Get a single preference value
pub async fn run_get(config_path: Option<PathBuf>, key: &str) -> Result<()> {
    let config_path = util::resolve_config_path(config_path)?;
    let config = UploaderConfig::load(&config_path)?;

    let value = config.get_by_name(key).with_context(|| {
        format!(
            "Unknown preference key: {}. Use 'camli-uploader config keys' to see available keys.",
            key
        )
    })?;

    println!("{}", value.unwrap_or_default());
    Ok(())
}

/// Set a single preference value
pub async fn run_set(config_path: Option<PathBuf>, key: &str, value: &str) -> Result<()> {
    let config_path = util::resolve_config_path(config_path)?;
    let mut config = UploaderConfig::load(&config_path)?;

    config
        .set_by_name(key, value)
        .with_context(|| format!("Cannot set {}", key))?;

    // Validate before saving
    config.validate().context("Invalid configuration value")?;

    config.save(&config_path)?;

    let shown = match key.parse::<PreferenceKey>() {
        Ok(k) if k.is_secret() => MASK.to_string(),
        _ => value.to_string(),
    };
    println!("{} {} = {}", "✓".green(), key.cyan(), shown);
    println!(
        "{}",
        "Note: Restart running watchers for changes to take effect".yellow()
    );

    Ok(())
}

/// Show the config file path and optionally create it
pub async fn run_path(config_path: Option<PathBuf>, create: bool) -> Result<()> {
    let config_path = util::resolve_config_path(config_path)?;

    if create && !config_path.exists() {
        UploaderConfig::default().save(&config_path)?;
        println!("{} Created config file at: {}", "✓".green(), config_path.display());
    } else if config_path.exists() {
        println!("{}", config_path.display());
    } else {
        println!("{}", config_path.display());
        println!("{}", "File does not exist. Use --create to create it.".yellow());
    }

    Ok(())
}

fn display_value(config: &UploaderConfig, key: PreferenceKey) -> String {
    match config.get(key) {
        Some(_) if key.is_secret() => MASK.to_string(),
        Some(value) => value,
        None => "(unset)".dimmed().to_string(),
    }
}
