//! Configuration system for sundowner with validation and default generation.
//!
//! Configuration lives in a TOML file at
//! `$XDG_CONFIG_HOME/sundowner/sundowner.toml`. A commented default file is
//! generated on first run. All fields are optional; accessors fall back to
//! the Omarchy conventions the tool was built around.
//!
//! ```toml
//! #[Themes]
//! theme_dir = "~/.local/share/omarchy/themes"            # One subdirectory per theme
//! theme_command = "~/.local/share/omarchy/bin/omarchy-theme-set"
//!
//! #[Scheduling]
//! check_interval_secs = 60   # Seconds between day/night checks (10-3600)
//!
//! #[Location override]
//! # latitude = 40.7128       # Skip location detection entirely
//! # longitude = -74.0060
//! ```
//!
//! When both `latitude` and `longitude` are present they short-circuit the
//! location resolver; setting only one of them is a configuration error.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CHECK_INTERVAL_SECS, DEFAULT_THEME_COMMAND, DEFAULT_THEME_DIR,
    MAX_CHECK_INTERVAL_SECS, MIN_CHECK_INTERVAL_SECS,
};
use crate::geo::GeoCoordinate;
use crate::utils::expand_tilde;


/// Configuration structure for sundowner application settings.
///
/// Loaded from `sundowner.toml`. Every field is optional and falls back to a
/// default when not specified.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Config {
    /// Directory containing one subdirectory per theme
    pub theme_dir: Option<String>,
    /// External command invoked with the chosen theme name
    pub theme_command: Option<String>,
    /// Seconds between day/night checks (10-3600)
    pub check_interval_secs: Option<u64>,
    /// Manual latitude override in degrees (-90 to +90)
    pub latitude: Option<f64>,
    /// Manual longitude override in degrees (-180 to +180)
    pub longitude: Option<f64>,
}

/// Template written when no configuration file exists yet.
const DEFAULT_CONFIG: &str = r#"#[Themes]
theme_dir = "~/.local/share/omarchy/themes"            # One subdirectory per theme
theme_command = "~/.local/share/omarchy/bin/omarchy-theme-set"

#[Scheduling]
check_interval_secs = 60   # Seconds between day/night checks (10-3600)

#[Location override]
# Uncomment both to skip location detection entirely
# latitude = 40.7128
# longitude = -74.0060
"#;

impl Config {
    /// Load configuration using automatic path detection.
    ///
    /// Creates a default configuration file if none exists, then parses and
    /// validates the result.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            create_default_config(&config_path)
                .context("Failed to create default config during load")?;
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        validate_config(&config)?;

        Ok(config)
    }

    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            anyhow!("Could not determine config directory (is $HOME set?)")
        })?;
        Ok(config_dir.join("sundowner").join("sundowner.toml"))
    }

    /// Theme directory with `~` expanded.
    pub fn theme_dir(&self) -> PathBuf {
        expand_tilde(self.theme_dir.as_deref().unwrap_or(DEFAULT_THEME_DIR))
    }

    /// External theme-set command with `~` expanded.
    pub fn theme_command(&self) -> PathBuf {
        expand_tilde(
            self.theme_command
                .as_deref()
                .unwrap_or(DEFAULT_THEME_COMMAND),
        )
    }

    /// Interval between day/night checks.
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(
            self.check_interval_secs
                .unwrap_or(DEFAULT_CHECK_INTERVAL_SECS),
        )
    }

    /// Manually configured coordinates, if both are present.
    ///
    /// Validation guarantees the pair is in-bounds and complete, so this
    /// returns None only when no override is configured.
    pub fn coordinates(&self) -> Option<GeoCoordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => GeoCoordinate::new(latitude, longitude),
            _ => None,
        }
    }

    /// Log the effective configuration.
    pub fn log_config(&self, debug_enabled: bool) {
        log_block_start!("Loaded configuration");
        log_indented!("Theme directory: {}", self.theme_dir().display());
        log_indented!("Theme command: {}", self.theme_command().display());
        log_indented!("Check interval: {}s", self.check_interval().as_secs());
        if debug_enabled {
            match self.coordinates() {
                Some(coordinate) => log_indented!("Location override: {coordinate}"),
                None => log_indented!("Location override: none (auto-detect)"),
            }
        }
    }
}

/// Write the commented default configuration file.
fn create_default_config(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write default config to {}", path.display()))?;
    log_block_start!("Created default configuration at {}", path.display());
    Ok(())
}

/// Validate ranges and cross-field requirements.
fn validate_config(config: &Config) -> Result<()> {
    if let Some(interval) = config.check_interval_secs {
        if !(MIN_CHECK_INTERVAL_SECS..=MAX_CHECK_INTERVAL_SECS).contains(&interval) {
            return Err(anyhow!(
                "check_interval_secs must be between {MIN_CHECK_INTERVAL_SECS} and \
                 {MAX_CHECK_INTERVAL_SECS} seconds, got {interval}"
            ));
        }
    }

    match (config.latitude, config.longitude) {
        (Some(latitude), Some(longitude)) => {
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(anyhow!(
                    "latitude must be between -90 and 90 degrees, got {latitude}"
                ));
            }
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(anyhow!(
                    "longitude must be between -180 and 180 degrees, got {longitude}"
                ));
            }
        }
        (Some(_), None) => {
            return Err(anyhow!(
                "latitude is set but longitude is missing; set both or neither"
            ));
        }
        (None, Some(_)) => {
            return Err(anyhow!(
                "longitude is set but latitude is missing; set both or neither"
            ));
        }
        (None, None) => {}
    }

    Ok(())
}

/// Parse and validate a configuration from a TOML string.
///
/// Used by tests; `load()` goes through the same path after reading the file.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse config")?;
    validate_config(&config)?;
    Ok(config)
}
