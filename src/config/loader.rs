//! Configuration file loading with precedence handling.

use crate::layout::LayoutParams;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permissions, not a regular file).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/chainviz/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Horizontal distance between slots.
    #[serde(default)]
    pub slot_width: Option<f64>,

    /// Vertical distance between blocks in one slot.
    #[serde(default)]
    pub slot_height: Option<f64>,

    /// Vertical step between attestations under one block.
    #[serde(default)]
    pub attestation_spacing: Option<f64>,

    /// Head row position as a fraction of the view height.
    #[serde(default)]
    pub head_row_fraction: Option<f64>,

    /// Validators per grid row.
    #[serde(default)]
    pub validator_columns: Option<usize>,

    /// Distance between validators in the grid.
    #[serde(default)]
    pub validator_spacing: Option<f64>,

    /// Validator band position as a fraction of the view height.
    #[serde(default)]
    pub validator_band_fraction: Option<f64>,

    /// Draw validators and vote edges on startup.
    #[serde(default)]
    pub show_validators: Option<bool>,

    /// Event loop tick in milliseconds.
    #[serde(default)]
    pub tick_ms: Option<u64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Extra key bindings: action name to key spec, e.g. `quit = "x"`.
    #[serde(default)]
    pub keybindings: Option<BTreeMap<String, String>>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Layout geometry.
    pub layout: LayoutParams,
    /// Draw validators on startup.
    pub show_validators: bool,
    /// Event loop tick in milliseconds.
    pub tick_ms: u64,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Key bindings layered over the defaults.
    pub keybindings: BTreeMap<String, String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            layout: LayoutParams::default(),
            show_validators: true,
            tick_ms: 100,
            log_file_path: default_log_path(),
            keybindings: BTreeMap::new(),
        }
    }
}

impl ResolvedConfig {
    /// Event loop tick as a duration. Never zero.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

/// Flags from the command line that override configuration.
///
/// `None` means the flag was not given.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CliOverrides {
    /// `--slot-width`.
    pub slot_width: Option<f64>,
    /// `--tick-ms`.
    pub tick_ms: Option<u64>,
    /// `--no-validators` (only ever `Some(false)`).
    pub show_validators: Option<bool>,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/chainviz/chainviz.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("chainviz").join("chainviz.log")
    } else {
        PathBuf::from("chainviz.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/chainviz/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chainviz").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CHAINVIZ_CONFIG` environment variable
/// 3. Default path `~/.config/chainviz/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("CHAINVIZ_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `CHAINVIZ_SLOT_WIDTH`: positive float, overrides slot width
/// - `CHAINVIZ_LOG_FILE`: overrides the log file path
///
/// Unparsable values are ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(width) = std::env::var("CHAINVIZ_SLOT_WIDTH")
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|w| w.is_finite() && *w > 0.0)
    {
        config.layout.slot_width = width;
    }

    if let Ok(path) = std::env::var("CHAINVIZ_LOG_FILE") {
        if !path.is_empty() {
            config.log_file_path = PathBuf::from(path);
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let d = defaults.layout;
    ResolvedConfig {
        layout: LayoutParams {
            slot_width: config.slot_width.unwrap_or(d.slot_width),
            slot_height: config.slot_height.unwrap_or(d.slot_height),
            attestation_spacing: config.attestation_spacing.unwrap_or(d.attestation_spacing),
            head_row_fraction: config.head_row_fraction.unwrap_or(d.head_row_fraction),
            validator_columns: config.validator_columns.unwrap_or(d.validator_columns),
            validator_spacing: config.validator_spacing.unwrap_or(d.validator_spacing),
            validator_band_fraction: config
                .validator_band_fraction
                .unwrap_or(d.validator_band_fraction),
        },
        show_validators: config.show_validators.unwrap_or(defaults.show_validators),
        tick_ms: config.tick_ms.unwrap_or(defaults.tick_ms),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        keybindings: config.keybindings.unwrap_or_default(),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: CliOverrides) -> ResolvedConfig {
    if let Some(width) = overrides.slot_width {
        config.layout.slot_width = width;
    }

    if let Some(tick_ms) = overrides.tick_ms {
        config.tick_ms = tick_ms;
    }

    if let Some(show) = overrides.show_validators {
        config.show_validators = show;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
