//! # Configuration Module
//!
//! Runtime settings for streamstat and where they live on disk.
//!
//! ## Config File
//!
//! Settings are read from the platform-standard config directory when a file
//! exists there:
//! - Linux: `~/.config/streamstat/config.json`
//! - macOS: `~/Library/Application Support/streamstat/config.json`
//! - Windows: `%APPDATA%\streamstat\config.json`
//!
//! Every key is optional; absent keys keep their defaults. Command-line flags
//! are applied on top by the caller.

use anyhow::{Context, Result};
use log::debug;
use path_absolutize::Absolutize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Dataset location used when neither flag, env var nor config file names one.
pub const DEFAULT_DATA_PATH: &str = "data/csv/spotify_history.csv";

/// Value written into missing text cells.
pub const DEFAULT_SENTINEL: &str = "unknown";

/// Returns the platform-appropriate config file path.
///
/// Unlike data directories, nothing is created here: a missing config file
/// simply means defaults.
///
/// # Errors
///
/// Fails only when the platform has no notion of a config directory.
///
/// # Examples
///
/// ```no_run
/// use streamstat::config::get_config_path;
///
/// let path = get_config_path()?;
/// println!("Config location: {}", path.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system config directory. Please ensure your platform supports standard config directories."
        )
    })?;

    Ok(config_dir.join("streamstat").join("config.json"))
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Path to the listening-history CSV
    pub data_path: PathBuf,
    /// Entries kept by top-N charts
    pub top_n: usize,
    /// Entries listed as peak hours and peak days
    pub peak_n: usize,
    /// Sentinel for missing text values
    pub missing_sentinel: String,
    /// Columns filled by the "fill missing values" action
    pub fill_columns: Vec<String>,
    /// Width of the longest chart bar
    pub chart_width: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_n: 10,
            peak_n: 5,
            missing_sentinel: DEFAULT_SENTINEL.to_string(),
            fill_columns: vec!["reason_start".to_string(), "reason_end".to_string()],
            chart_width: 50,
        }
    }
}

impl RuntimeConfig {
    /// Load from the standard config file, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = get_config_path()?;
        if path.exists() {
            Self::from_file(&path)
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load an explicit config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Create configuration with explicit dataset path
    pub fn with_data_path(data_path: PathBuf) -> Self {
        Self {
            data_path,
            ..Self::default()
        }
    }

    /// Absolute form of `data_path`, for messages and logs.
    pub fn absolute_data_path(&self) -> PathBuf {
        self.data_path
            .absolutize()
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| self.data_path.clone())
    }
}
