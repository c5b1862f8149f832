//! # Configuration Module
//!
//! Runtime settings and data directory locations for Moodtune.
//!
//! ## Data Storage
//!
//! The default catalog and the optional config file live in the
//! platform-standard data directory:
//! - Linux: `~/.local/share/moodtune/`
//! - macOS: `~/Library/Application Support/moodtune/`
//! - Windows: `%APPDATA%\moodtune\`
//!
//! ## Config File
//!
//! `config.json` in that directory (or a path passed with `--config`). Every
//! field is optional:
//!
//! ```json
//! { "catalog_path": "/srv/music_sentiment_dataset.csv", "result_count": 10,
//!   "jitter_min": 0.85, "jitter_max": 1.15 }
//! ```

use crate::engine::{RankingConfig, DEFAULT_RESULT_COUNT};
use anyhow::{Context, Result};
use path_absolutize::Absolutize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the platform data directory.
pub const APP_DIR: &str = "moodtune";

/// File name of the default catalog.
pub const CATALOG_FILE: &str = "music_sentiment_dataset.csv";

/// File name of the optional config file.
pub const CONFIG_FILE: &str = "config.json";

fn app_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| anyhow::anyhow!(
        "Could not determine system data directory. Please ensure your platform supports standard data directories."
    ))?;
    Ok(data_dir.join(APP_DIR))
}

/// Returns the Moodtune data directory, creating it if needed.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The moodtune subdirectory cannot be created due to permissions
pub fn get_data_dir() -> Result<PathBuf> {
    let dir = app_dir()?;
    fs::create_dir_all(&dir).with_context(|| format!(
        "Failed to create Moodtune data directory at {}. Please check file permissions.",
        dir.display()
    ))?;
    Ok(dir)
}

/// Where the catalog is looked for when none is given. Does not touch the filesystem.
///
/// # Errors
///
/// The system data directory cannot be determined.
pub fn default_catalog_path() -> Result<PathBuf> {
    Ok(app_dir()?.join(CATALOG_FILE))
}

/// Where the config file is looked for when none is given.
///
/// # Errors
///
/// The system data directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(app_dir()?.join(CONFIG_FILE))
}

/// Resolve a user-supplied path against the current directory.
///
/// # Errors
///
/// The current directory cannot be read.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    Ok(path
        .absolutize()
        .with_context(|| format!("Failed to resolve path {}", path.display()))?
        .into_owned())
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Catalog file (CSV or SQLite)
    pub catalog_path: PathBuf,
    /// Recommendations per request
    pub result_count: usize,
    /// Lower bound of the ranking jitter
    pub jitter_min: f64,
    /// Upper bound of the ranking jitter
    pub jitter_max: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let ranking = RankingConfig::default();
        Self {
            catalog_path: default_catalog_path().unwrap_or_else(|_| PathBuf::from(CATALOG_FILE)),
            result_count: DEFAULT_RESULT_COUNT,
            jitter_min: ranking.jitter_min,
            jitter_max: ranking.jitter_max,
        }
    }
}

impl RuntimeConfig {
    /// Read the config file at `path`, or the default location when `None`.
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// The file exists but cannot be read or parsed, or holds invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Ok(path) => path,
                Err(e) => {
                    log::debug!("No default config location: {e}");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate()?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override the catalog location, made absolute.
    ///
    /// # Errors
    ///
    /// See [`absolute_path`].
    pub fn with_catalog_path(mut self, path: &Path) -> Result<Self> {
        self.catalog_path = absolute_path(path)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Zero result count, or jitter bounds that are not `0 < min <= max`.
    pub fn validate(&self) -> Result<()> {
        if self.result_count == 0 {
            anyhow::bail!("result_count must be at least 1");
        }
        let bounds_ok = self.jitter_min.is_finite()
            && self.jitter_max.is_finite()
            && self.jitter_min > 0.0
            && self.jitter_min <= self.jitter_max;
        if !bounds_ok {
            anyhow::bail!(
                "jitter bounds must satisfy 0 < jitter_min <= jitter_max (got {} and {})",
                self.jitter_min,
                self.jitter_max
            );
        }
        Ok(())
    }

    #[must_use]
    pub fn ranking(&self) -> RankingConfig {
        RankingConfig {
            jitter_min: self.jitter_min,
            jitter_max: self.jitter_max,
        }
    }
}
