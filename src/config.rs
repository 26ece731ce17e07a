//! applykit configuration.
//!
//! Loaded from `~/.applykit/config.toml`. Every field is optional; a missing
//! file means defaults.
//!
//! ```toml
//! data-dir = "/home/jane/job-hunt"
//! log-level = "info"
//!
//! [generator]
//! command = "claude"
//! args = ["-p"]
//! ```

use std::path::{Path, PathBuf};
use std::{fs, io};

use serde::{Deserialize, Serialize};

/// Log filter used when neither the config nor `APPLYKIT_LOG` sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// applykit configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Where history and profile are stored. Defaults to `~/.applykit/`.
    pub data_dir: Option<PathBuf>,

    /// `tracing` filter directive, e.g. `info` or `applykit=debug`.
    pub log_level: Option<String>,

    pub generator: GeneratorConfig,
}

/// The external command used to generate missing assets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneratorConfig {
    /// Program to run. The brief is piped to its stdin.
    pub command: Option<String>,

    /// Arguments passed before the brief.
    pub args: Vec<String>,
}

impl Config {
    /// Load config from `~/.applykit/config.toml`.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.applykit/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".applykit").join("config.toml"))
    }

    /// The effective log filter.
    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
