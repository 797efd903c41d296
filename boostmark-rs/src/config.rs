//! User configuration loaded from `config.toml`.

use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "BOOSTMARK_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default vault root.
    pub vault: Option<PathBuf>,
    /// Default export root (defaults to the vault root).
    pub export_dir: Option<PathBuf>,
    /// Default log filter (`warn`, `info`, `debug`, ...).
    pub log_level: Option<String>,
    pub export: ExportConfig,
}

/// Export defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Write the `folder:` key into exported metadata headers.
    pub folder_metadata: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            folder_metadata: true,
        }
    }
}

impl Config {
    /// Load the config from `$BOOSTMARK_CONFIG` or the platform config dir.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load the config from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
            .map_err(|e| VaultError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Parse config text.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn default_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(explicit));
        }
        dirs::config_dir().map(|d| d.join("boostmark").join("config.toml"))
    }

    /// Resolve the vault root: CLI flag, then config, then the current directory.
    pub fn resolve_vault_path(&self, cli_vault: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_vault {
            return Ok(path.to_path_buf());
        }
        if let Some(ref path) = self.vault {
            return Ok(path.clone());
        }
        Ok(std::env::current_dir()?)
    }

    /// Resolve the export root: CLI flag, then config, then the vault root.
    pub fn resolve_export_path(&self, cli_export: Option<&Path>, vault_root: &Path) -> PathBuf {
        cli_export
            .map(Path::to_path_buf)
            .or_else(|| self.export_dir.clone())
            .unwrap_or_else(|| vault_root.to_path_buf())
    }
}
