//! Locating and loading `config.toml`

use crate::persistence;
use crate::{Config, ConfigError, ConfigResult, LogLevel};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `storage.catalog_path`
pub const ENV_CATALOG: &str = "SHELFMARK_CATALOG";

/// Environment variable overriding `app.log_level`
pub const ENV_LOG_LEVEL: &str = "SHELFMARK_LOG_LEVEL";

const CONFIG_FILE: &str = "config.toml";

/// Handle on one `config.toml`
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Uses the platform config directory
    ///
    /// - Linux: `~/.config/shelfmark/`
    /// - macOS: `~/Library/Application Support/shelfmark/`
    /// - Windows: `%APPDATA%\shelfmark\config\`
    pub fn new() -> ConfigResult<Self> {
        let dirs = ProjectDirs::from("", "", "shelfmark").ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_directory(dirs.config_dir()))
    }

    pub fn with_directory(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_dir.into().join(CONFIG_FILE),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the file, or returns defaults when there is none
    pub fn load(&self) -> ConfigResult<Config> {
        match persistence::read(&self.config_path)? {
            Some(config) => Ok(config),
            None => {
                log::debug!("No config at {}, using defaults", self.config_path.display());
                Ok(Config::default())
            }
        }
    }

    /// Validates and atomically replaces the file
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        persistence::write(&self.config_path, config)
    }

    /// Writes a default file unless one exists; true if it wrote one
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }
        self.save(&Config::default())?;
        Ok(true)
    }

    /// [`ConfigManager::load`] plus `SHELFMARK_CATALOG` and `SHELFMARK_LOG_LEVEL`
    ///
    /// A blank catalog override is ignored. A log level that does not parse
    /// is an error.
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_overrides(&mut config, |name| std::env::var(name).ok())?;
        Ok(config)
    }
}

fn apply_overrides(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConfigResult<()> {
    if let Some(path) = lookup(ENV_CATALOG).filter(|p| !p.trim().is_empty()) {
        config.storage.catalog_path = PathBuf::from(path);
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.app.log_level =
            level
                .parse::<LogLevel>()
                .map_err(|_| ConfigError::InvalidOverride {
                    variable: ENV_LOG_LEVEL,
                    value: level.clone(),
                })?;
    }

    Ok(())
}
