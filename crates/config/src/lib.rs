//! Shelfmark Configuration System
//!
//! Settings are grouped into sections that implement `ConfigSection`:
//!
//! - **app**: logging preferences
//! - **storage**: where the catalog file lives and how it is written
//!
//! A missing file means defaults. Loading does not judge the values;
//! callers run [`Config::validate`] once logging is up and decide what is
//! fatal. Saving refuses an invalid config and replaces the file atomically.
//!
//! # Example
//!
//! ```rust,no_run
//! use shelfmark_config::ConfigManager;
//!
//! let manager = ConfigManager::new()?;
//! let config = manager.load_with_env_overrides()?;
//! if let Err(problems) = config.validate() {
//!     for problem in problems {
//!         eprintln!("{}", problem);
//!     }
//! }
//!
//! println!("Catalog: {}", config.storage.catalog_path.display());
//! # Ok::<(), shelfmark_config::ConfigError>(())
//! ```

mod error;
mod manager;
mod persistence;
mod validation;

// Config sections
pub mod app_config;
mod storage_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::{ConfigManager, ENV_CATALOG, ENV_LOG_LEVEL};
pub use validation::{ConfigSection, Validator};

// Re-export config sections
pub use app_config::{AppConfig, LogLevel};
pub use storage_config::{StorageConfig, DEFAULT_CATALOG_FILE, DEFAULT_PLACEHOLDER};

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    /// Application-level settings
    pub app: AppConfig,

    /// Catalog storage settings
    pub storage: StorageConfig,
}

impl Config {
    /// Checks every section; returns all problems found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(mut e) = self.app.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.storage.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// True when the file was written by a newer release
    pub fn is_newer_format(&self) -> bool {
        self.version > CONFIG_VERSION
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}
