//! Reading and writing `config.toml`
//!
//! A write stages the new text in a temp file next to the target and
//! renames it into place. The previous file is copied to
//! `config.toml.backup` first.

use crate::{Config, ConfigError, ConfigResult};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Parses the file at `path`; `Ok(None)` when there is no file
pub(crate) fn read(path: &Path) -> ConfigResult<Option<Config>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if text.trim().is_empty() {
        return Err(ConfigError::Empty {
            path: path.to_path_buf(),
        });
    }

    toml::from_str(&text)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Validates `config` and replaces the file at `path` with it
pub(crate) fn write(path: &Path, config: &Config) -> ConfigResult<()> {
    config.validate().map_err(ConfigError::Invalid)?;
    let text = toml::to_string_pretty(config)?;

    let write_failed = |source: io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_failed)?;

    if path.exists() {
        let backup = path.with_extension("toml.backup");
        fs::copy(path, &backup).map_err(write_failed)?;
        log::debug!("Previous config copied to {}", backup.display());
    }

    let mut staged = NamedTempFile::new_in(dir).map_err(write_failed)?;
    staged.write_all(text.as_bytes()).map_err(write_failed)?;
    staged.persist(path).map_err(|e| write_failed(e.error))?;

    log::info!("Config written to {}", path.display());
    Ok(())
}
