//! Catalog storage configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name used when no catalog path is configured
pub const DEFAULT_CATALOG_FILE: &str = "books.txt";

/// Token written in place of the borrower for available books
pub const DEFAULT_PLACEHOLDER: &str = "None";

/// Where and how the catalog is persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the flat catalog file
    pub catalog_path: PathBuf,

    /// Literal stored in the borrower column when a book is available
    pub borrower_placeholder: String,
}

impl StorageConfig {
    /// Platform data directory location of the catalog file
    ///
    /// - Linux: `~/.local/share/shelfmark/books.txt`
    /// - macOS: `~/Library/Application Support/shelfmark/books.txt`
    /// - Windows: `%APPDATA%\shelfmark\data\books.txt`
    ///
    /// Falls back to `books.txt` in the working directory if no home
    /// directory can be resolved.
    pub fn default_catalog_path() -> PathBuf {
        ProjectDirs::from("", "", "shelfmark")
            .map(|dirs| dirs.data_dir().join(DEFAULT_CATALOG_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            catalog_path: Self::default_catalog_path(),
            borrower_placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl ConfigSection for StorageConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let results = vec![
            Validator::path_not_empty(&self.catalog_path, "storage.catalog_path"),
            Validator::not_a_directory(&self.catalog_path, "storage.catalog_path"),
            Validator::not_empty(&self.borrower_placeholder, "storage.borrower_placeholder"),
            Validator::excludes_char(
                &self.borrower_placeholder,
                ',',
                "storage.borrower_placeholder",
            ),
            Validator::single_line(&self.borrower_placeholder, "storage.borrower_placeholder"),
        ];

        Validator::collect_errors(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = StorageConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.catalog_path.ends_with(DEFAULT_CATALOG_FILE));
        assert_eq!(config.borrower_placeholder, "None");
    }

    #[test]
    fn test_empty_catalog_path() {
        let config = StorageConfig {
            catalog_path: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_placeholder_with_delimiter() {
        let config = StorageConfig {
            borrower_placeholder: "no,one".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "storage.borrower_placeholder");
    }

    #[test]
    fn test_placeholder_with_line_break() {
        let config = StorageConfig {
            borrower_placeholder: "no\none".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "must not contain line breaks");
    }
}
