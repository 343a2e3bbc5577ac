//! Shelfmark catalog
//!
//! Owns the in-memory list of books, keeps the flat storage file in sync
//! after every change and renders listings and reports for the front end.

pub mod catalog;
pub mod codec;
pub mod error;
pub mod receipt;
pub mod storage;

pub use catalog::{Catalog, CatalogStats, Listing, LoadReport, EMPTY_CATALOG_NOTICE};
pub use codec::RecordCodec;
pub use error::{LibraryError, LibraryResult};
pub use receipt::{Outcome, Receipt, SaveStatus};
pub use storage::CatalogFile;

use shelfmark_config::{StorageConfig, DEFAULT_PLACEHOLDER};
use std::path::PathBuf;

/// Catalog configuration
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Storage file path
    pub catalog_path: PathBuf,
    /// Borrower token written for available books
    pub borrower_placeholder: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

impl LibraryConfig {
    pub fn new(catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            borrower_placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.borrower_placeholder = placeholder.into();
        self
    }
}

impl From<&StorageConfig> for LibraryConfig {
    fn from(storage: &StorageConfig) -> Self {
        Self::new(storage.catalog_path.clone())
            .with_placeholder(storage.borrower_placeholder.clone())
    }
}
