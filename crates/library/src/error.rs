use shelfmark_core::error::AppError;
use thiserror::Error;

/// Failures outside the catalog's own operations (export, opening files)
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] AppError),

    #[error("Export failed: {0}")]
    Export(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LibraryResult<T> = std::result::Result<T, LibraryError>;
