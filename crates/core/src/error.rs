//! Error types and recovery strategies for Shelfmark
//!
//! Every failure in the catalog is handled locally and reported to the user;
//! nothing here is meant to abort the process. Errors are classified into
//! three severity tiers:
//! - **Recoverable**: The request was rejected but the catalog is untouched
//!   (unknown title, book already on loan, etc.)
//! - **Degraded**: The catalog keeps working from memory but storage is out
//!   of sync (failed read or write of the storage file)
//! - **Fatal**: Startup cannot continue (unusable configuration)
//!
//! Each error includes a recovery action to guide the caller.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Recovery actions that can be taken when an error occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Nothing to recover; the user should correct the request and retry
    UserIntervention,
    /// Keep serving from the in-memory catalog; storage is not authoritative
    ContinueInMemory,
    /// Ignore the offending record and carry on with the rest
    SkipRecord,
    /// Fall back to built-in defaults
    UseDefaults,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserIntervention => write!(f, "User intervention required"),
            Self::ContinueInMemory => write!(f, "Continuing with in-memory catalog"),
            Self::SkipRecord => write!(f, "Skipping record"),
            Self::UseDefaults => write!(f, "Using defaults"),
        }
    }
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Request rejected, no state was harmed
    Recoverable,
    /// Feature degraded but app can continue
    Degraded,
    /// Critical error requiring user action before the app can run
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Main error type for Shelfmark
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Catalog Errors =====
    /// No record has the requested title
    #[error("Book not found: {title}")]
    RecordNotFound { title: String },

    /// Borrow attempted on a record that is already on loan
    #[error("Book '{title}' is already borrowed by {holder}")]
    AlreadyBorrowed { title: String, holder: String },

    /// Return attempted by someone who does not hold the record
    #[error("Book '{title}' is not borrowed by {user}")]
    InvalidReturn { title: String, user: String },

    // ===== Storage Errors =====
    /// Storage file could not be read
    #[error("Failed to read catalog at {path}: {source}")]
    StorageRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Storage file could not be written
    #[error("Failed to write catalog at {path}: {source}")]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A storage line did not split into the expected fields
    #[error("Malformed record: expected 5 fields, found {fields}")]
    MalformedRecord { fields: usize },

    // ===== Configuration Errors =====
    /// Invalid configuration
    #[error("Invalid configuration: {setting} = '{value}' ({reason})")]
    InvalidConfiguration {
        setting: String,
        value: String,
        reason: String,
    },

    // ===== Input Errors =====
    /// User input that cannot be stored safely
    #[error("Invalid argument: {argument} - {reason}")]
    InvalidArgument { argument: String, reason: String },
}

impl AppError {
    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::RecordNotFound { .. }
            | Self::AlreadyBorrowed { .. }
            | Self::InvalidReturn { .. }
            | Self::MalformedRecord { .. }
            | Self::InvalidArgument { .. } => ErrorSeverity::Recoverable,

            Self::StorageRead { .. }
            | Self::StorageWrite { .. } => ErrorSeverity::Degraded,

            Self::InvalidConfiguration { .. } => ErrorSeverity::Fatal,
        }
    }

    /// Returns the recommended recovery action for this error
    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::StorageRead { .. } | Self::StorageWrite { .. } => {
                RecoveryAction::ContinueInMemory
            }
            Self::MalformedRecord { .. } => RecoveryAction::SkipRecord,
            Self::InvalidConfiguration { .. } => RecoveryAction::UseDefaults,
            _ => RecoveryAction::UserIntervention,
        }
    }

    /// Returns a user-friendly error message suitable for the menu output
    pub fn user_message(&self) -> String {
        match self {
            Self::RecordNotFound { title } => {
                format!("Book '{}' is not in the catalog.", title)
            }
            Self::AlreadyBorrowed { title, holder } => {
                format!("Sorry, '{}' is already borrowed by {}.", title, holder)
            }
            Self::InvalidReturn { title, user } => {
                format!("{} cannot return '{}': it is not borrowed by them.", user, title)
            }
            Self::StorageRead { .. } => {
                "The catalog file could not be read. Some books may be missing.".to_string()
            }
            Self::StorageWrite { .. } => {
                "The catalog file could not be saved. Changes are kept until you exit."
                    .to_string()
            }
            Self::MalformedRecord { .. } => "A catalog entry is damaged and was skipped.".to_string(),
            Self::InvalidConfiguration { setting, .. } => {
                format!("Invalid setting: {}. Please check your configuration.", setting)
            }
            Self::InvalidArgument { argument, reason } => {
                format!("Invalid {}: {}.", argument, reason)
            }
        }
    }

    /// Returns true if this error should be logged at ERROR level
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Fatal
    }

    /// Returns true if the request was turned down without touching any state
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::RecordNotFound { .. } | Self::AlreadyBorrowed { .. } | Self::InvalidReturn { .. }
        )
    }

    /// Helper to create a storage read error
    pub fn storage_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::StorageRead {
            path: path.into(),
            source,
        }
    }

    /// Helper to create a storage write error
    pub fn storage_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::StorageWrite {
            path: path.into(),
            source,
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;
