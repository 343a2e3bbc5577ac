pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, ErrorSeverity, RecoveryAction, Result};
pub use types::{Availability, BookRecord, Validator, FIELD_DELIMITER};
