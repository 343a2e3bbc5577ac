//! Validation system for configuration values

pub use crate::error::ValidationError;
use std::path::Path;

/// A config section that can check its own values
pub trait ConfigSection {
    fn validate(&self) -> Result<(), Vec<ValidationError>>;
}

/// Common validators for config values
pub struct Validator;

impl Validator {
    /// Validates that a string is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(ValidationError::new(field, "must not be empty"))
        } else {
            Ok(())
        }
    }

    /// Validates that a path is not empty
    pub fn path_not_empty(path: &Path, field: &str) -> Result<(), ValidationError> {
        if path.as_os_str().is_empty() {
            Err(ValidationError::new(field, "must not be empty"))
        } else {
            Ok(())
        }
    }

    /// Validates that a path does not point at an existing directory
    pub fn not_a_directory(path: &Path, field: &str) -> Result<(), ValidationError> {
        if path.is_dir() {
            Err(ValidationError::with_value(
                field,
                "must be a file, not a directory",
                path.display(),
            ))
        } else {
            Ok(())
        }
    }

    /// Validates that a string does not contain a forbidden character
    pub fn excludes_char(value: &str, forbidden: char, field: &str) -> Result<(), ValidationError> {
        if value.contains(forbidden) {
            Err(ValidationError::with_value(
                field,
                format!("must not contain '{}'", forbidden),
                value,
            ))
        } else {
            Ok(())
        }
    }

    /// Validates that a string holds no line break
    pub fn single_line(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.contains(['\n', '\r']) {
            Err(ValidationError::with_value(
                field,
                "must not contain line breaks",
                value,
            ))
        } else {
            Ok(())
        }
    }

    /// Collects multiple validation results into a single result
    pub fn collect_errors(
        results: Vec<Result<(), ValidationError>>,
    ) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = results.into_iter().filter_map(|r| r.err()).collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
