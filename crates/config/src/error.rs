//! Errors raised while locating, reading or writing `config.toml`

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine a config directory for this user")]
    NoConfigDir,

    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is empty")]
    Empty { path: PathBuf },

    #[error("Cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot render config as TOML: {0}")]
    Render(#[from] toml::ser::Error),

    /// Save refused; carries every problem found
    #[error("Refusing to save invalid config: {}", join_problems(.0))]
    Invalid(Vec<ValidationError>),

    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An environment variable held a value that does not parse
    #[error("Invalid value '{value}' for {variable}")]
    InvalidOverride {
        variable: &'static str,
        value: String,
    },
}

fn join_problems(problems: &[ValidationError]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One rejected setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted key, e.g. `storage.catalog_path`
    pub field: String,
    pub message: String,
    /// Offending value, when it is worth echoing back
    pub value: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    pub fn with_value(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Self::new(field, message)
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.message)?;
        match &self.value {
            Some(value) => write!(f, " (got {:?})", value),
            None => Ok(()),
        }
    }
}

impl std::error::Error for ValidationError {}
