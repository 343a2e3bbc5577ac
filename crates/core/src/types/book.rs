//! Catalog record domain model

use crate::error::{AppError, Result};
use crate::types::Validator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delimiter used by the flat storage format. Fields must never contain it.
pub const FIELD_DELIMITER: char = ',';

/// Loan status of a single record
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Availability {
    /// On the shelf
    #[default]
    Available,
    /// On loan to the named borrower
    Borrowed { by: String },
}

impl Availability {
    /// Returns true if the record is on loan
    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed { .. })
    }

    /// Returns the current borrower, if any
    pub fn borrower(&self) -> Option<&str> {
        match self {
            Self::Available => None,
            Self::Borrowed { by } => Some(by),
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "Available"),
            Self::Borrowed { by } => write!(f, "Borrowed by {}", by),
        }
    }
}

/// One book entry in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub category: String,
    pub status: Availability,
}

impl BookRecord {
    /// Creates a new, available record
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self::with_status(title, author, category, Availability::Available)
    }

    /// Creates a record in an explicit state.
    ///
    /// Used when restoring persisted records: a stored loan is taken as-is and
    /// does not go through [`BookRecord::borrow`].
    pub fn with_status(
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
        status: Availability,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            category: category.into(),
            status,
        }
    }

    /// Strips surrounding whitespace from every field, as loading does
    pub fn trimmed(self) -> Self {
        let status = match self.status {
            Availability::Borrowed { by } => Availability::Borrowed {
                by: by.trim().to_string(),
            },
            Availability::Available => Availability::Available,
        };
        Self::with_status(
            self.title.trim(),
            self.author.trim(),
            self.category.trim(),
            status,
        )
    }

    /// Returns true if the record is on loan
    pub fn is_borrowed(&self) -> bool {
        self.status.is_borrowed()
    }

    /// Returns the current borrower, if any
    pub fn borrowed_by(&self) -> Option<&str> {
        self.status.borrower()
    }

    /// Case-insensitive title comparison
    pub fn matches_title(&self, title: &str) -> bool {
        self.title
            .chars()
            .flat_map(char::to_lowercase)
            .eq(title.chars().flat_map(char::to_lowercase))
    }

    /// Lends the record to `user_id`.
    ///
    /// Fails with [`AppError::AlreadyBorrowed`] naming the current holder if
    /// the record is already on loan; the record is left unchanged.
    pub fn borrow(&mut self, user_id: &str) -> Result<()> {
        match &self.status {
            Availability::Available => {
                self.status = Availability::Borrowed {
                    by: user_id.to_string(),
                };
                Ok(())
            }
            Availability::Borrowed { by } => Err(AppError::AlreadyBorrowed {
                title: self.title.clone(),
                holder: by.clone(),
            }),
        }
    }

    /// Takes the record back from `user_id`.
    ///
    /// Only the current holder can return a record. Returning an available
    /// record, or one held by someone else, fails with
    /// [`AppError::InvalidReturn`] and leaves the record unchanged.
    pub fn give_back(&mut self, user_id: &str) -> Result<()> {
        match &self.status {
            Availability::Borrowed { by } if by == user_id => {
                self.status = Availability::Available;
                Ok(())
            }
            _ => Err(AppError::InvalidReturn {
                title: self.title.clone(),
                user: user_id.to_string(),
            }),
        }
    }
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} [{}] ({})",
            self.title, self.author, self.category, self.status
        )
    }
}

impl Validator for BookRecord {
    fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push("Title cannot be empty".to_string());
        }

        let fields = [
            ("Title", self.title.as_str()),
            ("Author", self.author.as_str()),
            ("Category", self.category.as_str()),
            ("Borrower", self.borrowed_by().unwrap_or_default()),
        ];
        for (name, value) in fields {
            if value.contains(FIELD_DELIMITER) {
                errors.push(format!("{} cannot contain '{}'", name, FIELD_DELIMITER));
            }
            if value.contains(['\n', '\r']) {
                errors.push(format!("{} cannot contain line breaks", name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
