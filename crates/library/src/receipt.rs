//! Results of mutating catalog operations

use shelfmark_core::AppError;
use std::fmt;

/// What a successful operation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added { title: String },
    /// `removed` is false when no title matched; the message is the same
    Removed { title: String, removed: bool },
    Borrowed { title: String, user: String },
    Returned { title: String, user: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { title } => write!(f, "Book '{}' added to the catalog.", title),
            Self::Removed { title, .. } => write!(f, "Book '{}' removed.", title),
            Self::Borrowed { title, user } => write!(f, "{} borrowed '{}'.", user, title),
            Self::Returned { title, user } => write!(f, "{} returned '{}'.", user, title),
        }
    }
}

/// Whether the storage file was rewritten after the operation
#[derive(Debug)]
pub enum SaveStatus {
    /// No save was attempted (title not found on borrow/return)
    Skipped,
    Saved,
    /// The write failed; the in-memory catalog still has the change
    Failed(AppError),
}

impl SaveStatus {
    pub fn attempted(&self) -> bool {
        !matches!(self, Self::Skipped)
    }
}

/// Domain result plus persistence result of one catalog call
#[derive(Debug)]
#[must_use]
pub struct Receipt {
    pub outcome: Result<Outcome, AppError>,
    pub save: SaveStatus,
}

impl Receipt {
    /// True when the request was applied, regardless of the save
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The user-facing status line
    pub fn status_line(&self) -> String {
        match &self.outcome {
            Ok(outcome) => outcome.to_string(),
            Err(e) => e.user_message(),
        }
    }

    /// Warning to show when the save failed
    pub fn warning(&self) -> Option<String> {
        match &self.save {
            SaveStatus::Failed(e) => Some(format!(
                "Warning: {}; changes are kept in memory only.",
                e
            )),
            _ => None,
        }
    }

    /// Status line followed by the save warning, if any
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.status_line()];
        lines.extend(self.warning());
        lines
    }
}
