//! The catalog: an ordered list of records mirrored to the storage file
//!
//! Every mutating call rewrites the whole file before returning. A failed
//! write is reported in the [`Receipt`] but never undoes the in-memory
//! change; memory stays authoritative until the process exits.

use crate::codec::RecordCodec;
use crate::error::LibraryResult;
use crate::receipt::{Outcome, Receipt, SaveStatus};
use crate::storage::CatalogFile;
use crate::LibraryConfig;
use log::{debug, info, warn};
use serde::Serialize;
use shelfmark_core::{AppError, BookRecord};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Single line produced by [`Catalog::list_books`] when there is nothing to list
pub const EMPTY_CATALOG_NOTICE: &str = "No books are available in the catalog.";

/// What happened while loading the storage file
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records now in memory
    pub loaded: usize,
    /// Lines ignored for having the wrong number of fields
    pub skipped: usize,
    /// The storage file did not exist
    pub file_missing: bool,
    /// Read failure; records read before it are kept
    pub error: Option<AppError>,
}

impl LoadReport {
    /// One line for the user. Skipped lines are deliberately not mentioned.
    pub fn summary(&self) -> String {
        match (&self.error, self.file_missing) {
            (Some(e), _) => format!(
                "Error loading books: {}. Continuing with {} book(s).",
                e, self.loaded
            ),
            (None, true) => "No existing book records found; starting with an empty catalog."
                .to_string(),
            (None, false) => format!("Loaded {} book(s) from the catalog.", self.loaded),
        }
    }
}

/// Aggregate counts over the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub available: usize,
    pub borrowed: usize,
    /// Distinct category names
    pub categories: usize,
    /// Distinct users currently holding at least one book
    pub borrowers: usize,
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Books: {}", self.total)?;
        writeln!(f, "Available: {}", self.available)?;
        writeln!(f, "Borrowed: {}", self.borrowed)?;
        writeln!(f, "Categories: {}", self.categories)?;
        write!(f, "Active Borrowers: {}", self.borrowers)
    }
}

/// Lazy display lines for the catalog.
///
/// Clone it, or call [`Catalog::list_books`] again, to restart.
#[derive(Debug, Clone)]
pub struct Listing<'a> {
    books: std::slice::Iter<'a, BookRecord>,
    empty_notice: bool,
}

impl Iterator for Listing<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.empty_notice {
            self.empty_notice = false;
            return Some(EMPTY_CATALOG_NOTICE.to_string());
        }
        self.books.next().map(ToString::to_string)
    }
}

/// In-memory catalog bound to one storage file
#[derive(Debug)]
pub struct Catalog {
    books: Vec<BookRecord>,
    file: CatalogFile,
    codec: RecordCodec,
}

impl Catalog {
    /// Creates an empty catalog without touching storage
    pub fn new(config: &LibraryConfig) -> Self {
        Self {
            books: Vec::new(),
            file: CatalogFile::new(config.catalog_path.clone()),
            codec: RecordCodec::new(config.borrower_placeholder.clone()),
        }
    }

    /// Creates a catalog and loads it from storage
    pub fn open(config: &LibraryConfig) -> (Self, LoadReport) {
        let mut catalog = Self::new(config);
        let report = catalog.load();
        (catalog, report)
    }

    /// Replaces the in-memory records with the contents of the storage file.
    ///
    /// A missing file leaves the catalog empty. Malformed lines are skipped.
    /// On a read error, whatever was read so far is kept.
    pub fn load(&mut self) -> LoadReport {
        self.books.clear();
        let mut report = LoadReport::default();

        let lines = match self.file.read_lines() {
            Ok(Some(lines)) => lines,
            Ok(None) => {
                info!(
                    "No catalog file at {}, starting empty",
                    self.file.path().display()
                );
                report.file_missing = true;
                return report;
            }
            Err(e) => {
                let err = AppError::storage_read(self.file.path(), e);
                warn!("{}", err);
                report.error = Some(err);
                return report;
            }
        };

        for (index, line) in lines.enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    let err = AppError::storage_read(self.file.path(), e);
                    warn!("{} (after line {})", err, index);
                    report.error = Some(err);
                    break;
                }
            };

            match self.codec.decode_line(&line) {
                Ok(record) => self.books.push(record),
                Err(e) => {
                    debug!("Skipping line {}: {}", index + 1, e);
                    report.skipped += 1;
                }
            }
        }

        report.loaded = self.books.len();
        info!(
            "Loaded {} books from {} ({} skipped)",
            report.loaded,
            self.file.path().display(),
            report.skipped
        );
        report
    }

    /// Overwrites the storage file with the current records
    pub fn save(&self) -> shelfmark_core::Result<()> {
        self.file
            .write_lines(self.books.iter().map(|book| self.codec.encode(book)))
            .map_err(|e| AppError::storage_write(self.file.path(), e))?;

        debug!(
            "Saved {} books to {}",
            self.books.len(),
            self.file.path().display()
        );
        Ok(())
    }

    fn persist(&self) -> SaveStatus {
        match self.save() {
            Ok(()) => SaveStatus::Saved,
            Err(e) => {
                warn!("{}", e);
                SaveStatus::Failed(e)
            }
        }
    }

    fn not_found(title: &str) -> Receipt {
        Receipt {
            outcome: Err(AppError::RecordNotFound {
                title: title.to_string(),
            }),
            save: SaveStatus::Skipped,
        }
    }

    /// Appends a new available book and saves. Duplicates are allowed.
    pub fn add_book(&mut self, title: &str, author: &str, category: &str) -> Receipt {
        self.add_record(BookRecord::new(title, author, category))
    }

    /// Appends `record`, trimmed the way loading trims, and saves
    pub fn add_record(&mut self, record: BookRecord) -> Receipt {
        let record = record.trimmed();
        let title = record.title.clone();
        self.books.push(record);

        Receipt {
            outcome: Ok(Outcome::Added { title }),
            save: self.persist(),
        }
    }

    /// Removes the first record whose title matches, then saves.
    ///
    /// Saves even when nothing matched.
    pub fn remove_book(&mut self, title: &str) -> Receipt {
        let title = title.trim();
        let removed = match self.books.iter().position(|b| b.matches_title(title)) {
            Some(index) => {
                self.books.remove(index);
                true
            }
            None => false,
        };

        Receipt {
            outcome: Ok(Outcome::Removed {
                title: title.to_string(),
                removed,
            }),
            save: self.persist(),
        }
    }

    /// Lends the first matching record to `user_id`.
    ///
    /// Not found: nothing is saved. Otherwise the file is rewritten whether
    /// or not the loan was granted.
    pub fn borrow_book(&mut self, title: &str, user_id: &str) -> Receipt {
        let (title, user_id) = (title.trim(), user_id.trim());
        let Some(book) = self.books.iter_mut().find(|b| b.matches_title(title)) else {
            return Self::not_found(title);
        };

        let outcome = book.borrow(user_id).map(|()| Outcome::Borrowed {
            title: book.title.clone(),
            user: user_id.to_string(),
        });

        Receipt {
            outcome,
            save: self.persist(),
        }
    }

    /// Takes the first matching record back from `user_id`.
    ///
    /// Same save rule as [`Catalog::borrow_book`].
    pub fn return_book(&mut self, title: &str, user_id: &str) -> Receipt {
        let (title, user_id) = (title.trim(), user_id.trim());
        let Some(book) = self.books.iter_mut().find(|b| b.matches_title(title)) else {
            return Self::not_found(title);
        };

        let outcome = book.give_back(user_id).map(|()| Outcome::Returned {
            title: book.title.clone(),
            user: user_id.to_string(),
        });

        Receipt {
            outcome,
            save: self.persist(),
        }
    }

    /// Display lines for every record, or the empty-catalog notice
    pub fn list_books(&self) -> Listing<'_> {
        Listing {
            books: self.books.iter(),
            empty_notice: self.books.is_empty(),
        }
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.books
    }

    /// First record whose title matches, ignoring case
    pub fn find(&self, title: &str) -> Option<&BookRecord> {
        self.books.iter().find(|b| b.matches_title(title))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Location of the storage file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn stats(&self) -> CatalogStats {
        let borrowed = self.books.iter().filter(|b| b.is_borrowed()).count();
        let categories = self
            .books
            .iter()
            .map(|b| b.category.as_str())
            .collect::<HashSet<_>>()
            .len();
        let borrowers = self
            .books
            .iter()
            .filter_map(BookRecord::borrowed_by)
            .collect::<HashSet<_>>()
            .len();

        CatalogStats {
            total: self.books.len(),
            available: self.books.len() - borrowed,
            borrowed,
            categories,
            borrowers,
        }
    }

    /// Writes the catalog as pretty JSON to `path`, leaving storage alone.
    ///
    /// Returns the number of records exported.
    pub fn export_json(&self, path: impl AsRef<Path>) -> LibraryResult<usize> {
        let json = serde_json::to_string_pretty(&self.books)?;
        std::fs::write(path.as_ref(), json)?;
        info!(
            "Exported {} books to {}",
            self.books.len(),
            path.as_ref().display()
        );
        Ok(self.books.len())
    }
}
