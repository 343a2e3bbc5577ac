//! Domain types for Shelfmark
//!
//! - `book`: Catalog records and their loan status
//! - `common`: Shared traits

mod book;
mod common;

pub use book::{Availability, BookRecord, FIELD_DELIMITER};
pub use common::Validator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_types_are_exported() {
        let record = BookRecord::new("Dune", "Herbert", "SciFi");
        assert_eq!(record.status, Availability::Available);
        assert!(record.is_valid());
    }
}
