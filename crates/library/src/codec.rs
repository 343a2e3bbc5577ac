//! Line codec for the flat catalog file
//!
//! One record per line, five positional fields joined by `,`:
//!
//! ```text
//! title,author,category,borrowed,borrowedBy
//! ```
//!
//! No escaping is performed, so a field containing `,` cannot round-trip.
//! Trailing empty fields are dropped before counting, so a borrowed line
//! with an empty borrower column (`a,b,c,true,`) has four fields and is
//! rejected.

use shelfmark_config::DEFAULT_PLACEHOLDER;
use shelfmark_core::{AppError, Availability, BookRecord, Result, FIELD_DELIMITER};

/// Encodes and decodes catalog lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCodec {
    placeholder: String,
}

impl RecordCodec {
    /// Creates a codec writing `placeholder` for available books
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    /// Token stored in the borrower column of available books
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Parses one storage line.
    ///
    /// Fields are trimmed after counting. The borrowed flag is true only
    /// for `true` in any case. A borrowed line yields a record already in the `Borrowed` state,
    /// whatever the borrower column holds.
    pub fn decode_line(&self, line: &str) -> Result<BookRecord> {
        let mut fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        while fields.last().is_some_and(|field| field.is_empty()) {
            fields.pop();
        }

        let [title, author, category, borrowed, borrower] = fields.as_slice() else {
            return Err(AppError::MalformedRecord {
                fields: fields.len(),
            });
        };

        let status = if borrowed.trim().eq_ignore_ascii_case("true") {
            Availability::Borrowed {
                by: borrower.to_string(),
            }
        } else {
            Availability::Available
        };

        Ok(BookRecord::with_status(*title, *author, *category, status).trimmed())
    }

    /// Renders one record as a storage line (without the newline)
    pub fn encode(&self, record: &BookRecord) -> String {
        let borrower = record.borrowed_by().unwrap_or(self.placeholder.as_str());
        [
            record.title.as_str(),
            record.author.as_str(),
            record.category.as_str(),
            if record.is_borrowed() { "true" } else { "false" },
            borrower,
        ]
        .join(",")
    }
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_available() {
        let codec = RecordCodec::default();
        let record = BookRecord::new("Dune", "Herbert", "SciFi");
        assert_eq!(codec.encode(&record), "Dune,Herbert,SciFi,false,None");
    }

    #[test]
    fn test_encode_borrowed() {
        let codec = RecordCodec::default();
        let mut record = BookRecord::new("Dune", "Herbert", "SciFi");
        record.borrow("u1").unwrap();
        assert_eq!(codec.encode(&record), "Dune,Herbert,SciFi,true,u1");
    }

    #[test]
    fn test_encode_custom_placeholder() {
        let codec = RecordCodec::new("-");
        let record = BookRecord::new("Dune", "Herbert", "SciFi");
        assert_eq!(codec.encode(&record), "Dune,Herbert,SciFi,false,-");
    }

    #[test]
    fn test_decode_available() {
        let codec = RecordCodec::default();
        let record = codec.decode_line("Dune,Herbert,SciFi,false,None").unwrap();
        assert_eq!(record, BookRecord::new("Dune", "Herbert", "SciFi"));
    }

    #[test]
    fn test_decode_borrowed_bypasses_borrow() {
        let codec = RecordCodec::default();
        let record = codec.decode_line("Dune,Herbert,SciFi,TRUE,u7").unwrap();
        assert_eq!(record.borrowed_by(), Some("u7"));
    }

    #[test]
    fn test_decode_trims_fields() {
        let codec = RecordCodec::default();
        let record = codec
            .decode_line("  Dune , Herbert ,SciFi, true , u1 ")
            .unwrap();
        assert_eq!(record.title, "Dune");
        assert_eq!(record.author, "Herbert");
        assert_eq!(record.borrowed_by(), Some("u1"));
    }

    #[test]
    fn test_decode_non_true_flag_is_available() {
        let codec = RecordCodec::default();
        for flag in ["false", "yes", "1", ""] {
            let line = format!("Dune,Herbert,SciFi,{},u1", flag);
            let record = codec.decode_line(&line).unwrap();
            assert!(!record.is_borrowed(), "flag {:?} parsed as borrowed", flag);
        }
    }

    #[test]
    fn test_decode_wrong_field_count() {
        let codec = RecordCodec::default();
        for (line, count) in [
            ("Dune,Herbert,SciFi,false", 4),
            ("Dune,Herbert,SciFi,false,None,extra", 6),
            ("", 0),
            ("Dune,Herbert,SciFi,true,", 4),
            ("Dune,Herbert,,,", 2),
        ] {
            match codec.decode_line(line) {
                Err(AppError::MalformedRecord { fields }) => assert_eq!(fields, count),
                other => panic!("expected malformed record for {:?}, got {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_decode_blank_borrower_column() {
        let codec = RecordCodec::default();
        assert!(matches!(
            codec.decode_line("Dune,Herbert,SciFi,true,"),
            Err(AppError::MalformedRecord { fields: 4 })
        ));

        // Whitespace is not an empty field, so the line keeps five fields
        let record = codec.decode_line("Dune,Herbert,SciFi,true, ").unwrap();
        assert_eq!(record.borrowed_by(), Some(""));
    }

    #[test]
    fn test_roundtrip_preserves_record() {
        let codec = RecordCodec::default();
        let mut record = BookRecord::new("The Left Hand of Darkness", "Le Guin", "SciFi");
        record.borrow("reader-42").unwrap();

        let decoded = codec.decode_line(&codec.encode(&record)).unwrap();
        assert_eq!(decoded, record);
    }
}
