//! Error types for afptools library.

use std::io;
use thiserror::Error;

/// Result type alias for afptools operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for every afptools operation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input does not frame into structured fields or pages.
    #[error("AFP parsing error: {0}")]
    Parse(#[from] ParseError),

    /// The page selector could not be resolved.
    #[error("Invalid page range: {0}")]
    Range(#[from] RangeError),

    /// The extraction request was rejected.
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// A structured field payload does not fit the 16-bit length prefix.
    #[error("Structured field of {0} bytes exceeds the maximum record length")]
    FieldTooLarge(usize),

    /// The file does not look like a MO:DCA stream.
    #[error("Unknown file format: not a valid AFP stream")]
    UnknownFormat,

    /// Error while rendering a report.
    #[error("Rendering error: {0}")]
    Render(String),
}

/// Framing and page-structure errors.
///
/// Each variant carries the byte offset of the record that triggered it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer bytes than a record header remain at `offset`.
    #[error("truncated header at offset {offset}: {remaining} byte(s) left, {needed} needed")]
    TruncatedHeader {
        /// Offset of the incomplete header
        offset: usize,
        /// Bytes left in the buffer
        remaining: usize,
        /// Header size for the active framing
        needed: usize,
    },

    /// The declared record length is too small or runs past the buffer end.
    #[error("invalid field length {length} at offset {offset} ({remaining} byte(s) available)")]
    InvalidLength {
        /// Offset of the record
        offset: usize,
        /// Length declared in the header
        length: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// Decoding stopped before the end of the buffer.
    #[error("{count} trailing byte(s) after last field at offset {offset}")]
    TrailingBytes {
        /// Offset of the first unparsed byte
        offset: usize,
        /// Number of unparsed bytes
        count: usize,
    },

    /// A carriage-control framed record does not start with `0x5A`.
    #[error("expected carriage control 0x5A at offset {offset}, found 0x{found:02X}")]
    MissingIntroducer {
        /// Offset of the record
        offset: usize,
        /// Byte found instead
        found: u8,
    },

    /// PageBegin inside an open page, or PageEnd without one.
    #[error("unbalanced page nesting at offset {offset}")]
    UnbalancedPageNesting {
        /// Offset of the offending PageBegin/PageEnd
        offset: usize,
    },

    /// The stream ended while a page was still open.
    #[error("page opened at offset {offset} is never closed")]
    UnterminatedPage {
        /// Offset of the dangling PageBegin
        offset: usize,
    },
}

impl ParseError {
    /// Byte offset the error refers to.
    pub fn offset(&self) -> usize {
        match *self {
            ParseError::TruncatedHeader { offset, .. }
            | ParseError::InvalidLength { offset, .. }
            | ParseError::TrailingBytes { offset, .. }
            | ParseError::MissingIntroducer { offset, .. }
            | ParseError::UnbalancedPageNesting { offset }
            | ParseError::UnterminatedPage { offset } => offset,
        }
    }
}

/// Page selector errors. Each names the token it rejects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// The token is not `n`, `a:b`, `a:` or `:b`.
    #[error("malformed token '{token}': {reason}")]
    Malformed {
        /// Offending token, trimmed
        token: String,
        /// Why it was rejected
        reason: String,
    },

    /// A page index is below 1 or beyond the document.
    #[error("page {index} in '{token}' is out of range (document has {total} pages)")]
    IndexOutOfBounds {
        /// Offending token, trimmed
        token: String,
        /// Rejected index, possibly negative
        index: i64,
        /// Pages in the document
        total: u32,
    },

    /// A closed range whose start is after its end.
    #[error("inverted range '{token}': start {start} is after end {end}")]
    InvertedRange {
        /// Offending token, trimmed
        token: String,
        /// Range start
        start: i64,
        /// Range end
        end: i64,
    },

    /// The selector contains no tokens.
    #[error("page selection is empty")]
    EmptySelection,
}

/// Errors raised by the extractor itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// At least one page must be selected.
    #[error("no pages selected")]
    EmptySelection,

    /// A selected index is not a page of the document.
    #[error("Page {index} is out of range (document has {page_count} pages)")]
    IndexOutOfBounds {
        /// Rejected index
        index: u32,
        /// Pages in the document
        page_count: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::from(ExtractionError::IndexOutOfBounds {
            index: 10,
            page_count: 5,
        });
        assert_eq!(
            err.to_string(),
            "Extraction error: Page 10 is out of range (document has 5 pages)"
        );

        let err = ParseError::UnterminatedPage { offset: 42 };
        assert_eq!(err.to_string(), "page opened at offset 42 is never closed");
    }

    #[test]
    fn test_range_error_names_token() {
        let err = RangeError::InvertedRange {
            token: "5:3".to_string(),
            start: 5,
            end: 3,
        };
        assert!(err.to_string().contains("'5:3'"));
    }

    #[test]
    fn test_parse_error_offset() {
        let err = ParseError::InvalidLength {
            offset: 17,
            length: 3,
            remaining: 20,
        };
        assert_eq!(err.offset(), 17);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
