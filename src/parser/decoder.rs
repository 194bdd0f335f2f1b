//! Structured-field decoder.
//!
//! Splits a buffer into records without interpreting payloads. Every record
//! advances the cursor by at least the header size, so decoding always
//! terminates.

use crate::error::ParseError;
use crate::model::{FieldType, StructuredField, CARRIAGE_CONTROL, IDENTIFIER_SIZE, LENGTH_SIZE};

use super::options::Framing;

/// Lazy iterator over the records of a buffer.
///
/// Yields `Err` once at the first framing error and then stops.
#[derive(Debug, Clone)]
pub struct FieldIter<'a> {
    data: &'a [u8],
    framing: Framing,
    pos: usize,
    failed: bool,
}

impl<'a> FieldIter<'a> {
    /// Iterate `data` using `framing`; `Framing::Auto` is resolved here.
    pub fn new(data: &'a [u8], framing: Framing) -> Self {
        Self {
            data,
            framing: framing.resolve(data),
            pos: 0,
            failed: false,
        }
    }

    /// The resolved framing.
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Offset of the next record.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn read_field(&mut self) -> Result<StructuredField<'a>, ParseError> {
        let offset = self.pos;
        let rest = &self.data[offset..];
        let header_size = self.framing.header_size();

        if rest.len() < header_size {
            return Err(ParseError::TruncatedHeader {
                offset,
                remaining: rest.len(),
                needed: header_size,
            });
        }

        let intro = self.framing.introducer_size();
        if intro > 0 && rest[0] != CARRIAGE_CONTROL {
            return Err(ParseError::MissingIntroducer {
                offset,
                found: rest[0],
            });
        }

        let declared = u16::from_be_bytes([rest[intro], rest[intro + 1]]) as usize;
        let record_len = intro + declared;
        if declared < LENGTH_SIZE + IDENTIFIER_SIZE || record_len > rest.len() {
            return Err(ParseError::InvalidLength {
                offset,
                length: declared,
                remaining: rest.len(),
            });
        }

        let id_start = intro + LENGTH_SIZE;
        let identifier = [rest[id_start], rest[id_start + 1], rest[id_start + 2]];

        self.pos += record_len;
        Ok(StructuredField::new(
            offset,
            FieldType::from_identifier(identifier),
            &rest[..record_len],
            header_size,
        ))
    }
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = Result<StructuredField<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }

        let item = self.read_field();
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }
}

impl std::iter::FusedIterator for FieldIter<'_> {}

/// Decode every record of `data`.
///
/// The decoded fields cover the buffer exactly; any framing error aborts the
/// whole decode.
pub fn decode(data: &[u8], framing: Framing) -> Result<Vec<StructuredField<'_>>, ParseError> {
    let mut iter = FieldIter::new(data, framing);
    let fields = iter.by_ref().collect::<Result<Vec<_>, _>>()?;

    if iter.position() != data.len() {
        return Err(ParseError::TrailingBytes {
            offset: iter.position(),
            count: data.len().saturating_sub(iter.position()),
        });
    }

    log::debug!(
        "Decoded {} structured fields ({} framing, {} bytes)",
        fields.len(),
        iter.framing(),
        data.len()
    );
    Ok(fields)
}
