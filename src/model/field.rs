//! Structured-field types.

use std::fmt;
use std::ops::Range;

use crate::error::{Error, Result};
use crate::parser::Framing;

/// First byte of every MO:DCA structured-field identifier.
pub const MODCA_CLASS: u8 = 0xD3;

/// Carriage-control byte that introduces each record in line-data style files.
pub const CARRIAGE_CONTROL: u8 = 0x5A;

/// Size of the big-endian length prefix.
pub const LENGTH_SIZE: usize = 2;

/// Size of the structured-field identifier.
pub const IDENTIFIER_SIZE: usize = 3;

/// Largest record length allowed by MO:DCA. Longer records still decode,
/// but analysis reports them.
pub const MAX_FIELD_LENGTH: usize = 32767;

/// Well-known identifiers: (identifier, mnemonic, description).
const KNOWN_FIELDS: &[([u8; 3], &str, &str)] = &[
    ([0xD3, 0xA8, 0xA8], "BDT", "Begin Document"),
    ([0xD3, 0xA9, 0xA8], "EDT", "End Document"),
    ([0xD3, 0xA8, 0xAF], "BPG", "Begin Page"),
    ([0xD3, 0xA9, 0xAF], "EPG", "End Page"),
    ([0xD3, 0xA8, 0xC6], "BRG", "Begin Resource Group"),
    ([0xD3, 0xA9, 0xC6], "ERG", "End Resource Group"),
    ([0xD3, 0xA8, 0xC9], "BOG", "Begin Object"),
    ([0xD3, 0xA9, 0xC9], "EOG", "End Object"),
    ([0xD3, 0xA8, 0xA7], "BMM", "Begin Mixed Mode"),
    ([0xD3, 0xA9, 0xA7], "EMM", "End Mixed Mode"),
    ([0xD3, 0xA8, 0xFB], "BPT", "Begin Presentation Text"),
    ([0xD3, 0xA9, 0xFB], "EPT", "End Presentation Text"),
    ([0xD3, 0xA8, 0xDF], "BDI", "Begin Document Index"),
    ([0xD3, 0xA9, 0xDF], "EDI", "End Document Index"),
];

/// Structural type of a field, derived from its 3-byte identifier.
///
/// Only the identifiers that delimit documents, pages and resource groups get
/// their own variant. Everything else is `Opaque` and passes through
/// unexamined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldType {
    /// BDT
    DocumentBegin,
    /// EDT
    DocumentEnd,
    /// BPG
    PageBegin,
    /// EPG
    PageEnd,
    /// BRG
    ResourceGroupBegin,
    /// ERG
    ResourceGroupEnd,
    /// Any other identifier
    Opaque([u8; 3]),
}

impl FieldType {
    /// Map a raw identifier to its field type.
    pub const fn from_identifier(id: [u8; 3]) -> Self {
        match id {
            [0xD3, 0xA8, 0xA8] => FieldType::DocumentBegin,
            [0xD3, 0xA9, 0xA8] => FieldType::DocumentEnd,
            [0xD3, 0xA8, 0xAF] => FieldType::PageBegin,
            [0xD3, 0xA9, 0xAF] => FieldType::PageEnd,
            [0xD3, 0xA8, 0xC6] => FieldType::ResourceGroupBegin,
            [0xD3, 0xA9, 0xC6] => FieldType::ResourceGroupEnd,
            other => FieldType::Opaque(other),
        }
    }

    /// The raw identifier.
    pub const fn identifier(&self) -> [u8; 3] {
        match self {
            FieldType::DocumentBegin => [0xD3, 0xA8, 0xA8],
            FieldType::DocumentEnd => [0xD3, 0xA9, 0xA8],
            FieldType::PageBegin => [0xD3, 0xA8, 0xAF],
            FieldType::PageEnd => [0xD3, 0xA9, 0xAF],
            FieldType::ResourceGroupBegin => [0xD3, 0xA8, 0xC6],
            FieldType::ResourceGroupEnd => [0xD3, 0xA9, 0xC6],
            FieldType::Opaque(id) => *id,
        }
    }

    fn known(&self) -> Option<&'static ([u8; 3], &'static str, &'static str)> {
        let id = self.identifier();
        KNOWN_FIELDS.iter().find(|(known, _, _)| *known == id)
    }

    /// Three-letter mnemonic for well-known identifiers (e.g. "BPG").
    pub fn mnemonic(&self) -> Option<&'static str> {
        self.known().map(|(_, mnemonic, _)| *mnemonic)
    }

    /// Human-readable name for well-known identifiers (e.g. "Begin Page").
    pub fn description(&self) -> Option<&'static str> {
        self.known().map(|(_, _, description)| *description)
    }

    /// Whether the identifier appears in the well-known table.
    pub fn is_well_known(&self) -> bool {
        self.known().is_some()
    }

    /// Lowercase hex of the identifier (e.g. "d3a8af").
    pub fn hex(&self) -> String {
        self.identifier()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

impl From<[u8; 3]> for FieldType {
    fn from(id: [u8; 3]) -> Self {
        FieldType::from_identifier(id)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(mnemonic) => f.write_str(mnemonic),
            None => f.write_str(&self.hex()),
        }
    }
}

/// One decoded record, borrowing from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredField<'a> {
    /// Offset of the first record byte (the carriage control, if framed)
    pub offset: usize,

    /// Total record length in bytes, header included
    pub length: usize,

    /// Type derived from the identifier
    pub field_type: FieldType,

    /// Bytes after the header
    pub payload: &'a [u8],

    raw: &'a [u8],
}

impl<'a> StructuredField<'a> {
    /// `raw` is the complete record, `header_size` the part before the payload.
    pub(crate) fn new(
        offset: usize,
        field_type: FieldType,
        raw: &'a [u8],
        header_size: usize,
    ) -> Self {
        debug_assert!(raw.len() >= header_size);
        Self {
            offset,
            length: raw.len(),
            field_type,
            payload: &raw[header_size..],
            raw,
        }
    }

    /// Offset one past the last record byte.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Byte range of the record in the input buffer.
    pub fn byte_range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// The complete record, header included.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.raw
    }

    /// Header length for this record's framing.
    pub fn header_size(&self) -> usize {
        self.length - self.payload.len()
    }

    /// Raw identifier.
    pub fn identifier(&self) -> [u8; 3] {
        self.field_type.identifier()
    }

    /// Encode a single record.
    ///
    /// `Framing::Auto` encodes bare records.
    pub fn encode(framing: Framing, field_type: FieldType, payload: &[u8]) -> Result<Vec<u8>> {
        let declared = LENGTH_SIZE + IDENTIFIER_SIZE + payload.len();
        let length = u16::try_from(declared).map_err(|_| Error::FieldTooLarge(declared))?;

        let mut out = Vec::with_capacity(declared + 1);
        if framing == Framing::CarriageControl {
            out.push(CARRIAGE_CONTROL);
        }
        out.extend_from_slice(&length.to_be_bytes());
        out.extend_from_slice(&field_type.identifier());
        out.extend_from_slice(payload);
        Ok(out)
    }
}
