//! AFP format detection.

use crate::error::{Error, Result};
use crate::model::{FieldType, IDENTIFIER_SIZE, MODCA_CLASS};
use crate::parser::Framing;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// AFP format information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AfpFormat {
    /// Record framing of the stream
    pub framing: Framing,
    /// Type of the first structured field
    pub first_field: FieldType,
}

impl std::fmt::Display for AfpFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AFP ({} framing, starts with {})", self.framing, self.first_field)
    }
}

/// Bytes read from a file for detection.
const HEADER_PEEK: usize = 16;

/// Detect AFP format from a file path.
///
/// # Arguments
/// * `path` - Path to the AFP file
///
/// # Returns
/// * `Ok(AfpFormat)` if the file starts with a MO:DCA structured field
/// * `Err(Error::UnknownFormat)` otherwise
///
/// # Example
/// ```no_run
/// use afptools::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("statement.afp").unwrap();
/// println!("Framing: {}", format.framing);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<AfpFormat> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_PEEK);
    BufReader::new(file)
        .take(HEADER_PEEK as u64)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect AFP format from bytes.
///
/// Only the first record header is inspected: its identifier must carry the
/// MO:DCA class byte `0xD3`.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<AfpFormat> {
    let framing = Framing::Auto.resolve(data);
    let header_size = framing.header_size();
    if data.len() < header_size {
        return Err(Error::UnknownFormat);
    }

    let id_start = header_size - IDENTIFIER_SIZE;
    let identifier = [data[id_start], data[id_start + 1], data[id_start + 2]];
    if identifier[0] != MODCA_CLASS {
        return Err(Error::UnknownFormat);
    }

    Ok(AfpFormat {
        framing,
        first_field: FieldType::from_identifier(identifier),
    })
}

/// Check if a file looks like an AFP stream.
pub fn is_afp<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes look like an AFP stream.
pub fn is_afp_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
