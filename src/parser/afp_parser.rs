//! AFP stream parser.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::{Document, StructuredField};

use super::builder::build;
use super::decoder::{decode, FieldIter};
use super::options::{Framing, ParseOptions};

/// Parser over a borrowed AFP buffer.
pub struct AfpParser<'a> {
    data: &'a [u8],
    options: ParseOptions,
}

impl<'a> AfpParser<'a> {
    /// Parse an AFP buffer.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_options(data, ParseOptions::default())
    }

    /// Parse an AFP buffer with custom options.
    pub fn with_options(data: &'a [u8], options: ParseOptions) -> Self {
        Self { data, options }
    }

    /// The framing that will be used, with `Auto` resolved.
    pub fn framing(&self) -> Framing {
        self.options.framing.resolve(self.data)
    }

    /// Iterate the records lazily.
    pub fn fields(&self) -> FieldIter<'a> {
        FieldIter::new(self.data, self.options.framing)
    }

    /// Decode every record.
    pub fn decode(&self) -> Result<Vec<StructuredField<'a>>> {
        Ok(decode(self.data, self.options.framing)?)
    }

    /// Decode and group into preamble, pages and trailer.
    pub fn parse(&self) -> Result<Document<'a>> {
        let fields = self.decode()?;
        Ok(build(fields)?)
    }
}

/// An AFP file read fully into memory.
///
/// Owns the buffer that [`Document`]s produced by [`AfpFile::parse`] borrow.
#[derive(Debug, Clone)]
pub struct AfpFile {
    path: Option<PathBuf>,
    data: Vec<u8>,
    options: ParseOptions,
}

impl AfpFile {
    /// Read an AFP file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Read an AFP file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        log::debug!("Read {} bytes from {}", data.len(), path.display());
        Ok(Self {
            path: Some(path.to_path_buf()),
            data,
            options,
        })
    }

    /// Read an AFP stream from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Read an AFP stream from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::from_vec_with_options(data, options))
    }

    /// Wrap an in-memory buffer.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self::from_vec_with_options(data, ParseOptions::default())
    }

    /// Wrap an in-memory buffer with custom options.
    pub fn from_vec_with_options(data: Vec<u8>, options: ParseOptions) -> Self {
        Self {
            path: None,
            data,
            options,
        }
    }

    /// Path the file was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Parser borrowing this file's bytes.
    pub fn parser(&self) -> AfpParser<'_> {
        AfpParser::with_options(&self.data, self.options.clone())
    }

    /// Decode and group into preamble, pages and trailer.
    pub fn parse(&self) -> Result<Document<'_>> {
        self.parser().parse()
    }
}
