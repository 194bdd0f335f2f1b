//! # afptools
//!
//! Page extraction and structural analysis for AFP (MO:DCA) print streams.
//!
//! An AFP stream is a flat sequence of length-prefixed structured fields.
//! This library decodes that sequence without interpreting payloads, groups
//! it into a preamble, pages and a trailer, and writes new streams that keep
//! only selected pages.
//!
//! ## Quick Start
//!
//! ```no_run
//! use afptools::extract_file;
//!
//! fn main() -> afptools::Result<()> {
//!     // Keep pages 1 to 3 and page 5
//!     let summary = extract_file("statement.afp", "excerpt.afp", "1:3, 5")?;
//!     println!("{} of {} pages", summary.selected.len(), summary.total_pages);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Zero-copy parsing**: fields borrow the input buffer
//! - **Byte-exact output**: records are copied, never re-encoded
//! - **Both framings**: bare records and `0x5A` carriage-control records
//! - **Analysis reports**: text and JSON, with parallel multi-file analysis

pub mod analyze;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use analyze::{
    analyze_bytes, analyze_file, analyze_files, validate_structure, Analysis, AnalyzeOptions,
    FieldSummary, PageSummary, StructureIssue,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_afp, AfpFormat};
pub use error::{Error, ExtractionError, ParseError, RangeError, Result};
pub use extract::{extract, extract_to, resolve, ExtractSummary, PageSelection};
pub use model::{Document, FieldType, Page, Segment, StructuredField};
pub use parser::{AfpFile, AfpParser, Framing, ParseOptions};
pub use render::JsonFormat;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Parse an AFP buffer.
///
/// # Example
///
/// ```no_run
/// use afptools::parse_bytes;
///
/// let data = std::fs::read("statement.afp").unwrap();
/// let doc = parse_bytes(&data).unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Document<'_>> {
    AfpParser::new(data).parse()
}

/// Parse an AFP buffer with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document<'_>> {
    AfpParser::with_options(data, options).parse()
}

/// Keep the pages named by `selector` and return the new stream.
///
/// # Example
///
/// ```no_run
/// use afptools::extract_pages;
///
/// let data = std::fs::read("statement.afp").unwrap();
/// let excerpt = extract_pages(&data, "2, 4:").unwrap();
/// std::fs::write("excerpt.afp", excerpt).unwrap();
/// ```
pub fn extract_pages(data: &[u8], selector: &str) -> Result<Vec<u8>> {
    extract_pages_with_options(data, selector, ParseOptions::default())
}

/// Keep the pages named by `selector`, with custom parse options.
pub fn extract_pages_with_options(
    data: &[u8],
    selector: &str,
    options: ParseOptions,
) -> Result<Vec<u8>> {
    let doc = parse_bytes_with_options(data, options)?;
    let selection = resolve(selector, doc.page_count())?;
    Ok(extract(&doc, &selection)?)
}

/// Read `input`, keep the pages named by `selector` and write `output`.
///
/// Parent directories of `output` are created as needed. The output is
/// written to a temporary file first and moved into place once complete, so
/// a failed call never leaves a partial or truncated `output` behind.
///
/// # Example
///
/// ```no_run
/// use afptools::extract_file;
///
/// let summary = extract_file("in.afp", "out/pages.afp", "1, 3").unwrap();
/// println!("Wrote {} bytes", summary.bytes_written);
/// ```
pub fn extract_file<P, Q>(input: P, output: Q, selector: &str) -> Result<ExtractSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    extract_file_with_options(input, output, selector, ParseOptions::default())
}

/// Like [`extract_file`], with custom parse options.
pub fn extract_file_with_options<P, Q>(
    input: P,
    output: Q,
    selector: &str,
    options: ParseOptions,
) -> Result<ExtractSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let file = AfpFile::open_with_options(input, options)?;
    let doc = file.parse()?;
    let selection = resolve(selector, doc.page_count())?;

    let output = output.as_ref();
    let bytes_written = write_atomically(output, |writer| extract_to(&doc, &selection, writer))?;

    log::debug!(
        "Wrote {} bytes ({} pages) to {}",
        bytes_written,
        selection.len(),
        output.display()
    );
    Ok(ExtractSummary {
        total_pages: doc.page_count(),
        selected: selection,
        bytes_written,
    })
}

/// Write `output` through a temporary file in the same directory.
///
/// The temporary file replaces `output` only after `write` and the final flush
/// succeed. On any error it is removed and `output` is left untouched.
fn write_atomically<T, F>(output: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<T>,
{
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    let value = {
        let mut writer = BufWriter::new(temp.as_file_mut());
        let value = write(&mut writer)?;
        writer.flush()?;
        value
    };
    temp.as_file().sync_all()?;
    temp.persist(output).map_err(|e| Error::Io(e.error))?;
    Ok(value)
}

/// Analyse an AFP file and render the text report.
///
/// # Example
///
/// ```no_run
/// use afptools::analyze_to_text;
///
/// println!("{}", analyze_to_text("statement.afp").unwrap());
/// ```
pub fn analyze_to_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let analysis = analyze_file(path, &AnalyzeOptions::default())?;
    Ok(render::to_text(&analysis))
}

/// Analyse an AFP file and render the JSON report.
pub fn analyze_to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let analysis = analyze_file(path, &AnalyzeOptions::default())?;
    render::to_json(&analysis, format)
}
