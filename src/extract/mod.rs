//! Page extraction.
//!
//! Extraction is a structural subset: the preamble, the selected pages and the
//! trailer are copied byte for byte. Length, count or pointer values embedded
//! in those records are never rewritten.

mod selection;

pub use selection::{resolve, PageSelection};

use std::io::Write;

use serde::Serialize;

use crate::analyze::validate_structure;
use crate::error::{ExtractionError, Result};
use crate::model::{Document, Page};

/// Outcome of a file-to-file extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractSummary {
    /// Pages in the input document
    pub total_pages: u32,

    /// Pages written, ascending
    pub selected: PageSelection,

    /// Size of the output
    pub bytes_written: usize,
}

/// Assemble preamble, selected pages (ascending) and trailer into a new
/// stream.
///
/// A page that follows fields outside any page carries them as its lead-in,
/// and the lead-in is written directly before the page.
pub fn extract(
    document: &Document<'_>,
    selection: &PageSelection,
) -> std::result::Result<Vec<u8>, ExtractionError> {
    let pages = selected_pages(document, selection)?;
    let size = output_len(document, &pages);

    let mut out = Vec::with_capacity(size);
    for chunk in output_chunks(document, &pages) {
        out.extend_from_slice(chunk);
    }
    check_output(document, &pages);

    log::debug!(
        "Extracted {} of {} pages ({} bytes)",
        pages.len(),
        document.page_count(),
        out.len()
    );
    Ok(out)
}

/// Like [`extract`], but streams the output into `writer`.
///
/// Returns the number of bytes written. Selection errors are reported before
/// anything is written.
pub fn extract_to<W: Write>(
    document: &Document<'_>,
    selection: &PageSelection,
    writer: &mut W,
) -> Result<usize> {
    let pages = selected_pages(document, selection)?;

    let mut written = 0;
    for chunk in output_chunks(document, &pages) {
        writer.write_all(chunk)?;
        written += chunk.len();
    }
    writer.flush()?;
    check_output(document, &pages);

    Ok(written)
}

/// Look up every selected page, rejecting empty or out-of-range selections.
fn selected_pages<'d>(
    document: &'d Document<'_>,
    selection: &PageSelection,
) -> std::result::Result<Vec<&'d Page>, ExtractionError> {
    if selection.is_empty() {
        return Err(ExtractionError::EmptySelection);
    }

    selection
        .iter()
        .map(|index| {
            document
                .get_page(index)
                .ok_or(ExtractionError::IndexOutOfBounds {
                    index,
                    page_count: document.page_count(),
                })
        })
        .collect()
}

fn output_len(document: &Document<'_>, pages: &[&Page]) -> usize {
    document.preamble().byte_len()
        + pages
            .iter()
            .map(|page| page.lead_in.byte_len() + page.byte_len())
            .sum::<usize>()
        + document.trailer().byte_len()
}

fn output_chunks<'a, 'd>(
    document: &'d Document<'a>,
    pages: &'d [&'d Page],
) -> impl Iterator<Item = &'a [u8]> + 'd {
    let preamble = document.field_bytes(document.preamble().fields.clone());
    let body = pages.iter().flat_map(move |page| {
        document
            .field_bytes(page.lead_in.fields.clone())
            .chain(document.field_bytes(page.fields.clone()))
    });
    let trailer = document.field_bytes(document.trailer().fields.clone());

    preamble.chain(body).chain(trailer)
}

/// Warn when the assembled stream lacks the usual document envelope.
fn check_output(document: &Document<'_>, pages: &[&Page]) {
    let types = document
        .segment_fields(document.preamble())
        .iter()
        .chain(pages.iter().flat_map(move |page| {
            document
                .segment_fields(&page.lead_in)
                .iter()
                .chain(document.page_fields(page))
        }))
        .chain(document.segment_fields(document.trailer()))
        .map(|field| field.field_type);

    for issue in validate_structure(types) {
        log::warn!("Extracted stream structure may not be valid: {}", issue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{FieldType, StructuredField};
    use crate::parser::{AfpParser, Framing};

    fn field(field_type: FieldType, payload: &[u8]) -> Vec<u8> {
        StructuredField::encode(Framing::Bare, field_type, payload).unwrap()
    }

    fn three_pages() -> Vec<u8> {
        let mut data = field(FieldType::DocumentBegin, b"DOC");
        data.extend(field(FieldType::ResourceGroupBegin, b""));
        data.extend(field(FieldType::ResourceGroupEnd, b""));
        for page in 1..=3u8 {
            data.extend(field(FieldType::PageBegin, &[page]));
            data.extend(field(FieldType::Opaque([0xD3, 0xEE, 0x9B]), &[page; 4]));
            data.extend(field(FieldType::PageEnd, &[page]));
        }
        data.extend(field(FieldType::DocumentEnd, b"DOC"));
        data
    }

    #[test]
    fn test_extract_all_is_identity() {
        let data = three_pages();
        let doc = AfpParser::new(&data).parse().unwrap();
        let out = extract(&doc, &PageSelection::all(3)).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_extract_single_page() {
        let data = three_pages();
        let doc = AfpParser::new(&data).parse().unwrap();
        let selection: PageSelection = [2].into_iter().collect();
        let out = extract(&doc, &selection).unwrap();

        let reparsed = AfpParser::new(&out).parse().unwrap();
        assert_eq!(reparsed.page_count(), 1);
        assert_eq!(reparsed.pages()[0].index, 1);
        let page_fields = reparsed.page_fields(&reparsed.pages()[0]);
        assert_eq!(page_fields[0].payload, &[2]);
        assert_eq!(page_fields[1].payload, &[2, 2, 2, 2]);
        assert_eq!(
            reparsed.segment_fields(reparsed.trailer())[0].field_type,
            FieldType::DocumentEnd
        );
    }

    #[test]
    fn test_extract_empty_selection() {
        let data = three_pages();
        let doc = AfpParser::new(&data).parse().unwrap();
        let err = extract(&doc, &PageSelection::new()).unwrap_err();
        assert_eq!(err, ExtractionError::EmptySelection);
    }

    #[test]
    fn test_extract_out_of_bounds() {
        let data = three_pages();
        let doc = AfpParser::new(&data).parse().unwrap();
        let selection: PageSelection = [1, 4].into_iter().collect();
        let err = extract(&doc, &selection).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::IndexOutOfBounds {
                index: 4,
                page_count: 3
            }
        );

        let selection: PageSelection = [0].into_iter().collect();
        assert!(extract(&doc, &selection).is_err());
    }

    #[test]
    fn test_extract_to_writer() {
        let data = three_pages();
        let doc = AfpParser::new(&data).parse().unwrap();
        let selection: PageSelection = [1, 3].into_iter().collect();

        let mut sink = Vec::new();
        let written = extract_to(&doc, &selection, &mut sink).unwrap();
        assert_eq!(written, sink.len());
        assert_eq!(sink, extract(&doc, &selection).unwrap());
    }

    #[test]
    fn test_extract_to_rejects_before_writing() {
        let data = three_pages();
        let doc = AfpParser::new(&data).parse().unwrap();

        let mut sink = Vec::new();
        let result = extract_to(&doc, &PageSelection::new(), &mut sink);
        assert!(matches!(
            result,
            Err(Error::Extraction(ExtractionError::EmptySelection))
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_lead_in_travels_with_page() {
        let mut data = field(FieldType::DocumentBegin, b"");
        data.extend(field(FieldType::PageBegin, &[1]));
        data.extend(field(FieldType::PageEnd, &[1]));
        data.extend(field(FieldType::Opaque([0xD3, 0xA8, 0xAD]), b"group"));
        data.extend(field(FieldType::PageBegin, &[2]));
        data.extend(field(FieldType::PageEnd, &[2]));
        data.extend(field(FieldType::DocumentEnd, b""));
        let doc = AfpParser::new(&data).parse().unwrap();

        let first: PageSelection = [1].into_iter().collect();
        let out = extract(&doc, &first).unwrap();
        assert!(!out.windows(5).any(|w| w == b"group"));

        let second: PageSelection = [2].into_iter().collect();
        let out = extract(&doc, &second).unwrap();
        assert!(out.windows(5).any(|w| w == b"group"));

        assert_eq!(extract(&doc, &PageSelection::all(2)).unwrap(), data);
    }
}
