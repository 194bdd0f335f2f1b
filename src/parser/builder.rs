//! Document model builder: partitions decoded fields into preamble, pages and
//! trailer.

use crate::error::ParseError;
use crate::model::{Document, FieldType, Page, Segment, StructuredField};

/// Scan state: at most one page is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside any page
    Idle,
    /// Inside the page whose PageBegin is field `begin`
    OpenPage { begin: usize },
}

/// Group `fields` into a [`Document`] in a single linear pass.
///
/// Fields before the first PageBegin are the preamble, fields after the last
/// PageEnd are the trailer. Fields between two pages become the lead-in of the
/// following page.
pub fn build(fields: Vec<StructuredField<'_>>) -> Result<Document<'_>, ParseError> {
    let mut state = ScanState::Idle;
    let mut pages: Vec<Page> = Vec::new();
    let mut first_begin: Option<usize> = None;
    // First field after the most recently closed page
    let mut idle_since = 0;

    for (i, field) in fields.iter().enumerate() {
        match (state, field.field_type) {
            (ScanState::Idle, FieldType::PageBegin) => {
                first_begin.get_or_insert(i);
                state = ScanState::OpenPage { begin: i };
            }
            (ScanState::OpenPage { .. }, FieldType::PageBegin)
            | (ScanState::Idle, FieldType::PageEnd) => {
                return Err(ParseError::UnbalancedPageNesting {
                    offset: field.offset,
                });
            }
            (ScanState::OpenPage { begin }, FieldType::PageEnd) => {
                let begin_offset = fields[begin].offset;
                let lead_start = if pages.is_empty() { begin } else { idle_since };
                let lead_in = Segment::span(&fields, lead_start..begin, begin_offset);

                pages.push(Page {
                    index: pages.len() as u32 + 1,
                    fields: begin..i + 1,
                    byte_range: begin_offset..field.end(),
                    lead_in,
                });
                idle_since = i + 1;
                state = ScanState::Idle;
            }
            _ => {}
        }
    }

    if let ScanState::OpenPage { begin } = state {
        return Err(ParseError::UnterminatedPage {
            offset: fields[begin].offset,
        });
    }

    let end = fields.last().map_or(0, StructuredField::end);
    let preamble = Segment::span(&fields, 0..first_begin.unwrap_or(fields.len()), 0);
    let trailer_start = if pages.is_empty() {
        fields.len()
    } else {
        idle_since
    };
    let trailer = Segment::span(&fields, trailer_start..fields.len(), end);

    log::debug!(
        "Built document: {} pages, {} preamble fields, {} trailer fields",
        pages.len(),
        preamble.field_count(),
        trailer.field_count()
    );

    Ok(Document::from_parts(fields, preamble, pages, trailer))
}
