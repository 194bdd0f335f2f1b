//! Document-level types.

use std::ops::Range;

use super::{Page, Segment, StructuredField};

/// A parsed AFP document: preamble, pages and trailer over one input buffer.
///
/// The document owns only its field list. Every field borrows the caller's
/// buffer, and pages and segments are index ranges into the field list, so
/// the buffer must outlive the document.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    fields: Vec<StructuredField<'a>>,
    preamble: Segment,
    pages: Vec<Page>,
    trailer: Segment,
}

impl<'a> Document<'a> {
    pub(crate) fn from_parts(
        fields: Vec<StructuredField<'a>>,
        preamble: Segment,
        pages: Vec<Page>,
        trailer: Segment,
    ) -> Self {
        Self {
            fields,
            preamble,
            pages,
            trailer,
        }
    }

    /// All fields in stream order.
    pub fn fields(&self) -> &[StructuredField<'a>] {
        &self.fields
    }

    /// Fields before the first PageBegin.
    pub fn preamble(&self) -> &Segment {
        &self.preamble
    }

    /// Fields after the last PageEnd.
    pub fn trailer(&self) -> &Segment {
        &self.trailer
    }

    /// Pages in stream order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, index: u32) -> Option<&Page> {
        if index == 0 {
            return None;
        }
        self.pages.get((index - 1) as usize)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total size of the input buffer.
    pub fn byte_len(&self) -> usize {
        self.fields.last().map_or(0, StructuredField::end)
    }

    /// Fields of a segment.
    pub fn segment_fields(&self, segment: &Segment) -> &[StructuredField<'a>] {
        &self.fields[segment.fields.clone()]
    }

    /// Fields of a page, PageBegin through PageEnd.
    pub fn page_fields(&self, page: &Page) -> &[StructuredField<'a>] {
        &self.fields[page.fields.clone()]
    }

    /// Record bytes of a run of fields, in order.
    pub fn field_bytes(&self, fields: Range<usize>) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.fields[fields].iter().map(|field| field.as_bytes())
    }

    /// Give up the document structure and keep the fields.
    pub fn into_fields(self) -> Vec<StructuredField<'a>> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;

    fn sample(raw: &[u8]) -> Document<'_> {
        let fields = vec![
            StructuredField::new(0, FieldType::DocumentBegin, &raw[0..5], 5),
            StructuredField::new(5, FieldType::PageBegin, &raw[5..10], 5),
            StructuredField::new(10, FieldType::PageEnd, &raw[10..15], 5),
            StructuredField::new(15, FieldType::DocumentEnd, &raw[15..20], 5),
        ];
        let preamble = Segment::span(&fields, 0..1, 0);
        let page = Page {
            index: 1,
            fields: 1..3,
            byte_range: 5..15,
            lead_in: Segment::span(&fields, 1..1, 5),
        };
        let trailer = Segment::span(&fields, 3..4, 15);
        Document::from_parts(fields, preamble, vec![page], trailer)
    }

    #[test]
    fn test_get_page() {
        let raw = [0u8; 20];
        let doc = sample(&raw);
        assert_eq!(doc.page_count(), 1);
        assert!(doc.get_page(0).is_none());
        assert_eq!(doc.get_page(1).map(|p| p.index), Some(1));
        assert!(doc.get_page(2).is_none());
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_views() {
        let raw = [0u8; 20];
        let doc = sample(&raw);
        assert_eq!(doc.byte_len(), 20);
        assert_eq!(doc.segment_fields(doc.preamble()).len(), 1);
        assert_eq!(doc.page_fields(&doc.pages()[0])[0].field_type, FieldType::PageBegin);
        assert_eq!(doc.field_bytes(0..4).map(<[u8]>::len).sum::<usize>(), 20);
    }
}
