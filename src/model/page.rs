//! Page-level types.

use std::ops::Range;

use serde::Serialize;

use super::StructuredField;

/// A contiguous run of fields, addressed by index into the document's field
/// list and by byte range into the input buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Segment {
    /// Field indices (half-open)
    pub fields: Range<usize>,

    /// Byte range in the input buffer (half-open)
    pub byte_range: Range<usize>,
}

impl Segment {
    /// Span `range` of `fields`. An empty range sits at byte offset `at`.
    pub(crate) fn span(fields: &[StructuredField<'_>], range: Range<usize>, at: usize) -> Self {
        let byte_range = match (fields.get(range.start), range.end.checked_sub(1)) {
            (Some(first), Some(last)) if range.start < range.end => first.offset..fields[last].end(),
            _ => at..at,
        };
        Self {
            fields: range,
            byte_range,
        }
    }

    /// Check if the segment holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields in the segment.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Number of bytes in the segment.
    pub fn byte_len(&self) -> usize {
        self.byte_range.len()
    }
}

/// A single page: the fields from a PageBegin through its matching PageEnd.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Page number (1-indexed, sequential)
    pub index: u32,

    /// Field indices, PageBegin through PageEnd inclusive
    pub fields: Range<usize>,

    /// Byte range, PageBegin start through PageEnd end
    pub byte_range: Range<usize>,

    /// Fields between the previous page (or the preamble) and this PageBegin
    pub lead_in: Segment,
}

impl Page {
    /// Number of fields on the page, PageBegin and PageEnd included.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Number of bytes on the page.
    pub fn byte_len(&self) -> usize {
        self.byte_range.len()
    }

    /// Byte offset of the PageBegin field.
    pub fn offset(&self) -> usize {
        self.byte_range.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;

    #[test]
    fn test_segment_span() {
        let raw = [0u8; 12];
        let fields = vec![
            StructuredField::new(0, FieldType::DocumentBegin, &raw[..5], 5),
            StructuredField::new(5, FieldType::Opaque([0xD3, 0, 0]), &raw[5..12], 5),
        ];

        let all = Segment::span(&fields, 0..2, 0);
        assert_eq!(all.byte_range, 0..12);
        assert_eq!(all.field_count(), 2);

        let empty = Segment::span(&fields, 2..2, 12);
        assert!(empty.is_empty());
        assert_eq!(empty.byte_range, 12..12);
        assert_eq!(empty.byte_len(), 0);
    }

    #[test]
    fn test_page_accessors() {
        let page = Page {
            index: 1,
            fields: 3..6,
            byte_range: 20..41,
            lead_in: Segment::default(),
        };
        assert_eq!(page.field_count(), 3);
        assert_eq!(page.byte_len(), 21);
        assert_eq!(page.offset(), 20);
    }
}
