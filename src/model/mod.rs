//! Document model types for AFP streams.
//!
//! The model is a zero-copy view over the input buffer: fields borrow their
//! bytes, and pages and segments address fields by index.

mod document;
mod field;
mod page;

pub use document::Document;
pub use field::{
    FieldType, StructuredField, CARRIAGE_CONTROL, IDENTIFIER_SIZE, LENGTH_SIZE, MAX_FIELD_LENGTH,
    MODCA_CLASS,
};
pub use page::{Page, Segment};
