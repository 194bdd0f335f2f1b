//! AFP parsing module.

mod afp_parser;
mod builder;
mod decoder;
mod options;

pub use afp_parser::{AfpFile, AfpParser};
pub use builder::build;
pub use decoder::{decode, FieldIter};
pub use options::{Framing, ParseOptions};
