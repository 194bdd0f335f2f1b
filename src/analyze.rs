//! Read-only analysis of AFP streams.
//!
//! Unlike parsing, analysis never fails on malformed input: framing and
//! nesting errors are recorded in the [`Analysis`] together with whatever
//! could be decoded before them.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::model::{FieldType, MAX_FIELD_LENGTH};
use crate::parser::{build, FieldIter, Framing};

/// Fields listed in a default report.
pub const DEFAULT_LISTED_FIELDS: usize = 10;

/// Fields listed in a verbose report.
pub const VERBOSE_LISTED_FIELDS: usize = 100;

/// Options for analysing AFP streams.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Record framing of the input
    pub framing: Framing,

    /// Include per-page summaries and list more fields
    pub verbose: bool,

    /// Override the number of listed fields
    pub max_listed_fields: Option<usize>,

    /// Analyse multiple files in parallel
    pub parallel: bool,
}

impl AnalyzeOptions {
    /// Create new analyze options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record framing.
    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    /// Enable or disable verbose reports.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// List at most `count` fields.
    pub fn with_max_listed_fields(mut self, count: usize) -> Self {
        self.max_listed_fields = Some(count);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Number of fields to list in the report.
    pub fn listed_fields(&self) -> usize {
        match (self.max_listed_fields, self.verbose) {
            (Some(count), _) => count,
            (None, true) => VERBOSE_LISTED_FIELDS,
            (None, false) => DEFAULT_LISTED_FIELDS,
        }
    }
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            framing: Framing::Auto,
            verbose: false,
            max_listed_fields: None,
            parallel: true,
        }
    }
}

/// Result of analysing one stream.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    /// Source path, when analysed from a file
    pub file_path: Option<String>,

    /// Input size in bytes
    pub file_size: usize,

    /// Framing used for decoding
    pub framing: Framing,

    /// Whether any well-known MO:DCA field was found
    pub is_afp: bool,

    /// Whether the stream parsed cleanly and has a complete document envelope
    pub valid: bool,

    /// Fields decoded (up to the first framing error)
    pub field_count: usize,

    /// Pages in the document, or PageBegin fields seen if building failed
    pub page_count: u32,

    /// Field count per type (mnemonic or identifier hex)
    pub type_counts: BTreeMap<String, usize>,

    /// The first decoded fields
    pub fields: Vec<FieldSummary>,

    /// Per-page summaries (verbose only)
    pub pages: Vec<PageSummary>,

    /// Non-fatal findings
    pub warnings: Vec<String>,

    /// Framing and nesting errors
    pub errors: Vec<String>,
}

impl Analysis {
    /// Check if the analysis recorded errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// One listed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    /// Position in the stream (0-indexed)
    pub index: usize,
    /// Byte offset
    pub offset: usize,
    /// Record length
    pub length: usize,
    /// Identifier hex (e.g. "d3a8af")
    pub type_code: String,
    /// Description, or "Unknown"
    pub type_name: String,
}

/// One page of a successfully built document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    /// Page number (1-indexed)
    pub index: u32,
    /// Byte offset of the PageBegin
    pub offset: usize,
    /// Page size in bytes
    pub length: usize,
    /// Fields on the page
    pub field_count: usize,
}

/// Structural findings that do not stop parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureIssue {
    /// No DocumentBegin field
    MissingDocumentBegin,
    /// No DocumentEnd field
    MissingDocumentEnd,
    /// No PageBegin field
    NoPages,
    /// Something precedes the DocumentBegin
    DocumentBeginNotFirst,
    /// Something follows the DocumentEnd
    DocumentEndNotLast,
    /// ResourceGroupBegin/End do not pair up
    UnbalancedResourceGroups,
}

impl fmt::Display for StructureIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            StructureIssue::MissingDocumentBegin => "missing Begin Document (BDT)",
            StructureIssue::MissingDocumentEnd => "missing End Document (EDT)",
            StructureIssue::NoPages => "no Begin Page (BPG) fields",
            StructureIssue::DocumentBeginNotFirst => "Begin Document is not the first field",
            StructureIssue::DocumentEndNotLast => "End Document is not the last field",
            StructureIssue::UnbalancedResourceGroups => "unbalanced resource groups",
        };
        f.write_str(message)
    }
}

/// Check a field-type sequence for the usual document envelope.
pub fn validate_structure<I>(types: I) -> Vec<StructureIssue>
where
    I: IntoIterator<Item = FieldType>,
{
    let mut first = None;
    let mut last = None;
    let (mut has_begin, mut has_end, mut has_page) = (false, false, false);
    let mut depth: i64 = 0;
    let mut groups_balanced = true;

    for field_type in types {
        first.get_or_insert(field_type);
        last = Some(field_type);
        match field_type {
            FieldType::DocumentBegin => has_begin = true,
            FieldType::DocumentEnd => has_end = true,
            FieldType::PageBegin => has_page = true,
            FieldType::ResourceGroupBegin => depth += 1,
            FieldType::ResourceGroupEnd => {
                depth -= 1;
                if depth < 0 {
                    groups_balanced = false;
                }
            }
            _ => {}
        }
    }

    let mut issues = Vec::new();
    if !has_begin {
        issues.push(StructureIssue::MissingDocumentBegin);
    } else if first != Some(FieldType::DocumentBegin) {
        issues.push(StructureIssue::DocumentBeginNotFirst);
    }
    if !has_end {
        issues.push(StructureIssue::MissingDocumentEnd);
    } else if last != Some(FieldType::DocumentEnd) {
        issues.push(StructureIssue::DocumentEndNotLast);
    }
    if !has_page {
        issues.push(StructureIssue::NoPages);
    }
    if !groups_balanced || depth != 0 {
        issues.push(StructureIssue::UnbalancedResourceGroups);
    }
    issues
}

/// Analyse an in-memory stream.
pub fn analyze_bytes(data: &[u8], options: &AnalyzeOptions) -> Analysis {
    let iter = FieldIter::new(data, options.framing);
    let framing = iter.framing();
    let mut analysis = Analysis {
        file_size: data.len(),
        framing,
        ..Default::default()
    };

    let mut fields = Vec::new();
    let mut decode_error = None;
    for item in iter {
        match item {
            Ok(field) => fields.push(field),
            Err(e) => {
                decode_error = Some(e);
                break;
            }
        }
    }

    let limit = options.listed_fields();
    let mut page_begins = 0u32;
    for (index, field) in fields.iter().enumerate() {
        let field_type = field.field_type;
        *analysis.type_counts.entry(field_type.to_string()).or_default() += 1;
        analysis.is_afp |= field_type.is_well_known();
        if field_type == FieldType::PageBegin {
            page_begins += 1;
        }

        let declared = field.length - framing.introducer_size();
        if declared > MAX_FIELD_LENGTH {
            analysis.warnings.push(format!(
                "Field length {} at offset {} exceeds the MO:DCA maximum of {}",
                declared, field.offset, MAX_FIELD_LENGTH
            ));
        }

        if index < limit {
            analysis.fields.push(FieldSummary {
                index,
                offset: field.offset,
                length: field.length,
                type_code: field_type.hex(),
                type_name: field_type.description().unwrap_or("Unknown").to_string(),
            });
        }
    }
    analysis.field_count = fields.len();
    analysis.page_count = page_begins;

    if fields.is_empty() && decode_error.is_none() {
        analysis.errors.push("No structured fields found".to_string());
    } else if !fields.is_empty() && !analysis.is_afp {
        analysis
            .warnings
            .push("No well-known MO:DCA structured fields found".to_string());
    }

    let issues = validate_structure(fields.iter().map(|field| field.field_type));

    match decode_error {
        Some(e) => analysis.errors.push(e.to_string()),
        None if !fields.is_empty() => match build(fields) {
            Ok(doc) => {
                analysis.page_count = doc.page_count();
                if options.verbose {
                    analysis.pages = doc
                        .pages()
                        .iter()
                        .map(|page| PageSummary {
                            index: page.index,
                            offset: page.offset(),
                            length: page.byte_len(),
                            field_count: page.field_count(),
                        })
                        .collect();
                }
            }
            Err(e) => analysis.errors.push(e.to_string()),
        },
        None => {}
    }

    analysis
        .warnings
        .extend(issues.iter().map(ToString::to_string));
    analysis.valid = analysis.errors.is_empty() && issues.is_empty();

    log::debug!(
        "Analysed {} bytes: {} fields, {} pages, {} warnings, {} errors",
        analysis.file_size,
        analysis.field_count,
        analysis.page_count,
        analysis.warnings.len(),
        analysis.errors.len()
    );
    analysis
}

/// Analyse a file.
///
/// Only I/O errors fail; problems with the content are part of the result.
pub fn analyze_file<P: AsRef<Path>>(path: P, options: &AnalyzeOptions) -> Result<Analysis> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let mut analysis = analyze_bytes(&data, options);
    analysis.file_path = Some(path.display().to_string());
    Ok(analysis)
}

/// Analyse independent files, in parallel unless `options.parallel` is off.
///
/// Results are returned in input order.
pub fn analyze_files<P>(paths: &[P], options: &AnalyzeOptions) -> Vec<Result<Analysis>>
where
    P: AsRef<Path> + Sync,
{
    if options.parallel {
        paths
            .par_iter()
            .map(|path| analyze_file(path, options))
            .collect()
    } else {
        paths
            .iter()
            .map(|path| analyze_file(path, options))
            .collect()
    }
}
