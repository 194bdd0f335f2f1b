//! JSON rendering for analysis reports.

use crate::analyze::Analysis;
use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an analysis to JSON.
pub fn to_json(analysis: &Analysis, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(analysis),
        JsonFormat::Compact => serde_json::to_string(analysis),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
