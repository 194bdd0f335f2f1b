//! Plain text rendering for analysis reports.

use crate::analyze::Analysis;

const RULE_WIDTH: usize = 60;

/// Render a human-readable report.
pub fn to_text(analysis: &Analysis) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&rule);
    out.push_str(&format!(
        "\nAFP File Analysis Report: {}\n",
        analysis.file_path.as_deref().unwrap_or("<memory>")
    ));
    out.push_str(&rule);
    out.push_str(&format!("\n\nFile size: {} bytes\n", analysis.file_size));

    push_list(&mut out, "Errors", &analysis.errors);
    push_list(&mut out, "Warnings", &analysis.warnings);

    let format = if analysis.is_afp {
        "Standard"
    } else {
        "Non-standard or not AFP"
    };
    out.push_str(&format!(
        "\nAFP Format: {} ({} framing)\n",
        format, analysis.framing
    ));
    out.push_str(&format!("Total fields: {}\n", analysis.field_count));
    out.push_str(&format!("Total pages: {}\n", analysis.page_count));

    if !analysis.type_counts.is_empty() {
        out.push_str("\nField types:\n");
        for (name, count) in &analysis.type_counts {
            out.push_str(&format!("  {}: {}\n", name, count));
        }
    }

    if !analysis.fields.is_empty() {
        out.push_str("\nFirst fields:\n");
        for field in &analysis.fields {
            out.push_str(&format!(
                "  {}: offset={}, length={}, type={} ({})\n",
                field.index, field.offset, field.length, field.type_code, field.type_name
            ));
        }
    }

    if !analysis.pages.is_empty() {
        out.push_str("\nPages:\n");
        for page in &analysis.pages {
            out.push_str(&format!(
                "  {}: offset={}, length={}, fields={}\n",
                page.index, page.offset, page.length, page.field_count
            ));
        }
    }

    out.push('\n');
    out.push_str(&rule);
    out
}

fn push_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("\n{}:\n", title));
    for item in items {
        out.push_str(&format!("  - {}\n", item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{analyze_bytes, AnalyzeOptions};
    use crate::model::{FieldType, StructuredField};
    use crate::parser::Framing;

    #[test]
    fn test_to_text() {
        let data: Vec<u8> = [
            FieldType::DocumentBegin,
            FieldType::PageBegin,
            FieldType::PageEnd,
            FieldType::DocumentEnd,
        ]
        .iter()
        .flat_map(|t| StructuredField::encode(Framing::CarriageControl, *t, b"").unwrap())
        .collect();
        let mut analysis = analyze_bytes(&data, &AnalyzeOptions::new().with_verbose(true));
        analysis.file_path = Some("sample.afp".to_string());

        let report = to_text(&analysis);
        assert!(report.starts_with(&"=".repeat(60)));
        assert!(report.contains("AFP File Analysis Report: sample.afp"));
        assert!(report.contains("File size: 24 bytes"));
        assert!(report.contains("AFP Format: Standard (carriage control (0x5A) framing)"));
        assert!(report.contains("Total pages: 1"));
        assert!(report.contains("  1: offset=6, length=6, type=d3a8af (Begin Page)"));
        assert!(report.contains("Pages:\n  1: offset=6, length=12, fields=2"));
        assert!(!report.contains("Errors:"));
    }

    #[test]
    fn test_to_text_errors() {
        let analysis = analyze_bytes(&[0x00, 0x02], &AnalyzeOptions::default());
        let report = to_text(&analysis);
        assert!(report.contains("<memory>"));
        assert!(report.contains("Errors:\n  - truncated header at offset 0"));
        assert!(report.contains("Non-standard or not AFP"));
    }

    #[test]
    fn test_to_text_warnings_layout() {
        let data: Vec<u8> = [FieldType::PageBegin, FieldType::PageEnd]
            .iter()
            .flat_map(|t| StructuredField::encode(Framing::Bare, *t, b"").unwrap())
            .collect();
        let analysis = analyze_bytes(&data, &AnalyzeOptions::default());

        let report = to_text(&analysis);
        assert!(report.contains(
            "Warnings:\n  - missing Begin Document (BDT)\n  - missing End Document (EDT)\n"
        ));
        assert!(report.contains("Field types:\n  BPG: 1\n  EPG: 1\n"));
        assert!(report.ends_with(&format!("\n{}", "=".repeat(60))));
    }
}
