//! CSV parsing for bulk user import
//!
//! Each line carries `name,password,profile`, no header row. Blank lines are
//! ignored, lines with fewer than three fields are skipped, extra fields are
//! dropped.

use crate::types::{AdminError, ImportRow, NewHotspotUser};

/// Content type an upload must declare to be accepted
pub fn is_csv_mime(mime: &mime::Mime) -> bool {
    mime.essence_str() == mime::TEXT_CSV.essence_str()
}

/// Parses an uploaded import file into rows, in file order
pub fn parse_rows(content: &str) -> Result<Vec<ImportRow>, AdminError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if record.len() < 3 {
            tracing::warn!("import line {} has {} field(s), expected 3; skipped", line, record.len());
            continue;
        }

        rows.push(ImportRow {
            line,
            user: NewHotspotUser {
                name: record[0].to_string(),
                password: record[1].to_string(),
                profile: record[2].trim_end_matches('\r').to_string(),
            },
        });
    }
    Ok(rows)
}
