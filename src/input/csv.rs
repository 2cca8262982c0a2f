//! CSV file reader

use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, info};

use super::timestamp::normalize_publish_time;
use super::{InputError, InputResult};
use crate::normalize::schema::PUBLISH_TIME;
use crate::CsvRow;

/// UTF-8 byte-order mark some spreadsheet exports prepend
const BOM: char = '\u{feff}';

/// Read a CSV file into header-keyed rows
///
/// The first record is the header row. A leading BOM is stripped and blank
/// lines are skipped. Short records only carry the columns they reach.
pub fn read_csv<P: AsRef<Path>>(path: P) -> InputResult<Vec<CsvRow>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| InputError::IoError(format!("failed to read {}: {e}", path.display())))?;

    let rows = parse_csv(&content)?;
    info!(
        "Loaded {} rows from {}",
        rows.len(),
        path.file_name().unwrap_or(path.as_os_str()).to_string_lossy()
    );
    Ok(rows)
}

/// Parse CSV text into header-keyed rows
pub fn parse_csv(content: &str) -> InputResult<Vec<CsvRow>> {
    let content = content.strip_prefix(BOM).unwrap_or(content);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| InputError::CsvError(format!("failed to read header row: {e}")))?
        .clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| InputError::CsvError(format!("failed to read record {}: {e}", index + 1)))?;

        let row: CsvRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }

    debug!("Parsed {} rows with {} columns", rows.len(), headers.len());
    Ok(rows)
}

/// Read a story export, rewriting `Publish time` as UTC
pub fn read_stories_csv<P: AsRef<Path>>(path: P) -> InputResult<Vec<CsvRow>> {
    let mut rows = read_csv(path)?;
    for row in &mut rows {
        repair_publish_time(row);
    }
    Ok(rows)
}

/// Rewrite a non-empty `Publish time` cell in place
pub fn repair_publish_time(row: &mut CsvRow) {
    if let Some(value) = row.get_mut(PUBLISH_TIME) {
        if !value.is_empty() {
            *value = normalize_publish_time(value);
        }
    }
}
