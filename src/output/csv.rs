//! CSV output writer implementation

use csv::Writer;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

use super::{OutputError, OutputResult, OutputWriter, RowsWriter};
use crate::NormalizedRow;

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer

/// CSV writer with a fixed, explicit header list
///
/// The header list is both the column order and the column filter: row
/// fields outside it are dropped, header columns a row lacks are written
/// empty.
pub struct CsvRowsWriter {
    writer: Writer<BufWriter<File>>,
    headers: Vec<String>,
    rows_written: u64,
}

impl CsvRowsWriter {
    /// Create the file (and parent directories) and write the header row
    pub fn new<P: AsRef<Path>>(path: P, headers: Vec<String>) -> OutputResult<Self> {
        let path = path.as_ref();
        info!("Creating CSV writer: path={}", path.display());

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::IoError(format!("Failed to create directory: {e}")))?;
        }

        let file = File::create(path)
            .map_err(|e| OutputError::IoError(format!("Failed to create file: {e}")))?;

        let mut writer = Writer::from_writer(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file));
        // csv writes an empty record as `""`, which reads back as one blank column
        if !headers.is_empty() {
            writer
                .write_record(&headers)
                .map_err(|e| OutputError::CsvError(format!("Failed to write header: {e}")))?;
            debug!("CSV header written: {} columns", headers.len());
        }

        Ok(Self {
            writer,
            headers,
            rows_written: 0,
        })
    }

    /// Get number of rows written so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl RowsWriter for CsvRowsWriter {
    fn write_row(&mut self, row: &NormalizedRow) -> OutputResult<()> {
        let record = project(row, &self.headers);

        self.writer
            .write_record(&record)
            .map_err(|e| OutputError::CsvError(format!("Failed to write row: {e}")))?;

        self.rows_written += 1;
        Ok(())
    }
}

impl OutputWriter for CsvRowsWriter {
    fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::FlushError(format!("Failed to flush: {e}")))
    }

    fn close(mut self) -> OutputResult<()> {
        self.flush()?;

        let buf_writer = self
            .writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get inner writer: {e}")))?;

        let file = buf_writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get file handle: {e}")))?;

        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("Failed to sync file: {e}")))?;

        info!("CSV writer closed successfully: {} rows written", self.rows_written);
        Ok(())
    }
}

/// Values of `row` in header order, empty where absent
pub fn project(row: &NormalizedRow, headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|h| row.get(h).map(ToString::to_string).unwrap_or_default())
        .collect()
}

/// Write `rows` under `headers` and close the file
///
/// # Returns
/// Number of data rows written
pub fn write_csv<P: AsRef<Path>>(
    path: P,
    rows: &[NormalizedRow],
    headers: &[String],
) -> OutputResult<u64> {
    let mut writer = CsvRowsWriter::new(path, headers.to_vec())?;
    writer.write_rows(rows)?;
    let written = writer.rows_written();
    writer.close()?;
    Ok(written)
}
