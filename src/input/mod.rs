//! CSV input readers

pub mod csv;
pub mod timestamp;

/// Input reader errors
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// File could not be read
    #[error("IO error: {0}")]
    IoError(String),

    /// Malformed CSV
    #[error("CSV error: {0}")]
    CsvError(String),
}

/// Result type for input operations
pub type InputResult<T> = Result<T, InputError>;

pub use self::csv::{read_csv, read_stories_csv};
pub use timestamp::normalize_publish_time;
