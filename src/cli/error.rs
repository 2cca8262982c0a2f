//! CLI error types and conversions

use crate::fetcher::FetcherError;
use crate::pipeline::PipelineError;
use crate::report::ReportError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Export pipeline error
    #[error("export error: {0}")]
    PipelineError(#[from] PipelineError),

    /// Fetcher setup error
    #[error("fetcher error: {0}")]
    FetcherError(#[from] FetcherError),

    /// Report error
    #[error("report error: {0}")]
    ReportError(#[from] ReportError),

    /// Summary could not be serialized
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigurationError(String),
}
