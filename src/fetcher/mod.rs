//! Graph API fetchers

use crate::{AccountInfo, MediaItem};
use async_trait::async_trait;

pub mod graph_api;
pub mod graph_http;
pub mod graph_types;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Transport failure before a response arrived
    #[error("network error: {0}")]
    Network(String),

    /// Non-retryable API error, or one the retry policy does not cover
    #[error("Graph API request failed (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Graph error code, when the body carried one
        code: Option<i64>,
        /// Graph error subcode, when the body carried one
        subcode: Option<i64>,
        /// Graph error message, or a placeholder
        message: String,
    },

    /// Still rate limited after every retry
    #[error("Graph API request failed (HTTP {status}): rate limited after {attempts} attempts")]
    RateLimitExhausted {
        /// HTTP status of the final attempt
        status: u16,
        /// Total attempts made
        attempts: u32,
    },

    /// Successful response that could not be decoded
    #[error("parse error: {0}")]
    Parse(String),

    /// Malformed request or pagination URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// Source of account and media data for an export run
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Fetch the account's username and display name
    async fn fetch_account_info(&self) -> FetcherResult<AccountInfo>;

    /// Fetch every media item inside the lookback window, with insights
    ///
    /// # Returns
    /// Items in API order (newest first). Items on the page that crossed the
    /// cutoff are kept even when older than it.
    async fn fetch_all_media_with_insights(&self) -> FetcherResult<Vec<MediaItem>>;
}
