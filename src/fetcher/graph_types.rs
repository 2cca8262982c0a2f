//! Graph API response shapes

use crate::MediaItem;
use serde::Deserialize;

/// Error codes Graph uses for application and user throttling
const RATE_LIMIT_CODES: [i64; 3] = [4, 17, 613];

/// Error subcodes Graph uses for Instagram-specific throttling
const RATE_LIMIT_SUBCODES: [i64; 1] = [2446079];

/// One page of the media edge
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaPage {
    /// Items on this page
    #[serde(default)]
    pub data: Vec<MediaItem>,
    /// Cursor block
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl MediaPage {
    /// Absolute URL of the next page, if any
    pub fn next_url(&self) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|p| p.next.as_deref())
            .filter(|next| !next.is_empty())
    }
}

/// Graph cursor block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    /// Fully-formed URL of the next page
    #[serde(default)]
    pub next: Option<String>,
    /// Fully-formed URL of the previous page
    #[serde(default)]
    pub previous: Option<String>,
}

/// Body of a failed Graph request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphErrorResponse {
    /// Error details, absent when the body was not a Graph error
    #[serde(default)]
    pub error: Option<GraphErrorBody>,
}

/// Graph error details
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphErrorBody {
    /// Human readable message
    #[serde(default)]
    pub message: Option<String>,
    /// Error type (e.g. "OAuthException")
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Numeric error code
    #[serde(default)]
    pub code: Option<i64>,
    /// Numeric error subcode
    #[serde(default)]
    pub error_subcode: Option<i64>,
    /// Trace ID for support requests
    #[serde(default)]
    pub fbtrace_id: Option<String>,
}

impl GraphErrorResponse {
    /// Parse an error body; anything that is not JSON becomes an empty error
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// Error code, if present
    pub fn code(&self) -> Option<i64> {
        self.error.as_ref().and_then(|e| e.code)
    }

    /// Error subcode, if present
    pub fn subcode(&self) -> Option<i64> {
        self.error.as_ref().and_then(|e| e.error_subcode)
    }

    /// Error message, if present
    pub fn message(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.message.as_deref())
    }

    /// True when the code or subcode matches a throttling signature
    pub fn is_rate_limited(&self) -> bool {
        self.code().is_some_and(|c| RATE_LIMIT_CODES.contains(&c))
            || self.subcode().is_some_and(|s| RATE_LIMIT_SUBCODES.contains(&s))
    }
}

/// Outcome of one Graph request, discriminated by HTTP status
#[derive(Debug)]
pub enum GraphResponse<T> {
    /// 2xx with a decoded body
    Success(T),
    /// Non-2xx with whatever error body could be recovered
    Failure {
        /// HTTP status code
        status: u16,
        /// Parsed error body (empty when unparseable)
        body: GraphErrorResponse,
    },
}
