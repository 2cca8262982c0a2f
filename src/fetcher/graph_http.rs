//! Graph API HTTP client
//!
//! Single entry point for every Graph request:
//! - Status-discriminated responses ([`GraphResponse`])
//! - Rate-limit detection from Graph error codes
//! - Bounded retry loop with quadratic backoff
//! - Access tokens redacted from every log line

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::config::{calculate_backoff, ExportConfig};
use crate::fetcher::graph_types::{GraphErrorResponse, GraphResponse};
use crate::fetcher::{FetcherError, FetcherResult};

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client that retries Graph throttling responses
pub struct GraphHttpClient {
    client: Client,
    backoff_base: Duration,
    max_retries: u32,
}

impl GraphHttpClient {
    /// Create a client around an existing reqwest client
    ///
    /// # Arguments
    /// * `client` - reqwest client (cheap to clone)
    /// * `backoff_base` - Base delay; attempt `n` waits `backoff_base * n²`
    /// * `max_retries` - Retries after the first rate-limited attempt
    pub fn new(client: Client, backoff_base: Duration, max_retries: u32) -> Self {
        Self {
            client,
            backoff_base,
            max_retries,
        }
    }

    /// Create a client with retry tuning taken from the run configuration
    pub fn from_config(config: &ExportConfig) -> FetcherResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetcherError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::new(client, config.backoff_base, config.max_retries))
    }

    /// Configured retry cap
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// GET a URL and decode the JSON body, retrying while rate limited
    ///
    /// Attempt `n` that comes back throttled sleeps `backoff_base * n²` and
    /// tries again, as long as `n <= max_retries`. Any other failure is
    /// returned immediately.
    ///
    /// # Errors
    /// - [`FetcherError::RateLimitExhausted`] after `max_retries + 1` throttled attempts
    /// - [`FetcherError::Api`] for any other non-success status
    /// - [`FetcherError::Network`] / [`FetcherError::Parse`] for transport and decode failures
    pub async fn get_json<T>(&self, url: &Url) -> FetcherResult<T>
    where
        T: DeserializeOwned,
    {
        let mut attempt: u32 = 1;

        loop {
            debug!("GET {} (attempt {})", redact_token(url), attempt);

            let (status, body) = match self.request::<T>(url).await? {
                GraphResponse::Success(data) => {
                    debug!("Request succeeded on attempt {}", attempt);
                    return Ok(data);
                }
                GraphResponse::Failure { status, body } => (status, body),
            };

            if !body.is_rate_limited() {
                error!("Graph API error (HTTP {}): {:?}", status, body.error);
                return Err(FetcherError::Api {
                    status,
                    code: body.code(),
                    subcode: body.subcode(),
                    message: body.message().unwrap_or("no error message").to_string(),
                });
            }

            if attempt > self.max_retries {
                error!(
                    "Graph API still rate limited after {} attempts: {:?}",
                    attempt, body.error
                );
                return Err(FetcherError::RateLimitExhausted {
                    status,
                    attempts: attempt,
                });
            }

            let backoff = calculate_backoff(self.backoff_base, attempt);
            warn!(
                "Rate limit; retrying in {}ms (attempt {}/{})",
                backoff.as_millis(),
                attempt,
                self.max_retries + 1
            );
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }

    /// Issue one GET and discriminate success from failure by status
    pub async fn request<T>(&self, url: &Url) -> FetcherResult<GraphResponse<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetcherError::Network(e.without_url().to_string()))?;

        let status = response.status();

        if status.is_success() {
            let data = response.json::<T>().await.map_err(|e| {
                FetcherError::Parse(format!("failed to deserialize response: {}", e.without_url()))
            })?;
            return Ok(GraphResponse::Success(data));
        }

        // An unreadable body still fails on status below
        let text = response.text().await.unwrap_or_default();
        Ok(GraphResponse::Failure {
            status: status.as_u16(),
            body: GraphErrorResponse::from_body(&text),
        })
    }
}

/// Render a URL for logs with the `access_token` value masked
pub fn redact_token(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == "access_token") {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "access_token" { "REDACTED".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
