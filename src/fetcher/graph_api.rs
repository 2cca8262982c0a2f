//! Instagram Graph API fetcher
//!
//! Reads the account node once, then walks the media edge page by page,
//! newest first, until either the cursor runs out or a page ends on media
//! older than the lookback cutoff.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{lookback_cutoff, ExportConfig};
use crate::fetcher::graph_http::GraphHttpClient;
use crate::fetcher::graph_types::MediaPage;
use crate::fetcher::{FetcherError, FetcherResult, MediaSource};
use crate::{AccountInfo, MediaItem};

/// Metrics requested through the nested insights selection
pub const INSIGHT_METRICS: [&str; 10] = [
    "impressions",
    "reach",
    "plays",
    "views",
    "likes",
    "comments",
    "saved",
    "shares",
    "follows",
    "total_interactions",
];

/// Flat media fields requested alongside insights
const MEDIA_FIELDS: [&str; 7] = [
    "id",
    "caption",
    "media_type",
    "media_url",
    "permalink",
    "thumbnail_url",
    "timestamp",
];

/// Build the `fields` selection for the media edge
pub fn media_fields() -> String {
    format!(
        "{},insights.metric({})",
        MEDIA_FIELDS.join(","),
        INSIGHT_METRICS.join(",")
    )
}

/// Parse a Graph timestamp (`2025-05-29T21:04:00+0000` or RFC 3339)
pub fn parse_graph_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Graph API fetcher for one account
pub struct GraphFetcher {
    http: GraphHttpClient,
    account_url: String,
    media_url: String,
    access_token: String,
    page_limit: u32,
    page_pause: Duration,
    lookback_months: u32,
}

impl GraphFetcher {
    /// Create a fetcher from the run configuration
    pub fn new(config: &ExportConfig) -> FetcherResult<Self> {
        Ok(Self::with_client(GraphHttpClient::from_config(config)?, config))
    }

    /// Create a fetcher around a preconfigured HTTP client
    pub fn with_client(http: GraphHttpClient, config: &ExportConfig) -> Self {
        Self {
            http,
            account_url: config.node_url(None),
            media_url: config.node_url(Some("media")),
            access_token: config.access_token.clone(),
            page_limit: config.page_limit,
            page_pause: config.page_pause,
            lookback_months: config.lookback_months,
        }
    }

    /// Fetch account info (`fields=username,name`)
    pub async fn fetch_account_info(&self) -> FetcherResult<AccountInfo> {
        let url = Url::parse_with_params(
            &self.account_url,
            &[
                ("fields", "username,name"),
                ("access_token", self.access_token.as_str()),
            ],
        )
        .map_err(|e| FetcherError::InvalidUrl(e.to_string()))?;

        self.http.get_json(&url).await
    }

    /// Fetch all media, stopping once a page ends before `cutoff`
    ///
    /// Only the last item of each page is compared against the cutoff; the
    /// page that crosses it is kept whole and no later page is requested.
    pub async fn fetch_media_since(&self, cutoff: DateTime<Utc>) -> FetcherResult<Vec<MediaItem>> {
        let fields = media_fields();
        let limit = self.page_limit.to_string();
        let mut page_url = Url::parse_with_params(
            &self.media_url,
            &[
                ("fields", fields.as_str()),
                ("limit", limit.as_str()),
                ("access_token", self.access_token.as_str()),
            ],
        )
        .map_err(|e| FetcherError::InvalidUrl(e.to_string()))?;

        let mut all_media = Vec::new();
        let mut page_number = 0usize;

        loop {
            page_number += 1;
            let page: MediaPage = self.http.get_json(&page_url).await?;
            let next = page.next_url().map(str::to_string);

            debug!("Received {} items in page {}", page.data.len(), page_number);

            let past_cutoff = page
                .data
                .last()
                .and_then(|item| item.timestamp.as_deref())
                .and_then(parse_graph_timestamp)
                .is_some_and(|ts| ts < cutoff);

            all_media.extend(page.data);

            if past_cutoff {
                info!(
                    "Reached media older than {} - stopping pagination",
                    cutoff.format("%Y-%m-%d")
                );
                break;
            }

            let Some(next) = next else {
                debug!("No next cursor after page {}", page_number);
                break;
            };

            page_url = Url::parse(&next).map_err(|e| FetcherError::InvalidUrl(e.to_string()))?;
            tokio::time::sleep(self.page_pause).await;
        }

        debug!(
            "Pagination completed after {} pages. Total media: {}",
            page_number,
            all_media.len()
        );

        Ok(all_media)
    }
}

#[async_trait]
impl MediaSource for GraphFetcher {
    async fn fetch_account_info(&self) -> FetcherResult<AccountInfo> {
        GraphFetcher::fetch_account_info(self).await
    }

    async fn fetch_all_media_with_insights(&self) -> FetcherResult<Vec<MediaItem>> {
        let cutoff = lookback_cutoff(Utc::now(), self.lookback_months);
        self.fetch_media_since(cutoff).await
    }
}
