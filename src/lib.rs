//! # Insights Exporter Library
//!
//! Pulls post metadata and lifetime insights for a single Instagram business
//! account from the Graph API, merges them with a CSV export of expired
//! stories, and writes one unified CSV report.
//!
//! ## Features
//!
//! - **Paginated fetch**: follows Graph API `paging.next` cursors until a
//!   lookback cutoff or the end of the feed
//! - **Rate-limit retry**: recognizes Graph throttling signatures and retries
//!   with quadratic backoff
//! - **Union schema**: API rows and story rows share one fixed column set
//! - **Timezone repair**: story `Publish time` values (US-Eastern wall clock)
//!   are rewritten as UTC instants
//! - **Reports**: overview totals and top engagement over a merged CSV
//!
//! ## Quick Start
//!
//! ```no_run
//! use insights_exporter::config::ExportConfig;
//! use insights_exporter::fetcher::graph_api::GraphFetcher;
//! use insights_exporter::pipeline::ExportPipeline;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExportConfig::new("EAAB...token");
//! let fetcher = GraphFetcher::new(&config)?;
//! let summary = ExportPipeline::new(&config, &fetcher).run().await?;
//! println!("wrote {} rows", summary.total_rows());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - Run configuration and retry/pagination constants
//! - [`fetcher`] - Graph API client with retry and pagination
//! - [`normalize`] - Row normalizers and header union
//! - [`input`] - Story CSV reader with publish-time repair
//! - [`output`] - Merged CSV writer
//! - [`pipeline`] - End-to-end export orchestration
//! - [`report`] - Summaries over a merged CSV
//! - [`cli`] - Command line surface

#![warn(missing_docs)]
#![warn(clippy::all)]

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// CLI command implementations
pub mod cli;

/// Run configuration
pub mod config;

/// Graph API fetchers
pub mod fetcher;

/// CSV input readers
pub mod input;

/// Row normalization and header union
pub mod normalize;

/// CSV output writers
pub mod output;

/// Export orchestration
pub mod pipeline;

/// Reports over a merged CSV
pub mod report;

pub use config::ExportConfig;

/// One media object returned by the `/{account}/media` edge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    /// Media ID
    pub id: String,
    /// Caption text
    #[serde(default)]
    pub caption: Option<String>,
    /// IMAGE, VIDEO, CAROUSEL_ALBUM, ...
    #[serde(default)]
    pub media_type: Option<String>,
    /// Direct media URL
    #[serde(default)]
    pub media_url: Option<String>,
    /// Public permalink
    #[serde(default)]
    pub permalink: Option<String>,
    /// Thumbnail URL (videos only)
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Creation time as returned by the API (e.g. `2025-05-29T21:04:00+0000`)
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Nested insights sub-selection
    #[serde(default)]
    pub insights: Option<InsightsBlock>,
}

/// Wrapper around the `insights` edge of a media item
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InsightsBlock {
    /// Metrics in the order the API returned them
    #[serde(default)]
    pub data: Vec<InsightMetric>,
}

/// A named engagement metric
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightMetric {
    /// Metric name (e.g. "reach", "likes")
    #[serde(default)]
    pub name: String,
    /// Metric values; only the first is ever read
    #[serde(default)]
    pub values: Vec<MetricValue>,
}

impl InsightMetric {
    /// First value as a number, if it is one
    pub fn first_value(&self) -> Option<&Number> {
        self.values.first().and_then(MetricValue::as_number)
    }
}

/// Metric value as the API may send it: a bare number or `{"value": n}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetricValue {
    /// `42`
    Bare(Number),
    /// `{"value": 42}`
    Wrapped {
        /// Wrapped payload; not guaranteed to be numeric
        value: serde_json::Value,
    },
    /// Anything else
    Other(serde_json::Value),
}

impl MetricValue {
    /// Numeric payload, unwrapping the object form
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            MetricValue::Bare(n) => Some(n),
            MetricValue::Wrapped {
                value: serde_json::Value::Number(n),
            } => Some(n),
            _ => None,
        }
    }
}

/// Account fields stamped onto every API row
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountInfo {
    /// Account ID
    #[serde(default)]
    pub id: Option<String>,
    /// Handle
    #[serde(default)]
    pub username: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

/// Untyped row read from an external CSV, keyed by header
pub type CsvRow = IndexMap<String, String>;

/// Canonical output row keyed by column name
pub type NormalizedRow = IndexMap<String, CellValue>;

/// One output cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CellValue {
    /// Explicitly blank
    #[default]
    Empty,
    /// Free text
    Text(String),
    /// Numeric metric, kept in the API's own representation
    Number(Number),
}

impl CellValue {
    /// Text cell from an optional value, blank when absent
    pub fn text<S: AsRef<str>>(value: Option<S>) -> Self {
        match value {
            Some(s) => CellValue::Text(s.as_ref().to_string()),
            None => CellValue::Empty,
        }
    }

    /// Numeric cell from an optional value, blank when absent
    pub fn number(value: Option<&Number>) -> Self {
        value.map_or(CellValue::Empty, |n| CellValue::Number(n.clone()))
    }

    /// True when the cell renders as an empty string
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}
