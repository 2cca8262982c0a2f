//! Export configuration and tuning constants

use chrono::{DateTime, Months, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// Default Instagram business account queried when none is supplied
pub const DEFAULT_ACCOUNT_ID: &str = "17841400539558029";

/// Default Graph API version segment
pub const DEFAULT_API_VERSION: &str = "v21.0";

/// Default Graph API host
pub const DEFAULT_API_ROOT: &str = "https://graph.facebook.com";

/// Default path of the expired stories export
pub const DEFAULT_STORIES_CSV: &str = "stories.csv";

/// Default path of the merged report
pub const DEFAULT_OUTFILE: &str = "merged.csv";

/// Base delay for rate-limit backoff, in milliseconds.
/// Attempt `n` waits `BACKOFF_BASE_MS * n²`, so five retries wait 27.5s in total.
pub const BACKOFF_BASE_MS: u64 = 500;

/// Maximum number of retries after a rate-limited response
pub const MAX_RETRIES: u32 = 5;

/// Pause between consecutive page requests, in milliseconds
pub const PAGE_PAUSE_MS: u64 = 150;

/// Page size requested from the media edge
pub const PAGE_LIMIT: u32 = 100;

/// Media older than this many months stops pagination
pub const LOOKBACK_MONTHS: u32 = 36;

/// Calculate quadratic backoff delay for a 1-based attempt number
pub fn calculate_backoff(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(attempt.saturating_mul(attempt))
}

/// `now` minus a whole number of calendar months
pub fn lookback_cutoff(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Everything one export run needs, built once at startup
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Pre-obtained system user access token
    pub access_token: String,
    /// Account whose media is exported
    pub account_id: String,
    /// Graph API version segment (e.g. "v21.0")
    pub api_version: String,
    /// Scheme and host of the Graph API
    pub api_root: String,
    /// Expired stories CSV to merge in
    pub stories_csv: PathBuf,
    /// Merged report destination
    pub outfile: PathBuf,
    /// Backoff base for rate-limit retries
    pub backoff_base: Duration,
    /// Retries after the first rate-limited attempt
    pub max_retries: u32,
    /// Pause between page requests
    pub page_pause: Duration,
    /// Page size for the media edge
    pub page_limit: u32,
    /// Lookback window in months
    pub lookback_months: u32,
}

impl ExportConfig {
    /// Configuration with every optional setting at its default
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            api_root: DEFAULT_API_ROOT.to_string(),
            stories_csv: PathBuf::from(DEFAULT_STORIES_CSV),
            outfile: PathBuf::from(DEFAULT_OUTFILE),
            backoff_base: Duration::from_millis(BACKOFF_BASE_MS),
            max_retries: MAX_RETRIES,
            page_pause: Duration::from_millis(PAGE_PAUSE_MS),
            page_limit: PAGE_LIMIT,
            lookback_months: LOOKBACK_MONTHS,
        }
    }

    /// Builder-style account override
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    /// Builder-style API root override
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder-style API version override
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Builder-style input/output path override
    pub fn with_paths(mut self, stories_csv: impl Into<PathBuf>, outfile: impl Into<PathBuf>) -> Self {
        self.stories_csv = stories_csv.into();
        self.outfile = outfile.into();
        self
    }

    /// Builder-style retry tuning override
    pub fn with_retry(mut self, backoff_base: Duration, max_retries: u32) -> Self {
        self.backoff_base = backoff_base;
        self.max_retries = max_retries;
        self
    }

    /// Builder-style page pause override
    pub fn with_page_pause(mut self, page_pause: Duration) -> Self {
        self.page_pause = page_pause;
        self
    }

    /// Base URL for a node, optionally followed by an edge
    ///
    /// `{api_root}/{api_version}/{account_id}[/{edge}]`
    pub fn node_url(&self, edge: Option<&str>) -> String {
        let mut url = format!("{}/{}/{}", self.api_root, self.api_version, self.account_id);
        if let Some(edge) = edge {
            url.push('/');
            url.push_str(edge);
        }
        url
    }

    /// Oldest publish time still worth paginating towards
    pub fn cutoff_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        lookback_cutoff(now, self.lookback_months)
    }
}
