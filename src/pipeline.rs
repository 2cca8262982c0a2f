//! Export orchestration
//!
//! Fetch account info → fetch media with insights → normalize → read and
//! normalize the story export → merge → union headers → write.

use tracing::info;

use crate::config::ExportConfig;
use crate::fetcher::{FetcherError, MediaSource};
use crate::input::{read_stories_csv, InputError};
use crate::normalize::{normalize_api_row, normalize_story_row, union_headers};
use crate::output::{write_csv, OutputError};
use crate::NormalizedRow;

/// Pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Graph API failure
    #[error("fetch failed: {0}")]
    Fetcher(#[from] FetcherError),

    /// Story export could not be read
    #[error("input failed: {0}")]
    Input(#[from] InputError),

    /// Merged report could not be written
    #[error("output failed: {0}")]
    Output(#[from] OutputError),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Row counts of a finished export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Rows built from Graph API media
    pub api_rows: usize,
    /// Rows built from the story export
    pub story_rows: usize,
    /// Header written to the merged report
    pub headers: Vec<String>,
}

impl ExportSummary {
    /// Rows in the merged report
    pub fn total_rows(&self) -> usize {
        self.api_rows + self.story_rows
    }
}

/// One export run over a media source
pub struct ExportPipeline<'a, S: MediaSource + ?Sized> {
    config: &'a ExportConfig,
    source: &'a S,
}

impl<'a, S: MediaSource + ?Sized> ExportPipeline<'a, S> {
    /// Create a pipeline for `config`, reading media from `source`
    pub fn new(config: &'a ExportConfig, source: &'a S) -> Self {
        Self { config, source }
    }

    /// Fetch and normalize API rows
    pub async fn api_rows(&self) -> PipelineResult<Vec<NormalizedRow>> {
        info!("Reading IG account info...");
        let account = self.source.fetch_account_info().await?;
        let username = account.username.unwrap_or_default();
        let account_name = account.name.unwrap_or_default();

        info!("Fetching ALL media with insights (auto-pagination)...");
        let media = self.source.fetch_all_media_with_insights().await?;
        info!("Fetched {} media items", media.len());

        Ok(media
            .iter()
            .map(|item| normalize_api_row(item, &self.config.account_id, &username, &account_name))
            .collect())
    }

    /// Read and normalize story rows
    pub fn story_rows(&self) -> PipelineResult<Vec<NormalizedRow>> {
        info!("Reading stories CSV: {}", self.config.stories_csv.display());
        let stories = read_stories_csv(&self.config.stories_csv)?;
        Ok(stories.iter().map(normalize_story_row).collect())
    }

    /// Run the export end to end
    ///
    /// Nothing is written unless both sources load successfully.
    pub async fn run(&self) -> PipelineResult<ExportSummary> {
        let mut merged = self.api_rows().await?;
        let api_rows = merged.len();

        let story_rows = self.story_rows()?;
        let story_count = story_rows.len();
        merged.extend(story_rows);

        let headers = union_headers(&merged);

        info!("Writing merged CSV -> {}", self.config.outfile.display());
        write_csv(&self.config.outfile, &merged, &headers)?;

        info!("Done. Wrote {} rows", merged.len());

        Ok(ExportSummary {
            api_rows,
            story_rows: story_count,
            headers,
        })
    }
}
