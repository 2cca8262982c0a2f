//! Export command implementation

use clap::Args;
use std::path::PathBuf;
use tracing::info;

use super::{CliError, OutputFormat};
use crate::config::{
    ExportConfig, DEFAULT_ACCOUNT_ID, DEFAULT_API_ROOT, DEFAULT_API_VERSION, DEFAULT_OUTFILE,
    DEFAULT_STORIES_CSV,
};
use crate::fetcher::graph_api::GraphFetcher;
use crate::pipeline::{ExportPipeline, ExportSummary};

/// Environment variable holding the access token
pub const TOKEN_ENV: &str = "META_SYSTEM_USER_TOKEN";

/// Arguments for an export run
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// System user access token
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    pub access_token: Option<String>,

    /// Instagram business account ID
    #[arg(long, env = "IG_USER_ID", default_value = DEFAULT_ACCOUNT_ID)]
    pub account_id: String,

    /// Graph API version
    #[arg(long, env = "GRAPH_VERSION", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Graph API root URL
    #[arg(long, env = "GRAPH_API_ROOT", default_value = DEFAULT_API_ROOT)]
    pub api_root: String,

    /// Expired stories CSV export
    #[arg(long, env = "STORIES_CSV", default_value = DEFAULT_STORIES_CSV)]
    pub stories_csv: PathBuf,

    /// Merged report path
    #[arg(long, env = "OUTFILE", default_value = DEFAULT_OUTFILE)]
    pub outfile: PathBuf,

    /// Summary output format
    #[arg(long, default_value = "human")]
    pub output_format: OutputFormat,
}

impl ExportArgs {
    /// Build the run configuration; fails without an access token
    pub fn to_config(&self) -> Result<ExportConfig, CliError> {
        let token = self
            .access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                CliError::ConfigurationError(format!("Missing required env var: {TOKEN_ENV}"))
            })?;

        Ok(ExportConfig::new(token)
            .with_account_id(self.account_id.clone())
            .with_api_version(self.api_version.clone())
            .with_api_root(self.api_root.clone())
            .with_paths(self.stories_csv.clone(), self.outfile.clone()))
    }

    /// Execute the export
    pub async fn execute(&self) -> Result<ExportSummary, CliError> {
        let config = self.to_config()?;
        info!(
            "Exporting account {} via Graph API {}",
            config.account_id, config.api_version
        );

        let fetcher = GraphFetcher::new(&config)?;
        let summary = ExportPipeline::new(&config, &fetcher).run().await?;

        match self.output_format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({
                    "outfile": config.outfile.display().to_string(),
                    "api_rows": summary.api_rows,
                    "story_rows": summary.story_rows,
                    "total_rows": summary.total_rows(),
                    "columns": summary.headers,
                })
            ),
            OutputFormat::Human => println!(
                "Wrote {} rows ({} API, {} stories) to {}",
                summary.total_rows(),
                summary.api_rows,
                summary.story_rows,
                config.outfile.display()
            ),
        }

        Ok(summary)
    }
}
