//! CLI command implementations

pub mod error;
pub mod export;
pub mod report;

pub use error::CliError;
pub use export::ExportArgs;
pub use report::{EngagementArgs, HashtagsArgs, OverviewArgs, PostTypesArgs};

use clap::{Parser, Subcommand, ValueEnum};

/// Insights exporter CLI
///
/// Runs `export` when no subcommand is given.
#[derive(Parser, Debug)]
#[command(name = "insights-exporter")]
#[command(about = "Export Instagram media insights merged with expired stories into one CSV", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Export arguments when no subcommand is given
    #[command(flatten)]
    pub export: ExportArgs,
}

impl Cli {
    /// Subcommand to run, defaulting to `export`
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Export(self.export))
    }
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch media and insights, merge the stories export, write the report
    Export(ExportArgs),

    /// Summarize totals in a merged CSV
    Overview(OverviewArgs),

    /// Rank posts in a merged CSV by engagement rate
    Engagement(EngagementArgs),

    /// Compare average reach and engagement rate per post type
    PostTypes(PostTypesArgs),

    /// Compare posts with and without hashtags
    Hashtags(HashtagsArgs),
}

/// Output format for command summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
