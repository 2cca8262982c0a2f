//! Report command implementations

use clap::Args;
use std::path::PathBuf;

use super::{CliError, OutputFormat};
use crate::config::DEFAULT_OUTFILE;
use crate::report::{
    engagement_file, hashtag_file, overview_file, post_type_file, HashtagReport, Overview,
    PostTypeSummary,
};

/// Default number of posts kept by the engagement report
const DEFAULT_TOP: &str = "25";

/// Arguments for the overview report
#[derive(Args, Debug, Clone)]
pub struct OverviewArgs {
    /// Merged CSV to summarize
    #[arg(default_value = DEFAULT_OUTFILE)]
    pub input: PathBuf,

    /// Output format
    #[arg(long, default_value = "human")]
    pub output_format: OutputFormat,
}

impl OverviewArgs {
    /// Execute the overview report
    pub fn execute(&self) -> Result<Overview, CliError> {
        let summary = overview_file(&self.input)?;

        match self.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&summary)?;
                println!("{json}");
            }
            OutputFormat::Human => {
                println!("{:<22}{}", "Total Posts", summary.total_posts);
                for total in &summary.totals {
                    println!("{:<22}{}", format!("Total {}", total.metric), total.total);
                }
                if let Some(avg) = summary.average_reach {
                    println!("{:<22}{:.2}", "Average Reach", avg);
                }
            }
        }

        Ok(summary)
    }
}

/// Arguments for the engagement report
#[derive(Args, Debug, Clone)]
pub struct EngagementArgs {
    /// Merged CSV to rank
    #[arg(default_value = DEFAULT_OUTFILE)]
    pub input: PathBuf,

    /// Number of posts to keep
    #[arg(long, default_value = DEFAULT_TOP, value_parser = clap::value_parser!(u32).range(1..))]
    pub top: u32,

    /// Report destination
    #[arg(long, default_value = "engagement_top25.csv")]
    pub out: PathBuf,
}

impl EngagementArgs {
    /// Execute the engagement report
    pub fn execute(&self) -> Result<(), CliError> {
        let ranked = engagement_file(&self.input, &self.out, self.top as usize)?;

        let average = if ranked.is_empty() {
            0.0
        } else {
            ranked.iter().map(|e| e.rate).sum::<f64>() / ranked.len() as f64
        };
        println!(
            "Wrote top {} engagement posts to {} (average rate {:.2}%)",
            ranked.len(),
            self.out.display(),
            average
        );
        Ok(())
    }
}

/// Arguments for the post type comparison
#[derive(Args, Debug, Clone)]
pub struct PostTypesArgs {
    /// Merged CSV to group
    #[arg(default_value = DEFAULT_OUTFILE)]
    pub input: PathBuf,

    /// Report destination
    #[arg(long, default_value = "posttype_comparison.csv")]
    pub out: PathBuf,
}

impl PostTypesArgs {
    /// Execute the post type comparison
    pub fn execute(&self) -> Result<Vec<PostTypeSummary>, CliError> {
        let summary = post_type_file(&self.input, &self.out)?;

        println!("{:<16}{:>12}{:>18}{:>8}", "Post type", "Avg reach", "Avg engagement %", "Posts");
        for s in &summary {
            println!(
                "{:<16}{:>12.0}{:>18.2}{:>8}",
                s.post_type, s.average_reach, s.average_engagement_rate, s.posts
            );
        }
        Ok(summary)
    }
}

/// Arguments for the hashtag comparison
#[derive(Args, Debug, Clone)]
pub struct HashtagsArgs {
    /// Merged CSV to scan
    #[arg(default_value = DEFAULT_OUTFILE)]
    pub input: PathBuf,

    /// With/without hashtags comparison destination
    #[arg(long, default_value = "hashtag_summary.csv")]
    pub summary_out: PathBuf,

    /// Per-hashtag table destination
    #[arg(long, default_value = "top_hashtags.csv")]
    pub tags_out: PathBuf,

    /// Output format
    #[arg(long, default_value = "human")]
    pub output_format: OutputFormat,
}

impl HashtagsArgs {
    /// Execute the hashtag comparison
    pub fn execute(&self) -> Result<HashtagReport, CliError> {
        let report = hashtag_file(&self.input, &self.summary_out, &self.tags_out)?;

        match self.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Human => {
                for g in &report.groups {
                    println!(
                        "{:<14}{:>6} posts  {:>6.2}% engagement  {:>10.2} reach  {:>8.2} likes",
                        g.group, g.posts, g.average_engagement_rate, g.average_reach, g.average_likes
                    );
                }
                if report.hashtags.is_empty() {
                    println!("No hashtags found");
                }
                for t in report.hashtags.iter().take(10) {
                    println!("{:<24}{:>6.2}% ({} posts)", t.hashtag, t.average_engagement_rate, t.posts);
                }
            }
        }
        Ok(report)
    }
}
