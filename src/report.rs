//! Reports over a merged CSV
//!
//! - Overview: row count, per-metric totals, average reach
//! - Engagement: top posts by (likes + comments + shares + saves) / reach
//! - Post types: average reach and engagement rate per media type
//! - Hashtags: posts with and without hashtags, and per-hashtag averages

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::path::Path;
use std::sync::LazyLock;
use tracing::info;

use crate::input::{read_csv, InputError};
use crate::normalize::schema::{
    COMMENTS, DESCRIPTION, IMPRESSIONS, LIKES, MEDIA_URL, PERMALINK, POST_TYPE, PUBLISH_TIME,
    REACH, SAVES, SHARES, TOTAL_INTERACTIONS, VIEWS,
};
use crate::output::{write_csv, OutputError};
use crate::{CellValue, CsvRow, NormalizedRow};

/// Metric columns totalled by the overview
const OVERVIEW_METRICS: [&str; 8] = [
    REACH,
    LIKES,
    COMMENTS,
    SHARES,
    SAVES,
    TOTAL_INTERACTIONS,
    VIEWS,
    IMPRESSIONS,
];

/// Rates above this are treated as bad data
const MAX_ENGAGEMENT_RATE: f64 = 99.99;

/// Column appended by the engagement report
pub const ENGAGEMENT_RATE: &str = "Engagement rate";

/// Columns carried into the engagement report, when present
const ENGAGEMENT_COLUMNS: [&str; 9] = [
    PUBLISH_TIME,
    DESCRIPTION,
    REACH,
    LIKES,
    COMMENTS,
    SHARES,
    SAVES,
    MEDIA_URL,
    PERMALINK,
];

/// Header of the post type report
const POST_TYPE_COLUMNS: [&str; 4] = [POST_TYPE, "Average reach", "Average engagement rate", "Posts"];

/// Header of the hashtag comparison
const HASHTAG_SUMMARY_COLUMNS: [&str; 6] = [
    "Group",
    "Posts",
    "Average engagement rate",
    "Average reach",
    "Average likes",
    "Average hashtags",
];

/// Header of the per-hashtag report
const HASHTAG_COLUMNS: [&str; 5] = [
    "Hashtag",
    "Posts",
    "Average engagement rate",
    "Average reach",
    "Average likes",
];

/// Regex for hashtags in lowercased captions
static HASHTAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("hashtag regex should compile"));

/// Report errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Merged CSV could not be read
    #[error("input failed: {0}")]
    Input(#[from] InputError),

    /// Report could not be written
    #[error("output failed: {0}")]
    Output(#[from] OutputError),

    /// A column the report groups by is absent
    #[error("column '{0}' not found in input")]
    MissingColumn(String),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Coerce a cell to a number; blanks and text count as zero
pub fn numeric(row: &CsvRow, column: &str) -> f64 {
    row.get(column)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Total of one metric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTotal {
    /// Column name
    pub metric: String,
    /// Sum over all rows
    pub total: f64,
}

/// Summary of a merged CSV
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    /// Rows in the file
    pub total_posts: usize,
    /// Totals for metric columns present in the file
    pub totals: Vec<MetricTotal>,
    /// Mean reach per row, when the file has a Reach column
    pub average_reach: Option<f64>,
}

/// Summarize rows of a merged CSV
pub fn overview(rows: &[CsvRow]) -> Overview {
    let has_column = |column: &str| rows.iter().any(|row| row.contains_key(column));

    let totals: Vec<MetricTotal> = OVERVIEW_METRICS
        .iter()
        .filter(|metric| has_column(**metric))
        .map(|metric| MetricTotal {
            metric: metric.to_string(),
            total: rows.iter().map(|row| numeric(row, metric)).sum(),
        })
        .collect();

    let average_reach = totals
        .iter()
        .find(|t| t.metric == REACH)
        .filter(|_| !rows.is_empty())
        .map(|t| t.total / rows.len() as f64);

    Overview {
        total_posts: rows.len(),
        totals,
        average_reach,
    }
}

/// Read a merged CSV and summarize it
pub fn overview_file<P: AsRef<Path>>(path: P) -> ReportResult<Overview> {
    let rows = read_csv(path)?;
    Ok(overview(&rows))
}

/// One ranked post
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementEntry {
    /// Source row
    pub row: CsvRow,
    /// (likes + comments + shares + saves) / reach × 100
    pub rate: f64,
}

/// Engagement rate of a row, if it has positive reach
pub fn engagement_rate(row: &CsvRow) -> Option<f64> {
    let reach = numeric(row, REACH);
    if reach == 0.0 {
        return None;
    }
    let engagements = [LIKES, COMMENTS, SHARES, SAVES]
        .iter()
        .map(|c| numeric(row, c))
        .sum::<f64>();
    Some(engagements / reach * 100.0)
}

/// Rows with a usable engagement rate, paired with that rate
///
/// Rows without reach, or with a rate outside `0..=99.99`, are dropped.
pub fn rated_rows<'a>(rows: &'a [CsvRow]) -> impl Iterator<Item = (&'a CsvRow, f64)> + 'a {
    rows.iter().filter_map(|row| {
        engagement_rate(row)
            .filter(|rate| (0.0..=MAX_ENGAGEMENT_RATE).contains(rate))
            .map(|rate| (row, rate))
    })
}

/// Rank rows by engagement rate, highest first, keeping `top`
pub fn top_engagement(rows: &[CsvRow], top: usize) -> Vec<EngagementEntry> {
    let mut ranked: Vec<EngagementEntry> = rated_rows(rows)
        .map(|(row, rate)| EngagementEntry {
            row: row.clone(),
            rate,
        })
        .collect();

    ranked.sort_by(|a, b| b.rate.partial_cmp(&a.rate).unwrap_or(Ordering::Equal));
    ranked.truncate(top);
    ranked
}

/// Read a merged CSV, rank it, and write the top rows to `out`
///
/// # Returns
/// The ranked entries that were written
pub fn engagement_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    out: Q,
    top: usize,
) -> ReportResult<Vec<EngagementEntry>> {
    let rows = read_csv(input)?;
    let ranked = top_engagement(&rows, top);

    let mut headers: Vec<String> = ENGAGEMENT_COLUMNS
        .iter()
        .filter(|c| rows.iter().any(|row| row.contains_key(**c)))
        .map(|c| c.to_string())
        .collect();
    headers.push(ENGAGEMENT_RATE.to_string());

    let report_rows: Vec<NormalizedRow> = ranked
        .iter()
        .map(|entry| {
            let mut report_row: NormalizedRow = entry
                .row
                .iter()
                .map(|(k, v)| (k.clone(), CellValue::from(v.as_str())))
                .collect();
            report_row.insert(
                ENGAGEMENT_RATE.to_string(),
                CellValue::Text(format!("{:.2}", entry.rate)),
            );
            report_row
        })
        .collect();

    write_csv(&out, &report_rows, &headers)?;
    info!(
        "Wrote top {} engagement posts -> {}",
        ranked.len(),
        out.as_ref().display()
    );
    Ok(ranked)
}

/// Running sums for per-group averages
#[derive(Debug, Default, Clone, Copy)]
struct Averages {
    posts: usize,
    rate: f64,
    reach: f64,
    likes: f64,
    hashtags: f64,
}

impl Averages {
    fn add(&mut self, row: &CsvRow, rate: f64, hashtags: usize) {
        self.posts += 1;
        self.rate += rate;
        self.reach += numeric(row, REACH);
        self.likes += numeric(row, LIKES);
        self.hashtags += hashtags as f64;
    }

    fn mean(&self, total: f64) -> f64 {
        if self.posts == 0 {
            0.0
        } else {
            total / self.posts as f64
        }
    }
}

fn by_rate_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn text_row(cells: impl IntoIterator<Item = (&'static str, String)>) -> NormalizedRow {
    cells
        .into_iter()
        .map(|(k, v)| (k.to_string(), CellValue::Text(v)))
        .collect()
}

fn header_list(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

/// Averages for one media type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostTypeSummary {
    /// Value of the `Post type` column
    pub post_type: String,
    /// Posts of this type with a usable rate
    pub posts: usize,
    /// Mean reach
    pub average_reach: f64,
    /// Mean engagement rate, in percent
    pub average_engagement_rate: f64,
}

/// Group rated rows by `Post type`, best average rate first
///
/// Rows with a blank post type are left out.
pub fn post_type_summary(rows: &[CsvRow]) -> Vec<PostTypeSummary> {
    let mut groups: IndexMap<&str, Averages> = IndexMap::new();
    for (row, rate) in rated_rows(rows) {
        let Some(post_type) = row.get(POST_TYPE).map(|v| v.trim()).filter(|v| !v.is_empty())
        else {
            continue;
        };
        groups.entry(post_type).or_default().add(row, rate, 0);
    }

    let mut summary: Vec<PostTypeSummary> = groups
        .into_iter()
        .map(|(post_type, sums)| PostTypeSummary {
            post_type: post_type.to_string(),
            posts: sums.posts,
            average_reach: sums.mean(sums.reach),
            average_engagement_rate: sums.mean(sums.rate),
        })
        .collect();

    summary.sort_by(|a, b| by_rate_desc(a.average_engagement_rate, b.average_engagement_rate));
    summary
}

/// Read a merged CSV and write the post type comparison to `out`
pub fn post_type_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    out: Q,
) -> ReportResult<Vec<PostTypeSummary>> {
    let rows = read_csv(input)?;
    if !rows.is_empty() && !rows.iter().any(|row| row.contains_key(POST_TYPE)) {
        return Err(ReportError::MissingColumn(POST_TYPE.to_string()));
    }

    let summary = post_type_summary(&rows);
    let report_rows: Vec<NormalizedRow> = summary
        .iter()
        .map(|s| {
            text_row([
                (POST_TYPE_COLUMNS[0], s.post_type.clone()),
                (POST_TYPE_COLUMNS[1], format!("{:.0}", s.average_reach)),
                (POST_TYPE_COLUMNS[2], format!("{:.2}", s.average_engagement_rate)),
                (POST_TYPE_COLUMNS[3], s.posts.to_string()),
            ])
        })
        .collect();

    write_csv(&out, &report_rows, &header_list(&POST_TYPE_COLUMNS))?;
    info!(
        "Wrote {} post types -> {}",
        summary.len(),
        out.as_ref().display()
    );
    Ok(summary)
}

/// Lowercased hashtags of a caption, repeats included
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_REGEX
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Averages for posts with or without hashtags
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashtagGroup {
    /// "No hashtags" or "Has hashtags"
    pub group: String,
    /// Posts in the group
    pub posts: usize,
    /// Mean engagement rate, in percent
    pub average_engagement_rate: f64,
    /// Mean reach
    pub average_reach: f64,
    /// Mean likes
    pub average_likes: f64,
    /// Mean number of hashtags per caption
    pub average_hashtags: f64,
}

/// Averages over the posts using one hashtag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashtagStat {
    /// Lowercased hashtag, with its `#`
    pub hashtag: String,
    /// Uses of the hashtag
    pub posts: usize,
    /// Mean engagement rate, in percent
    pub average_engagement_rate: f64,
    /// Mean reach
    pub average_reach: f64,
    /// Mean likes
    pub average_likes: f64,
}

/// Hashtag comparison of a merged CSV
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashtagReport {
    /// Posts without hashtags, then posts with them; empty groups omitted
    pub groups: Vec<HashtagGroup>,
    /// Per-hashtag averages, best rate first
    pub hashtags: Vec<HashtagStat>,
}

/// Compare rated rows by their caption hashtags
pub fn hashtag_report(rows: &[CsvRow]) -> HashtagReport {
    let mut without = Averages::default();
    let mut with = Averages::default();
    let mut tags: IndexMap<String, Averages> = IndexMap::new();

    for (row, rate) in rated_rows(rows) {
        let found = row
            .get(DESCRIPTION)
            .map(|caption| extract_hashtags(caption))
            .unwrap_or_default();

        if found.is_empty() {
            without.add(row, rate, 0);
        } else {
            with.add(row, rate, found.len());
        }
        for tag in found {
            tags.entry(tag).or_default().add(row, rate, 0);
        }
    }

    let groups = [("No hashtags", without), ("Has hashtags", with)]
        .into_iter()
        .filter(|(_, sums)| sums.posts > 0)
        .map(|(group, sums)| HashtagGroup {
            group: group.to_string(),
            posts: sums.posts,
            average_engagement_rate: sums.mean(sums.rate),
            average_reach: sums.mean(sums.reach),
            average_likes: sums.mean(sums.likes),
            average_hashtags: sums.mean(sums.hashtags),
        })
        .collect();

    let mut hashtags: Vec<HashtagStat> = tags
        .into_iter()
        .map(|(hashtag, sums)| HashtagStat {
            hashtag,
            posts: sums.posts,
            average_engagement_rate: sums.mean(sums.rate),
            average_reach: sums.mean(sums.reach),
            average_likes: sums.mean(sums.likes),
        })
        .collect();
    hashtags.sort_by(|a, b| by_rate_desc(a.average_engagement_rate, b.average_engagement_rate));

    HashtagReport { groups, hashtags }
}

/// Read a merged CSV and write the hashtag comparison and per-hashtag table
pub fn hashtag_file<P: AsRef<Path>, Q: AsRef<Path>, R: AsRef<Path>>(
    input: P,
    summary_out: Q,
    tags_out: R,
) -> ReportResult<HashtagReport> {
    let rows = read_csv(input)?;
    let report = hashtag_report(&rows);

    let summary_rows: Vec<NormalizedRow> = report
        .groups
        .iter()
        .map(|g| {
            text_row([
                (HASHTAG_SUMMARY_COLUMNS[0], g.group.clone()),
                (HASHTAG_SUMMARY_COLUMNS[1], g.posts.to_string()),
                (HASHTAG_SUMMARY_COLUMNS[2], format!("{:.2}", g.average_engagement_rate)),
                (HASHTAG_SUMMARY_COLUMNS[3], format!("{:.2}", g.average_reach)),
                (HASHTAG_SUMMARY_COLUMNS[4], format!("{:.2}", g.average_likes)),
                (HASHTAG_SUMMARY_COLUMNS[5], format!("{:.2}", g.average_hashtags)),
            ])
        })
        .collect();
    write_csv(&summary_out, &summary_rows, &header_list(&HASHTAG_SUMMARY_COLUMNS))?;

    let tag_rows: Vec<NormalizedRow> = report
        .hashtags
        .iter()
        .map(|t| {
            text_row([
                (HASHTAG_COLUMNS[0], t.hashtag.clone()),
                (HASHTAG_COLUMNS[1], t.posts.to_string()),
                (HASHTAG_COLUMNS[2], format!("{:.2}", t.average_engagement_rate)),
                (HASHTAG_COLUMNS[3], format!("{:.2}", t.average_reach)),
                (HASHTAG_COLUMNS[4], format!("{:.2}", t.average_likes)),
            ])
        })
        .collect();
    write_csv(&tags_out, &tag_rows, &header_list(&HASHTAG_COLUMNS))?;

    info!(
        "Wrote hashtag summary -> {}, {} hashtags -> {}",
        summary_out.as_ref().display(),
        report.hashtags.len(),
        tags_out.as_ref().display()
    );
    Ok(report)
}
