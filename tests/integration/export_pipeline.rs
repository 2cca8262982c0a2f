//! Integration tests for the export pipeline over a stub media source

use async_trait::async_trait;
use insights_exporter::config::ExportConfig;
use insights_exporter::fetcher::{FetcherError, FetcherResult, MediaSource};
use insights_exporter::input::csv::parse_csv;
use insights_exporter::normalize::PREFERRED_ORDER;
use insights_exporter::pipeline::{ExportPipeline, PipelineError};
use insights_exporter::{AccountInfo, MediaItem};
use std::path::Path;
use tempfile::TempDir;

struct StubSource {
    account: AccountInfo,
    media: Vec<MediaItem>,
}

#[async_trait]
impl MediaSource for StubSource {
    async fn fetch_account_info(&self) -> FetcherResult<AccountInfo> {
        Ok(self.account.clone())
    }

    async fn fetch_all_media_with_insights(&self) -> FetcherResult<Vec<MediaItem>> {
        Ok(self.media.clone())
    }
}

struct FailingSource;

#[async_trait]
impl MediaSource for FailingSource {
    async fn fetch_account_info(&self) -> FetcherResult<AccountInfo> {
        Err(FetcherError::Api {
            status: 400,
            code: Some(190),
            subcode: None,
            message: "Invalid OAuth access token".to_string(),
        })
    }

    async fn fetch_all_media_with_insights(&self) -> FetcherResult<Vec<MediaItem>> {
        Ok(Vec::new())
    }
}

fn stub_source() -> StubSource {
    let media = serde_json::from_value(serde_json::json!([
        {
            "id": "1001",
            "caption": "Spring drop",
            "media_type": "IMAGE",
            "permalink": "https://instagram.com/p/a",
            "timestamp": "2025-04-01T15:00:00+0000",
            "insights": { "data": [
                { "name": "reach", "values": [{ "value": 500 }] },
                { "name": "likes", "values": [{ "value": 42 }] },
                { "name": "plays", "values": [{ "value": 900 }] }
            ]}
        },
        {
            "id": "1002",
            "media_type": "VIDEO",
            "timestamp": "2025-03-01T15:00:00+0000"
        }
    ]))
    .unwrap();

    StubSource {
        account: AccountInfo {
            id: Some("42".to_string()),
            username: Some("brand".to_string()),
            name: None,
        },
        media,
    }
}

fn write_stories(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("stories.csv");
    std::fs::write(
        &path,
        "\u{feff}Post ID,Account username,Publish time,Views,Replies,Exits\n\
         9001,brand,5/29/25 5:04 PM,1300,4,7\n\
         9002,brand,not a date,800,,2\n",
    )
    .unwrap();
    path
}

fn config(dir: &Path, stories: &Path) -> ExportConfig {
    ExportConfig::new("tok")
        .with_account_id("42")
        .with_paths(stories, dir.join("out/merged.csv"))
}

#[tokio::test]
async fn test_export_merges_api_and_story_rows() {
    let dir = TempDir::new().unwrap();
    let stories = write_stories(dir.path());
    let config = config(dir.path(), &stories);
    let source = stub_source();

    let summary = ExportPipeline::new(&config, &source).run().await.unwrap();

    assert_eq!(summary.api_rows, 2);
    assert_eq!(summary.story_rows, 2);
    assert_eq!(summary.total_rows(), 4);
    assert_eq!(summary.headers, PREFERRED_ORDER.to_vec());

    let content = std::fs::read_to_string(&config.outfile).unwrap();
    let rows = parse_csv(&content).unwrap();
    assert_eq!(rows.len(), 4);

    // API rows first, stamped with account details
    assert_eq!(rows[0]["Source"], "API");
    assert_eq!(rows[0]["Post ID"], "1001");
    assert_eq!(rows[0]["Account ID"], "42");
    assert_eq!(rows[0]["Account username"], "brand");
    assert_eq!(rows[0]["Account name"], "");
    assert_eq!(rows[0]["Likes"], "42");
    assert_eq!(rows[0]["Views"], "900");
    assert_eq!(rows[0]["Replies"], "");
    assert_eq!(rows[1]["Likes"], "");

    // Story rows after, with repaired publish times
    assert_eq!(rows[2]["Source"], "Stories CSV");
    assert_eq!(rows[2]["Post ID"], "9001");
    assert_eq!(rows[2]["Publish time"], "2025-05-29T21:04:00.000Z");
    assert_eq!(rows[2]["Replies"], "4");
    assert_eq!(rows[2]["Impressions"], "");
    assert_eq!(rows[3]["Publish time"], "");
}

#[tokio::test]
async fn test_every_output_row_has_exactly_the_header_columns() {
    let dir = TempDir::new().unwrap();
    let stories = write_stories(dir.path());
    let config = config(dir.path(), &stories);
    let source = stub_source();

    let summary = ExportPipeline::new(&config, &source).run().await.unwrap();

    let content = std::fs::read_to_string(&config.outfile).unwrap();
    let mut reader = csv::ReaderBuilder::new().from_reader(content.as_bytes());
    let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(header, summary.headers);
    assert!(!header.contains(&"Exits".to_string()));

    for record in reader.records() {
        assert_eq!(record.unwrap().len(), header.len());
    }
}

#[tokio::test]
async fn test_missing_stories_file_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), &dir.path().join("absent.csv"));
    let source = stub_source();

    let result = ExportPipeline::new(&config, &source).run().await;

    assert!(matches!(result, Err(PipelineError::Input(_))));
    assert!(!config.outfile.exists());
}

#[tokio::test]
async fn test_fetch_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let stories = write_stories(dir.path());
    let config = config(dir.path(), &stories);

    let result = ExportPipeline::new(&config, &FailingSource).run().await;

    match result {
        Err(PipelineError::Fetcher(e)) => assert!(e.to_string().contains("HTTP 400")),
        other => panic!("expected fetcher error, got {other:?}"),
    }
    assert!(!config.outfile.exists());
}

#[tokio::test]
async fn test_empty_sources_still_write_file() {
    let dir = TempDir::new().unwrap();
    let stories = dir.path().join("stories.csv");
    std::fs::write(&stories, "Post ID,Views\n").unwrap();
    let config = config(dir.path(), &stories);
    let source = StubSource {
        account: AccountInfo::default(),
        media: Vec::new(),
    };

    let summary = ExportPipeline::new(&config, &source).run().await.unwrap();

    assert_eq!(summary.total_rows(), 0);
    assert!(summary.headers.is_empty());
    assert_eq!(std::fs::read_to_string(&config.outfile).unwrap(), "");
}
