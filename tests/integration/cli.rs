//! End-to-end tests for the insights-exporter binary

use assert_cmd::Command;
use insights_exporter::normalize::PREFERRED_ORDER;
use mockito::{Matcher, Server};
use tempfile::TempDir;

const ENV_VARS: [&str; 8] = [
    "RUST_LOG",
    "LOG_FORMAT",
    "META_SYSTEM_USER_TOKEN",
    "IG_USER_ID",
    "GRAPH_VERSION",
    "GRAPH_API_ROOT",
    "STORIES_CSV",
    "OUTFILE",
];

fn exporter() -> Command {
    let mut cmd = Command::cargo_bin("insights-exporter").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_missing_token_fails_before_network() {
    let temp_dir = TempDir::new().unwrap();

    let output = exporter()
        .current_dir(temp_dir.path())
        .args(["--api-root", "http://127.0.0.1:9"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("META_SYSTEM_USER_TOKEN"), "stderr: {stderr}");
    assert!(!temp_dir.path().join("merged.csv").exists());
}

#[test]
fn test_export_end_to_end() {
    let mut server = Server::new();
    let account = server
        .mock("GET", "/v21.0/42")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"42","username":"brand","name":"Brand Inc"}"#)
        .expect(1)
        .create();
    let media = server
        .mock("GET", "/v21.0/42/media")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "data": [{
                    "id": "1001",
                    "caption": "Hello",
                    "media_type": "IMAGE",
                    "timestamp": "2025-04-01T15:00:00+0000",
                    "insights": { "data": [{ "name": "likes", "values": [{ "value": 7 }] }] }
                }]
            })
            .to_string(),
        )
        .expect(1)
        .create();

    let temp_dir = TempDir::new().unwrap();
    let stories = temp_dir.path().join("stories.csv");
    let outfile = temp_dir.path().join("merged.csv");
    std::fs::write(&stories, "Post ID,Publish time,Views\n9001,5/29/25 5:04 PM,1300\n").unwrap();

    exporter()
        .args([
            "export",
            "--access-token",
            "tok",
            "--account-id",
            "42",
            "--api-root",
            &server.url(),
            "--stories-csv",
            stories.to_str().unwrap(),
            "--outfile",
            outfile.to_str().unwrap(),
        ])
        .assert()
        .success();

    account.assert();
    media.assert();

    let content = std::fs::read_to_string(&outfile).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next().unwrap(), PREFERRED_ORDER.join(","));
    assert!(lines.next().unwrap().starts_with("API,1001,42,brand,Brand Inc,Hello,"));
    assert!(lines
        .next()
        .unwrap()
        .starts_with("Stories CSV,9001,,,,,,2025-05-29T21:04:00.000Z,"));
    assert!(lines.next().is_none());
}

#[test]
fn test_export_fails_on_auth_error() {
    let mut server = Server::new();
    let _account = server
        .mock("GET", "/v21.0/42")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error":{"message":"Invalid OAuth access token","code":190}}"#)
        .create();

    let temp_dir = TempDir::new().unwrap();

    exporter()
        .current_dir(temp_dir.path())
        .args(["--access-token", "bad", "--account-id", "42", "--api-root", &server.url()])
        .assert()
        .failure()
        .code(1);

    assert!(!temp_dir.path().join("merged.csv").exists());
}

#[test]
fn test_overview_json() {
    let temp_dir = TempDir::new().unwrap();
    let merged = temp_dir.path().join("merged.csv");
    std::fs::write(&merged, "Source,Reach,Likes\nAPI,100,5\nStories CSV,300,\n").unwrap();

    let output = exporter()
        .args(["overview", merged.to_str().unwrap(), "--output-format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["total_posts"], 2);
    assert_eq!(summary["average_reach"], 200.0);
    assert_eq!(summary["totals"][1]["metric"], "Likes");
    assert_eq!(summary["totals"][1]["total"], 5.0);
}

#[test]
fn test_engagement_report() {
    let temp_dir = TempDir::new().unwrap();
    let merged = temp_dir.path().join("merged.csv");
    let out = temp_dir.path().join("top.csv");
    std::fs::write(
        &merged,
        "Post ID,Reach,Likes,Comments\na,100,10,0\nb,100,30,5\nc,0,10,0\n",
    )
    .unwrap();

    exporter()
        .args([
            "engagement",
            merged.to_str().unwrap(),
            "--top",
            "5",
            "--out",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();

    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        content,
        "Reach,Likes,Comments,Engagement rate\n100,30,5,35.00\n100,10,0,10.00\n"
    );
}

#[test]
fn test_post_types_report() {
    let temp_dir = TempDir::new().unwrap();
    let merged = temp_dir.path().join("merged.csv");
    let out = temp_dir.path().join("types.csv");
    std::fs::write(
        &merged,
        "Post type,Reach,Likes\nIMAGE,100,10\nREELS,100,30\nIMAGE,300,6\n",
    )
    .unwrap();

    exporter()
        .args(["post-types", merged.to_str().unwrap(), "--out", out.to_str().unwrap()])
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "Post type,Average reach,Average engagement rate,Posts\nREELS,100,30.00,1\nIMAGE,200,6.00,2\n"
    );
}

#[test]
fn test_hashtags_report() {
    let temp_dir = TempDir::new().unwrap();
    let merged = temp_dir.path().join("merged.csv");
    let summary = temp_dir.path().join("summary.csv");
    let tags = temp_dir.path().join("tags.csv");
    std::fs::write(
        &merged,
        "Description,Reach,Likes\n#Launch day,100,20\nquiet post,100,10\n",
    )
    .unwrap();

    let output = exporter()
        .args([
            "hashtags",
            merged.to_str().unwrap(),
            "--summary-out",
            summary.to_str().unwrap(),
            "--tags-out",
            tags.to_str().unwrap(),
            "--output-format",
            "json",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["hashtags"][0]["hashtag"], "#launch");
    assert_eq!(
        std::fs::read_to_string(&tags).unwrap(),
        "Hashtag,Posts,Average engagement rate,Average reach,Average likes\n#launch,1,20.00,100.00,20.00\n"
    );
    let summary = std::fs::read_to_string(&summary).unwrap();
    assert!(summary.contains("No hashtags,1,10.00,100.00,10.00,0.00"));
    assert!(summary.contains("Has hashtags,1,20.00,100.00,20.00,1.00"));
}
