//! End-to-end tests for the BigID audit-log pass
//!
//! These tests validate checkpointed resumption against a mock
//! instance:
//! - Full emission on a first run
//! - At-most-once re-indexing across consecutive runs
//! - Full re-emission when the checkpoint is absent from the log
//! - Fatal audit-log fetch failures

use pdc_collector::bigid::checkpoint::CheckpointFile;
use pdc_collector::bigid::{self, SOURCETYPE_AUDIT};
use pdc_collector::config::BigIdConfig;
use pdc_collector::secrets::MemorySecretStore;
use pdc_collector::sink::MemorySink;
use pdc_common::hash::line_digest;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to run one audit-log pass against a mock serving `body`
async fn run_once(state_dir: &Path, body: &str) -> MemorySink {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/audit-log"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let config = BigIdConfig {
        base_url: server.uri(),
        api_token: "test-token".to_string(),
        state_dir: state_dir.to_path_buf(),
    };

    let mut store = MemorySecretStore::new();
    let mut sink = MemorySink::new();
    bigid::run(&config, &mut store, &mut sink).await.unwrap();
    sink
}

fn emitted_lines(sink: &MemorySink) -> Vec<String> {
    sink.with_sourcetype(SOURCETYPE_AUDIT)
        .iter()
        .map(|e| e.event.as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_first_run_emits_entire_log() {
    let state = TempDir::new().unwrap();

    let sink = run_once(state.path(), "l1\nl2\nl3\n").await;

    assert_eq!(emitted_lines(&sink), vec!["l1", "l2", "l3"]);

    // The digest of the last emitted line is checkpointed
    let cp = CheckpointFile::new(state.path());
    assert_eq!(cp.load().unwrap(), Some(line_digest("l3")));
}

#[tokio::test]
async fn test_consecutive_runs_emit_each_line_exactly_once() {
    let state = TempDir::new().unwrap();

    let first = run_once(state.path(), "l1\nl2\nl3\n").await;
    let second = run_once(state.path(), "l1\nl2\nl3\nl4\nl5\n").await;

    assert_eq!(emitted_lines(&first), vec!["l1", "l2", "l3"]);
    assert_eq!(emitted_lines(&second), vec!["l4", "l5"]);
}

#[tokio::test]
async fn test_unchanged_log_emits_nothing() {
    let state = TempDir::new().unwrap();

    run_once(state.path(), "l1\nl2\n").await;
    let second = run_once(state.path(), "l1\nl2\n").await;

    assert!(emitted_lines(&second).is_empty());

    // Checkpoint is untouched when nothing was emitted
    let cp = CheckpointFile::new(state.path());
    assert_eq!(cp.load().unwrap(), Some(line_digest("l2")));
}

#[tokio::test]
async fn test_checkpoint_absent_from_log_re_emits_everything() {
    let state = TempDir::new().unwrap();

    // Simulate rotation: the checkpointed line no longer appears
    let cp = CheckpointFile::new(state.path());
    cp.record(&line_digest("rotated away")).unwrap();

    let sink = run_once(state.path(), "n1\nn2\n").await;

    assert_eq!(emitted_lines(&sink), vec!["n1", "n2"]);
    assert_eq!(cp.load().unwrap(), Some(line_digest("n2")));
}

#[tokio::test]
async fn test_blank_lines_are_not_emitted() {
    let state = TempDir::new().unwrap();

    let sink = run_once(state.path(), "l1\n\n   \nl2\n").await;

    assert_eq!(emitted_lines(&sink), vec!["l1", "l2"]);
}

#[tokio::test]
async fn test_failed_audit_log_fetch_aborts_the_run() {
    let state = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/audit-log"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = BigIdConfig {
        base_url: server.uri(),
        api_token: "test-token".to_string(),
        state_dir: state.path().to_path_buf(),
    };

    let mut store = MemorySecretStore::new();
    let mut sink = MemorySink::new();
    let result = bigid::run(&config, &mut store, &mut sink).await;

    assert!(result.is_err());
    assert!(sink.events.is_empty());

    // No checkpoint is written on a failed run
    let cp = CheckpointFile::new(state.path());
    assert_eq!(cp.load().unwrap(), None);
}
