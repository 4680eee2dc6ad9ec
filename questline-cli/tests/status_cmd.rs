//! Integration tests for `questline status` against the real binary.
//!
//! Sync state is rooted at a TempDir via `--state-dir`; no network involved.

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

use questline_core::history;
use questline_core::types::{
    DestinationReference, DestinationTaskId, SourceSnapshot, SourceTaskId, SyncHistory, TaskKind,
    TaskRecord,
};

fn questline() -> Command {
    Command::cargo_bin("questline").expect("binary builds")
}

fn seeded_state() -> TempDir {
    let state = TempDir::new().expect("tempdir");
    let mut history = SyncHistory {
        cursor: Some("token-42".to_string()),
        ..SyncHistory::default()
    };
    history.tasks.insert(
        SourceTaskId::from("44444444"),
        TaskRecord {
            source: SourceSnapshot {
                id: SourceTaskId::from("44444444"),
                text: "Create More Tests".to_string(),
                completed: false,
                due_date_utc: None,
                recurrence_text: None,
                labels: vec![],
                deleted: false,
            },
            destination: Some(DestinationReference {
                id: Some(DestinationTaskId::from("habit-9")),
                kind: TaskKind::Single,
                completed: Some(false),
                due_date: None,
            }),
        },
    );
    history::save_at(state.path(), &history).expect("seed history");
    state
}

#[test]
fn status_with_no_history_reports_empty_state() {
    let state = TempDir::new().unwrap();
    questline()
        .arg("status")
        .arg("--state-dir")
        .arg(state.path())
        .assert()
        .success()
        .stdout(contains("0 mapped task(s)"))
        .stdout(contains("No tasks mapped yet"));
}

#[test]
fn status_lists_mapped_tasks() {
    let state = seeded_state();
    questline()
        .arg("status")
        .arg("--state-dir")
        .arg(state.path())
        .assert()
        .success()
        .stdout(contains("1 mapped task(s)"))
        .stdout(contains("token-42"))
        .stdout(contains("44444444"))
        .stdout(contains("habit-9"));
}

#[test]
fn status_json_emits_parseable_payload() {
    let state = seeded_state();
    let output = questline()
        .arg("status")
        .arg("--state-dir")
        .arg(state.path())
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let payload: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(payload["cursor"], "token-42");
    assert_eq!(payload["tasks"][0]["source_id"], "44444444");
    assert_eq!(payload["tasks"][0]["destination_id"], "habit-9");
    assert_eq!(payload["tasks"][0]["kind"], "single");
    assert_eq!(payload["tasks"][0]["completed"], false);
}

#[test]
fn sync_without_credentials_fails_with_guidance() {
    let state = TempDir::new().unwrap();
    questline()
        .arg("sync")
        .arg("--state-dir")
        .arg(state.path())
        .env_remove("QUESTLINE_SOURCE_TOKEN")
        .env_remove("QUESTLINE_DEST_USER")
        .env_remove("QUESTLINE_DEST_TOKEN")
        .assert()
        .failure()
        .stderr(contains("QUESTLINE_SOURCE_TOKEN"));
}
