use std::fs;

use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use taskbubble::board::{TaskStatus, load_board};

fn write_board(dir: &tempfile::TempDir, contents: &str) -> String {
    let path = dir.path().join("board.json");
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn full_board_loads_with_rankings() {
    let dir = tempdir().unwrap();
    let path = write_board(
        &dir,
        r#"{
            "board": "Sprint board",
            "seed": "sprint-9",
            "tasks": [
                {
                    "id": "t-late",
                    "title": "Later task",
                    "status": "open",
                    "created_at": "2024-03-01T09:00:00Z",
                    "due_at": "2024-03-20T17:00:00Z",
                    "tags": [" infra", "backend", "backend "]
                },
                {
                    "id": "t-soon",
                    "title": "Sooner task",
                    "status": "in_progress",
                    "created_at": "2024-03-01T09:00:00Z",
                    "due_at": "2024-03-05T17:00:00Z",
                    "assignee": "  dana  "
                },
                {
                    "id": "t-done",
                    "title": "Finished task",
                    "status": "done",
                    "created_at": "2024-02-01T09:00:00Z"
                }
            ]
        }"#,
    );

    let board = load_board(&path).unwrap();

    assert_eq!(board.name, "Sprint board");
    assert_eq!(board.seed, "sprint-9");
    assert_eq!(board.task_count(), 3);

    let counts = board.status_counts();
    assert_eq!(counts.open, 1);
    assert_eq!(counts.in_progress, 1);
    assert_eq!(counts.done, 1);

    assert_eq!(board.due_soon_ranking(), vec!["t-soon", "t-late"]);

    let late = &board.tasks["t-late"];
    assert_eq!(late.tags, vec!["backend", "infra"]);
    assert_eq!(
        late.due_at,
        Some(Utc.with_ymd_and_hms(2024, 3, 20, 17, 0, 0).unwrap())
    );

    let soon = &board.tasks["t-soon"];
    assert_eq!(soon.assignee.as_deref(), Some("dana"));
    assert_eq!(soon.status, TaskStatus::InProgress);
}

#[test]
fn minimal_task_gets_defaults() {
    let dir = tempdir().unwrap();
    let path = write_board(
        &dir,
        r#"{"tasks": [{"id": "only", "created_at": "2024-03-01T09:00:00Z"}]}"#,
    );

    let board = load_board(&path).unwrap();

    assert_eq!(board.name, "Untitled board");
    assert_eq!(board.seed, board.name);

    let task = &board.tasks["only"];
    assert_eq!(task.title, "only");
    assert_eq!(task.status, TaskStatus::Open);
    assert_eq!(task.due_at, None);
    assert_eq!(task.assignee, None);
    assert!(task.tags.is_empty());
    assert!(task.notes.is_empty());
}

#[test]
fn missing_file_reports_the_path() {
    let error = load_board("/definitely/not/here/board.json").unwrap_err();
    let rendered = format!("{error:#}");
    assert!(rendered.contains("failed to read board file"), "{rendered}");
}

#[test]
fn malformed_json_reports_a_parse_failure() {
    let dir = tempdir().unwrap();
    let path = write_board(&dir, "{ this is not json");

    let error = load_board(&path).unwrap_err();
    let rendered = format!("{error:#}");
    assert!(rendered.contains("failed to parse board file"), "{rendered}");
}

#[test]
fn blank_document_is_rejected() {
    let dir = tempdir().unwrap();
    let path = write_board(&dir, "   \n  ");

    let error = load_board(&path).unwrap_err();
    let rendered = format!("{error:#}");
    assert!(rendered.contains("board document is empty"), "{rendered}");
}

#[test]
fn blank_ids_are_skipped_and_duplicates_keep_the_last_entry() {
    let dir = tempdir().unwrap();
    let path = write_board(
        &dir,
        r#"{
            "board": "Cleanup",
            "tasks": [
                {"id": "   ", "title": "Ghost", "created_at": "2024-03-01T09:00:00Z"},
                {"id": "dup", "title": "First copy", "created_at": "2024-03-01T09:00:00Z"},
                {"id": "dup", "title": "Second copy", "created_at": "2024-03-02T09:00:00Z"},
                {"id": " padded ", "title": "Trimmed", "created_at": "2024-03-01T09:00:00Z"}
            ]
        }"#,
    );

    let board = load_board(&path).unwrap();

    assert_eq!(board.task_count(), 2);
    assert_eq!(board.tasks["dup"].title, "Second copy");
    assert_eq!(board.tasks["padded"].title, "Trimmed");
}

#[test]
fn board_without_tasks_still_loads() {
    let dir = tempdir().unwrap();
    let path = write_board(&dir, r#"{"board": "Quiet week"}"#);

    let board = load_board(&path).unwrap();
    assert_eq!(board.name, "Quiet week");
    assert_eq!(board.seed, "Quiet week");
    assert_eq!(board.task_count(), 0);
    assert!(board.due_soon_ranking().is_empty());
}
