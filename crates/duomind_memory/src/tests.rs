use crate::event_log::EventLog;
use serde_json::json;

fn temp_log(dir: &tempfile::TempDir) -> EventLog {
    EventLog::new(dir.path().join("events.jsonl"))
}

async fn append_n(log: &EventLog, n: usize) {
    for i in 0..n {
        log.append("note", json!({ "i": i }), None)
            .await
            .expect("append failed");
    }
}

#[tokio::test]
async fn test_missing_file_is_empty_log() {
    let dir = tempfile::TempDir::new().unwrap();
    let log = temp_log(&dir);
    assert!(log.read_last(10).await.unwrap().is_empty());
    assert!(!log.path().exists(), "reads must not create the file");
}

#[tokio::test]
async fn test_append_creates_file_and_parent_dirs() {
    let dir = tempfile::TempDir::new().unwrap();
    let log = EventLog::new(dir.path().join("nested/deeper/events.jsonl"));
    let event = log
        .append("architect_output", json!({"text": "plan"}), Some(json!({"source": "test"})))
        .await
        .unwrap();
    assert!(log.path().exists());
    assert_eq!(event.event_type, "architect_output");
    assert_eq!(event.meta["source"], "test");
}

#[tokio::test]
async fn test_append_defaults_meta_to_empty_object() {
    let dir = tempfile::TempDir::new().unwrap();
    let log = temp_log(&dir);
    let event = log.append("note", json!({}), None).await.unwrap();
    assert_eq!(event.meta, json!({}));
}

#[tokio::test]
async fn test_append_is_visible_immediately() {
    let dir = tempfile::TempDir::new().unwrap();
    let log = temp_log(&dir);
    let written = log.append("note", json!({"text": "hello"}), None).await.unwrap();
    // A second handle on the same file sees the record right away
    let reader = temp_log(&dir);
    let read = reader.read_last(1).await.unwrap();
    assert_eq!(read, vec![written]);
}

#[tokio::test]
async fn test_read_last_returns_tail_in_append_order() {
    let dir = tempfile::TempDir::new().unwrap();
    let log = temp_log(&dir);
    append_n(&log, 5).await;

    let last = log.read_last(3).await.unwrap();
    let idx: Vec<_> = last.iter().map(|e| e.payload["i"].as_u64().unwrap()).collect();
    assert_eq!(idx, vec![2, 3, 4]);
}

#[tokio::test]
async fn test_read_last_more_than_available() {
    let dir = tempfile::TempDir::new().unwrap();
    let log = temp_log(&dir);
    append_n(&log, 4).await;
    assert_eq!(log.read_last(100).await.unwrap().len(), 4);
    assert!(log.read_last(0).await.unwrap().is_empty());
}

/// Write records with fixed timestamps straight to disk.
fn write_fixture(dir: &tempfile::TempDir, records: &[(&str, &str)]) -> EventLog {
    let path = dir.path().join("events.jsonl");
    let raw: String = records
        .iter()
        .map(|(ts, event_type)| {
            format!("{{\"ts\":\"{ts}\",\"event_type\":\"{event_type}\",\"payload\":{{}},\"meta\":{{}}}}\n")
        })
        .collect();
    std::fs::write(&path, raw).unwrap();
    EventLog::new(path)
}

#[tokio::test]
async fn test_read_since_excludes_records_at_the_pivot() {
    let dir = tempfile::TempDir::new().unwrap();
    let log = write_fixture(
        &dir,
        &[
            ("2026-01-01T00:00:00Z", "t0"),
            ("2026-01-01T00:00:01Z", "t1_first"),
            ("2026-01-01T00:00:01Z", "t1_second"),
            ("2026-01-01T00:00:02Z", "t2"),
        ],
    );

    let pivot = "2026-01-01T00:00:01Z".parse().unwrap();
    let newer = log.read_since(pivot).await.unwrap();
    let types: Vec<_> = newer.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(types, vec!["t2"]);

    let start = "2026-01-01T00:00:00Z".parse().unwrap();
    let newer = log.read_since(start).await.unwrap();
    let types: Vec<_> = newer.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(types, vec!["t1_first", "t1_second", "t2"]);
}

#[tokio::test]
async fn test_read_since_after_newest_is_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let log = write_fixture(&dir, &[("2026-01-01T00:00:00Z", "only")]);
    let pivot = "2026-01-01T00:00:00Z".parse().unwrap();
    assert!(log.read_since(pivot).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_timestamps_are_non_decreasing() {
    let dir = tempfile::TempDir::new().unwrap();
    let log = temp_log(&dir);
    append_n(&log, 20).await;
    let events = log.read_last(20).await.unwrap();
    assert!(events.windows(2).all(|w| w[0].ts <= w[1].ts));
}

#[tokio::test]
async fn test_corrupt_line_between_valid_lines() {
    let dir = tempfile::TempDir::new().unwrap();
    let log = temp_log(&dir);
    log.append("first", json!({}), None).await.unwrap();
    {
        use std::io::Write;
        let mut f = std::fs::OpenOptions::new().append(true).open(log.path()).unwrap();
        writeln!(f, "{{\"ts\": \"broken").unwrap();
    }
    log.append("second", json!({}), None).await.unwrap();

    let events = log.read_last(10).await.unwrap();
    let types: Vec<_> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(types, vec!["first", "second"]);
}

#[tokio::test]
async fn test_existing_records_are_never_rewritten() {
    let dir = tempfile::TempDir::new().unwrap();
    let log = temp_log(&dir);
    append_n(&log, 2).await;
    let before = std::fs::read_to_string(log.path()).unwrap();
    append_n(&log, 1).await;
    let after = std::fs::read_to_string(log.path()).unwrap();
    assert!(after.starts_with(&before));
    assert_eq!(after.lines().count(), 3);
}
