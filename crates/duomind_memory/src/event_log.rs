//! Event Log - the only persisted state of the dual-brain core
//!
//! One JSON object per line, UTF-8, append-only:
//!
//! ```text
//! {"ts":"2026-10-19T08:00:00.123456Z","event_type":"architect_output","payload":{..},"meta":{..}}
//! ```
//!
//! - The file is created on first write, never truncated or rewritten.
//! - Every append is flushed and synced before it returns.
//! - Reads skip lines that fail to parse instead of failing the whole read.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::io::Write;
use tokio::sync::Mutex;

/// A single timestamped record. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEvent {
    /// Append time, ISO-8601 UTC. Non-decreasing within one log.
    pub ts: DateTime<Utc>,
    /// Short tag, e.g. "architect_output"
    pub event_type: String,
    #[serde(default = "empty_object")]
    pub payload: Value,
    #[serde(default = "empty_object")]
    pub meta: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

/// Append-only JSONL log.
///
/// Appends are serialized through an internal lock, so concurrent tasks
/// sharing one `EventLog` (typically behind an `Arc`) never interleave
/// partial records. Reads do not take the lock: a record still being
/// written shows up as an unparsable trailing line and is skipped.
///
/// Ordering and timestamp monotonicity hold per instance. Two separate
/// handles on the same path each write whole lines, but their timestamps
/// are not coordinated, so share one handle instead of opening several.
pub struct EventLog {
    path: PathBuf,
    /// Timestamp of the newest record this handle knows about.
    /// `None` until the first append has looked at the file.
    last_ts: Mutex<Option<DateTime<Utc>>>,
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog").field("path", &self.path).finish()
    }
}

impl EventLog {
    /// Open a log at `path`. Nothing touches the disk until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_ts: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record stamped with the current wall-clock time.
    ///
    /// Once this returns `Ok`, the record is on disk and visible to every
    /// subsequent read.
    pub async fn append(
        &self,
        event_type: &str,
        payload: Value,
        meta: Option<Value>,
    ) -> Result<MemoryEvent> {
        let mut last_ts = self.last_ts.lock().await;

        if last_ts.is_none() {
            *last_ts = self.load().await?.last().map(|e| e.ts);
        }

        // Clock steps backwards must not reorder the log.
        let now = Utc::now();
        let ts = match *last_ts {
            Some(prev) if prev > now => prev,
            _ => now,
        };

        let event = MemoryEvent {
            ts,
            event_type: event_type.to_string(),
            payload,
            meta: meta.unwrap_or_else(empty_object),
        };

        let mut line = serde_json::to_string(&event).context("Failed to serialize event")?;
        line.push('\n');

        write_record(self.path.clone(), line).await?;

        *last_ts = Some(ts);
        tracing::debug!("Appended event '{}' at {}", event.event_type, event.ts);

        Ok(event)
    }

    /// The `n` most recently appended records, oldest first.
    ///
    /// `n == 0` yields nothing; a log shorter than `n` yields everything.
    pub async fn read_last(&self, n: usize) -> Result<Vec<MemoryEvent>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let mut events = self.load().await?;
        let skip = events.len().saturating_sub(n);
        Ok(events.split_off(skip))
    }

    /// All records with a timestamp strictly greater than `since`, in append order.
    pub async fn read_since(&self, since: DateTime<Utc>) -> Result<Vec<MemoryEvent>> {
        let events = self.load().await?;
        Ok(events.into_iter().filter(|e| e.ts > since).collect())
    }

    /// Parse every readable record. A missing file is an empty log.
    async fn load(&self) -> Result<Vec<MemoryEvent>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read event log: {}", self.path.display()))
            }
        };
        Ok(parse_lines(&bytes))
    }
}

/// Write one whole line with a single `write_all` on an `O_APPEND` handle,
/// then sync. Runs on the blocking pool so a slow disk never stalls the
/// runtime.
async fn write_record(path: PathBuf, line: String) -> Result<()> {
    tokio::task::spawn_blocking(move || -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create event log directory: {}", parent.display())
                })?;
            }
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open event log: {}", path.display()))?;
        file.write_all(line.as_bytes())
            .context("Failed to write event")?;
        file.sync_data().context("Failed to sync event log")?;
        Ok(())
    })
    .await
    .context("Event log writer task panicked")?
}

/// Parse newline-delimited records, skipping blank and malformed lines.
///
/// Works on raw bytes so a line with invalid UTF-8 only loses that line.
pub(crate) fn parse_lines(bytes: &[u8]) -> Vec<MemoryEvent> {
    bytes
        .split(|&b| b == b'\n')
        .enumerate()
        .filter(|(_, line)| !line.iter().all(u8::is_ascii_whitespace))
        .filter_map(|(idx, line)| match serde_json::from_slice::<MemoryEvent>(line) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!("Skipping malformed event log line {}: {}", idx + 1, e);
                None
            }
        })
        .collect()
}
