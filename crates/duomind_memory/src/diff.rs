//! Diff / inspection helpers over the event log.
//!
//! Used by the CLI's `diff` command. Nothing here may fail the process: an
//! unreadable log is reported as zero records with a warning.

use crate::event_log::{EventLog, MemoryEvent};
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};

/// Which slice of the log to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSelection {
    /// The last N records
    Last(usize),
    /// Records strictly newer than a timestamp
    Since(DateTime<Utc>),
}

/// Read the selected records, degrading to an empty list on I/O failure.
pub async fn inspect(log: &EventLog, selection: EventSelection) -> Vec<MemoryEvent> {
    let result = match selection {
        EventSelection::Last(n) => log.read_last(n).await,
        EventSelection::Since(ts) => log.read_since(ts).await,
    };
    result.unwrap_or_else(|e| {
        tracing::warn!("Event log inspection failed, reporting no records: {:#}", e);
        Vec::new()
    })
}

/// Parse a `--since` argument: RFC 3339 / ISO-8601, or unix seconds.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let secs: f64 = raw
        .parse()
        .with_context(|| format!("Not an ISO-8601 timestamp or unix seconds: {raw}"))?;
    if !secs.is_finite() {
        anyhow::bail!("Timestamp out of range: {raw}");
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    Utc.timestamp_opt(whole as i64, nanos)
        .single()
        .with_context(|| format!("Timestamp out of range: {raw}"))
}

/// One compact line per record: `- [ts] (type) payload | meta=meta`.
pub fn format_event(event: &MemoryEvent) -> String {
    let event_type: &str = if event.event_type.is_empty() {
        "<no_type>"
    } else {
        &event.event_type
    };
    format!(
        "- [{}] ({}) {} | meta={}",
        event.ts.to_rfc3339(),
        event_type,
        event.payload,
        event.meta
    )
}

/// Render a selection for humans. An empty selection is not an error.
pub fn render(events: &[MemoryEvent]) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }
    events.iter().map(format_event).collect::<Vec<_>>().join("\n")
}
