//! History records, the timeline digest, and sorted JSON output.

use crate::event::Event;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from writing the timeline to disk.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The event payload of a record: the validated structure in
/// schema-bound mode, or the raw response text in free-text mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventPayload {
    Structured(Event),
    Text(String),
}

/// One persisted, timestamped, sequentially-numbered generated event.
///
/// `id` is assigned in call order (1-based), not year order. `year` is
/// a denormalized copy used for sorting. Records are created once per
/// successful generation and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: u64,
    pub year: i64,
    pub event: EventPayload,
    pub timestamp: DateTime<Utc>,
}

impl HistoryRecord {
    /// Short title for the running-history digest.
    pub fn title(&self) -> &str {
        match &self.event {
            EventPayload::Structured(event) => &event.name,
            EventPayload::Text(text) => text.lines().next().unwrap_or("").trim(),
        }
    }
}

/// Year-sorted digest of the history so far (year and title only), one
/// event per line, ascending by year regardless of generation order.
pub fn timeline_digest(records: &[HistoryRecord]) -> String {
    let mut entries: Vec<(i64, &str)> = records.iter().map(|r| (r.year, r.title())).collect();
    entries.sort_by_key(|(year, _)| *year);

    let mut digest = String::new();
    for (year, title) in entries {
        digest.push_str(&format!("Year {year}: {title}\n"));
    }
    digest
}

/// Serialize records sorted ascending by year (stable: ties keep
/// insertion order), as a JSON array indented with 4 spaces.
pub fn to_sorted_json(records: &[HistoryRecord]) -> Result<String, serde_json::Error> {
    let mut sorted: Vec<&HistoryRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.year);

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    sorted.serialize(&mut serializer)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the sorted timeline to `path`, overwriting any existing file.
/// Filesystem failures surface to the caller; they are not retried.
pub async fn save_to_json(
    records: &[HistoryRecord],
    path: impl AsRef<Path>,
) -> Result<(), WriteError> {
    let content = to_sorted_json(records)?;
    fs::write(path, content).await?;
    Ok(())
}
