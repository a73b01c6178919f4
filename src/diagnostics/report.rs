// SPDX-License-Identifier: MPL-2.0
//! Diagnostic report generation and JSON export.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::{DiagnosticEventKind, ToastEvent};

/// Metadata about a diagnostic report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    /// When the report was generated (ISO 8601)
    pub generated_at: String,
    /// Version of `committed` that generated the report
    pub version: String,
    /// When diagnostic collection started (ISO 8601)
    pub collection_started_at: String,
    pub collection_duration_ms: u64,
    pub event_count: usize,
}

impl ReportMetadata {
    #[must_use]
    pub fn new(
        collection_started_at: DateTime<Utc>,
        collection_duration_ms: u64,
        event_count: usize,
    ) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            collection_started_at: collection_started_at.to_rfc3339(),
            collection_duration_ms,
            event_count,
        }
    }
}

/// A diagnostic event that can be serialized to JSON.
///
/// `Instant` timestamps become milliseconds since collection started.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerializableEvent {
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

impl SerializableEvent {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    pub fn new(
        event_timestamp: Instant,
        collection_start: Instant,
        kind: DiagnosticEventKind,
    ) -> Self {
        let timestamp_ms = event_timestamp
            .saturating_duration_since(collection_start)
            .as_millis() as u64;

        Self { timestamp_ms, kind }
    }
}

/// Quick overview of a report without parsing every event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReportSummary {
    /// Count of events by type (e.g., `"toast": 4`, `"warning": 1`)
    pub event_counts: HashMap<String, usize>,
    pub toasts_shown: usize,
    pub toasts_acknowledged: usize,
}

impl ReportSummary {
    #[must_use]
    pub fn from_events(events: &[SerializableEvent]) -> Self {
        let mut summary = Self::default();

        for event in events {
            let type_name = match &event.kind {
                DiagnosticEventKind::Toast { event, .. } => {
                    match event {
                        ToastEvent::Shown | ToastEvent::Replaced => summary.toasts_shown += 1,
                        ToastEvent::Acknowledged => summary.toasts_acknowledged += 1,
                        _ => {}
                    }
                    "toast"
                }
                DiagnosticEventKind::Feed { .. } => "feed",
                DiagnosticEventKind::Warning { .. } => "warning",
                DiagnosticEventKind::Error { .. } => "error",
            };
            *summary.event_counts.entry(type_name.to_string()).or_insert(0) += 1;
        }

        summary
    }
}

/// A complete diagnostic report ready for JSON export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticReport {
    pub metadata: ReportMetadata,
    pub events: Vec<SerializableEvent>,
    pub summary: ReportSummary,
}

impl DiagnosticReport {
    /// Creates a new diagnostic report with summary computed automatically.
    #[must_use]
    pub fn new(metadata: ReportMetadata, events: Vec<SerializableEvent>) -> Self {
        let summary = ReportSummary::from_events(&events);
        Self {
            metadata,
            events,
            summary,
        }
    }

    /// Exports the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Default report file name, e.g. `committed-diagnostics-20261015-142301.json`.
#[must_use]
pub fn generate_default_filename() -> String {
    format!(
        "committed-diagnostics-{}.json",
        Local::now().format("%Y%m%d-%H%M%S")
    )
}

/// Writes content to a file atomically.
///
/// Uses a temporary file with `.tmp` extension, then renames to the final path.
///
/// # Errors
///
/// Returns an error if writing or renaming fails.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = path.with_extension("json.tmp");

    fs::write(&temp_path, content)?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(())
}
