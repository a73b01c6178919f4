// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector for aggregating and storing diagnostic events.
//!
//! This module provides the central collector that receives events from
//! the feed, the toast sequencer and the change-feed bridge, and stores them
//! in a circular buffer.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};

use super::report::{generate_default_filename, write_atomic};
use super::{
    sanitize_message, BufferCapacity, CircularBuffer, DiagnosticEvent, DiagnosticEventKind,
    DiagnosticReport, ErrorEvent, FeedOperation, ReportMetadata, SerializableEvent, ToastEvent,
    WarningEvent,
};
use crate::error::Result;

/// Handle for sending diagnostic events to the collector.
///
/// This handle is cheap to clone and can be shared across threads (timer
/// callbacks and change-feed callbacks log through it). Events are sent via a
/// bounded channel to avoid blocking the UI thread.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    /// Logs a toast lifecycle step.
    pub fn log_toast(&self, event: ToastEvent, notification_id: impl Into<String>) {
        self.send(DiagnosticEventKind::Toast {
            event,
            notification_id: notification_id.into(),
        });
    }

    /// Logs a feed operation.
    pub fn log_feed(&self, operation: FeedOperation) {
        self.send(DiagnosticEventKind::Feed { operation });
    }

    /// Logs a warning event.
    ///
    /// The message is automatically sanitized.
    pub fn log_warning(&self, warning_event: WarningEvent) {
        let event = WarningEvent {
            message: sanitize_message(&warning_event.message),
            ..warning_event
        };
        self.send(DiagnosticEventKind::Warning { event });
    }

    /// Logs an error event.
    ///
    /// The message is automatically sanitized.
    pub fn log_error(&self, error_event: ErrorEvent) {
        let event = ErrorEvent {
            message: sanitize_message(&error_event.message),
            ..error_event
        };
        self.send(DiagnosticEventKind::Error { event });
    }

    // Non-blocking send - drop if channel is full
    fn send(&self, kind: DiagnosticEventKind) {
        let _ = self.event_tx.try_send(DiagnosticEvent::new(kind));
    }
}

/// Central collector for diagnostic events.
///
/// The collector receives events through a channel and stores them in a
/// memory-bounded circular buffer. Old events are automatically evicted
/// when the buffer reaches capacity.
pub struct DiagnosticsCollector {
    buffer: CircularBuffer<DiagnosticEvent>,
    event_rx: Receiver<DiagnosticEvent>,
    event_tx: Sender<DiagnosticEvent>,
    collection_started_at: Instant,
    collection_started_at_utc: DateTime<Utc>,
}

/// Default channel capacity for event buffering.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

impl DiagnosticsCollector {
    /// Creates a new diagnostics collector with the specified buffer capacity.
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        let (event_tx, event_rx) = bounded(DEFAULT_CHANNEL_CAPACITY);

        Self {
            buffer: CircularBuffer::new(capacity),
            event_rx,
            event_tx,
            collection_started_at: Instant::now(),
            collection_started_at_utc: Utc::now(),
        }
    }

    /// Creates a handle for sending events to this collector.
    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Processes all pending events from the channel.
    ///
    /// Call this periodically (e.g., on each UI tick) to drain the
    /// event channel and store events in the buffer.
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.buffer.push(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns an iterator over all stored events (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.buffer.iter()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Exports all collected events as a JSON diagnostic report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn export_json(&self) -> Result<String> {
        Ok(self.build_report().to_json()?)
    }

    /// Exports the report to `path`, written atomically.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if file operations fail and
    /// `Error::Serialization` if JSON serialization fails.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let json = self.export_json()?;
        write_atomic(path, &json)?;
        Ok(path.to_path_buf())
    }

    /// Exports the report into `dir` under a timestamped file name.
    ///
    /// # Errors
    ///
    /// Same as [`export_to_file`](Self::export_to_file).
    pub fn export_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        self.export_to_file(dir.as_ref().join(generate_default_filename()))
    }

    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    fn build_report(&self) -> DiagnosticReport {
        let collection_duration_ms = self.collection_started_at.elapsed().as_millis() as u64;

        let events: Vec<SerializableEvent> = self
            .buffer
            .iter()
            .map(|event| {
                SerializableEvent::new(
                    event.timestamp,
                    self.collection_started_at,
                    event.kind.clone(),
                )
            })
            .collect();

        let metadata = ReportMetadata::new(
            self.collection_started_at_utc,
            collection_duration_ms,
            events.len(),
        );

        DiagnosticReport::new(metadata, events)
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}
