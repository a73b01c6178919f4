// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for the notification pipeline.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::{ErrorType, WarningType};

/// Lifecycle steps of the notification toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastEvent {
    /// A new unseen notification was surfaced while idle.
    Shown,
    /// A new unseen notification replaced the visible one.
    Replaced,
    /// The newest unread notification was already surfaced this session.
    Suppressed,
    /// The auto-dismiss timer fired.
    Expired,
    /// The user closed the toast.
    Dismissed,
    /// The user tapped the toast.
    Acknowledged,
}

/// Feed operations worth correlating with toast behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedOperation {
    /// A full refresh replaced the local state.
    Refreshed {
        notifications: usize,
        alerts: usize,
    },
    /// A pushed change was merged.
    ChangeApplied,
    /// Notifications were optimistically flipped to read.
    MarkedRead { count: usize },
}

/// Non-critical issue; the pipeline keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningEvent {
    pub warning_type: WarningType,
    pub message: String,
}

impl WarningEvent {
    #[must_use]
    pub fn new(warning_type: WarningType, message: impl Into<String>) -> Self {
        Self {
            warning_type,
            message: message.into(),
        }
    }
}

/// An operation failed; the pipeline degraded to its last-known state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub error_type: ErrorType,
    pub message: String,
}

impl ErrorEvent {
    #[must_use]
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
        }
    }
}

/// A single diagnostic event with its capture time.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// When the event occurred (monotonic clock for duration calculations)
    pub timestamp: Instant,
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Creates a new diagnostic event with the current timestamp.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Instant::now(),
            kind,
        }
    }
}

/// The type and associated data for a diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    Toast {
        event: ToastEvent,
        notification_id: String,
    },
    Feed {
        operation: FeedOperation,
    },
    Warning {
        event: WarningEvent,
    },
    Error {
        event: ErrorEvent,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_event_serializes_with_type_tag() {
        let kind = DiagnosticEventKind::Toast {
            event: ToastEvent::Shown,
            notification_id: "n-1".to_string(),
        };
        let json = serde_json::to_string(&kind).expect("serialize");
        assert!(json.contains("\"type\":\"toast\""));
        assert!(json.contains("\"event\":\"shown\""));
    }

    #[test]
    fn feed_operation_deserializes_from_json() {
        let json = r#"{"type":"feed","operation":{"kind":"marked_read","count":2}}"#;
        let kind: DiagnosticEventKind = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            kind,
            DiagnosticEventKind::Feed {
                operation: FeedOperation::MarkedRead { count: 2 }
            }
        );
    }

    #[test]
    fn warning_event_carries_type() {
        let event = WarningEvent::new(WarningType::NetworkError, "mark as read failed");
        assert_eq!(event.warning_type, WarningType::NetworkError);
        assert_eq!(event.message, "mark as read failed");
    }
}
