// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for collecting and exporting pipeline activity.
//!
//! Components log through a cloneable [`DiagnosticsHandle`]; the
//! [`DiagnosticsCollector`] drains those events into a memory-bounded
//! [`CircularBuffer`] and can export them as a JSON report.
//!
//! Swallowed failures (refresh errors, failed mark-as-read calls, dropped
//! change-feed events) are recorded here rather than surfaced to the user.

mod buffer;
mod collector;
mod events;
mod report;
mod sanitizer;

pub use buffer::{BufferCapacity, CircularBuffer};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{
    DiagnosticEvent, DiagnosticEventKind, ErrorEvent, FeedOperation, ToastEvent, WarningEvent,
};
pub use report::{
    generate_default_filename, DiagnosticReport, ReportMetadata, ReportSummary, SerializableEvent,
};
pub use sanitizer::{sanitize_message, ErrorType, WarningType};
