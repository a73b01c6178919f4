// SPDX-License-Identifier: MPL-2.0
//! Message sanitization and warning/error type definitions.
//!
//! Backend error messages can echo request details back, so every message
//! logged through a [`DiagnosticsHandle`](super::DiagnosticsHandle) passes
//! through [`sanitize_message`] first.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

// =============================================================================
// Warning and Error Type Enums
// =============================================================================

/// Categories of warnings that can occur in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    /// A network-related issue occurred.
    NetworkError,
    /// The backend rejected the request.
    PermissionDenied,
    /// The targeted notification no longer exists.
    NotFound,
    /// A pushed change was dropped because the change channel was full.
    ChangeDropped,
    /// Other warning type not covered by specific categories.
    Other,
}

/// Categories of errors that can occur in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Fetching the feed failed on the network.
    NetworkError,
    /// The backend rejected the feed query.
    PermissionDenied,
    /// The backend answered with an unexpected error.
    BackendError,
    /// Other error type not covered by specific categories.
    Other,
}

impl From<&BackendError> for WarningType {
    fn from(err: &BackendError) -> Self {
        match err {
            BackendError::Network(_) => WarningType::NetworkError,
            BackendError::PermissionDenied => WarningType::PermissionDenied,
            BackendError::NotFound(_) => WarningType::NotFound,
            BackendError::Other(_) => WarningType::Other,
        }
    }
}

impl From<&BackendError> for ErrorType {
    fn from(err: &BackendError) -> Self {
        match err {
            BackendError::Network(_) => ErrorType::NetworkError,
            BackendError::PermissionDenied => ErrorType::PermissionDenied,
            BackendError::NotFound(_) | BackendError::Other(_) => ErrorType::BackendError,
        }
    }
}

// =============================================================================
// Message Sanitization
// =============================================================================

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
        .expect("email regex should compile")
});

// Bearer headers and bare JWTs (three base64url segments starting with `eyJ`).
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:bearer\s+[A-Za-z0-9._~+/=-]+)|eyJ[A-Za-z0-9_-]*\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+")
        .expect("token regex should compile")
});

/// Sanitizes a message by removing sensitive information.
///
/// Email addresses become `<email>`; bearer tokens and JWTs become `<token>`.
///
/// # Examples
///
/// ```
/// use committed::diagnostics::sanitize_message;
///
/// let msg = "update denied for jane@example.com";
/// assert_eq!(sanitize_message(msg), "update denied for <email>");
///
/// let msg = "Invalid format";
/// assert_eq!(sanitize_message(msg), "Invalid format");
/// ```
#[must_use]
pub fn sanitize_message(message: &str) -> String {
    let without_tokens = TOKEN_PATTERN.replace_all(message, "<token>");
    EMAIL_PATTERN
        .replace_all(&without_tokens, "<email>")
        .into_owned()
}
