// SPDX-License-Identifier: MPL-2.0
//! Notification newtypes.
//!
//! This module provides type-safe wrappers for notification pipeline values,
//! ensuring they are always within valid ranges.

use std::time::Duration;

// =============================================================================
// Toast Timeout Bounds
// =============================================================================

/// Toast timeout bounds (1 to 30 seconds).
pub mod toast_timeout_bounds {
    /// Minimum timeout in seconds.
    pub const MIN: u32 = 1;
    /// Maximum timeout in seconds.
    pub const MAX: u32 = 30;
    /// Default timeout in seconds.
    pub const DEFAULT: u32 = 5;
}

// =============================================================================
// ToastTimeout
// =============================================================================

/// Auto-dismiss delay of the notification toast, in whole seconds.
///
/// # Example
///
/// ```
/// use committed::domain::notifications::ToastTimeout;
///
/// let timeout = ToastTimeout::new(5);
/// assert_eq!(timeout.value(), 5);
///
/// // Values outside range are clamped
/// let too_high = ToastTimeout::new(100);
/// assert_eq!(too_high.value(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTimeout(u32);

impl ToastTimeout {
    /// Creates a new toast timeout, clamping to valid range.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(toast_timeout_bounds::MIN, toast_timeout_bounds::MAX))
    }

    /// Returns the value as u32.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the timeout as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(u64::from(self.0))
    }
}

impl Default for ToastTimeout {
    fn default() -> Self {
        Self(toast_timeout_bounds::DEFAULT)
    }
}

// =============================================================================
// Tests
// =============================================================================
