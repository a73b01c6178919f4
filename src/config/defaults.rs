// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the notification pipeline. Constants are organized by category.
//!
//! # Categories
//!
//! - **Toast**: Auto-dismiss timeout of the notification toast
//! - **Badge**: Display cap of the tab-bar badge
//! - **Diagnostics**: Event buffer capacity
//! - **Change feed**: Buffering between the real-time callback and the UI thread

// ==========================================================================
// Toast Defaults
// ==========================================================================

/// Default auto-dismiss timeout for the notification toast (in seconds).
pub const DEFAULT_TOAST_TIMEOUT_SECS: u32 = 5;

/// Minimum toast timeout (in seconds).
pub const MIN_TOAST_TIMEOUT_SECS: u32 = 1;

/// Maximum toast timeout (in seconds).
pub const MAX_TOAST_TIMEOUT_SECS: u32 = 30;

// ==========================================================================
// Badge Defaults
// ==========================================================================

/// Largest badge count rendered as a number; anything above shows `"99+"`.
pub const BADGE_DISPLAY_CAP: usize = 99;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Default number of diagnostic events kept in memory.
pub const DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY: usize = 1000;

/// Minimum diagnostic buffer capacity.
pub const MIN_DIAGNOSTICS_BUFFER_CAPACITY: usize = 100;

/// Maximum diagnostic buffer capacity.
pub const MAX_DIAGNOSTICS_BUFFER_CAPACITY: usize = 10_000;

// ==========================================================================
// Change Feed Defaults
// ==========================================================================

/// Capacity of the channel between the change-feed callback and the UI thread.
/// Changes beyond this are dropped; the next refresh reconciles them.
pub const CHANGE_CHANNEL_CAPACITY: usize = 256;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Toast timeout validation
    assert!(MIN_TOAST_TIMEOUT_SECS > 0);
    assert!(MAX_TOAST_TIMEOUT_SECS >= MIN_TOAST_TIMEOUT_SECS);
    assert!(DEFAULT_TOAST_TIMEOUT_SECS >= MIN_TOAST_TIMEOUT_SECS);
    assert!(DEFAULT_TOAST_TIMEOUT_SECS <= MAX_TOAST_TIMEOUT_SECS);

    // Diagnostics validation
    assert!(MIN_DIAGNOSTICS_BUFFER_CAPACITY > 0);
    assert!(MAX_DIAGNOSTICS_BUFFER_CAPACITY >= MIN_DIAGNOSTICS_BUFFER_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY >= MIN_DIAGNOSTICS_BUFFER_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY <= MAX_DIAGNOSTICS_BUFFER_CAPACITY);

    assert!(BADGE_DISPLAY_CAP > 0);
    assert!(CHANGE_CHANNEL_CAPACITY > 0);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_timeout_defaults_are_valid() {
        assert_eq!(DEFAULT_TOAST_TIMEOUT_SECS, 5);
        assert!(DEFAULT_TOAST_TIMEOUT_SECS >= MIN_TOAST_TIMEOUT_SECS);
        assert!(DEFAULT_TOAST_TIMEOUT_SECS <= MAX_TOAST_TIMEOUT_SECS);
    }

    #[test]
    fn badge_cap_is_two_digits() {
        assert_eq!(BADGE_DISPLAY_CAP, 99);
    }

    #[test]
    fn diagnostics_defaults_are_valid() {
        assert_eq!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY, 1000);
        assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY >= MIN_DIAGNOSTICS_BUFFER_CAPACITY);
        assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY <= MAX_DIAGNOSTICS_BUFFER_CAPACITY);
    }
}
