// SPDX-License-Identifier: MPL-2.0
//! Notification pipeline domain types.
//!
//! This module provides pure domain types for the toast pipeline:
//! - [`ToastTimeout`]: Auto-dismiss delay of the notification toast

mod newtypes;

pub use newtypes::{toast_timeout_bounds, ToastTimeout};
