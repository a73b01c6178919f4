// SPDX-License-Identifier: MPL-2.0
//! User interface components for the notification pipeline.
//!
//! Views follow the Elm-style "state down, messages up" pattern: they read
//! from a [`NotificationCenter`](crate::notifications::NotificationCenter) or
//! [`ToastSequencer`](crate::notifications::ToastSequencer) and emit messages
//! the host routes back through [`toast::update`].
//!
//! - [`toast`] - Toast card and top-of-screen overlay
//! - [`badge`] - Unread badge pill for the notifications tab
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)
//! - [`theming`] - Light/Dark/System color schemes

pub mod badge;
pub mod design_tokens;
pub mod theming;
pub mod toast;
