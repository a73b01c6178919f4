// SPDX-License-Identifier: MPL-2.0
//! `committed` is the notification pipeline of the Committed social app.
//!
//! It keeps the signed-in user's notification feed in sync with the backend,
//! surfaces newly arrived notifications as a single transient toast, and
//! aggregates unread notifications and cheating alerts into the tab-bar badge.

#![doc(html_root_url = "https://docs.rs/committed/0.1.0")]

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod notifications;
pub mod ui;
