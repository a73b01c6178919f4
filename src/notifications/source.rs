// SPDX-License-Identifier: MPL-2.0
//! Push-based change feed.
//!
//! The backend's real-time channel is reached through [`NotificationSource`]
//! so the pipeline can be driven by a test double. Callbacks may run on any
//! thread.

use super::notification::{CheatingAlert, Notification};

/// A row inserted or updated on the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedChange {
    Notification(Notification),
    Alert(CheatingAlert),
}

/// Callback invoked for every pushed change.
pub type ChangeCallback = Box<dyn Fn(FeedChange) + Send + Sync>;

/// Capability to subscribe to a user's notification changes.
pub trait NotificationSource {
    /// Starts delivering the user's changes to `on_change`.
    ///
    /// Delivery stops when the returned [`Subscription`] is unsubscribed or
    /// dropped.
    fn subscribe(&self, user_id: &str, on_change: ChangeCallback) -> Subscription;
}

/// Live subscription to a [`NotificationSource`].
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Stops delivery. Equivalent to dropping the subscription.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
