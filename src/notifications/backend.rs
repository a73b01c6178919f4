// SPDX-License-Identifier: MPL-2.0
//! Request/response access to the notification store.

use async_trait::async_trait;

use super::notification::{AlertId, CheatingAlert, Notification, NotificationId};
use crate::error::BackendError;

/// The managed backend holding the `notifications` and `cheating_alerts` tables.
///
/// The backend is the sole writer of new rows; the client only flips
/// `read` flags. Implementations must be safe to call from any thread since
/// fire-and-forget requests are driven by the host runtime.
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    /// The user's notifications, newest first.
    async fn fetch_notifications(&self, user_id: &str)
        -> Result<Vec<Notification>, BackendError>;

    /// The user's cheating alerts, newest first.
    async fn fetch_alerts(&self, user_id: &str) -> Result<Vec<CheatingAlert>, BackendError>;

    /// Sets `read = true` on one notification. Idempotent.
    async fn mark_as_read(&self, id: &NotificationId) -> Result<(), BackendError>;

    /// Sets `read = true` on every notification of the user.
    async fn mark_all_as_read(&self, user_id: &str) -> Result<(), BackendError>;

    /// Sets `read = true` on one cheating alert. Idempotent.
    async fn mark_alert_as_read(&self, id: &AlertId) -> Result<(), BackendError>;
}
