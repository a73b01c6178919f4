// SPDX-License-Identifier: MPL-2.0
//! Per-user notification feed.
//!
//! The feed holds the signed-in user's notifications and cheating alerts in
//! the backend's order (newest first). It is kept current by full refreshes
//! and by changes pushed from the real-time channel.
//!
//! Writes are optimistic: the local `read` flag flips immediately and the
//! backend update is returned as a [`FireAndForget`] future for the host
//! runtime to drive. A failed update is logged and never rolled back.
//!
//! A snapshot fetched before a local mark-as-read cannot clear that mark:
//! reads made after the fetch started are re-applied on top of it. Reads
//! that precede the fetch are left to the backend, so a failed update shows
//! up as unread again on the next refresh.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture};

use super::backend::NotificationBackend;
use super::notification::{AlertId, CheatingAlert, Notification, NotificationId};
use super::source::FeedChange;
use super::unread::{badge, Badge};
use crate::diagnostics::{
    DiagnosticsHandle, ErrorEvent, ErrorType, FeedOperation, WarningEvent, WarningType,
};
use crate::error::BackendError;

/// A backend request whose outcome the caller does not wait for.
///
/// Failures are logged inside the future.
pub type FireAndForget = BoxFuture<'static, ()>;

/// Result of fetching both tables, applied with [`NotificationFeed::apply_fetch`].
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub notifications: Result<Vec<Notification>, BackendError>,
    pub alerts: Result<Vec<CheatingAlert>, BackendError>,
    /// Local mark count when the fetch started.
    marks_before: u64,
}

/// The signed-in user's notifications and alerts.
pub struct NotificationFeed {
    user_id: String,
    notifications: Vec<Notification>,
    alerts: Vec<CheatingAlert>,
    /// Ids read locally, keyed to the mark count at which they were read.
    local_reads: HashMap<NotificationId, u64>,
    local_alert_reads: HashMap<AlertId, u64>,
    marks: u64,
    backend: Arc<dyn NotificationBackend>,
    diagnostics: Option<DiagnosticsHandle>,
}

impl NotificationFeed {
    /// Creates an empty feed. Call [`refresh`](Self::refresh) to load it.
    pub fn new(user_id: impl Into<String>, backend: Arc<dyn NotificationBackend>) -> Self {
        Self {
            user_id: user_id.into(),
            notifications: Vec::new(),
            alerts: Vec::new(),
            local_reads: HashMap::new(),
            local_alert_reads: HashMap::new(),
            marks: 0,
            backend,
            diagnostics: None,
        }
    }

    pub fn set_diagnostics(&mut self, handle: DiagnosticsHandle) {
        self.diagnostics = Some(handle);
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    #[must_use]
    pub fn alerts(&self) -> &[CheatingAlert] {
        &self.alerts
    }

    #[must_use]
    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id() == id)
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read()).count()
    }

    #[must_use]
    pub fn unread_alert_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.is_read()).count()
    }

    /// Tab-bar badge for the current state.
    #[must_use]
    pub fn badge(&self) -> Badge {
        badge(self.unread_count(), self.unread_alert_count())
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Fetches both tables without touching local state.
    ///
    /// The returned future owns everything it needs, so it can be handed to
    /// `iced::Task::perform` and the result fed back through
    /// [`apply_fetch`](Self::apply_fetch).
    pub fn fetch(&self) -> BoxFuture<'static, FeedSnapshot> {
        let backend = Arc::clone(&self.backend);
        let user_id = self.user_id.clone();
        let marks_before = self.marks;
        Box::pin(async move {
            let (notifications, alerts) = future::join(
                backend.fetch_notifications(&user_id),
                backend.fetch_alerts(&user_id),
            )
            .await;
            FeedSnapshot {
                notifications,
                alerts,
                marks_before,
            }
        })
    }

    /// Replaces local state with whatever part of the snapshot succeeded.
    ///
    /// Failed parts are logged and the previous state is kept. Returns
    /// `true` if the notification list was replaced.
    ///
    /// Notifications and alerts marked read after the snapshot's fetch
    /// started stay read.
    pub fn apply_fetch(&mut self, snapshot: FeedSnapshot) -> bool {
        let marks_before = snapshot.marks_before;
        let replaced = match snapshot.notifications {
            Ok(mut notifications) => {
                self.local_reads.retain(|_, mark| *mark > marks_before);
                for notification in notifications
                    .iter_mut()
                    .filter(|n| self.local_reads.contains_key(n.id()))
                {
                    notification.mark_read();
                }
                self.notifications = notifications;
                true
            }
            Err(err) => {
                self.log_error(&err, "fetch notifications");
                false
            }
        };

        match snapshot.alerts {
            Ok(mut alerts) => {
                self.local_alert_reads.retain(|_, mark| *mark > marks_before);
                for alert in alerts
                    .iter_mut()
                    .filter(|a| self.local_alert_reads.contains_key(a.id()))
                {
                    alert.mark_read();
                }
                self.alerts = alerts;
            }
            Err(err) => self.log_error(&err, "fetch alerts"),
        }

        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_feed(FeedOperation::Refreshed {
                notifications: self.notifications.len(),
                alerts: self.alerts.len(),
            });
        }

        replaced
    }

    /// Fetches and applies in one step.
    pub async fn refresh(&mut self) -> bool {
        let snapshot = self.fetch().await;
        self.apply_fetch(snapshot)
    }

    // =========================================================================
    // Pushed changes
    // =========================================================================

    /// Merges a change pushed by the real-time channel.
    ///
    /// Returns `true` if local state changed. Notifications addressed to
    /// another user are ignored.
    pub fn apply(&mut self, change: FeedChange) -> bool {
        let changed = match change {
            FeedChange::Notification(incoming) => self.merge_notification(incoming),
            FeedChange::Alert(incoming) => self.merge_alert(incoming),
        };

        if changed {
            if let Some(diagnostics) = &self.diagnostics {
                diagnostics.log_feed(FeedOperation::ChangeApplied);
            }
        }
        changed
    }

    fn merge_notification(&mut self, mut incoming: Notification) -> bool {
        if incoming.user_id() != self.user_id {
            return false;
        }

        match self
            .notifications
            .iter_mut()
            .find(|n| n.id() == incoming.id())
        {
            Some(existing) => {
                // `read` never goes back to false locally.
                if existing.is_read() {
                    incoming.mark_read();
                }
                if *existing == incoming {
                    return false;
                }
                *existing = incoming;
            }
            None => self.notifications.insert(0, incoming),
        }
        true
    }

    fn merge_alert(&mut self, mut incoming: CheatingAlert) -> bool {
        match self.alerts.iter_mut().find(|a| a.id() == incoming.id()) {
            Some(existing) => {
                if existing.is_read() {
                    incoming.mark_read();
                }
                if *existing == incoming {
                    return false;
                }
                *existing = incoming;
            }
            None => self.alerts.insert(0, incoming),
        }
        true
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Marks one notification read.
    ///
    /// Returns `None` without contacting the backend when the notification
    /// is unknown or already read.
    pub fn mark_as_read(&mut self, id: &NotificationId) -> Option<FireAndForget> {
        let notification = self
            .notifications
            .iter_mut()
            .find(|n| n.id() == id && !n.is_read())?;
        notification.mark_read();
        let mark = self.next_mark();
        self.local_reads.insert(id.clone(), mark);
        self.log_marked(1);

        let backend = Arc::clone(&self.backend);
        let diagnostics = self.diagnostics.clone();
        let id = id.clone();
        Some(Box::pin(async move {
            if let Err(err) = backend.mark_as_read(&id).await {
                warn(diagnostics.as_ref(), &err, &format!("mark {id} as read"));
            }
        }))
    }

    /// Marks every notification read with a single backend call.
    pub fn mark_all_as_read(&mut self) -> Option<FireAndForget> {
        let mark = self.marks + 1;
        let mut count = 0;
        for notification in self.notifications.iter_mut().filter(|n| !n.is_read()) {
            notification.mark_read();
            self.local_reads.insert(notification.id().clone(), mark);
            count += 1;
        }
        if count == 0 {
            return None;
        }
        self.marks = mark;
        self.log_marked(count);

        let backend = Arc::clone(&self.backend);
        let diagnostics = self.diagnostics.clone();
        let user_id = self.user_id.clone();
        Some(Box::pin(async move {
            if let Err(err) = backend.mark_all_as_read(&user_id).await {
                warn(diagnostics.as_ref(), &err, "mark all as read");
            }
        }))
    }

    /// Marks one cheating alert read. Same contract as [`mark_as_read`](Self::mark_as_read).
    pub fn mark_alert_as_read(&mut self, id: &AlertId) -> Option<FireAndForget> {
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.id() == id && !a.is_read())?;
        alert.mark_read();
        let mark = self.next_mark();
        self.local_alert_reads.insert(id.clone(), mark);

        let backend = Arc::clone(&self.backend);
        let diagnostics = self.diagnostics.clone();
        let id = id.clone();
        Some(Box::pin(async move {
            if let Err(err) = backend.mark_alert_as_read(&id).await {
                warn(diagnostics.as_ref(), &err, &format!("mark alert {id} as read"));
            }
        }))
    }

    fn next_mark(&mut self) -> u64 {
        self.marks += 1;
        self.marks
    }

    fn log_marked(&self, count: usize) {
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_feed(FeedOperation::MarkedRead { count });
        }
    }

    fn log_error(&self, err: &BackendError, context: &str) {
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_error(ErrorEvent::new(
                ErrorType::from(err),
                format!("{context}: {err}"),
            ));
        }
    }
}

fn warn(diagnostics: Option<&DiagnosticsHandle>, err: &BackendError, context: &str) {
    if let Some(diagnostics) = diagnostics {
        diagnostics.log_warning(WarningEvent::new(
            WarningType::from(err),
            format!("{context}: {err}"),
        ));
    }
}

impl std::fmt::Debug for NotificationFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationFeed")
            .field("user_id", &self.user_id)
            .field("notifications", &self.notifications.len())
            .field("alerts", &self.alerts.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticEventKind, DiagnosticsCollector};
    use crate::notifications::memory::MemoryStore;
    use crate::notifications::notification::NotificationType;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_760_000_000 + secs, 0).unwrap()
    }

    fn note(id: &str, secs: i64) -> Notification {
        Notification::new(id, "u-1", NotificationType::PostComment, "t", "m", at(secs))
    }

    fn seeded() -> (Arc<MemoryStore>, NotificationFeed) {
        let store = Arc::new(MemoryStore::new());
        store.insert(note("1", 1));
        store.insert(note("2", 2));
        store.insert(note("3", 3).already_read());
        store.insert_alert("u-1", CheatingAlert::new("a-1", at(4)));
        let feed = NotificationFeed::new("u-1", store.clone());
        (store, feed)
    }

    fn ids(feed: &NotificationFeed) -> Vec<&str> {
        feed.notifications().iter().map(|n| n.id().as_str()).collect()
    }

    #[tokio::test]
    async fn refresh_loads_backend_order() {
        let (_store, mut feed) = seeded();
        assert!(feed.refresh().await);

        assert_eq!(ids(&feed), vec!["3", "2", "1"]);
        assert_eq!(feed.unread_count(), 2);
        assert_eq!(feed.unread_alert_count(), 1);
        assert_eq!(feed.badge().count(), 3);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_last_known_state() {
        let mut collector = DiagnosticsCollector::default();
        let (store, mut feed) = seeded();
        feed.set_diagnostics(collector.handle());
        feed.refresh().await;

        store.set_failure(Some(BackendError::Network("connection reset".into())));
        assert!(!feed.refresh().await);
        assert_eq!(feed.notifications().len(), 3);
        assert_eq!(feed.alerts().len(), 1);

        collector.process_pending();
        let errors = collector
            .iter()
            .filter(|e| matches!(e.kind, DiagnosticEventKind::Error { .. }))
            .count();
        assert_eq!(errors, 2);
    }

    #[test]
    fn unread_count_tracks_read_flags() {
        let store = Arc::new(MemoryStore::new());
        let mut feed = NotificationFeed::new("u-1", store);
        for (i, read) in [false, true, false, true, true].into_iter().enumerate() {
            let n = note(&i.to_string(), i as i64);
            feed.apply(FeedChange::Notification(if read { n.already_read() } else { n }));
        }
        assert_eq!(feed.unread_count(), 2);
    }

    #[tokio::test]
    async fn mark_as_read_is_optimistic_and_idempotent() {
        let (store, mut feed) = seeded();
        feed.refresh().await;
        let id = NotificationId::from("1");

        let request = feed.mark_as_read(&id).expect("unread notification");
        assert!(feed.get(&id).is_some_and(Notification::is_read));
        assert_eq!(feed.unread_count(), 1);
        request.await;
        assert!(store.notification(&id).is_some_and(|n| n.is_read()));

        assert!(feed.mark_as_read(&id).is_none());
        assert!(feed.mark_as_read(&NotificationId::from("missing")).is_none());
        assert_eq!(store.mark_calls(), 1);
    }

    #[tokio::test]
    async fn failed_mark_is_logged_and_not_rolled_back() {
        let mut collector = DiagnosticsCollector::default();
        let (store, mut feed) = seeded();
        feed.set_diagnostics(collector.handle());
        feed.refresh().await;
        store.set_failure(Some(BackendError::PermissionDenied));

        let id = NotificationId::from("2");
        feed.mark_as_read(&id).expect("unread notification").await;
        assert!(feed.get(&id).is_some_and(Notification::is_read));

        collector.process_pending();
        let warned = collector.iter().any(|e| {
            matches!(
                &e.kind,
                DiagnosticEventKind::Warning { event } if event.warning_type == WarningType::PermissionDenied
            )
        });
        assert!(warned);
    }

    #[tokio::test]
    async fn snapshot_fetched_before_mark_keeps_it_read() {
        let (store, mut feed) = seeded();
        feed.refresh().await;
        let id = NotificationId::from("1");
        let alert = AlertId::from("a-1");

        let stale = feed.fetch().await;
        let request = feed.mark_as_read(&id).expect("unread notification");
        let alert_request = feed.mark_alert_as_read(&alert).expect("unread alert");
        assert!(feed.apply_fetch(stale));
        request.await;
        alert_request.await;

        assert!(feed.get(&id).is_some_and(Notification::is_read));
        assert_eq!(feed.unread_count(), 1);
        assert_eq!(feed.unread_alert_count(), 0);
        assert_eq!(feed.badge().count(), 1);
        assert!(feed.mark_as_read(&id).is_none());
        assert!(feed.mark_alert_as_read(&alert).is_none());
        assert_eq!(store.mark_calls(), 2);
    }

    #[tokio::test]
    async fn stale_snapshot_keeps_mark_all() {
        let (_store, mut feed) = seeded();
        feed.refresh().await;

        let stale = feed.fetch().await;
        let request = feed.mark_all_as_read().expect("two unread");
        feed.apply_fetch(stale);
        request.await;

        assert_eq!(feed.unread_count(), 0);
        assert!(feed.mark_all_as_read().is_none());
    }

    #[tokio::test]
    async fn failed_mark_is_reconciled_by_next_refresh() {
        let (store, mut feed) = seeded();
        feed.refresh().await;
        let id = NotificationId::from("2");

        store.set_failure(Some(BackendError::Network("offline".into())));
        feed.mark_as_read(&id).expect("unread notification").await;
        assert_eq!(feed.unread_count(), 1);

        store.set_failure(None);
        assert!(feed.refresh().await);
        assert!(feed.get(&id).is_some_and(|n| !n.is_read()));
        assert_eq!(feed.unread_count(), 2);
    }

    #[tokio::test]
    async fn mark_all_as_read_flips_everything_once() {
        let (store, mut feed) = seeded();
        feed.refresh().await;

        feed.mark_all_as_read().expect("two unread").await;
        assert_eq!(feed.unread_count(), 0);
        assert_eq!(store.mark_calls(), 1);
        assert!(feed.mark_all_as_read().is_none());
    }

    #[tokio::test]
    async fn mark_alert_as_read_updates_badge() {
        let (_store, mut feed) = seeded();
        feed.refresh().await;

        feed.mark_alert_as_read(&AlertId::from("a-1"))
            .expect("unread alert")
            .await;
        assert_eq!(feed.unread_alert_count(), 0);
        assert!(feed.mark_alert_as_read(&AlertId::from("a-1")).is_none());
    }

    #[test]
    fn pushed_insert_goes_to_front() {
        let store = Arc::new(MemoryStore::new());
        let mut feed = NotificationFeed::new("u-1", store);
        feed.apply(FeedChange::Notification(note("1", 1)));
        feed.apply(FeedChange::Notification(note("2", 2)));
        assert_eq!(ids(&feed), vec!["2", "1"]);
    }

    #[test]
    fn pushed_update_never_unreads() {
        let store = Arc::new(MemoryStore::new());
        let mut feed = NotificationFeed::new("u-1", store);
        feed.apply(FeedChange::Notification(note("1", 1).already_read()));

        assert!(!feed.apply(FeedChange::Notification(note("1", 1))));
        assert_eq!(feed.unread_count(), 0);
        assert!(feed.apply(FeedChange::Notification(
            Notification::new("1", "u-1", NotificationType::PostComment, "edited", "m", at(1))
        )));
        assert_eq!(feed.unread_count(), 0);
    }

    #[test]
    fn foreign_user_change_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        let mut feed = NotificationFeed::new("u-1", store);
        let foreign = Notification::new("x", "u-2", NotificationType::Follow, "t", "m", at(0));
        assert!(!feed.apply(FeedChange::Notification(foreign)));
        assert!(feed.notifications().is_empty());
    }

    #[test]
    fn pushed_alert_counts_in_badge() {
        let store = Arc::new(MemoryStore::new());
        let mut feed = NotificationFeed::new("u-1", store);
        feed.apply(FeedChange::Alert(CheatingAlert::new("a", at(0))));
        feed.apply(FeedChange::Notification(note("1", 1)));
        assert_eq!(feed.badge().count(), 2);
    }
}
