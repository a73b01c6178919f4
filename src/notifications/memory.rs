// SPDX-License-Identifier: MPL-2.0
//! In-process notification store.
//!
//! [`MemoryStore`] implements both [`NotificationBackend`] and
//! [`NotificationSource`], so a feed can be refreshed from it and receive
//! its pushed changes. It backs offline mode and the test suite.

use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;

use super::backend::NotificationBackend;
use super::lock;
use super::notification::{AlertId, CheatingAlert, Notification, NotificationId};
use super::source::{ChangeCallback, FeedChange, NotificationSource, Subscription};
use crate::error::BackendError;

type SharedCallback = Arc<dyn Fn(FeedChange) + Send + Sync>;

struct Subscriber {
    key: u64,
    user_id: String,
    on_change: SharedCallback,
}

#[derive(Default)]
struct Subscribers {
    next_key: u64,
    entries: Vec<Subscriber>,
}

#[derive(Default)]
struct Tables {
    notifications: Vec<Notification>,
    // Alerts carry no owner column of their own.
    alerts: Vec<(String, CheatingAlert)>,
    failure: Option<BackendError>,
    mark_calls: usize,
}

/// Notification tables held in memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    subscribers: Arc<Mutex<Subscribers>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a notification and pushes it to the owner's
    /// subscribers.
    pub fn insert(&self, notification: Notification) {
        {
            let mut tables = lock(&self.tables);
            match tables
                .notifications
                .iter_mut()
                .find(|n| n.id() == notification.id())
            {
                Some(existing) => *existing = notification.clone(),
                None => tables.notifications.push(notification.clone()),
            }
        }
        let user_id = notification.user_id().to_string();
        self.publish(&user_id, FeedChange::Notification(notification));
    }

    /// Inserts or replaces a cheating alert owned by `user_id`.
    pub fn insert_alert(&self, user_id: &str, alert: CheatingAlert) {
        {
            let mut tables = lock(&self.tables);
            match tables.alerts.iter_mut().find(|(_, a)| a.id() == alert.id()) {
                Some(existing) => *existing = (user_id.to_string(), alert.clone()),
                None => tables.alerts.push((user_id.to_string(), alert.clone())),
            }
        }
        self.publish(user_id, FeedChange::Alert(alert));
    }

    /// Makes every subsequent request fail with `failure`; `None` restores
    /// normal operation.
    pub fn set_failure(&self, failure: Option<BackendError>) {
        lock(&self.tables).failure = failure;
    }

    #[must_use]
    pub fn notification(&self, id: &NotificationId) -> Option<Notification> {
        lock(&self.tables)
            .notifications
            .iter()
            .find(|n| n.id() == id)
            .cloned()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).entries.len()
    }

    /// Number of mark-as-read requests received, including failed ones.
    #[must_use]
    pub fn mark_calls(&self) -> usize {
        lock(&self.tables).mark_calls
    }

    fn publish(&self, user_id: &str, change: FeedChange) {
        let callbacks: Vec<SharedCallback> = lock(&self.subscribers)
            .entries
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| Arc::clone(&s.on_change))
            .collect();

        // Callbacks may re-enter the store.
        for callback in callbacks {
            callback(change.clone());
        }
    }

    fn check(&self) -> Result<(), BackendError> {
        match &lock(&self.tables).failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }

    fn begin_mark(&self) -> Result<(), BackendError> {
        lock(&self.tables).mark_calls += 1;
        self.check()
    }
}

#[async_trait]
impl NotificationBackend for MemoryStore {
    async fn fetch_notifications(
        &self,
        user_id: &str,
    ) -> Result<Vec<Notification>, BackendError> {
        self.check()?;
        let mut rows: Vec<Notification> = lock(&self.tables)
            .notifications
            .iter()
            .filter(|n| n.user_id() == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.cmp_recency(a));
        Ok(rows)
    }

    async fn fetch_alerts(&self, user_id: &str) -> Result<Vec<CheatingAlert>, BackendError> {
        self.check()?;
        let mut rows: Vec<CheatingAlert> = lock(&self.tables)
            .alerts
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, alert)| alert.clone())
            .collect();
        rows.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(a.id()))
        });
        Ok(rows)
    }

    async fn mark_as_read(&self, id: &NotificationId) -> Result<(), BackendError> {
        self.begin_mark()?;
        let updated = {
            let mut tables = lock(&self.tables);
            let notification = tables
                .notifications
                .iter_mut()
                .find(|n| n.id() == id)
                .ok_or_else(|| BackendError::NotFound(id.to_string()))?;
            if notification.is_read() {
                None
            } else {
                notification.mark_read();
                Some(notification.clone())
            }
        };

        if let Some(notification) = updated {
            let user_id = notification.user_id().to_string();
            self.publish(&user_id, FeedChange::Notification(notification));
        }
        Ok(())
    }

    async fn mark_all_as_read(&self, user_id: &str) -> Result<(), BackendError> {
        self.begin_mark()?;
        let updated: Vec<Notification> = {
            let mut tables = lock(&self.tables);
            tables
                .notifications
                .iter_mut()
                .filter(|n| n.user_id() == user_id && !n.is_read())
                .map(|n| {
                    n.mark_read();
                    n.clone()
                })
                .collect()
        };

        for notification in updated {
            self.publish(user_id, FeedChange::Notification(notification));
        }
        Ok(())
    }

    async fn mark_alert_as_read(&self, id: &AlertId) -> Result<(), BackendError> {
        self.begin_mark()?;
        let updated = {
            let mut tables = lock(&self.tables);
            let (owner, alert) = tables
                .alerts
                .iter_mut()
                .find(|(_, a)| a.id() == id)
                .ok_or_else(|| BackendError::NotFound(id.to_string()))?;
            if alert.is_read() {
                None
            } else {
                alert.mark_read();
                Some((owner.clone(), alert.clone()))
            }
        };

        if let Some((owner, alert)) = updated {
            self.publish(&owner, FeedChange::Alert(alert));
        }
        Ok(())
    }
}

impl NotificationSource for MemoryStore {
    fn subscribe(&self, user_id: &str, on_change: ChangeCallback) -> Subscription {
        let key = {
            let mut subscribers = lock(&self.subscribers);
            let key = subscribers.next_key;
            subscribers.next_key += 1;
            subscribers.entries.push(Subscriber {
                key,
                user_id: user_id.to_string(),
                on_change: Arc::from(on_change),
            });
            key
        };

        let subscribers: Weak<Mutex<Subscribers>> = Arc::downgrade(&self.subscribers);
        Subscription::new(move || {
            if let Some(subscribers) = subscribers.upgrade() {
                lock(&subscribers).entries.retain(|s| s.key != key);
            }
        })
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = lock(&self.tables);
        f.debug_struct("MemoryStore")
            .field("notifications", &tables.notifications.len())
            .field("alerts", &tables.alerts.len())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
