// SPDX-License-Identifier: MPL-2.0
//! Composition of feed, toast sequencer and badge for the screen layer.
//!
//! The real-time channel may call back on any thread, so pushed changes are
//! buffered in a bounded channel and applied on the UI thread by
//! [`NotificationCenter::process_pending`]. Every feed change re-runs the
//! toast sequencer.

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, TrySendError};

use super::backend::NotificationBackend;
use super::feed::{FeedSnapshot, FireAndForget, NotificationFeed};
use super::notification::{AlertId, Notification, NotificationId};
use super::sequencer::{SeenSet, ToastSequencer};
use super::source::{FeedChange, NotificationSource, Subscription};
use super::timer::Timer;
use super::unread::Badge;
use crate::config::CHANGE_CHANNEL_CAPACITY;
use crate::diagnostics::{DiagnosticsHandle, WarningEvent, WarningType};
use crate::domain::notifications::ToastTimeout;

type Navigator = Box<dyn Fn(&Notification) + Send + Sync>;

/// Outcome of tapping the toast.
pub struct Tapped {
    /// The notification the user opened.
    pub notification: NotificationId,
    /// Backend update marking it read, if it was still unread.
    pub request: Option<FireAndForget>,
}

impl std::fmt::Debug for Tapped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tapped")
            .field("notification", &self.notification)
            .field("request", &self.request.is_some())
            .finish()
    }
}

struct Bridge {
    subscription: Subscription,
    changes: Receiver<FeedChange>,
}

/// Notification state of the signed-in user, as the screens see it.
pub struct NotificationCenter {
    feed: NotificationFeed,
    sequencer: ToastSequencer,
    navigator: Navigator,
    bridge: Option<Bridge>,
    diagnostics: Option<DiagnosticsHandle>,
}

impl NotificationCenter {
    pub fn new(
        user_id: impl Into<String>,
        backend: Arc<dyn NotificationBackend>,
        timer: Arc<dyn Timer>,
    ) -> Self {
        Self {
            feed: NotificationFeed::new(user_id, backend),
            sequencer: ToastSequencer::new(timer, SeenSet::new()),
            navigator: Box::new(|_: &Notification| {}),
            bridge: None,
            diagnostics: None,
        }
    }

    /// Sets the toast auto-dismiss delay.
    #[must_use]
    pub fn with_timeout(mut self, timeout: ToastTimeout) -> Self {
        self.sequencer = self.sequencer.with_timeout(timeout);
        self
    }

    /// Sets the callback that opens the notifications screen on tap.
    #[must_use]
    pub fn with_navigator(
        mut self,
        navigator: impl Fn(&Notification) + Send + Sync + 'static,
    ) -> Self {
        self.navigator = Box::new(navigator);
        self
    }

    pub fn set_diagnostics(&mut self, handle: DiagnosticsHandle) {
        self.feed.set_diagnostics(handle.clone());
        self.sequencer.set_diagnostics(handle.clone());
        self.diagnostics = Some(handle);
    }

    // =========================================================================
    // Change feed
    // =========================================================================

    /// Subscribes to the user's pushed changes, replacing any previous
    /// subscription.
    pub fn connect(&mut self, source: &dyn NotificationSource) {
        self.disconnect();

        let (tx, rx) = bounded(CHANGE_CHANNEL_CAPACITY);
        let diagnostics = self.diagnostics.clone();
        let subscription = source.subscribe(
            self.feed.user_id(),
            Box::new(move |change| {
                if let Err(TrySendError::Full(_)) = tx.try_send(change) {
                    if let Some(diagnostics) = &diagnostics {
                        diagnostics.log_warning(WarningEvent::new(
                            WarningType::ChangeDropped,
                            "change channel full; change dropped until next refresh",
                        ));
                    }
                }
            }),
        );

        self.bridge = Some(Bridge {
            subscription,
            changes: rx,
        });
    }

    /// Stops receiving pushed changes. Buffered changes are discarded.
    pub fn disconnect(&mut self) {
        if let Some(bridge) = self.bridge.take() {
            bridge.subscription.unsubscribe();
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.bridge.is_some()
    }

    /// Applies buffered pushed changes. Call from the UI thread.
    ///
    /// Returns the number of changes that modified the feed.
    pub fn process_pending(&mut self) -> usize {
        let Some(bridge) = &self.bridge else {
            return 0;
        };
        let changes: Vec<FeedChange> = bridge.changes.try_iter().collect();

        let mut applied = 0;
        for change in changes {
            if self.feed.apply(change) {
                applied += 1;
            }
        }

        if applied > 0 {
            self.observe();
        }
        applied
    }

    // =========================================================================
    // Feed
    // =========================================================================

    /// Reloads the feed from the backend, then re-runs the sequencer.
    pub async fn refresh(&mut self) -> bool {
        let replaced = self.feed.refresh().await;
        if replaced {
            self.observe();
        }
        replaced
    }

    /// Fetch half of [`refresh`](Self::refresh), for hosts that run futures
    /// themselves.
    pub fn fetch(&self) -> futures_util::future::BoxFuture<'static, FeedSnapshot> {
        self.feed.fetch()
    }

    /// Apply half of [`refresh`](Self::refresh).
    pub fn apply_fetch(&mut self, snapshot: FeedSnapshot) -> bool {
        let replaced = self.feed.apply_fetch(snapshot);
        if replaced {
            self.observe();
        }
        replaced
    }

    /// Merges one change directly, bypassing the channel.
    pub fn apply(&mut self, change: FeedChange) -> bool {
        let changed = self.feed.apply(change);
        if changed {
            self.observe();
        }
        changed
    }

    pub fn mark_as_read(&mut self, id: &NotificationId) -> Option<FireAndForget> {
        let request = self.feed.mark_as_read(id)?;
        self.observe();
        Some(request)
    }

    pub fn mark_all_as_read(&mut self) -> Option<FireAndForget> {
        self.feed.mark_all_as_read()
    }

    pub fn mark_alert_as_read(&mut self, id: &AlertId) -> Option<FireAndForget> {
        self.feed.mark_alert_as_read(id)
    }

    // =========================================================================
    // Toast
    // =========================================================================

    /// Handles a tap on the toast: closes it, marks the notification read
    /// and opens the notifications screen.
    pub fn tap_toast(&mut self) -> Option<Tapped> {
        let notification = self.sequencer.acknowledge()?;
        let request = self.feed.mark_as_read(notification.id());
        (self.navigator)(&notification);
        self.observe();

        Some(Tapped {
            notification: notification.id().clone(),
            request,
        })
    }

    /// Closes the toast; the notification stays unread.
    pub fn dismiss_toast(&mut self) -> bool {
        self.sequencer.dismiss()
    }

    /// The notification currently shown as a toast.
    #[must_use]
    pub fn toast(&self) -> Option<Notification> {
        self.sequencer.current()
    }

    #[must_use]
    pub fn badge(&self) -> Badge {
        self.feed.badge()
    }

    #[must_use]
    pub fn feed(&self) -> &NotificationFeed {
        &self.feed
    }

    #[must_use]
    pub fn sequencer(&self) -> &ToastSequencer {
        &self.sequencer
    }

    fn observe(&mut self) {
        self.sequencer.observe(self.feed.notifications());
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("feed", &self.feed)
            .field("sequencer", &self.sequencer)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
