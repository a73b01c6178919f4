// SPDX-License-Identifier: MPL-2.0
//! Toast sequencing.
//!
//! The [`ToastSequencer`] surfaces at most one unread notification at a time.
//! It has two states, `Idle` and `Visible`:
//!
//! - `Idle --new unseen--> Visible`
//! - `Visible --new unseen--> Visible` (content swapped, timer restarted)
//! - `Visible --timeout | dismiss | acknowledge--> Idle`
//!
//! Deduplication is presentational: a notification surfaced once in this
//! session is never surfaced again, even while it stays unread and keeps
//! counting toward the badge.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use super::lock;
use super::notification::{Notification, NotificationId};
use super::timer::{Timer, TimerHandle};
use crate::diagnostics::{DiagnosticsHandle, ToastEvent};
use crate::domain::notifications::ToastTimeout;

/// Identifiers already surfaced as a toast during this session.
#[derive(Debug, Clone, Default)]
pub struct SeenSet(HashSet<NotificationId>);

impl SeenSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &NotificationId) -> bool {
        self.0.contains(id)
    }

    /// Returns `false` if the id was already present.
    pub fn insert(&mut self, id: NotificationId) -> bool {
        self.0.insert(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What the toast slot currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToastState {
    #[default]
    Idle,
    Visible(Notification),
}

#[derive(Default)]
struct Slot {
    state: ToastState,
    // Bumped on every transition; timers carry the value they were started with.
    generation: u64,
    timer: Option<TimerHandle>,
}

/// Picks the most recent unread notification.
///
/// Ties on `created_at` go to the greater identifier.
#[must_use]
pub fn newest_unread(notifications: &[Notification]) -> Option<&Notification> {
    notifications
        .iter()
        .filter(|n| !n.is_read())
        .max_by(|a, b| a.cmp_recency(b))
}

/// Shows one unread notification at a time as a transient toast.
pub struct ToastSequencer {
    slot: Arc<Mutex<Slot>>,
    seen: SeenSet,
    timer: Arc<dyn Timer>,
    timeout: ToastTimeout,
    diagnostics: Option<DiagnosticsHandle>,
}

impl ToastSequencer {
    /// Creates an idle sequencer.
    ///
    /// `seen` is normally empty; it is a parameter so that the session's
    /// dedup state is explicit and owned here.
    pub fn new(timer: Arc<dyn Timer>, seen: SeenSet) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            seen,
            timer,
            timeout: ToastTimeout::default(),
            diagnostics: None,
        }
    }

    /// Overrides the auto-dismiss delay.
    #[must_use]
    pub fn with_timeout(mut self, timeout: ToastTimeout) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn set_diagnostics(&mut self, handle: DiagnosticsHandle) {
        self.diagnostics = Some(handle);
    }

    /// Reacts to a change of the notification sequence.
    ///
    /// Returns the id of the notification that was just surfaced, if any.
    pub fn observe(&mut self, notifications: &[Notification]) -> Option<NotificationId> {
        let latest = newest_unread(notifications)?;

        if self.seen.contains(latest.id()) {
            self.log(ToastEvent::Suppressed, latest.id());
            return None;
        }

        self.seen.insert(latest.id().clone());
        let replaced = self.show(latest.clone());
        self.log(
            if replaced {
                ToastEvent::Replaced
            } else {
                ToastEvent::Shown
            },
            latest.id(),
        );
        Some(latest.id().clone())
    }

    /// Closes the toast without acknowledging it.
    ///
    /// Returns `false` when nothing was visible.
    pub fn dismiss(&self) -> bool {
        match self.hide() {
            Some(notification) => {
                self.log(ToastEvent::Dismissed, notification.id());
                true
            }
            None => false,
        }
    }

    /// Closes the toast because the user tapped it.
    ///
    /// Returns the tapped notification so the caller can mark it read and
    /// navigate to it.
    pub fn acknowledge(&self) -> Option<Notification> {
        let notification = self.hide()?;
        self.log(ToastEvent::Acknowledged, notification.id());
        Some(notification)
    }

    #[must_use]
    pub fn state(&self) -> ToastState {
        lock(&self.slot).state.clone()
    }

    /// The notification currently on screen.
    #[must_use]
    pub fn current(&self) -> Option<Notification> {
        match &lock(&self.slot).state {
            ToastState::Visible(notification) => Some(notification.clone()),
            ToastState::Idle => None,
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        matches!(lock(&self.slot).state, ToastState::Visible(_))
    }

    #[must_use]
    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    #[must_use]
    pub fn timeout(&self) -> ToastTimeout {
        self.timeout
    }

    // Returns true if a visible toast was replaced.
    fn show(&self, notification: Notification) -> bool {
        let id = notification.id().clone();
        let (generation, previous, replaced) = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            let replaced = matches!(slot.state, ToastState::Visible(_));
            slot.state = ToastState::Visible(notification);
            (slot.generation, slot.timer.take(), replaced)
        };

        if let Some(previous) = previous {
            previous.cancel();
        }

        let weak_slot = Arc::downgrade(&self.slot);
        let diagnostics = self.diagnostics.clone();
        let handle = self.timer.start(
            self.timeout.as_duration(),
            Box::new(move || {
                let Some(slot) = weak_slot.upgrade() else {
                    return;
                };
                let expired = {
                    let mut slot = lock(&slot);
                    if slot.generation == generation {
                        slot.generation += 1;
                        slot.state = ToastState::Idle;
                        slot.timer = None;
                        true
                    } else {
                        false
                    }
                };
                if expired {
                    if let Some(diagnostics) = diagnostics {
                        diagnostics.log_toast(ToastEvent::Expired, id.as_str());
                    }
                }
            }),
        );

        let mut slot = lock(&self.slot);
        if slot.generation == generation {
            slot.timer = Some(handle);
        } else {
            // Expired or dismissed before the handle could be stored.
            drop(slot);
            handle.cancel();
        }

        replaced
    }

    fn hide(&self) -> Option<Notification> {
        let (notification, timer) = {
            let mut slot = lock(&self.slot);
            match std::mem::take(&mut slot.state) {
                ToastState::Visible(notification) => {
                    slot.generation += 1;
                    (notification, slot.timer.take())
                }
                ToastState::Idle => return None,
            }
        };

        if let Some(timer) = timer {
            timer.cancel();
        }
        Some(notification)
    }

    fn log(&self, event: ToastEvent, id: &NotificationId) {
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_toast(event, id.as_str());
        }
    }
}

impl std::fmt::Debug for ToastSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastSequencer")
            .field("state", &self.state())
            .field("seen", &self.seen.len())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
