// SPDX-License-Identifier: MPL-2.0
//! Notification pipeline.
//!
//! Three cooperating parts turn backend rows into what the user sees:
//!
//! - [`NotificationFeed`]: per-user notification and alert lists, kept in
//!   sync by refreshes and pushed changes
//! - [`ToastSequencer`]: one transient toast for the newest unseen unread item
//! - [`badge`]: the combined unread count shown on the tab bar
//!
//! [`NotificationCenter`] wires them to a backend and a change source.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chrono::Utc;
//! use committed::notifications::{
//!     ManualTimer, MemoryStore, Notification, NotificationCenter, NotificationType,
//! };
//!
//! let store = Arc::new(MemoryStore::new());
//! let timer = Arc::new(ManualTimer::new());
//! let mut center = NotificationCenter::new("u-1", store.clone(), timer);
//! center.connect(&*store);
//!
//! store.insert(Notification::new(
//!     "n-1", "u-1", NotificationType::Follow, "New follower", "Sam follows you", Utc::now(),
//! ));
//! center.process_pending();
//!
//! assert_eq!(center.badge().count(), 1);
//! assert!(center.toast().is_some());
//! ```

mod backend;
mod center;
mod feed;
mod memory;
mod notification;
mod sequencer;
mod source;
mod timer;
mod unread;

pub use backend::NotificationBackend;
pub use center::{NotificationCenter, Tapped};
pub use feed::{FeedSnapshot, FireAndForget, NotificationFeed};
pub use memory::MemoryStore;
pub use notification::{AlertId, CheatingAlert, Notification, NotificationId, NotificationType};
pub use sequencer::{newest_unread, SeenSet, ToastSequencer, ToastState};
pub use source::{ChangeCallback, FeedChange, NotificationSource, Subscription};
pub use timer::{ManualTimer, Timer, TimerCallback, TimerHandle, TokioTimer};
pub use unread::{badge, Badge};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
