// SPDX-License-Identifier: MPL-2.0
//! Cancellable one-shot timers.
//!
//! The toast auto-dismiss is scheduled through [`Timer`] so that it can run
//! on the tokio runtime in the app ([`TokioTimer`]) and on virtual time in
//! tests ([`ManualTimer`]).

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::lock;

/// Callback run when a timer fires.
pub type TimerCallback = Box<dyn FnOnce() + Send>;

/// Schedules one-shot callbacks.
pub trait Timer: Send + Sync {
    /// Runs `on_fire` once `duration` has elapsed, unless cancelled first.
    fn start(&self, duration: Duration, on_fire: TimerCallback) -> TimerHandle;
}

/// Cancels a scheduled callback.
///
/// Dropping the handle does not cancel the timer.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Prevents the callback from running if it has not fired yet.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle").finish_non_exhaustive()
    }
}

// =============================================================================
// TokioTimer
// =============================================================================

/// Timer backed by `tokio::time::sleep` on a runtime handle.
#[derive(Debug, Clone)]
pub struct TokioTimer {
    runtime: tokio::runtime::Handle,
}

impl TokioTimer {
    #[must_use]
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        Self { runtime }
    }

    /// Uses the runtime of the calling context, if there is one.
    #[must_use]
    pub fn current() -> Option<Self> {
        tokio::runtime::Handle::try_current().ok().map(Self::new)
    }
}

impl Timer for TokioTimer {
    fn start(&self, duration: Duration, on_fire: TimerCallback) -> TimerHandle {
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            on_fire();
        });
        TimerHandle::new(move || task.abort())
    }
}

// =============================================================================
// ManualTimer
// =============================================================================

struct Pending {
    deadline: Duration,
    seq: u64,
    cancelled: Arc<AtomicBool>,
    on_fire: TimerCallback,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

/// Timer driven by explicit calls to [`ManualTimer::advance`].
///
/// Time only moves when the owner says so, which makes auto-dismiss
/// behavior testable without sleeping. Clones share the same clock.
#[derive(Clone, Default)]
pub struct ManualTimer {
    clock: Arc<Mutex<Clock>>,
}

impl ManualTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    #[must_use]
    pub fn now(&self) -> Duration {
        lock(&self.clock).now
    }

    /// Number of timers that are scheduled and not cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        lock(&self.clock)
            .pending
            .iter()
            .filter(|p| !p.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Moves virtual time forward, firing due callbacks in deadline order.
    ///
    /// Callbacks run without the clock locked, so they may schedule new
    /// timers; those fire too if they fall due within the same advance.
    /// Returns the number of callbacks that ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = lock(&self.clock).now + by;
        let mut fired = 0;

        loop {
            let due = {
                let mut clock = lock(&self.clock);
                let next = clock
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.deadline <= target)
                    .min_by_key(|(_, p)| (p.deadline, p.seq))
                    .map(|(index, _)| index);
                match next {
                    Some(index) => {
                        let pending = clock.pending.swap_remove(index);
                        clock.now = pending.deadline.max(clock.now);
                        Some(pending)
                    }
                    None => {
                        clock.now = target;
                        None
                    }
                }
            };

            let Some(pending) = due else { break };
            if !pending.cancelled.load(Ordering::SeqCst) {
                (pending.on_fire)();
                fired += 1;
            }
        }

        fired
    }
}

impl Timer for ManualTimer {
    fn start(&self, duration: Duration, on_fire: TimerCallback) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut clock = lock(&self.clock);
        let seq = clock.next_seq;
        clock.next_seq += 1;
        let deadline = clock.now + duration;
        clock.pending.push(Pending {
            deadline,
            seq,
            cancelled: Arc::clone(&cancelled),
            on_fire,
        });

        TimerHandle::new(move || cancelled.store(true, Ordering::SeqCst))
    }
}

impl fmt::Debug for ManualTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTimer")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}
