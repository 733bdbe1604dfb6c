//! Idle-triggered remount counter.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
    time::Duration,
};

use crate::{Scheduler, Subscription};

/// Threshold used when the caller does not pick one.
pub const DEFAULT_REMOUNT_THRESHOLD: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Options for [`IdleRemount`].
pub struct RemountOptions {
    /// Cancel the timer while the document is hidden and restart it in full when shown.
    pub pause_when_hidden: bool,
}

impl Default for RemountOptions {
    fn default() -> Self {
        Self {
            pause_when_hidden: true,
        }
    }
}

struct IdleInner {
    scheduler: Rc<dyn Scheduler>,
    threshold: Duration,
    options: RemountOptions,
    count: Cell<u32>,
    timer: RefCell<Option<Subscription>>,
    on_change: RefCell<Option<Rc<dyn Fn(u32)>>>,
    disposed: Cell<bool>,
}

/// Counter bumped once the threshold elapses, intended as a key that forces a subtree remount.
///
/// The timer is armed once on creation and is not rearmed after it fires. With
/// [`RemountOptions::pause_when_hidden`], each hide cancels the pending timer and each show arms
/// a fresh full-length one, so every visible period can bump the counter at most once.
pub struct IdleRemount {
    inner: Rc<IdleInner>,
}

impl IdleRemount {
    /// Creates the counter at zero and arms the first timer.
    pub fn new(scheduler: Rc<dyn Scheduler>, threshold: Duration, options: RemountOptions) -> Self {
        let remount = Self {
            inner: Rc::new(IdleInner {
                scheduler,
                threshold,
                options,
                count: Cell::new(0),
                timer: RefCell::new(None),
                on_change: RefCell::new(None),
                disposed: Cell::new(false),
            }),
        };
        remount.start();
        remount
    }

    /// Returns the current counter value.
    pub fn count(&self) -> u32 {
        self.inner.count.get()
    }

    /// Returns the configured threshold.
    pub fn threshold(&self) -> Duration {
        self.inner.threshold
    }

    /// Returns the configured options.
    pub fn options(&self) -> RemountOptions {
        self.inner.options
    }

    /// Returns whether a timer is armed.
    pub fn is_armed(&self) -> bool {
        self.inner.timer.borrow().is_some()
    }

    /// Registers the listener notified after each increment.
    pub fn on_change(&self, notify: impl Fn(u32) + 'static) {
        *self.inner.on_change.borrow_mut() = Some(Rc::new(notify));
    }

    /// Arms a full-length timer unless one is already armed.
    pub fn start(&self) {
        let inner = &self.inner;
        if inner.disposed.get() || inner.timer.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(inner);
        let timer = inner.scheduler.set_timeout(
            inner.threshold,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if let Some(fired) = inner.timer.borrow_mut().take() {
                    fired.release();
                }
                let next = inner.count.get().saturating_add(1);
                inner.count.set(next);
                let notify = inner.on_change.borrow().clone();
                if let Some(notify) = notify {
                    notify(next);
                }
            }),
        );
        *inner.timer.borrow_mut() = timer.ok();
    }

    /// Cancels the armed timer, if any.
    pub fn stop(&self) {
        let timer = self.inner.timer.borrow_mut().take();
        drop(timer);
    }

    /// Applies a document visibility change. Ignored unless pausing while hidden.
    pub fn visibility_changed(&self, visible: bool) {
        if !self.inner.options.pause_when_hidden {
            return;
        }
        self.stop();
        if visible {
            self.start();
        }
    }

    /// Cancels the armed timer and ignores later starts. Safe to repeat.
    pub fn dispose(&self) {
        self.inner.disposed.set(true);
        self.stop();
    }
}

impl Clone for IdleRemount {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl fmt::Debug for IdleRemount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdleRemount")
            .field("count", &self.count())
            .field("threshold", &self.inner.threshold)
            .field("armed", &self.is_armed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ManualScheduler;

    const THRESHOLD: Duration = Duration::from_secs(30);

    fn remount(options: RemountOptions) -> (ManualScheduler, IdleRemount) {
        let scheduler = ManualScheduler::default();
        let remount = IdleRemount::new(Rc::new(scheduler.clone()), THRESHOLD, options);
        (scheduler, remount)
    }

    #[test]
    fn increments_once_after_threshold_and_does_not_rearm() {
        let (scheduler, remount) = remount(RemountOptions::default());
        assert_eq!(remount.count(), 0);

        scheduler.advance(THRESHOLD);
        assert_eq!(remount.count(), 1);
        assert!(!remount.is_armed());

        scheduler.advance(THRESHOLD * 10);
        assert_eq!(remount.count(), 1);
    }

    #[test]
    fn hiding_before_threshold_keeps_counter_at_zero() {
        let (scheduler, remount) = remount(RemountOptions::default());
        scheduler.advance(THRESHOLD / 2);
        remount.visibility_changed(false);
        scheduler.advance(THRESHOLD * 100);
        assert_eq!(remount.count(), 0);
    }

    #[test]
    fn showing_again_arms_a_fresh_full_length_timer() {
        let (scheduler, remount) = remount(RemountOptions::default());
        scheduler.advance(Duration::from_secs(20));
        remount.visibility_changed(false);
        scheduler.advance(Duration::from_secs(5));
        remount.visibility_changed(true);

        scheduler.advance(Duration::from_secs(29));
        assert_eq!(remount.count(), 0);
        scheduler.advance(Duration::from_secs(1));
        assert_eq!(remount.count(), 1);

        remount.visibility_changed(false);
        remount.visibility_changed(true);
        scheduler.advance(THRESHOLD);
        assert_eq!(remount.count(), 2);
    }

    #[test]
    fn visibility_is_ignored_without_pause_option() {
        let (scheduler, remount) = remount(RemountOptions {
            pause_when_hidden: false,
        });
        scheduler.advance(THRESHOLD / 2);
        remount.visibility_changed(false);
        scheduler.advance(THRESHOLD / 2);
        assert_eq!(remount.count(), 1);
    }

    #[test]
    fn notifies_listener_with_new_count() {
        let (scheduler, remount) = remount(RemountOptions::default());
        let seen = Rc::new(Cell::new(0));
        let sink = seen.clone();
        remount.on_change(move |count| sink.set(count));
        scheduler.advance(THRESHOLD);
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn dispose_cancels_timer_and_is_idempotent() {
        let (scheduler, remount) = remount(RemountOptions::default());
        remount.dispose();
        remount.dispose();
        remount.visibility_changed(true);
        scheduler.advance(THRESHOLD * 2);
        assert_eq!(remount.count(), 0);
        assert_eq!(scheduler.pending_timers(), 0);
    }
}
