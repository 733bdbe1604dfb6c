//! Debounce controller collapsing bursts of calls into one invocation.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
    time::Duration,
};

use crate::{Scheduler, Subscription};

/// Default quiet window used by the debounce hook.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Which edge of a burst invokes the callback.
pub enum DebounceMode {
    /// Invoke once after the burst, with the arguments of the last call.
    #[default]
    Trailing,
    /// Invoke on the first call of a burst and swallow the rest.
    Leading,
}

impl DebounceMode {
    /// Maps the `immediate` flag of the hook API to a mode.
    pub const fn from_immediate(immediate: bool) -> Self {
        if immediate {
            Self::Leading
        } else {
            Self::Trailing
        }
    }
}

struct DebounceInner<A> {
    scheduler: Rc<dyn Scheduler>,
    callback: RefCell<Rc<dyn Fn(A)>>,
    delay: Duration,
    mode: DebounceMode,
    pending: RefCell<Option<Subscription>>,
    disposed: Cell<bool>,
}

impl<A> DebounceInner<A> {
    fn current_callback(&self) -> Rc<dyn Fn(A)> {
        self.callback.borrow().clone()
    }
}

/// Debounced wrapper around a callback, sharing one timer slot across clones.
///
/// Only one invocation is ever pending. In [`DebounceMode::Trailing`] each call replaces the
/// pending one; in [`DebounceMode::Leading`] the first call of a quiet period runs
/// synchronously and later calls inside the window are dropped while still extending it.
pub struct Debouncer<A: 'static> {
    inner: Rc<DebounceInner<A>>,
}

impl<A: 'static> Debouncer<A> {
    /// Creates a debouncer that schedules its quiet window on `scheduler`.
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        callback: impl Fn(A) + 'static,
        delay: Duration,
        mode: DebounceMode,
    ) -> Self {
        Self {
            inner: Rc::new(DebounceInner {
                scheduler,
                callback: RefCell::new(Rc::new(callback)),
                delay,
                mode,
                pending: RefCell::new(None),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Returns the quiet window length.
    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Returns the configured edge.
    pub fn mode(&self) -> DebounceMode {
        self.inner.mode
    }

    /// Returns whether a quiet window is currently open.
    pub fn is_pending(&self) -> bool {
        self.inner.pending.borrow().is_some()
    }

    /// Replaces the callback; pending invocations use the new one.
    pub fn set_callback(&self, callback: impl Fn(A) + 'static) {
        *self.inner.callback.borrow_mut() = Rc::new(callback);
    }

    /// Feeds one call into the debouncer.
    pub fn call(&self, args: A) {
        let inner = &self.inner;
        if inner.disposed.get() {
            return;
        }

        let previous = inner.pending.borrow_mut().take();
        let call_now = inner.mode == DebounceMode::Leading && previous.is_none();
        drop(previous);

        let (deferred, immediate) = match inner.mode {
            DebounceMode::Trailing => (Some(args), None),
            DebounceMode::Leading if call_now => (None, Some(args)),
            DebounceMode::Leading => (None, None),
        };

        let weak = Rc::downgrade(inner);
        let scheduled = inner.scheduler.set_timeout(
            inner.delay,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if let Some(fired) = inner.pending.borrow_mut().take() {
                    fired.release();
                }
                if let Some(args) = deferred {
                    let callback = inner.current_callback();
                    callback(args);
                }
            }),
        );
        *inner.pending.borrow_mut() = scheduled.ok();

        if let Some(args) = immediate {
            let callback = inner.current_callback();
            callback(args);
        }
    }

    /// Cancels any pending invocation and ignores every later call. Safe to repeat.
    pub fn dispose(&self) {
        self.inner.disposed.set(true);
        let pending = self.inner.pending.borrow_mut().take();
        drop(pending);
    }

    /// Returns whether [`Debouncer::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

impl<A: 'static> Clone for Debouncer<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A: 'static> fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.inner.delay)
            .field("mode", &self.inner.mode)
            .field("pending", &self.is_pending())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ManualScheduler;

    type Calls = Rc<RefCell<Vec<(Duration, &'static str)>>>;

    fn debouncer(mode: DebounceMode, delay_ms: u64) -> (ManualScheduler, Calls, Debouncer<&'static str>) {
        let scheduler = ManualScheduler::default();
        let calls: Calls = Rc::default();
        let sink = calls.clone();
        let clock = scheduler.clone();
        let debounced = Debouncer::new(
            Rc::new(scheduler.clone()),
            move |value: &'static str| sink.borrow_mut().push((clock.now(), value)),
            Duration::from_millis(delay_ms),
            mode,
        );
        (scheduler, calls, debounced)
    }

    #[test]
    fn trailing_invokes_once_with_latest_arguments_after_quiet_window() {
        let (scheduler, calls, debounced) = debouncer(DebounceMode::Trailing, 100);

        debounced.call("first");
        scheduler.advance(Duration::from_millis(40));
        debounced.call("second");
        scheduler.advance(Duration::from_millis(99));
        assert!(calls.borrow().is_empty());

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(*calls.borrow(), vec![(Duration::from_millis(140), "second")]);

        scheduler.advance(Duration::from_secs(1));
        assert_eq!(calls.borrow().len(), 1);
        assert!(!debounced.is_pending());
    }

    #[test]
    fn trailing_zero_delay_defers_one_tick() {
        let (scheduler, calls, debounced) = debouncer(DebounceMode::Trailing, 0);

        debounced.call("now");
        assert!(calls.borrow().is_empty());
        scheduler.advance(Duration::ZERO);
        assert_eq!(*calls.borrow(), vec![(Duration::ZERO, "now")]);
    }

    #[test]
    fn leading_invokes_synchronously_and_swallows_calls_inside_window() {
        let (scheduler, calls, debounced) = debouncer(DebounceMode::Leading, 100);

        debounced.call("first");
        assert_eq!(*calls.borrow(), vec![(Duration::ZERO, "first")]);

        scheduler.advance(Duration::from_millis(50));
        debounced.call("swallowed");
        scheduler.advance(Duration::from_millis(500));
        assert_eq!(calls.borrow().len(), 1);

        debounced.call("rearmed");
        assert_eq!(
            *calls.borrow(),
            vec![
                (Duration::ZERO, "first"),
                (Duration::from_millis(550), "rearmed")
            ]
        );
    }

    #[test]
    fn leading_window_is_extended_by_swallowed_calls() {
        let (scheduler, calls, debounced) = debouncer(DebounceMode::Leading, 100);

        debounced.call("first");
        scheduler.advance(Duration::from_millis(80));
        debounced.call("swallowed");
        scheduler.advance(Duration::from_millis(80));
        debounced.call("still swallowed");
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn replaced_callback_is_used_for_pending_invocation() {
        let (scheduler, calls, debounced) = debouncer(DebounceMode::Trailing, 10);
        let replacement: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        let sink = replacement.clone();

        debounced.call("value");
        debounced.set_callback(move |value: &'static str| sink.borrow_mut().push(value));
        scheduler.advance(Duration::from_millis(10));

        assert!(calls.borrow().is_empty());
        assert_eq!(*replacement.borrow(), vec!["value"]);
    }

    #[test]
    fn dispose_cancels_pending_call_and_is_idempotent() {
        let (scheduler, calls, debounced) = debouncer(DebounceMode::Trailing, 10);

        debounced.call("pending");
        debounced.dispose();
        debounced.dispose();
        debounced.call("ignored");
        scheduler.advance(Duration::from_secs(1));

        assert!(calls.borrow().is_empty());
        assert_eq!(scheduler.pending_timers(), 0);
        assert!(debounced.is_disposed());
    }

    #[test]
    fn clones_share_one_timer_slot() {
        let (scheduler, calls, debounced) = debouncer(DebounceMode::Trailing, 10);
        let other = debounced.clone();

        debounced.call("a");
        other.call("b");
        assert_eq!(scheduler.pending_timers(), 1);
        scheduler.advance(Duration::from_millis(10));
        assert_eq!(*calls.borrow(), vec![(Duration::from_millis(10), "b")]);
    }

    #[test]
    fn callback_may_reenter_the_debouncer() {
        let scheduler = ManualScheduler::default();
        let count = Rc::new(Cell::new(0_u32));
        let debounced: Debouncer<u32> = Debouncer::new(
            Rc::new(scheduler.clone()),
            |_: u32| {},
            Duration::from_millis(5),
            DebounceMode::Leading,
        );
        let handle = debounced.clone();
        let sink = count.clone();
        debounced.set_callback(move |value: u32| {
            sink.set(sink.get() + 1);
            if value > 0 {
                handle.call(value - 1);
            }
        });

        debounced.call(3);
        assert_eq!(count.get(), 1);
        assert!(debounced.is_pending());
        debounced.dispose();
    }

    #[test]
    fn dropping_every_handle_cancels_the_timer() {
        let (scheduler, calls, debounced) = debouncer(DebounceMode::Trailing, 10);
        debounced.call("orphaned");
        drop(debounced);
        scheduler.advance(Duration::from_millis(10));
        assert!(calls.borrow().is_empty());
        assert_eq!(scheduler.pending_timers(), 0);
    }
}
