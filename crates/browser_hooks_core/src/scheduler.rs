//! Timer and animation-frame scheduling contracts.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt,
    rc::{Rc, Weak},
    time::Duration,
};

use crate::{HookError, Subscription};

/// Host service for one-shot timers and animation-frame callbacks.
///
/// Both methods hand back a [`Subscription`] whose cancel step clears the pending callback.
/// Once a callback has run, its owner should [`Subscription::release`] the guard.
pub trait Scheduler {
    /// Schedules `callback` after `delay`. A zero delay still defers to a later turn.
    ///
    /// # Errors
    ///
    /// Returns an error when the host refuses to schedule the timer.
    fn set_timeout(
        &self,
        delay: Duration,
        callback: Box<dyn FnOnce()>,
    ) -> Result<Subscription, HookError>;

    /// Schedules `callback` before the next repaint.
    ///
    /// # Errors
    ///
    /// Returns an error when the host refuses to schedule the frame.
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<Subscription, HookError>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Scheduler for contexts without a browser; callbacks are dropped and never run.
pub struct NoopScheduler;

impl Scheduler for NoopScheduler {
    fn set_timeout(
        &self,
        _delay: Duration,
        _callback: Box<dyn FnOnce()>,
    ) -> Result<Subscription, HookError> {
        Ok(Subscription::noop())
    }

    fn request_frame(&self, _callback: Box<dyn FnOnce()>) -> Result<Subscription, HookError> {
        Ok(Subscription::noop())
    }
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    timers: BTreeMap<(Duration, u64), Box<dyn FnOnce()>>,
    frames: Vec<(u64, Box<dyn FnOnce()>)>,
}

impl ManualState {
    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

#[derive(Clone, Default)]
/// Virtual-time scheduler for tests and headless composition.
///
/// Time only moves through [`ManualScheduler::advance`]; frames only run through
/// [`ManualScheduler::run_frame`]. Timers due at the same instant fire in scheduling order.
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    /// Returns the virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Returns the number of timers waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Returns the number of frame callbacks waiting for the next frame.
    pub fn pending_frames(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    /// Moves virtual time forward by `by`, firing every timer that comes due on the way.
    ///
    /// Timers scheduled by a firing callback also fire if they come due before the target time.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let next = {
                let mut state = self.inner.borrow_mut();
                match state.timers.first_key_value().map(|(key, _)| *key) {
                    Some(key) if key.0 <= target => {
                        state.now = key.0;
                        state.timers.remove(&key)
                    }
                    _ => None,
                }
            };
            match next {
                Some(callback) => callback(),
                None => break,
            }
        }
        self.inner.borrow_mut().now = target;
    }

    /// Runs the frame callbacks queued before this call and returns how many ran.
    ///
    /// Frames requested while the batch runs wait for the next call.
    pub fn run_frame(&self) -> usize {
        let batch = std::mem::take(&mut self.inner.borrow_mut().frames);
        let ran = batch.len();
        for (_, callback) in batch {
            callback();
        }
        ran
    }

    fn cancel_timer(state: &Weak<RefCell<ManualState>>, key: (Duration, u64)) {
        let Some(state) = state.upgrade() else {
            return;
        };
        let removed = state.borrow_mut().timers.remove(&key);
        drop(removed);
    }

    fn cancel_frame(state: &Weak<RefCell<ManualState>>, seq: u64) {
        let Some(state) = state.upgrade() else {
            return;
        };
        let removed = {
            let mut state = state.borrow_mut();
            state
                .frames
                .iter()
                .position(|(id, _)| *id == seq)
                .map(|index| state.frames.remove(index))
        };
        drop(removed);
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(
        &self,
        delay: Duration,
        callback: Box<dyn FnOnce()>,
    ) -> Result<Subscription, HookError> {
        let key = {
            let mut state = self.inner.borrow_mut();
            let key = (state.now + delay, state.next_seq());
            state.timers.insert(key, callback);
            key
        };
        let state = Rc::downgrade(&self.inner);
        Ok(Subscription::new(move || Self::cancel_timer(&state, key)))
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<Subscription, HookError> {
        let seq = {
            let mut state = self.inner.borrow_mut();
            let seq = state.next_seq();
            state.frames.push((seq, callback));
            seq
        };
        let state = Rc::downgrade(&self.inner);
        Ok(Subscription::new(move || Self::cancel_frame(&state, seq)))
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending_timers", &state.timers.len())
            .field("pending_frames", &state.frames.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnOnce()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let make = move |label: &'static str| {
            let sink = sink.clone();
            Box::new(move || sink.borrow_mut().push(label)) as Box<dyn FnOnce()>
        };
        (log, make)
    }

    #[test]
    fn timers_fire_in_due_order_then_scheduling_order() {
        let scheduler = ManualScheduler::default();
        let (log, make) = recorder();

        let late = scheduler
            .set_timeout(Duration::from_millis(20), make("late"))
            .expect("schedule");
        let first = scheduler
            .set_timeout(Duration::from_millis(10), make("first"))
            .expect("schedule");
        let second = scheduler
            .set_timeout(Duration::from_millis(10), make("second"))
            .expect("schedule");

        scheduler.advance(Duration::from_millis(15));
        assert_eq!(*log.borrow(), vec!["first", "second"]);
        assert_eq!(scheduler.now(), Duration::from_millis(15));

        scheduler.advance(Duration::from_millis(5));
        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);

        for subscription in [late, first, second] {
            subscription.release();
        }
    }

    #[test]
    fn zero_delay_timer_waits_for_advance() {
        let scheduler = ManualScheduler::default();
        let (log, make) = recorder();
        let subscription = scheduler
            .set_timeout(Duration::ZERO, make("tick"))
            .expect("schedule");

        assert!(log.borrow().is_empty());
        scheduler.advance(Duration::ZERO);
        assert_eq!(*log.borrow(), vec!["tick"]);
        subscription.release();
    }

    #[test]
    fn cancelled_timer_and_frame_never_run() {
        let scheduler = ManualScheduler::default();
        let (log, make) = recorder();
        let timer = scheduler
            .set_timeout(Duration::from_millis(5), make("timer"))
            .expect("schedule");
        let frame = scheduler.request_frame(make("frame")).expect("frame");

        drop(timer);
        drop(frame);
        scheduler.advance(Duration::from_millis(10));
        assert_eq!(scheduler.run_frame(), 0);
        assert!(log.borrow().is_empty());
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn frames_requested_during_a_frame_wait_for_the_next_one() {
        let scheduler = ManualScheduler::default();
        let (log, make) = recorder();
        let nested = scheduler.clone();
        let held = Rc::new(RefCell::new(Vec::new()));
        let held_inner = held.clone();
        let outer = scheduler
            .request_frame(Box::new(move || {
                let subscription = nested.request_frame(make("inner")).expect("frame");
                held_inner.borrow_mut().push(subscription);
            }))
            .expect("frame");

        assert_eq!(scheduler.run_frame(), 1);
        assert!(log.borrow().is_empty());
        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(*log.borrow(), vec!["inner"]);
        outer.release();
        for subscription in held.borrow_mut().drain(..) {
            subscription.release();
        }
    }

    #[test]
    fn noop_scheduler_drops_callbacks() {
        let (log, make) = recorder();
        let timer = NoopScheduler
            .set_timeout(Duration::ZERO, make("never"))
            .expect("noop");
        assert!(!timer.is_active());
        assert!(log.borrow().is_empty());
    }
}
