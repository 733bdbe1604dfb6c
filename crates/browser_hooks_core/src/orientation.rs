//! Device orientation classification with settle-before-read recomputation.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{Scheduler, Subscription};

/// Fixed settle delay used by [`OrientationSettle::Delay`] when none is configured.
pub const ORIENTATION_SETTLE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Screen orientation as reported by the orientation media queries.
pub enum Orientation {
    /// `(orientation: portrait)` matches.
    Portrait,
    /// `(orientation: landscape)` matches.
    Landscape,
    /// Neither query matched, or nothing has been measured yet.
    #[default]
    Unknown,
}

impl Orientation {
    /// Media query checked first.
    pub const PORTRAIT_QUERY: &'static str = "(orientation: portrait)";
    /// Media query checked when portrait does not match.
    pub const LANDSCAPE_QUERY: &'static str = "(orientation: landscape)";

    /// Classifies media-query matches, preferring portrait.
    pub const fn from_matches(portrait: bool, landscape: bool) -> Self {
        if portrait {
            Self::Portrait
        } else if landscape {
            Self::Landscape
        } else {
            Self::Unknown
        }
    }

    /// Returns a stable lowercase token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
            Self::Unknown => "unknown",
        }
    }

    /// Returns whether the orientation could be determined.
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// How long a recompute waits before reading the media queries.
pub enum OrientationSettle {
    /// Read on the next animation frame.
    #[default]
    NextFrame,
    /// Read after a fixed delay.
    Delay(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Options for the orientation observer.
pub struct OrientationOptions {
    /// Settle strategy applied to every recompute.
    pub settle: OrientationSettle,
}

struct OrientationInner {
    scheduler: Rc<dyn Scheduler>,
    settle: OrientationSettle,
    read_orientation: Box<dyn Fn() -> Orientation>,
    value: Cell<Orientation>,
    pending: RefCell<Option<Subscription>>,
    on_update: RefCell<Option<Rc<dyn Fn(Orientation)>>>,
    disposed: Cell<bool>,
}

impl OrientationInner {
    fn settle(&self) {
        if self.disposed.get() {
            return;
        }
        let next = (self.read_orientation)();
        self.value.set(next);
        let notify = self.on_update.borrow().clone();
        if let Some(notify) = notify {
            notify(next);
        }
    }
}

/// Tracks orientation, re-reading it once events stop arriving for one settle period.
///
/// A recompute request replaces any pending one, so a burst of rotation events yields a single
/// read after the burst.
pub struct OrientationTracker {
    inner: Rc<OrientationInner>,
}

impl OrientationTracker {
    /// Creates a tracker starting at [`Orientation::Unknown`].
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        options: OrientationOptions,
        read_orientation: impl Fn() -> Orientation + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(OrientationInner {
                scheduler,
                settle: options.settle,
                read_orientation: Box::new(read_orientation),
                value: Cell::new(Orientation::Unknown),
                pending: RefCell::new(None),
                on_update: RefCell::new(None),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Returns the last settled value.
    pub fn orientation(&self) -> Orientation {
        self.inner.value.get()
    }

    /// Registers the listener notified after every settled read, including unknown results.
    pub fn on_update(&self, notify: impl Fn(Orientation) + 'static) {
        *self.inner.on_update.borrow_mut() = Some(Rc::new(notify));
    }

    /// Returns whether a read is waiting to settle.
    pub fn is_pending(&self) -> bool {
        self.inner.pending.borrow().is_some()
    }

    /// Schedules a read after the settle period, replacing any pending read.
    pub fn request_recompute(&self) {
        let inner = &self.inner;
        if inner.disposed.get() {
            return;
        }
        let previous = inner.pending.borrow_mut().take();
        drop(previous);

        let weak = Rc::downgrade(inner);
        let callback: Box<dyn FnOnce()> = Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Some(fired) = inner.pending.borrow_mut().take() {
                fired.release();
            }
            inner.settle();
        });
        let scheduled = match inner.settle {
            OrientationSettle::NextFrame => inner.scheduler.request_frame(callback),
            OrientationSettle::Delay(delay) => inner.scheduler.set_timeout(delay, callback),
        };
        *inner.pending.borrow_mut() = scheduled.ok();
    }

    /// Cancels any pending read and stops further updates. Safe to repeat.
    pub fn dispose(&self) {
        self.inner.disposed.set(true);
        let pending = self.inner.pending.borrow_mut().take();
        drop(pending);
    }
}

impl Clone for OrientationTracker {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl fmt::Debug for OrientationTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrientationTracker")
            .field("orientation", &self.orientation())
            .field("settle", &self.inner.settle)
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ManualScheduler;

    fn tracker(
        settle: OrientationSettle,
    ) -> (ManualScheduler, Rc<Cell<(bool, bool)>>, Rc<Cell<u32>>, OrientationTracker) {
        let scheduler = ManualScheduler::default();
        let queries = Rc::new(Cell::new((true, false)));
        let reads = Rc::new(Cell::new(0));
        let (matches, count) = (queries.clone(), reads.clone());
        let tracker = OrientationTracker::new(
            Rc::new(scheduler.clone()),
            OrientationOptions { settle },
            move || {
                count.set(count.get() + 1);
                let (portrait, landscape) = matches.get();
                Orientation::from_matches(portrait, landscape)
            },
        );
        (scheduler, queries, reads, tracker)
    }

    #[test]
    fn classification_prefers_portrait_and_falls_back_to_unknown() {
        assert_eq!(Orientation::from_matches(true, true), Orientation::Portrait);
        assert_eq!(Orientation::from_matches(false, true), Orientation::Landscape);
        assert_eq!(Orientation::from_matches(false, false), Orientation::Unknown);
        assert_eq!(Orientation::Landscape.to_string(), "landscape");
        assert!(!Orientation::default().is_known());
    }

    #[test]
    fn orientation_serializes_as_lowercase_token() {
        let raw = serde_json::to_string(&Orientation::Portrait).expect("serialize");
        assert_eq!(raw, "\"portrait\"");
    }

    #[test]
    fn starts_unknown_and_settles_on_next_frame() {
        let (scheduler, queries, _, tracker) = tracker(OrientationSettle::NextFrame);
        assert_eq!(tracker.orientation(), Orientation::Unknown);

        tracker.request_recompute();
        assert_eq!(tracker.orientation(), Orientation::Unknown);
        scheduler.run_frame();
        assert_eq!(tracker.orientation(), Orientation::Portrait);

        queries.set((false, true));
        tracker.request_recompute();
        scheduler.run_frame();
        assert_eq!(tracker.orientation(), Orientation::Landscape);
    }

    #[test]
    fn delayed_settle_collapses_bursts_into_one_read() {
        let (scheduler, queries, reads, tracker) =
            tracker(OrientationSettle::Delay(ORIENTATION_SETTLE_DELAY));
        let updates: Rc<RefCell<Vec<Orientation>>> = Rc::default();
        let sink = updates.clone();
        tracker.on_update(move |value| sink.borrow_mut().push(value));

        tracker.request_recompute();
        scheduler.advance(Duration::from_millis(60));
        queries.set((false, true));
        tracker.request_recompute();
        scheduler.advance(Duration::from_millis(99));
        assert_eq!(reads.get(), 0);

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(reads.get(), 1);
        assert_eq!(*updates.borrow(), vec![Orientation::Landscape]);
    }

    #[test]
    fn unknown_reads_are_reported() {
        let (scheduler, queries, _, tracker) = tracker(OrientationSettle::NextFrame);
        let updates: Rc<RefCell<Vec<Orientation>>> = Rc::default();
        let sink = updates.clone();
        tracker.on_update(move |value| sink.borrow_mut().push(value));

        queries.set((false, false));
        tracker.request_recompute();
        scheduler.run_frame();
        assert_eq!(*updates.borrow(), vec![Orientation::Unknown]);
    }

    #[test]
    fn dispose_drops_pending_read() {
        let (scheduler, _, reads, tracker) = tracker(OrientationSettle::NextFrame);
        tracker.request_recompute();
        tracker.dispose();
        tracker.dispose();
        scheduler.run_frame();
        assert_eq!(reads.get(), 0);
        assert!(!tracker.is_pending());
    }
}
