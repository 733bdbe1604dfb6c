//! Viewport/element size tracking with per-frame coalescing.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use serde::{Deserialize, Serialize};

use crate::{Scheduler, Subscription};

/// Width threshold below which a layout counts as mobile.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
/// Width/height pair in CSS pixels. `(0, 0)` means "not measured yet".
pub struct Size {
    /// Width in CSS pixels.
    pub width: u32,
    /// Height in CSS pixels.
    pub height: u32,
}

impl Size {
    /// The unmeasured size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a size from integer CSS pixels.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Converts fractional CSS pixels, rounding and clamping negatives to zero.
    pub fn from_css_pixels(width: f64, height: f64) -> Self {
        fn px(value: f64) -> u32 {
            if value.is_finite() {
                value.round().clamp(0.0, u32::MAX as f64) as u32
            } else {
                0
            }
        }
        Self::new(px(width), px(height))
    }

    /// Returns whether either dimension has been measured.
    pub const fn is_measured(self) -> bool {
        self.width > 0 || self.height > 0
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

impl From<Size> for (u32, u32) {
    fn from(size: Size) -> Self {
        (size.width, size.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Raw box dimensions read from an element.
pub struct BoxMetrics {
    /// Layout box width (`offsetWidth`).
    pub offset_width: i32,
    /// Layout box height (`offsetHeight`).
    pub offset_height: i32,
    /// Content box width (`clientWidth`).
    pub client_width: i32,
    /// Content box height (`clientHeight`).
    pub client_height: i32,
}

impl BoxMetrics {
    /// Returns the larger of the layout and content boxes on each axis.
    pub fn size(self) -> Size {
        let width = self.offset_width.max(self.client_width).max(0);
        let height = self.offset_height.max(self.client_height).max(0);
        Size::new(width as u32, height as u32)
    }
}

/// Returns `true` iff `width` is measured (non-zero) and strictly below `threshold`.
pub const fn is_below_breakpoint(width: u32, threshold: u32) -> bool {
    width > 0 && width < threshold
}

struct SizeInner {
    scheduler: Rc<dyn Scheduler>,
    measure: Box<dyn Fn() -> Option<Size>>,
    size: Cell<Size>,
    frame: RefCell<Option<Subscription>>,
    on_change: RefCell<Option<Rc<dyn Fn(Size)>>>,
    disposed: Cell<bool>,
}

impl SizeInner {
    fn apply(&self) {
        if self.disposed.get() {
            return;
        }
        let Some(next) = (self.measure)() else {
            return;
        };
        if next == self.size.replace(next) {
            return;
        }
        let notify = self.on_change.borrow().clone();
        if let Some(notify) = notify {
            notify(next);
        }
    }
}

/// Holds the latest measured size and coalesces measurement requests into one per frame.
pub struct SizeTracker {
    inner: Rc<SizeInner>,
}

impl SizeTracker {
    /// Creates a tracker starting at `initial`; `measure` returns `None` while the measured
    /// surface is missing.
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        initial: Size,
        measure: impl Fn() -> Option<Size> + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(SizeInner {
                scheduler,
                measure: Box::new(measure),
                size: Cell::new(initial),
                frame: RefCell::new(None),
                on_change: RefCell::new(None),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Returns the last measured size.
    pub fn size(&self) -> Size {
        self.inner.size.get()
    }

    /// Registers the listener notified whenever the measured size changes.
    pub fn on_change(&self, notify: impl Fn(Size) + 'static) {
        *self.inner.on_change.borrow_mut() = Some(Rc::new(notify));
    }

    /// Returns whether a measurement is waiting for the next frame.
    pub fn is_pending(&self) -> bool {
        self.inner.frame.borrow().is_some()
    }

    /// Schedules a measurement on the next frame unless one is already pending.
    pub fn request_measure(&self) {
        let inner = &self.inner;
        if inner.disposed.get() || inner.frame.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(inner);
        let frame = inner.scheduler.request_frame(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Some(fired) = inner.frame.borrow_mut().take() {
                fired.release();
            }
            inner.apply();
        }));
        *inner.frame.borrow_mut() = frame.ok();
    }

    /// Measures synchronously, bypassing frame coalescing.
    pub fn measure_now(&self) {
        self.inner.apply();
    }

    /// Cancels any pending frame and stops further updates. Safe to repeat.
    pub fn dispose(&self) {
        self.inner.disposed.set(true);
        let frame = self.inner.frame.borrow_mut().take();
        drop(frame);
    }
}

impl Clone for SizeTracker {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl fmt::Debug for SizeTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizeTracker")
            .field("size", &self.size())
            .field("pending", &self.is_pending())
            .finish()
    }
}
