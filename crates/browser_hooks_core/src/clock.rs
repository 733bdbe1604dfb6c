//! Wall-clock snapshots and the interval ticker behind the clock hook.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{Scheduler, Subscription};

/// Tick interval used when the caller does not pick one.
pub const DEFAULT_CLOCK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Clock hook configuration.
pub struct ClockOptions {
    /// Tick interval.
    #[serde(with = "duration_ms")]
    pub interval: Duration,
    /// Refresh once immediately whenever ticking (re)starts.
    pub immediate: bool,
    /// Stop ticking while the document is hidden.
    pub pause_when_hidden: bool,
}

impl Default for ClockOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_CLOCK_INTERVAL,
            immediate: false,
            pause_when_hidden: true,
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Local wall-clock reading.
pub struct ClockSnapshot {
    /// Full year.
    pub year: u32,
    /// Month, 1-based.
    pub month: u32,
    /// Day of month, 1-based.
    pub day: u32,
    /// Hour, 0-23.
    pub hour: u32,
    /// Minute, 0-59.
    pub minute: u32,
    /// Second, 0-59.
    pub second: u32,
}

impl Default for ClockSnapshot {
    fn default() -> Self {
        Self {
            year: 1970,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl ClockSnapshot {
    /// Reads the local time. Non-wasm targets report the unix epoch.
    pub fn now() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let date = js_sys::Date::new_0();
            Self {
                year: date.get_full_year(),
                month: date.get_month() + 1,
                day: date.get_date(),
                hour: date.get_hours(),
                minute: date.get_minutes(),
                second: date.get_seconds(),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::default()
        }
    }

    /// Formats the time of day as `HH:MM` or `HH:MM:SS`, on a 24- or 12-hour clock.
    pub fn format_time(&self, use_24_hour: bool, with_seconds: bool) -> String {
        let (hour, suffix) = if use_24_hour {
            (self.hour, "")
        } else {
            let hour = match self.hour % 12 {
                0 => 12,
                hour => hour,
            };
            (hour, if self.hour < 12 { " AM" } else { " PM" })
        };
        if with_seconds {
            format!("{hour:02}:{:02}:{:02}{suffix}", self.minute, self.second)
        } else {
            format!("{hour:02}:{:02}{suffix}", self.minute)
        }
    }

    /// Formats the date as `YYYY-MM-DD`.
    pub fn format_date(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

struct TickerInner {
    scheduler: Rc<dyn Scheduler>,
    options: ClockOptions,
    tick: Rc<dyn Fn()>,
    timer: RefCell<Option<Subscription>>,
    running: Cell<bool>,
    disposed: Cell<bool>,
}

impl TickerInner {
    fn arm(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let timer = self.scheduler.set_timeout(
            self.options.interval,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if let Some(fired) = inner.timer.borrow_mut().take() {
                    fired.release();
                }
                if !inner.running.get() {
                    return;
                }
                inner.arm();
                (inner.tick)();
            }),
        );
        *self.timer.borrow_mut() = timer.ok();
    }
}

/// Repeating ticker calling `tick` every [`ClockOptions::interval`].
///
/// Ticking is built from chained one-shot timers, so it may drift under load the same way
/// browser intervals do.
pub struct ClockTicker {
    inner: Rc<TickerInner>,
}

impl ClockTicker {
    /// Creates a ticker and starts it.
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        options: ClockOptions,
        tick: impl Fn() + 'static,
    ) -> Self {
        let ticker = Self {
            inner: Rc::new(TickerInner {
                scheduler,
                options,
                tick: Rc::new(tick),
                timer: RefCell::new(None),
                running: Cell::new(false),
                disposed: Cell::new(false),
            }),
        };
        ticker.start();
        ticker
    }

    /// Returns the configured options.
    pub fn options(&self) -> ClockOptions {
        self.inner.options
    }

    /// Returns whether ticking is active.
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Starts ticking; refreshes immediately first when [`ClockOptions::immediate`] is set.
    pub fn start(&self) {
        let inner = &self.inner;
        if inner.disposed.get() || inner.running.get() {
            return;
        }
        inner.running.set(true);
        inner.arm();
        if inner.options.immediate {
            (inner.tick)();
        }
    }

    /// Stops ticking.
    pub fn stop(&self) {
        self.inner.running.set(false);
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

    /// Stops ticking for good. Safe to repeat.
    pub fn dispose(&self) {
        self.inner.disposed.set(true);
        self.stop();
    }
}

impl Clone for ClockTicker {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl fmt::Debug for ClockTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockTicker")
            .field("options", &self.inner.options)
            .field("running", &self.is_running())
            .finish()
    }
}
