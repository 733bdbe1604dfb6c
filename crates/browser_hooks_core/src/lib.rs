//! Platform-neutral contracts and controllers behind the browser UI hooks.
//!
//! Every controller in this crate is driven through a small capability trait
//! ([`Scheduler`], [`DocumentEvents`], [`QueryParamBackend`]) so the same logic runs against the
//! browser adapters in `browser_hooks_web` and against the in-memory implementations here
//! ([`ManualScheduler`], [`MemoryDocument`], [`MemoryQueryBackend`]) in native tests.
//!
//! Resource ownership is carried by [`Subscription`]: each timer, listener, or observer a
//! controller acquires is released exactly once, whichever exit path runs first.
//!
//! # Example
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc, time::Duration};
//!
//! use browser_hooks_core::{DebounceMode, Debouncer, ManualScheduler, Scheduler};
//!
//! let scheduler = ManualScheduler::default();
//! let seen = Rc::new(Cell::new(0_u32));
//! let sink = seen.clone();
//! let shared: Rc<dyn Scheduler> = Rc::new(scheduler.clone());
//! let debounced = Debouncer::new(
//!     shared,
//!     move |value: u32| sink.set(value),
//!     Duration::from_millis(50),
//!     DebounceMode::Trailing,
//! );
//!
//! debounced.call(1);
//! debounced.call(2);
//! scheduler.advance(Duration::from_millis(50));
//! assert_eq!(seen.get(), 2);
//! ```

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod clock;
pub mod debounce;
pub mod error;
pub mod idle;
pub mod orientation;
pub mod outside;
pub mod query;
pub mod scheduler;
pub mod size;
pub mod subscription;

pub use clock::{ClockOptions, ClockSnapshot, ClockTicker, DEFAULT_CLOCK_INTERVAL};
pub use debounce::{DebounceMode, Debouncer, DEFAULT_DEBOUNCE_DELAY};
pub use error::HookError;
pub use idle::{IdleRemount, RemountOptions, DEFAULT_REMOUNT_THRESHOLD};
pub use orientation::{
    Orientation, OrientationOptions, OrientationSettle, OrientationTracker,
    ORIENTATION_SETTLE_DELAY,
};
pub use outside::{
    is_outside, ContainsNode, DocumentEvents, DocumentListener, MemoryDocument,
    NoopDocumentEvents, OutsideClickConfig, OutsideInteraction, DEFAULT_OUTSIDE_EVENT,
};
pub use query::{
    read_query_params, render_search, select_query_params, update_query_param,
    write_query_param, MemoryQueryBackend, QueryParamBackend, QueryParams,
};
pub use scheduler::{ManualScheduler, NoopScheduler, Scheduler};
pub use size::{is_below_breakpoint, BoxMetrics, Size, SizeTracker, MOBILE_BREAKPOINT_PX};
pub use subscription::Subscription;
