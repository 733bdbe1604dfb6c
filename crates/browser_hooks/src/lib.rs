//! Leptos hooks over browser timers, listeners, observers, and the URL.
//!
//! Each hook binds one controller from [`browser_hooks_core`] to leptos timers and window
//! listeners plus the adapters selected by [`browser_hooks_web::selected_host_strategy`], mirrors the controller's state into a signal,
//! and releases every timer, listener, and observer when the calling scope is cleaned up.
//! Registration failures are logged with `leptos::logging::warn!` and the hook keeps reporting
//! its default value.
//!
//! Outside a browser (native builds or the `headless` feature) every hook returns its default
//! and observes nothing.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod clock;
mod debounce;
mod modal;
mod orientation;
mod outside;
mod platform;
mod query;
mod remount;
mod scheduler;
mod size;

pub use browser_hooks_core::{
    ClockOptions, ClockSnapshot, HookError, Orientation, OrientationOptions, OrientationSettle,
    QueryParams, RemountOptions, Size, DEFAULT_CLOCK_INTERVAL, DEFAULT_DEBOUNCE_DELAY,
    DEFAULT_REMOUNT_THRESHOLD, MOBILE_BREAKPOINT_PX, ORIENTATION_SETTLE_DELAY,
};
pub use clock::use_clock;
pub use debounce::{use_debounce, DebouncedFn};
pub use modal::{use_modal_state, ModalState};
pub use orientation::{use_orientation, use_orientation_with_options};
pub use outside::{use_outside_click, OutsideClickOptions};
pub use query::{
    use_history_query_params, use_query_params, use_set_history_query_param, use_set_query_param,
    RouterQueryBackend, SetQueryParam,
};
pub use remount::use_remount_key;
pub use size::{use_breakpoint, use_element_size, use_is_mobile, use_window_size};

/// Convenience imports for components consuming the hook set.
pub mod prelude {
    pub use crate::{
        use_breakpoint, use_clock, use_debounce, use_element_size, use_history_query_params,
        use_is_mobile, use_modal_state, use_orientation, use_orientation_with_options,
        use_outside_click, use_query_params, use_remount_key, use_set_history_query_param,
        use_set_query_param, use_window_size, ClockOptions, ClockSnapshot, DebouncedFn,
        ModalState, Orientation, OrientationOptions, OrientationSettle, OutsideClickOptions,
        RemountOptions, SetQueryParam, Size, DEFAULT_CLOCK_INTERVAL, DEFAULT_DEBOUNCE_DELAY,
        DEFAULT_REMOUNT_THRESHOLD, MOBILE_BREAKPOINT_PX,
    };
}
