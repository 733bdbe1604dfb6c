use browser_hooks_core::{Orientation, OrientationOptions, OrientationTracker};
use leptos::{create_rw_signal, logging, on_cleanup, Signal, SignalSet};

use crate::platform::HookHost;

/// [`use_orientation_with_options`] settling on the next animation frame.
pub fn use_orientation() -> Signal<Orientation> {
    use_orientation_with_options(OrientationOptions::default())
}

/// Tracks the screen orientation from the `(orientation: …)` media queries.
///
/// Starts at [`Orientation::Unknown`]. Each `orientationchange` or `resize` schedules a read
/// after the settle period, replacing any read still pending.
pub fn use_orientation_with_options(options: OrientationOptions) -> Signal<Orientation> {
    orientation_with(&HookHost::browser(), options)
}

pub(crate) fn orientation_with(
    host: &HookHost,
    options: OrientationOptions,
) -> Signal<Orientation> {
    let orientation = create_rw_signal(Orientation::Unknown);
    let read_orientation = host.orientation.clone();
    let tracker = OrientationTracker::new(host.scheduler.clone(), options, move || {
        read_orientation()
    });
    tracker.on_update(move |next| {
        if !next.is_known() {
            logging::warn!("use_orientation: no orientation media query matched");
        }
        orientation.set(next);
    });
    tracker.request_recompute();

    let trigger = tracker.clone();
    let listener = host.window_listener(
        "use_orientation",
        &["orientationchange", "resize"],
        move || trigger.request_recompute(),
    );

    on_cleanup(move || {
        drop(listener);
        tracker.dispose();
    });
    orientation.into()
}
