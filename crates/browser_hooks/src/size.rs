use std::{cell::RefCell, rc::Rc};

use browser_hooks_core::{
    is_below_breakpoint, Size, SizeTracker, Subscription, MOBILE_BREAKPOINT_PX,
};
use browser_hooks_web::{element_metrics, observe_element_resize, resize_observer_supported};
use leptos::{
    create_effect, create_memo, create_rw_signal, html::ElementDescriptor, logging, on_cleanup,
    NodeRef, Signal, SignalGet, SignalSet,
};

use crate::platform::{tracked_element, HookHost};

/// Tracks `window.innerWidth` / `window.innerHeight`.
///
/// Reports `(0, 0)` until the first measurement, which runs on the next animation frame.
/// `resize` and `orientationchange` bursts are coalesced into one measurement per frame.
pub fn use_window_size() -> Signal<Size> {
    window_size_with(&HookHost::browser())
}

pub(crate) fn window_size_with(host: &HookHost) -> Signal<Size> {
    let size = create_rw_signal(Size::ZERO);
    let viewport = host.viewport.clone();
    let tracker = SizeTracker::new(host.scheduler.clone(), Size::ZERO, move || viewport());
    tracker.on_change(move |next| size.set(next));
    tracker.request_measure();

    let trigger = tracker.clone();
    let listener = host.window_listener(
        "use_window_size",
        &["resize", "orientationchange"],
        move || trigger.request_measure(),
    );

    on_cleanup(move || {
        drop(listener);
        tracker.dispose();
    });
    size.into()
}

/// Tracks the size of the element bound to `node_ref`, as the larger of its offset and client
/// boxes per axis.
///
/// Uses a `ResizeObserver`, or window `resize` events where the observer is unavailable. The
/// observation follows the element when it is unmounted or replaced.
pub fn use_element_size<El>(node_ref: NodeRef<El>) -> Signal<Size>
where
    El: ElementDescriptor + Clone + 'static,
{
    let host = HookHost::browser();
    let fallback = host.clone();
    element_size_with(
        &host,
        move || tracked_element(node_ref),
        |element: &web_sys::HtmlElement| element_metrics(element).size(),
        move |element: &web_sys::HtmlElement, remeasure: Rc<dyn Fn()>| {
            if !resize_observer_supported() {
                return fallback.window_listener("use_element_size", &["resize"], move || {
                    remeasure()
                });
            }
            match observe_element_resize(element, remeasure) {
                Ok(subscription) => Some(subscription),
                Err(err) => {
                    logging::warn!("use_element_size: ResizeObserver failed: {err}");
                    None
                }
            }
        },
    )
}

/// Measures whatever `element` currently resolves to.
///
/// `element` is read inside an effect, so a reactive source re-runs the swap: the previous
/// observation is released before the new element is observed and re-measured.
pub(crate) fn element_size_with<E: 'static>(
    host: &HookHost,
    element: impl Fn() -> Option<E> + 'static,
    measure: impl Fn(&E) -> Size + 'static,
    observe: impl Fn(&E, Rc<dyn Fn()>) -> Option<Subscription> + 'static,
) -> Signal<Size> {
    let size = create_rw_signal(Size::ZERO);
    let current: Rc<RefCell<Option<E>>> = Rc::default();
    let measured = current.clone();
    let tracker = SizeTracker::new(host.scheduler.clone(), Size::ZERO, move || {
        measured.borrow().as_ref().map(|element| measure(element))
    });
    tracker.on_change(move |next| size.set(next));

    let watch: Rc<RefCell<Option<Subscription>>> = Rc::default();
    let slot = watch.clone();
    let trigger = tracker.clone();
    create_effect(move |_| {
        let next = element();
        let previous = slot.borrow_mut().take();
        drop(previous);
        if let Some(mounted) = &next {
            let remeasure = trigger.clone();
            let subscription = observe(mounted, Rc::new(move || remeasure.request_measure()));
            *slot.borrow_mut() = subscription;
        }
        *current.borrow_mut() = next;
        trigger.request_measure();
    });

    on_cleanup(move || {
        let subscription = watch.borrow_mut().take();
        drop(subscription);
        tracker.dispose();
    });
    size.into()
}

/// Returns whether the viewport is narrower than `threshold` CSS pixels.
///
/// An unmeasured viewport (width `0`) never counts as narrow.
pub fn use_breakpoint(threshold: u32) -> Signal<bool> {
    breakpoint_with(&HookHost::browser(), threshold)
}

pub(crate) fn breakpoint_with(host: &HookHost, threshold: u32) -> Signal<bool> {
    let size = window_size_with(host);
    create_memo(move |_| is_below_breakpoint(size.get().width, threshold)).into()
}

/// [`use_breakpoint`] at [`MOBILE_BREAKPOINT_PX`].
pub fn use_is_mobile() -> Signal<bool> {
    use_breakpoint(MOBILE_BREAKPOINT_PX)
}
