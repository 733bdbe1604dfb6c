use std::{borrow::Cow, rc::Rc};

use browser_hooks_core::{
    ContainsNode, DocumentEvents, OutsideClickConfig, OutsideInteraction, DEFAULT_OUTSIDE_EVENT,
};
use browser_hooks_web::DomNode;
use leptos::{
    create_effect, html::ElementDescriptor, logging, on_cleanup, MaybeSignal, NodeRef,
    SignalGet, SignalGetUntracked,
};

use crate::platform::mounted_element;

#[derive(Debug, Clone)]
/// Options for [`use_outside_click`].
pub struct OutsideClickOptions {
    /// Document event to observe.
    pub event_type: Cow<'static, str>,
    /// Attaches the listener while `true`; a reactive value re-attaches and detaches live.
    pub enabled: MaybeSignal<bool>,
}

impl Default for OutsideClickOptions {
    fn default() -> Self {
        Self {
            event_type: Cow::Borrowed(DEFAULT_OUTSIDE_EVENT),
            enabled: MaybeSignal::Static(true),
        }
    }
}

/// Calls `on_outside` for every document event that starts outside the element bound to
/// `target`.
///
/// The listener runs in the capture phase and is removed when the owning scope is cleaned up.
/// Nothing fires while `target` is unmounted.
pub fn use_outside_click<El>(
    target: NodeRef<El>,
    on_outside: impl Fn() + 'static,
    options: OutsideClickOptions,
) where
    El: ElementDescriptor + Clone + 'static,
{
    let events: Rc<dyn DocumentEvents<DomNode>> = Rc::new(browser_hooks_web::document_events());
    let resolve_target = move || {
        mounted_element(target).map(|element| {
            let element: &web_sys::Element = &element;
            DomNode::from_element(element)
        })
    };
    outside_click_with(events, resolve_target, on_outside, options);
}

pub(crate) fn outside_click_with<N: ContainsNode + 'static>(
    events: Rc<dyn DocumentEvents<N>>,
    target: impl Fn() -> Option<N> + 'static,
    on_outside: impl Fn() + 'static,
    options: OutsideClickOptions,
) {
    let config = OutsideClickConfig {
        event_type: options.event_type,
        enabled: options.enabled.get_untracked(),
    };
    let detector = match OutsideInteraction::new(events, target, on_outside, config) {
        Ok(detector) => detector,
        Err(err) => {
            logging::warn!("use_outside_click: listener registration failed: {err}");
            return;
        }
    };

    if let MaybeSignal::Dynamic(enabled) = options.enabled {
        let toggled = detector.clone();
        create_effect(move |_| {
            if let Err(err) = toggled.set_enabled(enabled.get()) {
                logging::warn!("use_outside_click: listener registration failed: {err}");
            }
        });
    }

    on_cleanup(move || detector.dispose());
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use browser_hooks_core::MemoryDocument;
    use leptos::{create_rw_signal, SignalSet};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::platform::testing::mount_while;

    /// Flat node: each region only contains itself.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Region(u8);

    impl ContainsNode for Region {
        fn contains_node(&self, other: &Self) -> bool {
            self == other
        }
    }

    const DIALOG: Region = Region(1);
    const BACKDROP: Region = Region(2);

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + Clone + 'static) {
        let hits = Rc::new(Cell::new(0_u32));
        let sink = hits.clone();
        (hits, move || sink.set(sink.get() + 1))
    }

    #[test]
    fn enabled_signal_attaches_and_detaches_one_listener() {
        let runtime = leptos::create_runtime();
        let document = MemoryDocument::<Region>::default();
        let enabled = create_rw_signal(false);
        let (hits, on_outside) = counter();
        outside_click_with(
            Rc::new(document.clone()),
            || Some(DIALOG),
            on_outside,
            OutsideClickOptions {
                enabled: MaybeSignal::Dynamic(enabled.into()),
                ..OutsideClickOptions::default()
            },
        );
        assert_eq!(document.listener_count(DEFAULT_OUTSIDE_EVENT), 0);

        enabled.set(true);
        enabled.set(true);
        assert_eq!(document.listener_count(DEFAULT_OUTSIDE_EVENT), 1);
        assert!(document.all_capture(DEFAULT_OUTSIDE_EVENT));
        document.dispatch(DEFAULT_OUTSIDE_EVENT, Some(BACKDROP));
        document.dispatch(DEFAULT_OUTSIDE_EVENT, Some(DIALOG));
        assert_eq!(hits.get(), 1);

        enabled.set(false);
        assert_eq!(document.listener_count(DEFAULT_OUTSIDE_EVENT), 0);
        assert_eq!(document.removals(), 1);
        document.dispatch(DEFAULT_OUTSIDE_EVENT, Some(BACKDROP));
        assert_eq!(hits.get(), 1);
        runtime.dispose();
    }

    #[test]
    fn unmount_removes_the_document_listener() {
        let runtime = leptos::create_runtime();
        let document = MemoryDocument::<Region>::default();
        let mounted = create_rw_signal(true);
        let (hits, on_outside) = counter();
        let events = document.clone();
        mount_while(mounted, move || {
            outside_click_with(
                Rc::new(events.clone()),
                || Some(DIALOG),
                on_outside.clone(),
                OutsideClickOptions {
                    event_type: Cow::Borrowed("click"),
                    ..OutsideClickOptions::default()
                },
            )
        });
        assert_eq!(document.listener_count("click"), 1);

        mounted.set(false);
        assert_eq!(document.removals(), 1);
        document.dispatch("click", Some(BACKDROP));
        assert_eq!(hits.get(), 0);
        runtime.dispose();
    }

    #[test]
    fn unmounted_target_ignores_every_event() {
        let runtime = leptos::create_runtime();
        let document = MemoryDocument::<Region>::default();
        let (hits, on_outside) = counter();
        outside_click_with(
            Rc::new(document.clone()),
            || None,
            on_outside,
            OutsideClickOptions::default(),
        );

        document.dispatch(DEFAULT_OUTSIDE_EVENT, Some(BACKDROP));
        assert_eq!(hits.get(), 0);
        runtime.dispose();
    }
}
