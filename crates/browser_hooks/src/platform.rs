use std::rc::Rc;

use browser_hooks_core::{
    ClockSnapshot, DocumentEvents, DocumentListener, HookError, Orientation, QueryParamBackend,
    Scheduler, Size, Subscription,
};
use browser_hooks_web::{
    browser_available, current_orientation, document_visible, listen_visibility, viewport_size,
};
use leptos::{html::ElementDescriptor, logging, window_event_listener_untyped, NodeRef};

use crate::scheduler::host_scheduler;

pub(crate) const VISIBILITY_EVENT: &str = "visibilitychange";

/// Window listeners registered through `leptos::window_event_listener_untyped`.
///
/// Registration is skipped outside a browser, where leptos has no window to bind.
#[derive(Debug, Clone, Copy, Default)]
struct LeptosWindowEvents;

impl DocumentEvents<()> for LeptosWindowEvents {
    fn listen(
        &self,
        event_type: &str,
        _capture: bool,
        listener: DocumentListener<()>,
    ) -> Result<Subscription, HookError> {
        if !browser_available() {
            return Ok(Subscription::noop());
        }
        let handle = window_event_listener_untyped(event_type, move |_| listener(Some(())));
        Ok(Subscription::new(move || handle.remove()))
    }
}

/// Document visibility; the listener receives `Some(visible)` on every `visibilitychange`.
#[derive(Debug, Clone, Copy, Default)]
struct DocumentVisibility;

impl DocumentEvents<bool> for DocumentVisibility {
    fn listen(
        &self,
        _event_type: &str,
        _capture: bool,
        listener: DocumentListener<bool>,
    ) -> Result<Subscription, HookError> {
        listen_visibility(Rc::new(move |visible| listener(Some(visible))))
    }
}

/// Host services a hook instance is wired to.
#[derive(Clone)]
pub(crate) struct HookHost {
    pub(crate) scheduler: Rc<dyn Scheduler>,
    pub(crate) window: Rc<dyn DocumentEvents<()>>,
    pub(crate) visibility: Rc<dyn DocumentEvents<bool>>,
    pub(crate) document_visible: Rc<dyn Fn() -> bool>,
    pub(crate) viewport: Rc<dyn Fn() -> Option<Size>>,
    pub(crate) orientation: Rc<dyn Fn() -> Orientation>,
    pub(crate) clock: Rc<dyn Fn() -> ClockSnapshot>,
    pub(crate) query: Rc<dyn QueryParamBackend>,
}

impl HookHost {
    /// Adapters for the selected host strategy.
    pub(crate) fn browser() -> Self {
        Self {
            scheduler: host_scheduler(),
            window: Rc::new(LeptosWindowEvents),
            visibility: Rc::new(DocumentVisibility),
            document_visible: Rc::new(document_visible),
            viewport: Rc::new(viewport_size),
            orientation: Rc::new(current_orientation),
            clock: Rc::new(ClockSnapshot::now),
            query: Rc::new(browser_hooks_web::query_backend()),
        }
    }

    /// Registers `callback` for every event in `event_types`; the subscription removes all of
    /// them. A failed registration is logged and rolls back the ones before it.
    pub(crate) fn window_listener(
        &self,
        hook: &str,
        event_types: &[&str],
        callback: impl Fn() + 'static,
    ) -> Option<Subscription> {
        let callback: Rc<dyn Fn()> = Rc::new(callback);
        let mut registered = Vec::with_capacity(event_types.len());
        for event_type in event_types {
            let callback = callback.clone();
            match self
                .window
                .listen(event_type, false, Rc::new(move |_: Option<()>| callback()))
            {
                Ok(subscription) => registered.push(subscription),
                Err(err) => {
                    logging::warn!("{hook}: `{event_type}` listener registration failed: {err}");
                    return None;
                }
            }
        }
        Some(Subscription::new(move || drop(registered)))
    }

    pub(crate) fn visibility_listener(
        &self,
        hook: &str,
        callback: impl Fn(bool) + 'static,
    ) -> Option<Subscription> {
        let listener = Rc::new(move |visible: Option<bool>| callback(visible.unwrap_or(true)));
        match self.visibility.listen(VISIBILITY_EVENT, false, listener) {
            Ok(subscription) => Some(subscription),
            Err(err) => {
                logging::warn!("{hook}: visibility listener registration failed: {err}");
                None
            }
        }
    }

    pub(crate) fn is_document_visible(&self) -> bool {
        (self.document_visible)()
    }
}

/// Resolves a mounted element without tracking the node ref.
pub(crate) fn mounted_element<El>(node_ref: NodeRef<El>) -> Option<web_sys::HtmlElement>
where
    El: ElementDescriptor + Clone + 'static,
{
    node_ref.get_untracked().map(html_element)
}

/// Resolves a mounted element and tracks the node ref, so effects re-run on remount.
pub(crate) fn tracked_element<El>(node_ref: NodeRef<El>) -> Option<web_sys::HtmlElement>
where
    El: ElementDescriptor + Clone + 'static,
{
    node_ref.get().map(html_element)
}

fn html_element<El>(element: leptos::HtmlElement<El>) -> web_sys::HtmlElement
where
    El: ElementDescriptor + 'static,
{
    let element = element.into_any();
    let html: &web_sys::HtmlElement = &element;
    html.clone()
}
