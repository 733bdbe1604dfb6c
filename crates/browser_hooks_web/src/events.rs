//! Document listener registration and visibility.

use std::rc::Rc;

use browser_hooks_core::{ContainsNode, DocumentEvents, DocumentListener, HookError, Subscription};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

#[derive(Debug, Clone, PartialEq, Eq)]
/// DOM node handle used as the node type of the outside-interaction detector.
pub struct DomNode(pub web_sys::Node);

impl DomNode {
    /// Wraps any element as a node.
    pub fn from_element(element: &web_sys::Element) -> Self {
        let node: &web_sys::Node = element.as_ref();
        Self(node.clone())
    }
}

impl ContainsNode for DomNode {
    fn contains_node(&self, other: &Self) -> bool {
        self.0.contains(Some(&other.0))
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Document listener registration reporting the event target as the origin node.
pub struct WebDocumentEvents;

impl DocumentEvents<DomNode> for WebDocumentEvents {
    fn listen(
        &self,
        event_type: &str,
        capture: bool,
        listener: DocumentListener<DomNode>,
    ) -> Result<Subscription, HookError> {
        #[cfg(target_arch = "wasm32")]
        {
            let document = web_sys::window()
                .and_then(|window| window.document())
                .ok_or(HookError::Unavailable("document"))?;
            let closure = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(
                move |event: web_sys::Event| {
                    let origin = event
                        .target()
                        .and_then(|target| target.dyn_into::<web_sys::Node>().ok())
                        .map(DomNode);
                    listener(origin);
                },
            ));
            document
                .add_event_listener_with_callback_and_bool(
                    event_type,
                    closure.as_ref().unchecked_ref(),
                    capture,
                )
                .map_err(crate::js_error)?;
            let event_type = event_type.to_string();
            return Ok(Subscription::new(move || {
                let _ = document.remove_event_listener_with_callback_and_bool(
                    &event_type,
                    closure.as_ref().unchecked_ref(),
                    capture,
                );
                drop(closure);
            }));
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (event_type, capture, listener);
            Ok(Subscription::noop())
        }
    }
}

/// Returns whether the document is currently visible. Without a document this is `true`.
pub fn document_visible() -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.document())
            .map(|document| !document.hidden())
            .unwrap_or(true)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        true
    }
}

/// Calls `callback` with the new visibility on every `visibilitychange`.
///
/// # Errors
///
/// Returns an error when the document is unavailable or rejects the registration.
pub fn listen_visibility(callback: Rc<dyn Fn(bool)>) -> Result<Subscription, HookError> {
    #[cfg(target_arch = "wasm32")]
    {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or(HookError::Unavailable("document"))?;
        let reader = document.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_: web_sys::Event| {
                callback(!reader.hidden());
            }));
        document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())
            .map_err(crate::js_error)?;
        return Ok(Subscription::new(move || {
            let _ = document.remove_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            drop(closure);
        }));
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = callback;
        Ok(Subscription::noop())
    }
}
