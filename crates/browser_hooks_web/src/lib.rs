//! Browser (`wasm32`) implementations of the [`browser_hooks_core`] capability contracts.
//!
//! This crate is the concrete wiring layer between the hook controllers and `web-sys`: document
//! listeners, element measurement, `ResizeObserver`, `matchMedia`, and the `location`/`history`
//! query backend. Non-wasm builds compile every adapter to an inert fallback so server-side and
//! native test builds never touch a DOM.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and adapter factories for hook wiring.
pub mod adapters;
pub mod events;
pub mod measure;
pub mod media;
pub mod query;

pub use adapters::{
    browser_available, document_events, host_strategy_name, query_backend,
    selected_host_strategy, DocumentEventsAdapter, HostStrategy, QueryBackendAdapter,
};
pub use events::{document_visible, listen_visibility, DomNode, WebDocumentEvents};
pub use measure::{
    element_metrics, observe_element_resize, resize_observer_supported, viewport_size,
};
pub use media::{current_orientation, media_matches};
pub use query::WebQueryBackend;

#[cfg(target_arch = "wasm32")]
pub(crate) fn js_error(err: wasm_bindgen::JsValue) -> browser_hooks_core::HookError {
    browser_hooks_core::HookError::Js(format!("{err:?}"))
}
