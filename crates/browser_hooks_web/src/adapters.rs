use browser_hooks_core::{
    DocumentEvents, DocumentListener, HookError, MemoryQueryBackend, NoopDocumentEvents,
    QueryParamBackend, Subscription,
};

use crate::{DomNode, WebDocumentEvents, WebQueryBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for hook adapters.
pub enum HostStrategy {
    /// `web-sys` adapters talking to the live window and document.
    Browser,
    /// Inert adapters for native builds, server rendering, and the `headless` feature.
    Headless,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(any(feature = "headless", not(target_arch = "wasm32")))]
    {
        HostStrategy::Headless
    }

    #[cfg(not(any(feature = "headless", not(target_arch = "wasm32"))))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::Headless => "headless",
    }
}

/// Returns whether browser adapters are selected and a window is reachable.
pub fn browser_available() -> bool {
    match selected_host_strategy() {
        HostStrategy::Browser => web_sys::window().is_some(),
        HostStrategy::Headless => false,
    }
}

/// Adapter enum that erases the concrete listener backend behind [`DocumentEvents`].
#[derive(Debug, Clone, Copy)]
pub enum DocumentEventsAdapter {
    /// Listeners on the live document.
    Browser(WebDocumentEvents),
    /// Registration that never delivers events.
    Headless(NoopDocumentEvents),
}

impl DocumentEvents<DomNode> for DocumentEventsAdapter {
    fn listen(
        &self,
        event_type: &str,
        capture: bool,
        listener: DocumentListener<DomNode>,
    ) -> Result<Subscription, HookError> {
        match self {
            Self::Browser(events) => events.listen(event_type, capture, listener),
            Self::Headless(events) => events.listen(event_type, capture, listener),
        }
    }
}

/// Adapter enum that erases the concrete URL backend behind [`QueryParamBackend`].
#[derive(Debug, Clone)]
pub enum QueryBackendAdapter {
    /// `location.search` reads and `history.replaceState` writes.
    Browser(WebQueryBackend),
    /// Query string shared by every headless backend on the thread.
    Headless(MemoryQueryBackend),
}

impl QueryParamBackend for QueryBackendAdapter {
    fn current_search(&self) -> String {
        match self {
            Self::Browser(backend) => backend.current_search(),
            Self::Headless(backend) => backend.current_search(),
        }
    }

    fn replace_search(&self, search: &str) -> Result<(), HookError> {
        match self {
            Self::Browser(backend) => backend.replace_search(search),
            Self::Headless(backend) => backend.replace_search(search),
        }
    }
}

/// Builds the document listener adapter for the selected host strategy.
pub fn document_events() -> DocumentEventsAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => DocumentEventsAdapter::Browser(WebDocumentEvents),
        HostStrategy::Headless => DocumentEventsAdapter::Headless(NoopDocumentEvents),
    }
}

thread_local! {
    static HEADLESS_QUERY: MemoryQueryBackend = MemoryQueryBackend::default();
}

/// Builds the query backend adapter for the selected host strategy.
///
/// Headless backends stand in for the single `location` of a page, so they all share one
/// query string per thread.
pub fn query_backend() -> QueryBackendAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => QueryBackendAdapter::Browser(WebQueryBackend),
        HostStrategy::Headless => {
            QueryBackendAdapter::Headless(HEADLESS_QUERY.with(Clone::clone))
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::rc::Rc;

    use browser_hooks_core::{read_query_params, write_query_param};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn native_builds_select_headless_adapters() {
        assert_eq!(selected_host_strategy(), HostStrategy::Headless);
        assert_eq!(host_strategy_name(), "headless");
        assert!(!browser_available());
        assert!(matches!(document_events(), DocumentEventsAdapter::Headless(_)));
        assert!(matches!(query_backend(), QueryBackendAdapter::Headless(_)));
    }

    #[test]
    fn headless_document_listener_is_inert() {
        let listener = document_events()
            .listen("pointerdown", true, Rc::new(|_: Option<DomNode>| {}))
            .expect("headless listener");

        assert!(!listener.is_active());
    }

    #[test]
    fn headless_query_backends_share_one_location() {
        let writer = query_backend();
        let reader = query_backend();
        write_query_param(&writer, "tab", Some("two words")).expect("write");

        assert_eq!(reader.current_search(), "tab=two+words");
        assert_eq!(
            read_query_params(&reader, &["tab"]).get("tab"),
            Some(&Some("two words".to_string()))
        );
    }
}
