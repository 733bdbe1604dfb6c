use std::{cell::RefCell, fmt, rc::Rc};

use browser_hooks_core::{
    render_search, select_query_params, write_query_param, HookError, QueryParamBackend,
    QueryParams,
};
use leptos::{
    create_memo, create_rw_signal, logging, on_cleanup, store_value, use_context, Memo, RwSignal,
    SignalGet, SignalGetUntracked, SignalSet, StoredValue,
};
use leptos_router::{use_location, use_navigate, Location, NavigateOptions, RouterContext};

use crate::platform::HookHost;

type Navigate = Rc<dyn Fn(&str, NavigateOptions)>;

/// Query backend routing writes through the enclosing `leptos_router` router.
///
/// Writes replace the current history entry and leave the scroll position alone.
pub struct RouterQueryBackend {
    location: Location,
    navigate: Navigate,
}

impl RouterQueryBackend {
    /// Binds to the router in the current reactive scope.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Navigation`] when no router is in scope.
    pub fn from_context() -> Result<Self, HookError> {
        if use_context::<RouterContext>().is_none() {
            return Err(HookError::Navigation("no router in scope".to_string()));
        }
        Ok(Self {
            location: use_location(),
            navigate: Rc::new(use_navigate()),
        })
    }
}

impl QueryParamBackend for RouterQueryBackend {
    fn current_search(&self) -> String {
        self.location.search.get_untracked()
    }

    fn replace_search(&self, search: &str) -> Result<(), HookError> {
        let pathname = self.location.pathname.get_untracked();
        let hash = self.location.hash.get_untracked();
        let hash = match hash.as_str() {
            "" => String::new(),
            fragment if fragment.starts_with('#') => hash,
            fragment => format!("#{fragment}"),
        };
        (self.navigate)(
            &format!("{pathname}{}{hash}", render_search(search)),
            NavigateOptions {
                replace: true,
                scroll: false,
                ..Default::default()
            },
        );
        Ok(())
    }
}

impl fmt::Debug for RouterQueryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterQueryBackend")
            .field("search", &self.location.search.get_untracked())
            .finish()
    }
}

/// `Copy` setter for one query parameter at a time.
#[derive(Clone, Copy)]
pub struct SetQueryParam {
    backend: StoredValue<Rc<dyn QueryParamBackend>>,
    history: bool,
}

impl SetQueryParam {
    /// Sets `key` to `value`; `None` or an empty value removes it.
    ///
    /// Failures are logged and leave the URL unchanged.
    pub fn set(&self, key: &str, value: Option<&str>) {
        let Some(backend) = self.backend.try_get_value() else {
            return;
        };
        match write_query_param(&*backend, key, value) {
            Ok(()) => {
                if self.history {
                    publish_history_search(&backend.current_search());
                }
            }
            Err(err) => logging::warn!("query parameter `{key}` update failed: {err}"),
        }
    }

    /// Removes every occurrence of `key`.
    pub fn remove(&self, key: &str) {
        self.set(key, None);
    }
}

impl fmt::Debug for SetQueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetQueryParam")
            .field("tracks_history", &self.history)
            .finish()
    }
}

fn owned_keys<S: AsRef<str>>(keys: &[S]) -> Vec<String> {
    keys.iter().map(|key| key.as_ref().to_string()).collect()
}

fn router_in_scope() -> bool {
    use_context::<RouterContext>().is_some()
}

/// Reads `keys` from the router location, recomputed on every navigation.
///
/// Falls back to [`use_history_query_params`] when no router is in scope.
pub fn use_query_params<S: AsRef<str>>(keys: &[S]) -> Memo<QueryParams> {
    if !router_in_scope() {
        return use_history_query_params(keys);
    }
    let location = use_location();
    let keys = owned_keys(keys);
    create_memo(move |_| select_query_params(&location.search.get(), &keys))
}

/// Returns a setter writing through the router, or through `history.replaceState` when no
/// router is in scope.
pub fn use_set_query_param() -> SetQueryParam {
    match RouterQueryBackend::from_context() {
        Ok(backend) => {
            let backend: Rc<dyn QueryParamBackend> = Rc::new(backend);
            SetQueryParam {
                backend: store_value(backend),
                history: false,
            }
        }
        Err(_) => use_set_history_query_param(),
    }
}

thread_local! {
    /// Search signals of every mounted history reader, wherever it sits in the tree.
    static HISTORY_READERS: RefCell<Vec<RwSignal<String>>> = const { RefCell::new(Vec::new()) };
}

fn publish_history_search(search: &str) {
    let readers = HISTORY_READERS.with(|readers| readers.borrow().clone());
    for reader in readers {
        let _ = reader.try_set(search.to_string());
    }
}

/// Search signal fed by `popstate` and by every history setter, released with the scope.
fn history_search(host: &HookHost) -> RwSignal<String> {
    let backend = host.query.clone();
    let search = create_rw_signal(backend.current_search());
    HISTORY_READERS.with(|readers| readers.borrow_mut().push(search));

    let listener = host.window_listener("use_history_query_params", &["popstate"], move || {
        let _ = search.try_set(backend.current_search());
    });
    on_cleanup(move || {
        drop(listener);
        HISTORY_READERS.with(|readers| readers.borrow_mut().retain(|reader| *reader != search));
    });
    search
}

/// Reads `keys` from `location.search` without a router.
///
/// Updates after `popstate` and after writes made through any [`use_set_history_query_param`]
/// setter, including ones in unrelated components.
pub fn use_history_query_params<S: AsRef<str>>(keys: &[S]) -> Memo<QueryParams> {
    history_params_with(&HookHost::browser(), keys)
}

/// Returns a setter writing with `history.replaceState`, without a router.
pub fn use_set_history_query_param() -> SetQueryParam {
    history_setter_with(&HookHost::browser())
}

pub(crate) fn history_params_with<S: AsRef<str>>(
    host: &HookHost,
    keys: &[S],
) -> Memo<QueryParams> {
    let search = history_search(host);
    let keys = owned_keys(keys);
    create_memo(move |_| select_query_params(&search.get(), &keys))
}

pub(crate) fn history_setter_with(host: &HookHost) -> SetQueryParam {
    SetQueryParam {
        backend: store_value(host.query.clone()),
        history: true,
    }
}
