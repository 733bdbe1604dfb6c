//! `location` / `history` query backend.

use browser_hooks_core::{HookError, QueryParamBackend};

#[cfg(target_arch = "wasm32")]
use browser_hooks_core::render_search;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, Copy, Default)]
/// Query backend reading `location.search` and writing with `history.replaceState`.
///
/// Path and fragment are preserved on every write, and no navigation or scroll happens.
pub struct WebQueryBackend;

impl QueryParamBackend for WebQueryBackend {
    fn current_search(&self) -> String {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|window| window.location().search().ok())
                .unwrap_or_default()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            String::new()
        }
    }

    fn replace_search(&self, search: &str) -> Result<(), HookError> {
        #[cfg(target_arch = "wasm32")]
        {
            let window = web_sys::window().ok_or(HookError::Unavailable("window"))?;
            let location = window.location();
            let pathname = location.pathname().map_err(crate::js_error)?;
            let hash = location.hash().unwrap_or_default();
            let url = format!("{pathname}{}{hash}", render_search(search));
            window
                .history()
                .map_err(crate::js_error)?
                .replace_state_with_url(&JsValue::NULL, "", Some(&url))
                .map_err(crate::js_error)?;
            return Ok(());
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = search;
            Err(HookError::Unavailable("history"))
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use browser_hooks_core::read_query_params;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn native_backend_reads_empty_and_rejects_writes() {
        let params = read_query_params(&WebQueryBackend, &["tab"]);
        assert_eq!(params.get("tab"), Some(&None));
        assert!(matches!(
            WebQueryBackend.replace_search("tab=1"),
            Err(HookError::Unavailable("history"))
        ));
    }
}
