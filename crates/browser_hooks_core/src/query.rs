//! Query-string helpers and the pluggable routing backend behind the query-param hooks.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::HookError;

/// Selected query parameters keyed by name; `None` marks an absent parameter.
pub type QueryParams = BTreeMap<String, Option<String>>;

fn parse_pairs(search: &str) -> Vec<(String, String)> {
    let query = search.strip_prefix('?').unwrap_or(search);
    serde_urlencoded::from_str(query).unwrap_or_default()
}

fn encode_pairs(pairs: &[(String, String)]) -> Result<String, HookError> {
    serde_urlencoded::to_string(pairs).map_err(|err| HookError::Query(err.to_string()))
}

/// Reads the first value of each key in `keys` from `search` (with or without a leading `?`).
pub fn select_query_params<S: AsRef<str>>(search: &str, keys: &[S]) -> QueryParams {
    let pairs = parse_pairs(search);
    keys.iter()
        .map(|key| {
            let key = key.as_ref();
            let value = pairs
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.clone());
            (key.to_string(), value)
        })
        .collect()
}

/// Returns `search` with `key` set to `value`, without a leading `?`.
///
/// `None` or an empty value removes every occurrence of `key`. Otherwise the first occurrence is
/// replaced in place and later duplicates are dropped, or the pair is appended when absent.
///
/// # Errors
///
/// Returns [`HookError::Query`] when the updated pairs cannot be encoded.
pub fn update_query_param(search: &str, key: &str, value: Option<&str>) -> Result<String, HookError> {
    let mut pairs = parse_pairs(search);
    match value.filter(|value| !value.is_empty()) {
        None => pairs.retain(|(name, _)| name != key),
        Some(value) => {
            let mut replaced = false;
            pairs.retain_mut(|(name, current)| {
                if name != key {
                    return true;
                }
                if replaced {
                    return false;
                }
                *current = value.to_string();
                replaced = true;
                true
            });
            if !replaced {
                pairs.push((key.to_string(), value.to_string()));
            }
        }
    }
    encode_pairs(&pairs)
}

/// Prefixes a non-empty query with `?`; an empty query renders as an empty string.
pub fn render_search(query: &str) -> String {
    let query = query.strip_prefix('?').unwrap_or(query);
    if query.is_empty() {
        String::new()
    } else {
        format!("?{query}")
    }
}

/// Routing strategy that owns the current URL's query string.
pub trait QueryParamBackend {
    /// Returns the current query string, with or without a leading `?`.
    fn current_search(&self) -> String;

    /// Replaces the current query string without adding a history entry.
    ///
    /// `search` carries no leading `?`; an empty string clears the query.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the navigation.
    fn replace_search(&self, search: &str) -> Result<(), HookError>;
}

/// Reads selected parameters through a backend.
pub fn read_query_params<B, S>(backend: &B, keys: &[S]) -> QueryParams
where
    B: QueryParamBackend + ?Sized,
    S: AsRef<str>,
{
    select_query_params(&backend.current_search(), keys)
}

/// Sets or removes one parameter through a backend.
///
/// # Errors
///
/// Returns an error when encoding fails or the backend rejects the navigation.
pub fn write_query_param<B>(backend: &B, key: &str, value: Option<&str>) -> Result<(), HookError>
where
    B: QueryParamBackend + ?Sized,
{
    let next = update_query_param(&backend.current_search(), key, value)?;
    backend.replace_search(&next)
}

#[derive(Debug, Clone, Default)]
/// In-memory query backend recording every replacement.
pub struct MemoryQueryBackend {
    search: Rc<RefCell<String>>,
    replacements: Rc<RefCell<Vec<String>>>,
}

impl MemoryQueryBackend {
    /// Creates a backend starting at `search`.
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: Rc::new(RefCell::new(search.into())),
            replacements: Rc::default(),
        }
    }

    /// Returns every query string passed to [`QueryParamBackend::replace_search`], oldest first.
    pub fn replacements(&self) -> Vec<String> {
        self.replacements.borrow().clone()
    }
}

impl QueryParamBackend for MemoryQueryBackend {
    fn current_search(&self) -> String {
        self.search.borrow().clone()
    }

    fn replace_search(&self, search: &str) -> Result<(), HookError> {
        *self.search.borrow_mut() = search.to_string();
        self.replacements.borrow_mut().push(search.to_string());
        Ok(())
    }
}
