//! Error type shared by host adapters and controllers.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures surfaced by scheduler, listener, and query-parameter adapters.
///
/// Hooks never propagate these to callers; they log and fall back to the documented default.
pub enum HookError {
    /// A required host API (window, document, history) is not present.
    #[error("{0} unavailable")]
    Unavailable(&'static str),
    /// A host API call rejected the request.
    #[error("host call failed: {0}")]
    Js(String),
    /// A query string could not be encoded.
    #[error("query string encoding failed: {0}")]
    Query(String),
    /// The routing backend refused a navigation.
    #[error("navigation failed: {0}")]
    Navigation(String),
}
