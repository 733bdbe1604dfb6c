//! `matchMedia` queries.

use browser_hooks_core::Orientation;

/// Evaluates a media query; `None` when `matchMedia` is unavailable or rejects the query.
pub fn media_matches(query: &str) -> Option<bool> {
    #[cfg(target_arch = "wasm32")]
    {
        let list = web_sys::window()?.match_media(query).ok()??;
        return Some(list.matches());
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = query;
        None
    }
}

/// Classifies the current orientation, portrait first.
pub fn current_orientation() -> Orientation {
    let portrait = media_matches(Orientation::PORTRAIT_QUERY).unwrap_or(false);
    let landscape = !portrait && media_matches(Orientation::LANDSCAPE_QUERY).unwrap_or(false);
    Orientation::from_matches(portrait, landscape)
}
