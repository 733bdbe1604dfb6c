/// One showcase panel and the hooks it exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookEntry {
    /// Value of the `panel` query parameter selecting this entry.
    pub slug: &'static str,
    /// Hooks shown on the panel.
    pub hooks: &'static str,
    pub summary: &'static str,
}

/// Query parameter holding the selected panel slug.
pub const PANEL_KEY: &str = "panel";

pub const CATALOG: &[HookEntry] = &[
    HookEntry {
        slug: "clock",
        hooks: "use_clock",
        summary: "Wall clock that pauses while the tab is hidden.",
    },
    HookEntry {
        slug: "size",
        hooks: "use_window_size, use_element_size, use_orientation",
        summary: "Viewport, element, and orientation tracking.",
    },
    HookEntry {
        slug: "debounce",
        hooks: "use_debounce",
        summary: "Trailing debounce over a text field.",
    },
    HookEntry {
        slug: "modal",
        hooks: "use_modal_state, use_outside_click",
        summary: "Dialog dismissed by a press outside it.",
    },
    HookEntry {
        slug: "query",
        hooks: "use_query_params, use_set_query_param",
        summary: "URL query state without a reload.",
    },
    HookEntry {
        slug: "remount",
        hooks: "use_remount_key",
        summary: "Subtree remounted once after a minute on screen.",
    },
];

/// Looks up a catalog entry by slug, ignoring ASCII case.
pub fn find_entry(slug: &str) -> Option<&'static HookEntry> {
    CATALOG
        .iter()
        .find(|entry| entry.slug.eq_ignore_ascii_case(slug.trim()))
}
