//! Browser showcase for the hook set, one panel per catalog entry.

mod catalog;
mod showcase;
mod web_app;

pub use catalog::{find_entry, HookEntry, CATALOG, PANEL_KEY};
pub use web_app::SiteApp;

/// Mounts [`SiteApp`] on `<body>` with panic messages routed to the console.
#[cfg(all(feature = "csr", target_arch = "wasm32"))]
pub fn mount() {
    console_error_panic_hook::set_once();
    leptos::mount_to_body(|| leptos::view! { <SiteApp /> })
}
