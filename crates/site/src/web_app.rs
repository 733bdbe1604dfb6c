use browser_hooks::prelude::*;
use leptos::*;
use leptos_meta::*;
use leptos_router::Router;

use crate::catalog::{find_entry, HookEntry, CATALOG, PANEL_KEY};
use crate::showcase::{
    ClockPanel, DebouncePanel, ModalPanel, QueryPanel, RemountPanel, SizePanel,
};

/// Showcase root; the `panel` query parameter narrows the page to one catalog entry.
#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Browser hooks" />
        <Meta name="description" content="Live showcase of the browser UI hooks." />

        <Router>
            <main class="site-root">
                <h1>"Browser hooks"</h1>
                <CatalogNav />
                <SelectedPanels />
            </main>
        </Router>
    }
}

#[component]
fn CatalogNav() -> impl IntoView {
    let set_panel = use_set_query_param();

    view! {
        <nav class="catalog-nav">
            <button type="button" on:click=move |_| set_panel.remove(PANEL_KEY)>"All"</button>
            {CATALOG
                .iter()
                .map(|entry: &'static HookEntry| {
                    view! {
                        <button
                            type="button"
                            title=entry.summary
                            on:click=move |_| set_panel.set(PANEL_KEY, Some(entry.slug))
                        >
                            {entry.hooks}
                        </button>
                    }
                })
                .collect_view()}
        </nav>
    }
}

#[component]
fn SelectedPanels() -> impl IntoView {
    let params = use_query_params(&[PANEL_KEY]);
    let selected = move || params.with(|params| params.get(PANEL_KEY).cloned().flatten());

    view! {
        <section class="showcase">
            {move || match selected() {
                None => CATALOG.iter().map(panel).collect_view(),
                Some(slug) => match find_entry(&slug) {
                    Some(entry) => panel(entry),
                    None => view! { <p>{format!("No panel named {slug:?}.")}</p> }.into_view(),
                },
            }}
        </section>
    }
}

fn panel(entry: &'static HookEntry) -> View {
    match entry.slug {
        "clock" => view! { <ClockPanel /> }.into_view(),
        "size" => view! { <SizePanel /> }.into_view(),
        "debounce" => view! { <DebouncePanel /> }.into_view(),
        "modal" => view! { <ModalPanel /> }.into_view(),
        "query" => view! { <QueryPanel /> }.into_view(),
        "remount" => view! { <RemountPanel /> }.into_view(),
        _ => ().into_view(),
    }
}
