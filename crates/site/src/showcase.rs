use browser_hooks::prelude::*;
use leptos::*;

#[component]
pub(crate) fn ClockPanel() -> impl IntoView {
    let now = use_clock(ClockOptions {
        immediate: true,
        ..ClockOptions::default()
    });

    view! {
        <article class="showcase-panel">
            <h2>"use_clock"</h2>
            <p class="showcase-clock">{move || now.get().format_time(false, true)}</p>
            <p>{move || now.get().format_date()}</p>
        </article>
    }
}

#[component]
pub(crate) fn SizePanel() -> impl IntoView {
    let window = use_window_size();
    let mobile = use_is_mobile();
    let orientation = use_orientation();
    let measured = create_node_ref::<html::Div>();
    let element = use_element_size(measured);

    view! {
        <article class="showcase-panel">
            <h2>"use_window_size / use_element_size / use_orientation"</h2>
            <p>{move || {
                let size = window.get();
                format!("Window: {} x {}", size.width, size.height)
            }}</p>
            <p>{move || if mobile.get() { "Layout: mobile" } else { "Layout: wide" }}</p>
            <p>{move || format!("Orientation: {}", orientation.get())}</p>
            <div class="showcase-resizable" node_ref=measured>
                {move || {
                    let size = element.get();
                    format!("This box: {} x {}", size.width, size.height)
                }}
            </div>
        </article>
    }
}

#[component]
pub(crate) fn DebouncePanel() -> impl IntoView {
    let committed = create_rw_signal(String::new());
    let commits = create_rw_signal(0_u32);
    let debounced = use_debounce(
        move |text: String| {
            committed.set(text);
            commits.update(|count| *count += 1);
        },
        DEFAULT_DEBOUNCE_DELAY,
        false,
    );

    view! {
        <article class="showcase-panel">
            <h2>"use_debounce"</h2>
            <input
                type="search"
                placeholder="Type quickly"
                on:input=move |ev| debounced.call(event_target_value(&ev))
            />
            <p>{move || format!("Committed: {:?} ({} commits)", committed.get(), commits.get())}</p>
        </article>
    }
}

#[component]
pub(crate) fn ModalPanel() -> impl IntoView {
    let modal = use_modal_state(false);
    let dialog = create_node_ref::<html::Div>();
    use_outside_click(
        dialog,
        move || modal.close(),
        OutsideClickOptions {
            enabled: modal.open_signal().into(),
            ..OutsideClickOptions::default()
        },
    );

    view! {
        <article class="showcase-panel">
            <h2>"use_modal_state / use_outside_click"</h2>
            <button type="button" on:click=move |_| modal.open()>"Open dialog"</button>
            <Show when=move || modal.is_open()>
                <div class="showcase-dialog" role="dialog" node_ref=dialog>
                    <p>"Press anywhere outside this dialog to dismiss it."</p>
                    <button type="button" on:click=move |_| modal.close()>"Close"</button>
                </div>
            </Show>
        </article>
    }
}

#[component]
pub(crate) fn QueryPanel() -> impl IntoView {
    let params = use_query_params(&["tab"]);
    let set_param = use_set_query_param();
    let tab = move || {
        params
            .get()
            .get("tab")
            .cloned()
            .flatten()
            .unwrap_or_else(|| "none".to_string())
    };

    view! {
        <article class="showcase-panel">
            <h2>"use_query_params / use_set_query_param"</h2>
            <p>{move || format!("tab = {}", tab())}</p>
            <button type="button" on:click=move |_| set_param.set("tab", Some("overview"))>
                "Overview"
            </button>
            <button type="button" on:click=move |_| set_param.set("tab", Some("release notes"))>
                "Release notes"
            </button>
            <button type="button" on:click=move |_| set_param.remove("tab")>"Clear"</button>
        </article>
    }
}

#[component]
pub(crate) fn RemountPanel() -> impl IntoView {
    let key = use_remount_key(DEFAULT_REMOUNT_THRESHOLD, RemountOptions::default());

    view! {
        <article class="showcase-panel">
            <h2>"use_remount_key"</h2>
            {move || {
                let generation = key.get();
                view! { <RemountedChild generation=generation /> }
            }}
        </article>
    }
}

#[component]
fn RemountedChild(generation: u32) -> impl IntoView {
    let mounted_at = ClockSnapshot::now();

    view! {
        <p>{format!("Generation {generation}, mounted at {}", mounted_at.format_time(true, true))}</p>
    }
}
