use leptos::{prelude::*, task::spawn_local};
use shared_types::Coordinate;
use web_sys::KeyboardEvent;

use crate::components::alert;
use crate::server::search_address;

/// Header search box: forward-geocodes a free-text address and hands the
/// matched coordinate to the page. Empty input and "no match" are blocking
/// prompts, per the original workflow; neither touches the map.
#[component]
pub fn AddressSearch<F>(on_found: F, #[prop(into)] disabled: Signal<bool>) -> impl IntoView
where
    F: Fn(Coordinate) + 'static + Copy + Send + Sync,
{
    let query = RwSignal::new(String::new());
    let is_searching = RwSignal::new(false);

    let perform_search = move || {
        let text = query.get_untracked().trim().to_string();
        if text.is_empty() {
            alert("주소를 입력해주세요.");
            return;
        }

        is_searching.set(true);
        spawn_local(async move {
            match search_address(text.clone()).await {
                Ok(Some(coordinate)) => on_found(coordinate),
                Ok(None) => alert("검색 결과가 없습니다."),
                Err(e) => {
                    leptos::logging::log!("address search failed: {}", e);
                    alert("주소 검색 중 오류가 발생했습니다.");
                }
            }
            is_searching.set(false);
        });
    };

    let handle_keydown = move |ev: KeyboardEvent| {
        if ev.key() == "Enter" {
            ev.prevent_default();
            perform_search();
        }
    };

    view! {
        <div class="address-search">
            <input
                type="text"
                class="address-search-input"
                placeholder="주소를 입력하세요 (예: 강남구 역삼동)"
                prop:value=move || query.get()
                on:input=move |ev| query.set(event_target_value(&ev))
                on:keydown=handle_keydown
                disabled=move || disabled.get() || is_searching.get()
            />
            <button
                class="address-search-button"
                on:click=move |_| perform_search()
                disabled=move || disabled.get() || is_searching.get()
            >
                {move || if is_searching.get() { "검색 중..." } else { "검색" }}
            </button>
        </div>
    }
}
