use leptos::{prelude::*, task::spawn_local};
use shared_types::{SelectedLocation, WishlistEntry, WishlistGroup};

use crate::components::{alert, confirm, error::ErrorView, loading::LoadingView};
use crate::server::{delete_wishlist_entry, save_wishlist_entry};

/// Sidebar panel: save the current selection as a wishlist entry, browse the
/// persisted entries grouped by label, delete them, export everything as CSV.
///
/// The list is never patched in place: every mutation bumps the resource and
/// re-renders from a fresh backend fetch.
#[component]
pub fn WishlistPanel<F, G>(
    wishlist: Resource<Result<Vec<WishlistGroup>, ServerFnError>>,
    selection: RwSignal<Option<SelectedLocation>>,
    on_mutated: F,
    on_locate: G,
) -> impl IntoView
where
    F: Fn() + 'static + Copy + Send + Sync,
    G: Fn(String) + 'static + Copy + Send + Sync,
{
    let group_input = RwSignal::new(String::new());
    let color_input = RwSignal::new("#ff0000".to_string());
    let note_input = RwSignal::new(String::new());
    let is_saving = RwSignal::new(false);
    let panel_error = RwSignal::new(Option::<String>::None);
    let collapsed_groups = RwSignal::new(Vec::<String>::new());

    // Save is only meaningful once the selection's address has resolved.
    let selected_address = Memo::new(move |_| selection.get().and_then(|sel| sel.address));

    let save_current = move |_ev: web_sys::MouseEvent| {
        let Some(address) = selected_address.get_untracked() else {
            alert("지도에서 마킹할 위치를 먼저 클릭하세요.");
            return;
        };
        if address.trim().is_empty() {
            alert("선택한 위치의 주소를 확인할 수 없습니다.");
            return;
        }

        let entry = WishlistEntry {
            address,
            group_name: group_input.get_untracked().trim().to_string(),
            color: color_input.get_untracked(),
            note: note_input.get_untracked(),
        };

        is_saving.set(true);
        panel_error.set(None);
        spawn_local(async move {
            match save_wishlist_entry(entry).await {
                Ok(()) => {
                    note_input.set(String::new());
                    on_mutated();
                }
                Err(e) => {
                    leptos::logging::log!("wishlist save failed: {}", e);
                    panel_error.set(Some("저장에 실패했습니다.".to_string()));
                }
            }
            is_saving.set(false);
        });
    };

    let delete_entry = move |address: String| {
        if !confirm(&format!("'{}' 항목을 삭제할까요?", address)) {
            return;
        }
        panel_error.set(None);
        spawn_local(async move {
            match delete_wishlist_entry(address).await {
                Ok(()) => on_mutated(),
                Err(e) => {
                    leptos::logging::log!("wishlist delete failed: {}", e);
                    panel_error.set(Some("삭제에 실패했습니다.".to_string()));
                }
            }
        });
    };

    // Backend-rendered download, served through the same-origin proxy route.
    let export = move |_ev: web_sys::MouseEvent| {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href("/api/wishlist/export");
        }
    };

    let toggle_group = move |name: String| {
        collapsed_groups.update(|collapsed| {
            if let Some(idx) = collapsed.iter().position(|g| *g == name) {
                collapsed.remove(idx);
            } else {
                collapsed.push(name);
            }
        });
    };

    view! {
        <div class="wishlist-panel">
            <div class="wishlist-save-form">
                <h3>"위시리스트에 저장"</h3>
                <div class="wishlist-save-address">
                    {move || selected_address.get()
                        .unwrap_or_else(|| "지도에서 위치를 선택하세요.".to_string())}
                </div>
                <input
                    type="text"
                    class="wishlist-group-input"
                    placeholder="그룹 이름 (비우면 기타)"
                    prop:value=move || group_input.get()
                    on:input=move |ev| group_input.set(event_target_value(&ev))
                />
                <div class="wishlist-save-row">
                    <input
                        type="color"
                        class="wishlist-color-input"
                        prop:value=move || color_input.get()
                        on:input=move |ev| color_input.set(event_target_value(&ev))
                    />
                    <input
                        type="text"
                        class="wishlist-note-input"
                        placeholder="메모"
                        prop:value=move || note_input.get()
                        on:input=move |ev| note_input.set(event_target_value(&ev))
                    />
                </div>
                <button
                    class="wishlist-save-button"
                    on:click=save_current
                    disabled=move || selected_address.get().is_none() || is_saving.get()
                >
                    {move || if is_saving.get() { "저장 중..." } else { "저장" }}
                </button>
            </div>

            {move || panel_error.get().map(|message| view! {
                <ErrorView message=Some(message) />
            })}

            <div class="wishlist-list">
                <div class="wishlist-list-header">
                    <h3>"위시리스트"</h3>
                    <button class="wishlist-export-button" on:click=export>
                        "CSV 내보내기"
                    </button>
                </div>
                <Suspense fallback=|| view! { <LoadingView message=None /> }>
                    {move || match wishlist.get() {
                        Some(Ok(groups)) => {
                            if groups.is_empty() {
                                view! {
                                    <p class="wishlist-empty">"저장된 위치가 없습니다."</p>
                                }.into_any()
                            } else {
                                groups.into_iter().map(|group| {
                                    let name = group.name.clone();
                                    let toggle_name = name.clone();
                                    let collapsed_name = name.clone();
                                    let is_collapsed = Memo::new(move |_| {
                                        collapsed_groups.get().contains(&collapsed_name)
                                    });
                                    view! {
                                        <div class="wishlist-group">
                                            <button
                                                class="wishlist-group-header"
                                                on:click=move |_| toggle_group(toggle_name.clone())
                                            >
                                                <span class="wishlist-group-name">{name.clone()}</span>
                                                <span class="wishlist-group-count">
                                                    {format!("({})", group.count())}
                                                </span>
                                                <span class="wishlist-group-chevron">
                                                    {move || if is_collapsed.get() { "▸" } else { "▾" }}
                                                </span>
                                            </button>
                                            <ul
                                                class="wishlist-entries"
                                                class:collapsed=move || is_collapsed.get()
                                            >
                                                {group.entries.into_iter().map(|entry| {
                                                    let address = entry.address.clone();
                                                    let locate_address = address.clone();
                                                    let delete_address = address.clone();
                                                    view! {
                                                        <li class="wishlist-entry">
                                                            <span
                                                                class="wishlist-entry-color"
                                                                style:background-color=entry.color.clone()
                                                            ></span>
                                                            <button
                                                                class="wishlist-entry-address"
                                                                title="지도에서 보기"
                                                                on:click=move |_| on_locate(locate_address.clone())
                                                            >
                                                                {address.clone()}
                                                            </button>
                                                            {(!entry.note.is_empty()).then(|| view! {
                                                                <span class="wishlist-entry-note">{entry.note.clone()}</span>
                                                            })}
                                                            <button
                                                                class="wishlist-entry-delete"
                                                                on:click=move |_| delete_entry(delete_address.clone())
                                                            >
                                                                "삭제"
                                                            </button>
                                                        </li>
                                                    }
                                                }).collect_view()}
                                            </ul>
                                        </div>
                                    }
                                }).collect_view().into_any()
                            }
                        }
                        Some(Err(_)) => view! {
                            <ErrorView message=Some("위시리스트를 불러오지 못했습니다.".to_string()) />
                        }.into_any(),
                        None => view! { <LoadingView message=None /> }.into_any(),
                    }}
                </Suspense>
            </div>
        </div>
    }
}
