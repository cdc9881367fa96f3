use leptos::{prelude::*, task::spawn_local};
use shared_types::{group_entries, Coordinate, SelectedLocation, ZoneStatus};
use thaw::{MessageBar, MessageBarIntent};

use crate::components::{alert, loading::LoadingView, AddressSearch, WishlistPanel};
use crate::server::{
    check_zone, fetch_nearby_buildings, fetch_wishlist, fetch_zone_polygons, geocoder_ready,
    resolve_address, search_address,
};
use crate::views::map::map_renderer::{MapRenderer, MapView, NearbyOverlay, WishlistMarker};

/// Zoom level used when jumping to a search hit or a wishlist entry.
const FOCUS_ZOOM: f64 = 15.0;

/// The map workspace: owns the single active selection, the async
/// continuations that fill it in, and every overlay collection.
///
/// Responses are guarded by a selection generation counter: a continuation
/// that resolves after the user has moved on writes nothing. The requests
/// themselves are never cancelled.
#[component]
pub fn ScoutMap() -> impl IntoView {
    let selection = RwSignal::new(Option::<SelectedLocation>::None);
    let selection_gen = RwSignal::new(0u64);
    let address_error = RwSignal::new(false);
    let requested_view = RwSignal::new(Option::<MapView>::None);

    let nearby_mode = RwSignal::new(false);
    let nearby_loading = RwSignal::new(false);
    let nearby_error = RwSignal::new(Option::<String>::None);
    let nearby = RwSignal::new(Option::<NearbyOverlay>::None);

    let wishlist_version = RwSignal::new(0u32);
    let wishlist_markers = RwSignal::new(Vec::<WishlistMarker>::new());

    // Mapping-service credential probe. A failure here is fatal to the
    // geocoding workflow and shown as a persistent banner.
    let geocoder_status = Resource::new(
        || (),
        |_| async move { geocoder_ready().await.unwrap_or(false) },
    );
    let geocoder_down = Memo::new(move |_| geocoder_status.get() == Some(false));

    // Restricted-zone polygons, fetched once per page load.
    let polygons = Resource::new(
        || (),
        |_| async move {
            match fetch_zone_polygons().await {
                Ok(rings) => rings,
                Err(e) => {
                    leptos::logging::log!("failed to fetch zone polygons: {}", e);
                    vec![]
                }
            }
        },
    );

    // Full reload after every mutation; no incremental patching.
    let wishlist = Resource::new(
        move || wishlist_version.get(),
        |_| async move { fetch_wishlist().await.map(group_entries) },
    );

    // Wishlist entries persist only an address; geocode each one to place
    // its marker. The marker list is replaced wholesale per reload.
    Effect::new(move |_| {
        let Some(Ok(groups)) = wishlist.get() else {
            return;
        };
        spawn_local(async move {
            let mut markers = Vec::new();
            for group in &groups {
                for entry in &group.entries {
                    match search_address(entry.address.clone()).await {
                        Ok(Some(coordinate)) => markers.push(WishlistMarker {
                            address: entry.address.clone(),
                            coordinate,
                            color: entry.color.clone(),
                        }),
                        Ok(None) => {}
                        Err(e) => {
                            leptos::logging::log!(
                                "wishlist marker geocode failed for {}: {}",
                                entry.address,
                                e
                            );
                        }
                    }
                }
            }
            wishlist_markers.set(markers);
        });
    });

    let show_nearby = move |coordinate: Coordinate, generation: u64| {
        nearby.set(None);
        nearby_error.set(None);
        nearby_loading.set(true);
        spawn_local(async move {
            let result = fetch_nearby_buildings(coordinate).await;
            if selection_gen.get_untracked() != generation {
                return;
            }
            nearby_loading.set(false);
            match result {
                Ok(data) => nearby.set(Some(NearbyOverlay {
                    center: coordinate,
                    data,
                })),
                Err(e) => {
                    leptos::logging::log!("nearby fetch failed: {}", e);
                    nearby_error.set(Some("주변 상가 정보를 불러오지 못했습니다.".to_string()));
                }
            }
        });
    };

    let select_coordinate = move |coordinate: Coordinate| {
        let generation = selection_gen.get_untracked() + 1;
        selection_gen.set(generation);
        selection.set(Some(SelectedLocation::new(coordinate)));
        address_error.set(false);
        nearby.set(None);
        nearby_error.set(None);
        nearby_loading.set(false);

        // Address and zone lookups run independently; neither blocks the other.
        spawn_local(async move {
            let resolved = resolve_address(coordinate).await;
            if selection_gen.get_untracked() != generation {
                return;
            }
            match resolved {
                Ok(address) => selection.update(|sel| {
                    if let Some(sel) = sel {
                        sel.address = Some(address);
                    }
                }),
                Err(e) => {
                    leptos::logging::log!("reverse geocode failed: {}", e);
                    address_error.set(true);
                }
            }
        });

        spawn_local(async move {
            // A failed round trip to the zone checker is still a verdict:
            // treat the location as forbidden.
            let status = match check_zone(coordinate).await {
                Ok(status) => status,
                Err(e) => {
                    leptos::logging::log!("zone check failed: {}", e);
                    ZoneStatus::Unavailable
                }
            };
            if selection_gen.get_untracked() != generation {
                return;
            }
            selection.update(|sel| {
                if let Some(sel) = sel {
                    sel.zone = Some(status);
                }
            });
        });

        if nearby_mode.get_untracked() {
            show_nearby(coordinate, generation);
        }
    };

    let clear_selection = move |_ev: web_sys::MouseEvent| {
        // Bump the generation so in-flight lookups for the old selection
        // have nowhere to land.
        selection_gen.update(|g| *g += 1);
        selection.set(None);
        address_error.set(false);
        nearby.set(None);
        nearby_error.set(None);
        nearby_loading.set(false);
    };

    let toggle_nearby = move |ev: web_sys::Event| {
        if event_target_checked(&ev) {
            let Some(sel) = selection.get_untracked() else {
                alert("지도에서 위치를 먼저 선택하세요.");
                nearby_mode.set(false);
                event_target::<web_sys::HtmlInputElement>(&ev).set_checked(false);
                return;
            };
            nearby_mode.set(true);
            show_nearby(sel.coordinate, selection_gen.get_untracked());
        } else {
            nearby_mode.set(false);
            nearby.set(None);
            nearby_error.set(None);
            nearby_loading.set(false);
        }
    };

    let handle_search_found = move |coordinate: Coordinate| {
        requested_view.set(Some(MapView {
            coordinate,
            zoom: FOCUS_ZOOM,
        }));
        select_coordinate(coordinate);
    };

    let locate_entry = move |address: String| {
        let marker = wishlist_markers
            .get_untracked()
            .into_iter()
            .find(|m| m.address == address);
        if let Some(marker) = marker {
            requested_view.set(Some(MapView {
                coordinate: marker.coordinate,
                zoom: FOCUS_ZOOM,
            }));
        }
    };

    let open_roadview = move |_ev: web_sys::MouseEvent| {
        let Some(sel) = selection.get_untracked() else {
            return;
        };
        let address = sel.address.unwrap_or_default();
        let url = format!(
            "/panorama?lat={}&lng={}&addr={}",
            sel.coordinate.latitude,
            sel.coordinate.longitude,
            urlencoding::encode(&address)
        );
        if let Some(window) = web_sys::window() {
            let _ = window.open_with_url_and_target_and_features(
                &url,
                "roadview",
                "width=800,height=600",
            );
        }
    };

    view! {
        <div class="scout-container">
            <header class="scout-header">
                <div class="header-content">
                    <h1>"sitescout"</h1>
                    <AddressSearch
                        on_found=handle_search_found
                        disabled=geocoder_down
                    />
                </div>
                {move || geocoder_down.get().then(|| view! {
                    <MessageBar intent=MessageBarIntent::Error>
                        "지도 서비스 인증에 실패했습니다. 주소 검색과 주소 표시를 사용할 수 없습니다."
                    </MessageBar>
                })}
            </header>

            <div class="scout-content">
                <aside class="scout-sidebar">
                    <WishlistPanel
                        wishlist=wishlist
                        selection=selection
                        on_mutated=move || wishlist_version.update(|v| *v += 1)
                        on_locate=locate_entry
                    />
                </aside>

                <div class="scout-map-wrapper">
                    <MapRenderer
                        on_select=select_coordinate
                        selection=selection
                        polygons=polygons
                        wishlist_markers=wishlist_markers
                        nearby=nearby
                        requested_view=requested_view
                    />

                    {move || nearby_loading.get().then(|| view! {
                        <div class="nearby-loading">
                            <LoadingView message=Some("주변 상가를 검색하는 중...".to_string()) />
                        </div>
                    })}

                    <div class="map-toolbar">
                        <button
                            class="toolbar-button"
                            on:click=clear_selection
                            disabled=move || selection.get().is_none()
                        >
                            "선택 해제"
                        </button>
                        <button
                            class="toolbar-button"
                            on:click=open_roadview
                            disabled=move || selection.get().is_none()
                        >
                            "로드뷰"
                        </button>
                        <label class="nearby-toggle">
                            <input
                                type="checkbox"
                                prop:checked=move || nearby_mode.get()
                                on:change=toggle_nearby
                            />
                            "주변 상가 표시"
                        </label>
                        {move || nearby_error.get().map(|message| view! {
                            <span class="nearby-error">{message}</span>
                        })}
                    </div>

                    <div class="map-legend">
                        <div class="legend-item">
                            <span class="legend-swatch zone"></span>
                            <span>"입점 제한 구역"</span>
                        </div>
                        <div class="legend-item">
                            <span class="legend-swatch radius"></span>
                            <span>"주변 상가 검색 반경"</span>
                        </div>
                    </div>
                </div>
            </div>

            <footer class="status-footer">
                <span class="footer-coords">
                    {move || selection.get().map_or_else(
                        || "위도: - / 경도: -".to_string(),
                        |sel| format!(
                            "위도: {:.6} / 경도: {:.6}",
                            sel.coordinate.latitude, sel.coordinate.longitude
                        ),
                    )}
                </span>
                <span class="footer-address">
                    {move || selection.get().map(|sel| match sel.address {
                        Some(address) => address,
                        None if address_error.get() => "주소 조회 실패".to_string(),
                        None => "주소 확인 중...".to_string(),
                    })}
                </span>
                {move || selection.get().and_then(|sel| sel.zone).map(|status| {
                    // Unavailable collapses into the forbidden theme; the
                    // user only ever sees two states.
                    let forbidden = status.is_forbidden();
                    let (class, text) = if forbidden {
                        ("zone-indicator forbidden", "입점 불가")
                    } else {
                        ("zone-indicator allowed", "입점 가능")
                    };
                    view! { <span class=class>{text}</span> }
                })}
            </footer>
        </div>
    }
}
