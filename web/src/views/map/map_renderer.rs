use leptos::prelude::*;
use leptos_leaflet::{
    leaflet::{LatLng, Map, MouseEvent},
    prelude::*,
};
use shared_types::{Coordinate, NearbyBuildings, SelectedLocation};
use thaw::{Label, LabelSize};

/// A one-shot request to move the viewport (search hit, wishlist focus).
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub coordinate: Coordinate,
    pub zoom: f64,
}

/// A wishlist entry with its geocoded position, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct WishlistMarker {
    pub address: String,
    pub coordinate: Coordinate,
    pub color: String,
}

/// The nearby-buildings result anchored to the coordinate it was fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyOverlay {
    pub center: Coordinate,
    pub data: NearbyBuildings,
}

// Seoul City Hall, the initial viewport of the original map.
const DEFAULT_CENTER: (f64, f64) = (37.5665, 126.9780);
const DEFAULT_ZOOM: f64 = 10.0;

/// Pin icon tinted with a wishlist entry's color.
fn pin_icon(color: &str) -> String {
    let fill = color.replace('#', "%23");
    format!(
        "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='28' height='42' viewBox='0 0 28 42'%3E%3Cpath fill='{}' stroke='%23ffffff' stroke-width='1.5' d='M14 2C8.5 2 4 6.5 4 12c0 8.5 10 26 10 26s10-17.5 10-26c0-5.5-4.5-10-10-10zm0 13.5c-1.9 0-3.5-1.6-3.5-3.5s1.6-3.5 3.5-3.5 3.5 1.6 3.5 3.5-1.6 3.5-3.5 3.5z'/%3E%3C/svg%3E",
        fill
    )
}

fn to_position(coord: Coordinate) -> Position {
    Position::new(coord.latitude, coord.longitude)
}

/// Declarative map layer: everything on the map is derived from the signals
/// passed in, so overlays are replaced atomically on refresh instead of
/// being mutated in place.
#[component]
pub fn MapRenderer<F>(
    on_select: F,
    selection: RwSignal<Option<SelectedLocation>>,
    polygons: Resource<Vec<Vec<Coordinate>>>,
    wishlist_markers: RwSignal<Vec<WishlistMarker>>,
    nearby: RwSignal<Option<NearbyOverlay>>,
    requested_view: RwSignal<Option<MapView>>,
) -> impl IntoView
where
    F: Fn(Coordinate) + 'static + Copy + Send + Sync,
{
    let map: JsRwSignal<Option<Map>> = JsRwSignal::new_local(None::<Map>);

    // Subscribe to clicks on the raw leaflet map once it exists.
    Effect::new(move |_| {
        let Some(map_instance) = map.get() else {
            return;
        };
        map_instance.on_mouse_click(Box::new(move |event: MouseEvent| {
            let latlng = event.lat_lng();
            on_select(Coordinate::new(latlng.lat(), latlng.lng()));
        }));
    });

    // Viewport moves requested by search or the wishlist focus action.
    Effect::new(move |_| {
        let Some(view) = requested_view.get() else {
            return;
        };
        if let Some(map_instance) = map.get_untracked() {
            let target = LatLng::new(view.coordinate.latitude, view.coordinate.longitude);
            map_instance.set_view(&target, view.zoom);
        }
    });

    view! {
        <MapContainer
            style="height: 100%; width: 100%; flex: 1"
            center=Position::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1)
            zoom=DEFAULT_ZOOM
            set_view=true
            map=map.write_only()
        >
            <TileLayer
                url="https://tile.openstreetmap.org/{z}/{x}/{y}.png"
                attribution="&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
            />

            // Restricted-zone polygons, fetched once per page load.
            {move || polygons.get().map(|rings| {
                rings.into_iter().map(|ring| {
                    let positions: Vec<Position> = ring.iter().copied().map(to_position).collect();
                    view! {
                        <Polygon
                            positions=positions
                            color="#dc2626"
                            fill_color="#dc2626"
                        />
                    }
                }).collect_view()
            })}

            // The single current-selection marker.
            {move || selection.get().map(|sel| {
                let label = sel.address.clone().unwrap_or_else(|| "선택한 위치".to_string());
                view! {
                    <Marker position=to_position(sel.coordinate) draggable=false>
                        <Popup>
                            <Label size=LabelSize::Large>{label}</Label>
                            <p>{format!(
                                "위도 {:.6} / 경도 {:.6}",
                                sel.coordinate.latitude, sel.coordinate.longitude
                            )}</p>
                        </Popup>
                    </Marker>
                }
            })}

            // One tinted marker per wishlist entry.
            {move || wishlist_markers.get().into_iter().map(|marker| {
                view! {
                    <Marker
                        position=to_position(marker.coordinate)
                        draggable=false
                        icon_url=Some(pin_icon(&marker.color))
                        icon_size=Some((28.0, 42.0))
                        icon_anchor=Some((14.0, 42.0))
                    >
                        <Popup>
                            <Label size=LabelSize::Large>{marker.address.clone()}</Label>
                        </Popup>
                    </Marker>
                }
            }).collect_view()}

            // Nearby overlay: search-radius circle plus one marker per building.
            {move || nearby.get().map(|overlay| {
                let radius = overlay.data.radius_meter;
                view! {
                    <Circle
                        center=to_position(overlay.center)
                        radius=radius
                        color="#2563eb"
                        fill_color="#2563eb"
                    />
                    {overlay.data.buildings.into_iter().map(|building| {
                        let store_label = building.store_label();
                        let building_address = building.building_address.clone();
                        view! {
                            <Marker position=to_position(building.location) draggable=false>
                                <Popup>
                                    <Label size=LabelSize::Large>{store_label}</Label>
                                    <p>{building_address}</p>
                                </Popup>
                            </Marker>
                        }
                    }).collect_view()}
                }
            })}
        </MapContainer>
    }
}
