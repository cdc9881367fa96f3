//! Integration tests for `GeoDataClient` using wiremock HTTP mocks.

use geo_client::GeoDataClient;
use shared_types::Coordinate;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GeoDataClient {
    GeoDataClient::with_base_url(base_url).expect("client construction should not fail")
}

#[tokio::test]
async fn fetch_polygons_accepts_both_ring_encodings() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "polygons": [
            [[127.0, 37.5], [127.1, 37.5], [127.1, 37.6]],
            "[[126.9, 37.5], [127.0, 37.5], [127.0, 37.6], [126.9, 37.6]]"
        ]
    });

    Mock::given(method("GET"))
        .and(path("/getcoordinates/getPolygon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let rings = client
        .fetch_polygons()
        .await
        .expect("polygon fetch should succeed");

    assert_eq!(rings.len(), 2);
    assert_eq!(rings[0].len(), 3);
    assert_eq!(rings[1].len(), 4);
    // Wire pairs are [lng, lat].
    assert_eq!(rings[0][0], Coordinate::new(37.5, 127.0));
}

#[tokio::test]
async fn check_zone_reports_containment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/checkImpossible"))
        .and(query_param("x", "127"))
        .and(query_param("y", "37.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "is_inside": false
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let inside = client
        .check_zone(Coordinate::new(37.5, 127.0))
        .await
        .expect("zone check should succeed");
    assert!(!inside);
}

#[tokio::test]
async fn check_zone_errors_on_server_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/checkImpossible"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.check_zone(Coordinate::new(37.5, 127.0)).await;
    // The caller maps this branch to ZoneStatus::Unavailable (fail-closed).
    assert!(result.is_err());
}

#[tokio::test]
async fn nearby_buildings_maps_wire_shape() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "count": 2,
        "radius_meter": 50,
        "buildings": [
            {
                "building_address": "서울 강남구 역삼동 736",
                "location": { "lat": 37.498, "lon": 127.027 },
                "stores": [
                    { "name": "GS25", "category": "편의점" },
                    { "name": "파리바게뜨", "category": "베이커리" }
                ]
            },
            {
                "building_address": "서울 강남구 역삼동 737",
                "location": { "lat": 37.499, "lon": 127.028 },
                "stores": []
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/building/nearby-buildings"))
        .and(query_param("latitude", "37.498"))
        .and(query_param("longitude", "127.027"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let nearby = client
        .nearby_buildings(Coordinate::new(37.498, 127.027))
        .await
        .expect("nearby fetch should succeed");

    assert_eq!(nearby.count, 2);
    assert!((nearby.radius_meter - 50.0).abs() < f64::EPSILON);
    assert_eq!(nearby.buildings[0].stores.len(), 2);
    assert_eq!(nearby.buildings[0].store_label(), "GS25, 파리바게뜨");
    assert_eq!(nearby.buildings[1].store_label(), "상가 정보 없음");
    assert_eq!(nearby.buildings[1].location, Coordinate::new(37.499, 127.028));
}
