//! Integration tests for `GeocodingClient` using wiremock HTTP mocks.

use geo_client::geocoding::NO_ADDRESS;
use geo_client::GeocodingClient;
use shared_types::Coordinate;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GeocodingClient {
    GeocodingClient::with_base_url("test-id", "test-key", base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn forward_parses_first_address() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "addresses": [
            { "x": "127.0276", "y": "37.4980", "jibunAddress": "서울 강남구 역삼동 736" },
            { "x": "126.0", "y": "36.0" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/map-geocode/v2/geocode"))
        .and(query_param("query", "강남역"))
        .and(header("x-ncp-apigw-api-key-id", "test-id"))
        .and(header("x-ncp-apigw-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coord = client
        .forward("강남역")
        .await
        .expect("forward geocode should succeed")
        .expect("should find a match");

    assert!((coord.latitude - 37.4980).abs() < 1e-9);
    assert!((coord.longitude - 127.0276).abs() < 1e-9);
}

#[tokio::test]
async fn forward_returns_none_when_no_match() {
    let server = MockServer::start().await;

    let body = serde_json::json!({ "status": "OK", "addresses": [] });
    Mock::given(method("GET"))
        .and(path("/map-geocode/v2/geocode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coord = client
        .forward("존재하지 않는 주소")
        .await
        .expect("forward geocode should succeed");
    assert!(coord.is_none());
}

#[tokio::test]
async fn forward_surfaces_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/map-geocode/v2/geocode"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.forward("강남역").await.expect_err("401 should error");
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn reverse_composes_region_and_land_lot() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": { "code": 0, "name": "ok" },
        "results": [
            {
                "name": "addr",
                "region": {
                    "area1": { "name": "서울특별시" },
                    "area2": { "name": "강남구" },
                    "area3": { "name": "역삼동" }
                },
                "land": { "number1": "736", "number2": "17" }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/map-reversegeocode/v2/gc"))
        .and(query_param("coords", "127.0276,37.498"))
        .and(query_param("orders", "roadaddr,addr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let address = client
        .reverse(Coordinate::new(37.498, 127.0276))
        .await
        .expect("reverse geocode should succeed");
    assert_eq!(address, "서울특별시 강남구 역삼동 736-17");
}

#[tokio::test]
async fn reverse_falls_back_to_no_address_literal() {
    let server = MockServer::start().await;

    // code 3 is the service's "no results" answer.
    let body = serde_json::json!({ "status": { "code": 3, "name": "no results" }, "results": [] });
    Mock::given(method("GET"))
        .and(path("/map-reversegeocode/v2/gc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let address = client
        .reverse(Coordinate::new(0.0, 0.0))
        .await
        .expect("no-match response is not an error");
    assert_eq!(address, NO_ADDRESS);
}
