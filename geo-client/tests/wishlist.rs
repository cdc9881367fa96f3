//! Integration tests for `WishlistClient` using wiremock HTTP mocks.

use geo_client::WishlistClient;
use shared_types::WishlistEntry;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> WishlistClient {
    WishlistClient::with_base_url(base_url).expect("client construction should not fail")
}

fn sample_entry() -> WishlistEntry {
    WishlistEntry {
        address: "서울시청".to_string(),
        group_name: "Favorites".to_string(),
        color: "#ff0000".to_string(),
        note: "test".to_string(),
    }
}

#[tokio::test]
async fn list_maps_address_keyed_payload() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "서울시청": { "group_name": "Favorites", "color": "#ff0000", "note": "test" },
        "강남역": { "group_name": "", "color": "#00ff00", "note": "" }
    });

    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut entries = client.list().await.expect("list should succeed");
    entries.sort_by(|a, b| a.address.cmp(&b.address));

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].address, "서울시청");
    assert_eq!(entries[1].group_name, "Favorites");
    assert_eq!(entries[1].color, "#ff0000");
    assert_eq!(entries[1].note, "test");
    assert_eq!(entries[0].group_name, "");
}

#[tokio::test]
async fn save_posts_full_entry_body() {
    let server = MockServer::start().await;
    let entry = sample_entry();

    Mock::given(method("POST"))
        .and(path("/api/wishlist"))
        .and(body_json(serde_json::json!({
            "address": "서울시청",
            "group_name": "Favorites",
            "color": "#ff0000",
            "note": "test"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.save(&entry).await.expect("save should succeed");
}

#[tokio::test]
async fn delete_sends_address_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/wishlist"))
        .and(body_json(serde_json::json!({ "address": "서울시청" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .delete("서울시청")
        .await
        .expect("delete should succeed");
}

#[tokio::test]
async fn export_returns_raw_csv_bytes() {
    let server = MockServer::start().await;

    let csv = "address,group_name,color,note\n서울시청,Favorites,#ff0000,test\n";
    Mock::given(method("GET"))
        .and(path("/api/wishlist/export"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(csv, "text/csv"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let bytes = client.export_csv().await.expect("export should succeed");
    assert_eq!(bytes, csv.as_bytes());
}

#[tokio::test]
async fn save_surfaces_backend_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/wishlist"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .save(&sample_entry())
        .await
        .expect_err("500 should error");
    assert!(err.to_string().contains("500"));
}
