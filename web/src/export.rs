//! Same-origin proxy for the wishlist backend's CSV export, so the export
//! button can be a plain browser navigation.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use geo_client::WishlistClient;

use crate::config::AppConfig;

pub async fn export_wishlist() -> Response {
    let config = AppConfig::from_env();
    let client = match WishlistClient::with_base_url(&config.wishlist_api_base) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "failed to build wishlist client for export");
            return (
                StatusCode::BAD_GATEWAY,
                "위시리스트 내보내기에 실패했습니다.",
            )
                .into_response();
        }
    };

    match client.export_csv().await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"wishlist.csv\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "wishlist export failed");
            (
                StatusCode::BAD_GATEWAY,
                "위시리스트 내보내기에 실패했습니다.",
            )
                .into_response()
        }
    }
}
