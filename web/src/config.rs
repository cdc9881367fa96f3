use std::env;

/// Runtime configuration for the external service endpoints, read from the
/// environment on each use so a `.env` loaded at startup is enough.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Geospatial data backend (polygons, zone check, nearby buildings).
    pub geo_api_base: String,
    /// Wishlist persistence backend.
    pub wishlist_api_base: String,
    /// Naver maps gateway credentials for the geocoding endpoints.
    pub naver_key_id: Option<String>,
    pub naver_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            geo_api_base: env::var("GEO_API_BASE")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            wishlist_api_base: env::var("WISHLIST_API_BASE")
                .unwrap_or_else(|_| "http://localhost:5050".to_string()),
            naver_key_id: env::var("NAVER_MAP_CLIENT_ID").ok().filter(|v| !v.is_empty()),
            naver_key: env::var("NAVER_MAP_CLIENT_SECRET")
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }

    /// Whether the geocoding credentials are present. A missing credential
    /// pair is fatal to the map workflow and surfaced in the UI at page load.
    pub fn geocoder_configured(&self) -> bool {
        self.naver_key_id.is_some() && self.naver_key.is_some()
    }
}
