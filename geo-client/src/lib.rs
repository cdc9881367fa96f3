//! HTTP clients for the external REST services the map app talks to:
//! the Naver maps geocoder, the geospatial data backend (restricted-zone
//! polygons, containment checks, nearby buildings) and the wishlist backend.
//!
//! Each client wraps a `reqwest::Client` plus a base URL and can be pointed
//! at a mock server in tests via `with_base_url`.

pub mod error;
pub mod geodata;
pub mod geocoding;
pub mod wishlist;

pub use error::GeoClientError;
pub use geocoding::GeocodingClient;
pub use geodata::GeoDataClient;
pub use wishlist::WishlistClient;
