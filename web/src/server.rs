use leptos::prelude::*;
use leptos::server;
use shared_types::{Coordinate, NearbyBuildings, WishlistEntry, ZoneStatus};

#[cfg(feature = "ssr")]
use crate::config::AppConfig;
#[cfg(feature = "ssr")]
use geo_client::{GeoDataClient, GeocodingClient, WishlistClient};

#[cfg(feature = "ssr")]
fn geocoding_client() -> Result<GeocodingClient, ServerFnError> {
    let config = AppConfig::from_env();
    let (Some(key_id), Some(key)) = (config.naver_key_id, config.naver_key) else {
        return Err(ServerFnError::new(
            "Geocoding credentials are not configured",
        ));
    };
    GeocodingClient::new(&key_id, &key)
        .map_err(|e| ServerFnError::new(format!("Failed to build geocoding client: {}", e)))
}

#[cfg(feature = "ssr")]
fn geodata_client() -> Result<GeoDataClient, ServerFnError> {
    let config = AppConfig::from_env();
    GeoDataClient::with_base_url(&config.geo_api_base)
        .map_err(|e| ServerFnError::new(format!("Failed to build geo data client: {}", e)))
}

#[cfg(feature = "ssr")]
fn wishlist_client() -> Result<WishlistClient, ServerFnError> {
    let config = AppConfig::from_env();
    WishlistClient::with_base_url(&config.wishlist_api_base)
        .map_err(|e| ServerFnError::new(format!("Failed to build wishlist client: {}", e)))
}

/// Startup probe: whether the mapping-service credentials are configured.
/// `false` is fatal to the geocoding workflow and shown as a persistent
/// error banner.
#[server]
pub async fn geocoder_ready() -> Result<bool, ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        Ok(AppConfig::from_env().geocoder_configured())
    }
    #[cfg(not(feature = "ssr"))]
    {
        Ok(false)
    }
}

/// Forward geocode. `Ok(None)` means the service found no match for the
/// query; transport failures surface as errors.
#[server]
pub async fn search_address(query: String) -> Result<Option<Coordinate>, ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        if query.trim().is_empty() {
            return Err(ServerFnError::new("Address query must not be empty"));
        }
        geocoding_client()?
            .forward(query.trim())
            .await
            .map_err(|e| ServerFnError::new(format!("Address search failed: {}", e)))
    }
    #[cfg(not(feature = "ssr"))]
    {
        let _ = query;
        Ok(None)
    }
}

/// Reverse geocode a coordinate to a display address. A "no match" answer
/// yields the no-address literal, never an error.
#[server]
pub async fn resolve_address(coord: Coordinate) -> Result<String, ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        geocoding_client()?
            .reverse(coord)
            .await
            .map_err(|e| ServerFnError::new(format!("Reverse geocode failed: {}", e)))
    }
    #[cfg(not(feature = "ssr"))]
    {
        let _ = coord;
        Ok(String::new())
    }
}

/// Restricted-zone containment check. An unreachable or misbehaving backend
/// maps to `ZoneStatus::Unavailable` here so the fail-closed policy is an
/// explicit branch rather than an error the client might swallow.
#[server]
pub async fn check_zone(coord: Coordinate) -> Result<ZoneStatus, ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        match geodata_client()?.check_zone(coord).await {
            Ok(is_inside) => Ok(ZoneStatus::from_check(Some(is_inside))),
            Err(e) => {
                tracing::warn!(
                    latitude = coord.latitude,
                    longitude = coord.longitude,
                    error = %e,
                    "zone check unreachable, treating as forbidden"
                );
                Ok(ZoneStatus::from_check(None))
            }
        }
    }
    #[cfg(not(feature = "ssr"))]
    {
        let _ = coord;
        Ok(ZoneStatus::Unavailable)
    }
}

/// All restricted-zone polygon rings, fetched once per page load.
#[server]
pub async fn fetch_zone_polygons() -> Result<Vec<Vec<Coordinate>>, ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        geodata_client()?
            .fetch_polygons()
            .await
            .map_err(|e| ServerFnError::new(format!("Failed to fetch zone polygons: {}", e)))
    }
    #[cfg(not(feature = "ssr"))]
    {
        Ok(vec![])
    }
}

/// Commercial buildings within the backend's fixed radius of a coordinate.
#[server]
pub async fn fetch_nearby_buildings(coord: Coordinate) -> Result<NearbyBuildings, ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        geodata_client()?
            .nearby_buildings(coord)
            .await
            .map_err(|e| ServerFnError::new(format!("Failed to fetch nearby buildings: {}", e)))
    }
    #[cfg(not(feature = "ssr"))]
    {
        let _ = coord;
        Err(ServerFnError::new("unreachable"))
    }
}

#[server]
pub async fn fetch_wishlist() -> Result<Vec<WishlistEntry>, ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        wishlist_client()?
            .list()
            .await
            .map_err(|e| ServerFnError::new(format!("Failed to fetch wishlist: {}", e)))
    }
    #[cfg(not(feature = "ssr"))]
    {
        Ok(vec![])
    }
}

/// Creates or overwrites the entry keyed by its address.
#[server]
pub async fn save_wishlist_entry(entry: WishlistEntry) -> Result<(), ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        if entry.address.trim().is_empty() {
            return Err(ServerFnError::new("Wishlist address must not be empty"));
        }
        wishlist_client()?
            .save(&entry)
            .await
            .map_err(|e| ServerFnError::new(format!("Failed to save wishlist entry: {}", e)))
    }
    #[cfg(not(feature = "ssr"))]
    {
        let _ = entry;
        Ok(())
    }
}

#[server]
pub async fn delete_wishlist_entry(address: String) -> Result<(), ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        wishlist_client()?
            .delete(&address)
            .await
            .map_err(|e| ServerFnError::new(format!("Failed to delete wishlist entry: {}", e)))
    }
    #[cfg(not(feature = "ssr"))]
    {
        let _ = address;
        Ok(())
    }
}
