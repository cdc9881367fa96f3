//! Client for the geospatial data backend: restricted-zone polygons, the
//! point-containment check and the nearby-buildings search.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use shared_types::{Coordinate, NearbyBuilding, NearbyBuildings, Store};

use crate::error::GeoClientError;
use crate::geocoding::parse_base_url;

#[derive(Debug, Deserialize)]
struct PolygonResponse {
    #[serde(default)]
    polygons: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    is_inside: bool,
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    count: usize,
    #[serde(default)]
    radius_meter: f64,
    #[serde(default)]
    buildings: Vec<WireBuilding>,
}

#[derive(Debug, Deserialize)]
struct WireBuilding {
    #[serde(default)]
    building_address: String,
    location: WireLocation,
    #[serde(default)]
    stores: Vec<WireStore>,
}

#[derive(Debug, Deserialize)]
struct WireLocation {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct WireStore {
    name: String,
    #[serde(default)]
    category: String,
}

/// Client for the geospatial data backend.
pub struct GeoDataClient {
    client: Client,
    base_url: Url,
}

impl GeoDataClient {
    /// Creates a client for the given backend base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeoClientError::Http`] if the client cannot be constructed
    /// or [`GeoClientError::Api`] if `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, GeoClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Fetches all restricted-zone rings. Each payload element is either a
    /// ring (array of `[lng, lat]` pairs) or a JSON-encoded string of one;
    /// both shapes are accepted and rings with fewer than 3 points dropped.
    ///
    /// # Errors
    ///
    /// - [`GeoClientError::Http`] on network failure.
    /// - [`GeoClientError::Api`] on a non-2xx response.
    /// - [`GeoClientError::Deserialize`] if the envelope has an unexpected shape.
    pub async fn fetch_polygons(&self) -> Result<Vec<Vec<Coordinate>>, GeoClientError> {
        let url = self.join("getcoordinates/getPolygon")?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(GeoClientError::Api(format!(
                "getPolygon failed with status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let parsed: PolygonResponse =
            serde_json::from_str(&body).map_err(|e| GeoClientError::Deserialize {
                context: "getPolygon".to_string(),
                source: e,
            })?;

        Ok(parse_rings(&parsed.polygons))
    }

    /// Asks the backend whether a coordinate falls inside a restricted zone.
    /// Callers map the error branch to the fail-closed `Unavailable` status.
    ///
    /// # Errors
    ///
    /// - [`GeoClientError::Http`] on network failure.
    /// - [`GeoClientError::Api`] on a non-2xx response.
    /// - [`GeoClientError::Deserialize`] if the body has an unexpected shape.
    pub async fn check_zone(&self, coord: Coordinate) -> Result<bool, GeoClientError> {
        let url = self.join("checkImpossible")?;
        let response = self
            .client
            .get(url)
            .query(&[
                ("x", coord.longitude.to_string()),
                ("y", coord.latitude.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeoClientError::Api(format!(
                "checkImpossible failed with status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let parsed: CheckResponse =
            serde_json::from_str(&body).map_err(|e| GeoClientError::Deserialize {
                context: format!(
                    "checkImpossible(x={}, y={})",
                    coord.longitude, coord.latitude
                ),
                source: e,
            })?;
        Ok(parsed.is_inside)
    }

    /// Fetches the commercial buildings within the backend's fixed radius of
    /// a coordinate.
    ///
    /// # Errors
    ///
    /// - [`GeoClientError::Http`] on network failure.
    /// - [`GeoClientError::Api`] on a non-2xx response.
    /// - [`GeoClientError::Deserialize`] if the body has an unexpected shape.
    pub async fn nearby_buildings(
        &self,
        coord: Coordinate,
    ) -> Result<NearbyBuildings, GeoClientError> {
        let url = self.join("building/nearby-buildings")?;
        let response = self
            .client
            .get(url)
            .query(&[
                ("latitude", coord.latitude.to_string()),
                ("longitude", coord.longitude.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeoClientError::Api(format!(
                "nearby-buildings failed with status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let parsed: NearbyResponse =
            serde_json::from_str(&body).map_err(|e| GeoClientError::Deserialize {
                context: format!(
                    "nearby-buildings(lat={}, lng={})",
                    coord.latitude, coord.longitude
                ),
                source: e,
            })?;

        Ok(NearbyBuildings {
            count: parsed.count,
            radius_meter: parsed.radius_meter,
            buildings: parsed
                .buildings
                .into_iter()
                .map(|b| NearbyBuilding {
                    building_address: b.building_address,
                    location: Coordinate::new(b.location.lat, b.location.lon),
                    stores: b
                        .stores
                        .into_iter()
                        .map(|s| Store {
                            name: s.name,
                            category: s.category,
                        })
                        .collect(),
                })
                .collect(),
        })
    }

    fn join(&self, path: &str) -> Result<Url, GeoClientError> {
        self.base_url
            .join(path)
            .map_err(|e| GeoClientError::Api(format!("invalid endpoint path '{path}': {e}")))
    }
}

/// Normalizes the polygon payload into rings of coordinates. Elements that
/// are strings get a second JSON decode pass; malformed elements are skipped
/// with a warning rather than failing the whole set.
fn parse_rings(polygons: &[Value]) -> Vec<Vec<Coordinate>> {
    let mut rings = Vec::new();
    for raw in polygons {
        let decoded;
        let ring_value = match raw {
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(value) => {
                    decoded = value;
                    &decoded
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping undecodable polygon string");
                    continue;
                }
            },
            other => other,
        };

        let Some(points) = ring_value.as_array() else {
            tracing::warn!("skipping non-array polygon element");
            continue;
        };

        let ring: Vec<Coordinate> = points
            .iter()
            .filter_map(|pair| {
                let pair = pair.as_array()?;
                // Wire order is [longitude, latitude].
                let lng = pair.first()?.as_f64()?;
                let lat = pair.get(1)?.as_f64()?;
                Some(Coordinate::new(lat, lng))
            })
            .collect();

        if ring.len() >= 3 {
            rings.push(ring);
        } else {
            tracing::warn!(points = ring.len(), "skipping degenerate polygon ring");
        }
    }
    rings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_plain_rings() {
        let payload = vec![json!([[127.0, 37.5], [127.1, 37.5], [127.1, 37.6]])];
        let rings = parse_rings(&payload);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0][0], Coordinate::new(37.5, 127.0));
        assert_eq!(rings[0][2], Coordinate::new(37.6, 127.1));
    }

    #[test]
    fn parses_json_string_encoded_rings() {
        let payload = vec![json!("[[126.9, 37.5], [127.0, 37.5], [127.0, 37.6], [126.9, 37.6]]")];
        let rings = parse_rings(&payload);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
        assert_eq!(rings[0][1], Coordinate::new(37.5, 127.0));
    }

    #[test]
    fn skips_degenerate_and_malformed_rings() {
        let payload = vec![
            json!([[127.0, 37.5], [127.1, 37.5]]),
            json!("not json"),
            json!(42),
            json!([[127.0, 37.5], [127.1, 37.5], [127.1, 37.6]]),
        ];
        let rings = parse_rings(&payload);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 3);
    }
}
