//! Client for the Naver maps geocoding REST endpoints.
//!
//! Forward geocoding resolves a free-text address query to WGS84 coordinates;
//! reverse geocoding resolves a coordinate to a display address composed from
//! the region hierarchy (area1/area2/area3) plus the optional land-lot number.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use shared_types::Coordinate;

use crate::error::GeoClientError;

const DEFAULT_BASE_URL: &str = "https://maps.apigw.ntruss.com/";

/// Fallback display string when reverse geocoding finds no address. The
/// footer always needs something to show, so "no match" is not an error.
pub const NO_ADDRESS: &str = "주소 없음";

/// Client for the Naver geocode / reverse-geocode endpoints.
///
/// Requests are single-shot: no retry, no backoff. Credentials travel in the
/// `x-ncp-apigw-api-key-id` / `x-ncp-apigw-api-key` headers.
pub struct GeocodingClient {
    client: Client,
    key_id: String,
    key: String,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct ForwardResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    addresses: Vec<ForwardAddress>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForwardAddress {
    // Naver returns coordinates as strings: x is longitude, y is latitude.
    x: String,
    y: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    status: Option<ReverseStatus>,
    #[serde(default)]
    results: Vec<ReverseResult>,
}

#[derive(Debug, Deserialize)]
struct ReverseStatus {
    code: i64,
}

#[derive(Debug, Deserialize)]
struct ReverseResult {
    region: ReverseRegion,
    land: Option<ReverseLand>,
}

#[derive(Debug, Deserialize)]
struct ReverseRegion {
    area1: ReverseArea,
    area2: ReverseArea,
    area3: ReverseArea,
}

#[derive(Debug, Deserialize)]
struct ReverseArea {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ReverseLand {
    #[serde(default)]
    number1: String,
    #[serde(default)]
    number2: String,
}

impl GeocodingClient {
    /// Creates a client pointed at the production Naver maps gateway.
    ///
    /// # Errors
    ///
    /// Returns [`GeoClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(key_id: &str, key: &str) -> Result<Self, GeoClientError> {
        Self::with_base_url(key_id, key, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeoClientError::Http`] if the client cannot be constructed
    /// or [`GeoClientError::Api`] if `base_url` is not a valid URL.
    pub fn with_base_url(key_id: &str, key: &str, base_url: &str) -> Result<Self, GeoClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        let base_url = parse_base_url(base_url)?;
        Ok(Self {
            client,
            key_id: key_id.to_owned(),
            key: key.to_owned(),
            base_url,
        })
    }

    /// Resolves an address query to a coordinate. `Ok(None)` means the
    /// service answered normally but found no match.
    ///
    /// # Errors
    ///
    /// - [`GeoClientError::Http`] on network failure.
    /// - [`GeoClientError::Api`] on a non-2xx response or an error payload.
    /// - [`GeoClientError::Deserialize`] if the body has an unexpected shape.
    pub async fn forward(&self, query: &str) -> Result<Option<Coordinate>, GeoClientError> {
        let url = self.join("map-geocode/v2/geocode")?;
        let response = self
            .client
            .get(url)
            .query(&[("query", query)])
            .header("x-ncp-apigw-api-key-id", &self.key_id)
            .header("x-ncp-apigw-api-key", &self.key)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeoClientError::Api(format!(
                "geocode request failed with status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let parsed: ForwardResponse =
            serde_json::from_str(&body).map_err(|e| GeoClientError::Deserialize {
                context: format!("geocode(query={query})"),
                source: e,
            })?;

        if parsed.status != "OK" {
            tracing::warn!(
                status = %parsed.status,
                error = %parsed.error_message.unwrap_or_else(|| "-".into()),
                "geocode returned non-OK status"
            );
            return Ok(None);
        }

        match parsed.addresses.first() {
            Some(addr) => {
                let longitude: f64 = addr.x.parse().map_err(|_| {
                    GeoClientError::Api(format!("geocode returned non-numeric x '{}'", addr.x))
                })?;
                let latitude: f64 = addr.y.parse().map_err(|_| {
                    GeoClientError::Api(format!("geocode returned non-numeric y '{}'", addr.y))
                })?;
                Ok(Some(Coordinate::new(latitude, longitude)))
            }
            None => Ok(None),
        }
    }

    /// Resolves a coordinate to a display address. A well-formed "no result"
    /// response yields the literal [`NO_ADDRESS`] rather than an error.
    ///
    /// # Errors
    ///
    /// - [`GeoClientError::Http`] on network failure.
    /// - [`GeoClientError::Api`] on a non-2xx response.
    /// - [`GeoClientError::Deserialize`] if the body has an unexpected shape.
    pub async fn reverse(&self, coord: Coordinate) -> Result<String, GeoClientError> {
        let url = self.join("map-reversegeocode/v2/gc")?;
        let coords = format!("{},{}", coord.longitude, coord.latitude);
        let response = self
            .client
            .get(url)
            .query(&[
                ("coords", coords.as_str()),
                ("output", "json"),
                ("orders", "roadaddr,addr"),
            ])
            .header("x-ncp-apigw-api-key-id", &self.key_id)
            .header("x-ncp-apigw-api-key", &self.key)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeoClientError::Api(format!(
                "reverse geocode request failed with status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let parsed: ReverseResponse =
            serde_json::from_str(&body).map_err(|e| GeoClientError::Deserialize {
                context: format!(
                    "reverse geocode(lat={}, lng={})",
                    coord.latitude, coord.longitude
                ),
                source: e,
            })?;

        let ok = parsed.status.as_ref().is_some_and(|s| s.code == 0);
        if !ok {
            return Ok(NO_ADDRESS.to_string());
        }
        Ok(parsed
            .results
            .first()
            .map_or_else(|| NO_ADDRESS.to_string(), compose_address))
    }

    fn join(&self, path: &str) -> Result<Url, GeoClientError> {
        self.base_url
            .join(path)
            .map_err(|e| GeoClientError::Api(format!("invalid endpoint path '{path}': {e}")))
    }
}

pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, GeoClientError> {
    // Ensure exactly one trailing slash so Url::join appends instead of
    // replacing the last path segment.
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised)
        .map_err(|e| GeoClientError::Api(format!("invalid base URL '{base_url}': {e}")))
}

/// Composes `area1 area2 area3` plus the land-lot suffix `number1[-number2]`
/// when present.
fn compose_address(result: &ReverseResult) -> String {
    let region = &result.region;
    let mut address = format!(
        "{} {} {}",
        region.area1.name, region.area2.name, region.area3.name
    );
    if let Some(land) = &result.land {
        if !land.number1.is_empty() {
            address.push(' ');
            address.push_str(&land.number1);
            if !land.number2.is_empty() {
                address.push('-');
                address.push_str(&land.number2);
            }
        }
    }
    address
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(land: Option<ReverseLand>) -> ReverseResult {
        ReverseResult {
            region: ReverseRegion {
                area1: ReverseArea {
                    name: "서울특별시".into(),
                },
                area2: ReverseArea {
                    name: "강남구".into(),
                },
                area3: ReverseArea {
                    name: "역삼동".into(),
                },
            },
            land,
        }
    }

    #[test]
    fn composes_region_only_address() {
        assert_eq!(compose_address(&result(None)), "서울특별시 강남구 역삼동");
    }

    #[test]
    fn composes_land_lot_suffix() {
        let with_main = result(Some(ReverseLand {
            number1: "736".into(),
            number2: String::new(),
        }));
        assert_eq!(
            compose_address(&with_main),
            "서울특별시 강남구 역삼동 736"
        );

        let with_sub = result(Some(ReverseLand {
            number1: "736".into(),
            number2: "17".into(),
        }));
        assert_eq!(
            compose_address(&with_sub),
            "서울특별시 강남구 역삼동 736-17"
        );
    }

    #[test]
    fn empty_land_number_adds_no_suffix() {
        let empty = result(Some(ReverseLand {
            number1: String::new(),
            number2: "3".into(),
        }));
        assert_eq!(compose_address(&empty), "서울특별시 강남구 역삼동");
    }
}
