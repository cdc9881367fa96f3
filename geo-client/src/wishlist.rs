//! Client for the wishlist persistence backend.
//!
//! The backend keys entries by address: a save with an existing address
//! overwrites instead of duplicating, and the client never deduplicates.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;
use shared_types::WishlistEntry;

use crate::error::GeoClientError;
use crate::geocoding::parse_base_url;

#[derive(Debug, Deserialize)]
struct WireDetails {
    #[serde(default)]
    group_name: String,
    #[serde(default)]
    color: String,
    #[serde(default)]
    note: String,
}

/// Client for the wishlist REST backend.
pub struct WishlistClient {
    client: Client,
    base_url: Url,
}

impl WishlistClient {
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

    /// Fetches every persisted entry. The wire format is a map from address
    /// to `{group_name, color, note}`.
    ///
    /// # Errors
    ///
    /// - [`GeoClientError::Http`] on network failure.
    /// - [`GeoClientError::Api`] on a non-2xx response.
    /// - [`GeoClientError::Deserialize`] if the body has an unexpected shape.
    pub async fn list(&self) -> Result<Vec<WishlistEntry>, GeoClientError> {
        let url = self.join("api/wishlist")?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(GeoClientError::Api(format!(
                "wishlist list failed with status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let parsed: HashMap<String, WireDetails> =
            serde_json::from_str(&body).map_err(|e| GeoClientError::Deserialize {
                context: "wishlist list".to_string(),
                source: e,
            })?;

        Ok(parsed
            .into_iter()
            .map(|(address, details)| WishlistEntry {
                address,
                group_name: details.group_name,
                color: details.color,
                note: details.note,
            })
            .collect())
    }

    /// Creates or overwrites an entry.
    ///
    /// # Errors
    ///
    /// - [`GeoClientError::Http`] on network failure.
    /// - [`GeoClientError::Api`] on a non-2xx response.
    pub async fn save(&self, entry: &WishlistEntry) -> Result<(), GeoClientError> {
        let url = self.join("api/wishlist")?;
        let response = self.client.post(url).json(entry).send().await?;

        if !response.status().is_success() {
            return Err(GeoClientError::Api(format!(
                "wishlist save failed with status {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Removes the entry with the given address.
    ///
    /// # Errors
    ///
    /// - [`GeoClientError::Http`] on network failure.
    /// - [`GeoClientError::Api`] on a non-2xx response.
    pub async fn delete(&self, address: &str) -> Result<(), GeoClientError> {
        let url = self.join("api/wishlist")?;
        let response = self
            .client
            .delete(url)
            .json(&json!({ "address": address }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeoClientError::Api(format!(
                "wishlist delete failed with status {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Downloads the backend-rendered CSV export as raw bytes.
    ///
    /// # Errors
    ///
    /// - [`GeoClientError::Http`] on network failure.
    /// - [`GeoClientError::Api`] on a non-2xx response.
    pub async fn export_csv(&self) -> Result<Vec<u8>, GeoClientError> {
        let url = self.join("api/wishlist/export")?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(GeoClientError::Api(format!(
                "wishlist export failed with status {}",
                response.status()
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }

    fn join(&self, path: &str) -> Result<Url, GeoClientError> {
        self.base_url
            .join(path)
            .map_err(|e| GeoClientError::Api(format!("invalid endpoint path '{path}': {e}")))
    }
}
