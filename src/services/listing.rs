use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::ListingShelter;

/// Errors that can occur when talking to the shelter listing API
#[derive(Debug, Error)]
pub enum ListingClientError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// `{ success, data }` wrapper used by every listing endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    data: Option<T>,
}

fn default_true() -> bool { true }

impl<T> Envelope<T> {
    fn into_data(self, what: &str) -> Result<T, ListingClientError> {
        if !self.success {
            let reason = self
                .message
                .or(self.error)
                .unwrap_or_else(|| format!("{} request was not successful", what));
            return Err(ListingClientError::ApiError(reason));
        }

        self.data
            .ok_or_else(|| ListingClientError::InvalidResponse(format!("Missing data in {} response", what)))
    }
}

/// Client for the public shelter listing API
///
/// Only the read endpoints are used:
/// - `GET {base}/shelters`
/// - `GET {base}/shelters/{id}`
#[derive(Debug, Clone)]
pub struct ListingClient {
    base_url: String,
    client: Client,
}

impl ListingClient {
    /// Create a new listing client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ListingClientError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every published shelter
    pub async fn fetch_shelters(&self) -> Result<Vec<ListingShelter>, ListingClientError> {
        let url = format!("{}/shelters", self.base_url.trim_end_matches('/'));

        tracing::debug!("Fetching shelter listing from: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ListingClientError::ApiError(format!(
                "Failed to fetch shelters: {}",
                response.status()
            )));
        }

        let envelope: Envelope<Vec<ListingShelter>> = response
            .json()
            .await
            .map_err(|e| ListingClientError::InvalidResponse(format!("Failed to parse shelters: {}", e)))?;

        envelope.into_data("shelters")
    }

    /// Fetch a single shelter by id
    pub async fn fetch_shelter(&self, shelter_id: &str) -> Result<ListingShelter, ListingClientError> {
        let url = format!(
            "{}/shelters/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(shelter_id)
        );

        tracing::debug!("Fetching shelter from: {}", url);

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(ListingClientError::NotFound(format!("Shelter {} not found", shelter_id)));
            }
            status if !status.is_success() => {
                return Err(ListingClientError::ApiError(format!(
                    "Failed to fetch shelter {}: {}",
                    shelter_id, status
                )));
            }
            _ => {}
        }

        let envelope: Envelope<ListingShelter> = response
            .json()
            .await
            .map_err(|e| ListingClientError::InvalidResponse(format!("Failed to parse shelter: {}", e)))?;

        envelope.into_data("shelter")
    }
}
