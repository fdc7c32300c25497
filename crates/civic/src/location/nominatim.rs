//! Reverse geocoding against an OpenStreetMap Nominatim-compatible endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{GeocodeError, ReverseGeocoder};

/// Public Nominatim instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Default connect timeout for HTTP requests (5 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    display_name: Option<String>,
}

/// Picks the address out of a reverse-geocoding response.
///
/// An absent or empty `display_name` is not an error: the raw coordinates are
/// used instead.
fn address_from_response(response: ReverseResponse, latitude: f64, longitude: f64) -> String {
    match response.display_name {
        Some(name) if !name.is_empty() => name,
        _ => format!("{}, {}", latitude, longitude),
    }
}

/// HTTP reverse geocoder.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Creates a geocoder for `base_url` with the given request timeout.
    ///
    /// Nominatim's usage policy requires an identifying user agent.
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| GeocodeError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn reverse_url(&self) -> String {
        format!("{}/reverse", self.base_url)
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<String, GeocodeError> {
        let lat = latitude.to_string();
        let lon = longitude.to_string();

        let response = self
            .client
            .get(self.reverse_url())
            .query(&[("format", "json"), ("lat", lat.as_str()), ("lon", lon.as_str())])
            .send()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;

        Ok(address_from_response(body, latitude, longitude))
    }
}
