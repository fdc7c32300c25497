//! Device location acquisition and reverse geocoding.
//!
//! A lookup is a device position request followed by a best-effort reverse
//! geocode. Only the position request can fail; a geocoding failure degrades
//! to a formatted coordinate string.

pub mod cache;
pub mod error;
pub mod fixed;
pub mod nominatim;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use cache::CachedGeocoder;
pub use error::{GeocodeError, GeolocationError};
pub use fixed::{FixedGeolocator, StaticGeocoder};
pub use nominatim::NominatimGeocoder;

/// Raw device position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in meters.
    pub accuracy: f64,
}

/// A resolved report location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    /// A location with coordinates only.
    pub fn from_position(position: Position) -> Self {
        Self {
            latitude: position.latitude,
            longitude: position.longitude,
            accuracy: position.accuracy,
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// The address, or the formatted coordinates when none was resolved.
    pub fn display_address(&self) -> String {
        self.address
            .clone()
            .unwrap_or_else(|| fallback_address(self.latitude, self.longitude))
    }
}

/// Address used when reverse geocoding fails: coordinates to 4 decimals.
pub fn fallback_address(latitude: f64, longitude: f64) -> String {
    format!("{:.4}, {:.4}", latitude, longitude)
}

/// Source of the device's current position.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Position, GeolocationError>;
}

/// Resolves coordinates into a human-readable address.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64)
        -> Result<String, GeocodeError>;
}

/// Combines a geolocator with an optional reverse geocoder.
#[derive(Clone)]
pub struct LocationService {
    geolocator: Arc<dyn Geolocator>,
    geocoder: Option<Arc<dyn ReverseGeocoder>>,
}

impl LocationService {
    pub fn new(
        geolocator: Arc<dyn Geolocator>,
        geocoder: Option<Arc<dyn ReverseGeocoder>>,
    ) -> Self {
        Self {
            geolocator,
            geocoder,
        }
    }

    /// Performs one lookup.
    ///
    /// The returned location always carries an address: the geocoded one, or
    /// [`fallback_address`] when geocoding is disabled or fails.
    pub async fn acquire(&self) -> Result<Location, GeolocationError> {
        let position = self.geolocator.current_position().await?;
        let address =
            resolve_address(self.geocoder.as_deref(), position.latitude, position.longitude)
                .await;

        Ok(Location::from_position(position).with_address(address))
    }
}

/// Best-effort address for a coordinate pair.
///
/// Falls back to [`fallback_address`] when `geocoder` is `None` or the lookup
/// fails.
pub async fn resolve_address(
    geocoder: Option<&dyn ReverseGeocoder>,
    latitude: f64,
    longitude: f64,
) -> String {
    let Some(geocoder) = geocoder else {
        return fallback_address(latitude, longitude);
    };

    match geocoder.reverse_geocode(latitude, longitude).await {
        Ok(address) => address,
        Err(e) => {
            log::debug!("Reverse geocoding failed, using coordinates: {}", e);
            fallback_address(latitude, longitude)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delhi() -> Position {
        Position {
            latitude: 28.6139,
            longitude: 77.2090,
            accuracy: 12.0,
        }
    }

    struct FailingGeocoder;

    #[async_trait]
    impl ReverseGeocoder for FailingGeocoder {
        async fn reverse_geocode(&self, _: f64, _: f64) -> Result<String, GeocodeError> {
            Err(GeocodeError::Status(503))
        }
    }

    #[test]
    fn test_fallback_address_formatting() {
        assert_eq!(fallback_address(28.61394, 77.20902), "28.6139, 77.2090");
        assert_eq!(fallback_address(-1.5, 0.0), "-1.5000, 0.0000");
    }

    #[test]
    fn test_display_address_prefers_resolved() {
        let loc = Location::from_position(delhi());
        assert_eq!(loc.display_address(), "28.6139, 77.2090");
        let loc = loc.with_address("Connaught Place");
        assert_eq!(loc.display_address(), "Connaught Place");
    }

    #[tokio::test]
    async fn test_acquire_uses_geocoded_address() {
        let service = LocationService::new(
            Arc::new(FixedGeolocator::new(delhi())),
            Some(Arc::new(StaticGeocoder::new("Janpath, New Delhi"))),
        );
        let loc = service.acquire().await.unwrap();
        assert_eq!(loc.latitude, 28.6139);
        assert_eq!(loc.accuracy, 12.0);
        assert_eq!(loc.address.as_deref(), Some("Janpath, New Delhi"));
    }

    #[tokio::test]
    async fn test_acquire_falls_back_when_geocoding_fails() {
        let service =
            LocationService::new(Arc::new(FixedGeolocator::new(delhi())), Some(Arc::new(FailingGeocoder)));
        let loc = service.acquire().await.unwrap();
        assert_eq!(loc.address.as_deref(), Some("28.6139, 77.2090"));
    }

    #[tokio::test]
    async fn test_acquire_without_geocoder() {
        let service = LocationService::new(Arc::new(FixedGeolocator::new(delhi())), None);
        let loc = service.acquire().await.unwrap();
        assert_eq!(loc.address.as_deref(), Some("28.6139, 77.2090"));
    }

    #[tokio::test]
    async fn test_resolve_address() {
        let geocoder = StaticGeocoder::new("Rajpath, New Delhi");
        assert_eq!(
            resolve_address(Some(&geocoder), 28.6139, 77.2090).await,
            "Rajpath, New Delhi"
        );
        assert_eq!(
            resolve_address(Some(&FailingGeocoder), 28.61394, 77.20902).await,
            "28.6139, 77.2090"
        );
        assert_eq!(resolve_address(None, 1.0, 2.0).await, "1.0000, 2.0000");
    }

    #[tokio::test]
    async fn test_acquire_propagates_position_failure() {
        let service = LocationService::new(
            Arc::new(FixedGeolocator::failing(GeolocationError::PermissionDenied)),
            Some(Arc::new(StaticGeocoder::new("unused"))),
        );
        assert_eq!(
            service.acquire().await.unwrap_err(),
            GeolocationError::PermissionDenied
        );
    }
}
