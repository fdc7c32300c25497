//! Collaborators with predetermined answers.
//!
//! Used when the position is known up front (e.g. supplied by a client
//! device) and in tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{GeocodeError, Geolocator, GeolocationError, Position, ReverseGeocoder};

/// Returns the same position (or failure) on every request.
pub struct FixedGeolocator {
    result: Result<Position, GeolocationError>,
    calls: AtomicUsize,
}

impl FixedGeolocator {
    pub fn new(position: Position) -> Self {
        Self {
            result: Ok(position),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: GeolocationError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of position requests served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Position, GeolocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Resolves every coordinate to the same address.
pub struct StaticGeocoder {
    address: String,
}

impl StaticGeocoder {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

#[async_trait]
impl ReverseGeocoder for StaticGeocoder {
    async fn reverse_geocode(&self, _latitude: f64, _longitude: f64) -> Result<String, GeocodeError> {
        Ok(self.address.clone())
    }
}
