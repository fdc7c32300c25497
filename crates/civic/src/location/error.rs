//! Location lookup error types.

use thiserror::Error;

/// Failure of the one-shot device position request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location request timed out")]
    Timeout,

    #[error("Position unavailable")]
    PositionUnavailable,
}

/// Failure of a reverse-geocoding lookup. Never shown to the user.
#[derive(Error, Debug, Clone)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Request(String),

    #[error("Geocoding service returned HTTP {0}")]
    Status(u16),

    #[error("Failed to decode geocoding response: {0}")]
    Decode(String),
}
