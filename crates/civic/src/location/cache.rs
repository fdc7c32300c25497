//! TTL cache in front of a reverse geocoder.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::sync::Cache;

use super::{GeocodeError, ReverseGeocoder};

const MAX_ENTRIES: u64 = 10_000;

/// Coordinates rounded to 4 decimals (about 11 m).
type CellKey = (i64, i64);

fn cell_key(latitude: f64, longitude: f64) -> CellKey {
    (
        (latitude * 10_000.0).round() as i64,
        (longitude * 10_000.0).round() as i64,
    )
}

/// Caches successful lookups per coordinate cell. Failures are not cached.
pub struct CachedGeocoder {
    inner: Arc<dyn ReverseGeocoder>,
    cache: Cache<CellKey, String>,
}

impl CachedGeocoder {
    pub fn new(inner: Arc<dyn ReverseGeocoder>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(ttl)
                .build(),
        }
    }
}

#[async_trait]
impl ReverseGeocoder for CachedGeocoder {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<String, GeocodeError> {
        let key = cell_key(latitude, longitude);
        if let Some(address) = self.cache.get(&key) {
            return Ok(address);
        }

        let address = self.inner.reverse_geocode(latitude, longitude).await?;
        self.cache.insert(key, address.clone());
        Ok(address)
    }
}
