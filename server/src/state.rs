use std::sync::Arc;

use civic::dashboard::CivicData;
use civic::location::ReverseGeocoder;
use civic::submission::StoreSubmitter;
use civic::Database;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Files reports received over HTTP.
    pub reports: StoreSubmitter,
    pub dashboard: Arc<dyn CivicData>,
    /// Resolves addresses for reports filed with bare coordinates.
    pub geocoder: Option<Arc<dyn ReverseGeocoder>>,
}

impl AppState {
    pub fn new(db: Database, reports: StoreSubmitter, dashboard: Arc<dyn CivicData>) -> Self {
        Self {
            db,
            reports,
            dashboard,
            geocoder: None,
        }
    }

    pub fn with_geocoder(mut self, geocoder: Option<Arc<dyn ReverseGeocoder>>) -> Self {
        self.geocoder = geocoder;
        self
    }
}
