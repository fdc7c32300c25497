pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod location;
pub mod logging;
pub mod notice;
pub mod records;
pub mod session;
pub mod submission;
pub mod transcribe;
pub mod wizard;

use std::sync::Arc;
use std::time::Duration;

pub use catalog::{Category, Severity, SubCategory};
pub use config::{load_config, load_config_from_env, Config};
pub use dashboard::{CivicData, FixtureData, StoreData};
pub use db::Database;
pub use error::{CivicError, ConfigError, Result};
pub use location::{Geolocator, Location, LocationService, ReverseGeocoder};
pub use notice::{Notice, NoticeBroadcaster, NoticeLevel};
pub use session::ReportSession;
pub use submission::{ReferenceNumber, ReportDraft, ReportPayload, Submitter};
pub use wizard::{Step, Wizard, WizardError, WizardState};

use config::{
    DashboardSource, GeocoderConfig, SubmissionConfig, SubmissionMode, MAX_CACHE_TTL_SECS,
};
use location::{CachedGeocoder, NominatimGeocoder};
use submission::{SimulatedSubmitter, StoreSubmitter};

/// The submitter selected by `submission.mode`.
pub fn build_submitter(config: &SubmissionConfig, db: &Database) -> Arc<dyn Submitter> {
    match config.mode {
        SubmissionMode::Simulated => Arc::new(SimulatedSubmitter::new(
            Duration::from_millis(config.simulated_delay_ms),
            config.reference_prefix.clone(),
        )),
        SubmissionMode::Store => {
            let mut submitter = StoreSubmitter::new(db.clone(), config.reference_prefix.clone());
            if let Some(reporter) = &config.reporter {
                submitter = submitter.with_reporter(reporter.clone());
            }
            Arc::new(submitter)
        }
    }
}

/// The reverse geocoder described by `geocoder`, or `None` when disabled.
///
/// The cache TTL is capped at [`MAX_CACHE_TTL_SECS`] for configs that skipped
/// the loader.
pub fn build_geocoder(
    config: &GeocoderConfig,
) -> std::result::Result<Option<Arc<dyn ReverseGeocoder>>, location::GeocodeError> {
    if !config.enabled {
        return Ok(None);
    }

    let nominatim: Arc<dyn ReverseGeocoder> = Arc::new(NominatimGeocoder::new(
        &config.base_url,
        Duration::from_secs(config.timeout_secs),
        &config.user_agent,
    )?);

    if config.cache_ttl_secs == 0 {
        return Ok(Some(nominatim));
    }

    Ok(Some(Arc::new(CachedGeocoder::new(
        nominatim,
        Duration::from_secs(config.cache_ttl_secs.min(MAX_CACHE_TTL_SECS)),
    ))))
}

/// A location service for `geolocator` using the configured geocoder.
pub fn build_location_service(
    geolocator: Arc<dyn Geolocator>,
    config: &GeocoderConfig,
) -> std::result::Result<LocationService, location::GeocodeError> {
    Ok(LocationService::new(geolocator, build_geocoder(config)?))
}

/// The dashboard data source selected by `server.dashboard`.
pub fn build_dashboard(config: &Config, db: &Database) -> Arc<dyn CivicData> {
    match config.server.dashboard {
        DashboardSource::Fixture => Arc::new(FixtureData),
        DashboardSource::Store => {
            let mut data = StoreData::new(db.clone());
            if let Some(reporter) = &config.submission.reporter {
                data = data.with_reporter(reporter.clone());
            }
            Arc::new(data)
        }
    }
}
