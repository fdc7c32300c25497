//! Test harness for isolated session execution.
//!
//! Each harness owns a file database in its own temporary directory, so
//! tests can run in parallel.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use civic::location::{FixedGeolocator, Geolocator, LocationService, StaticGeocoder};
use civic::submission::{SimulatedSubmitter, StoreSubmitter, Submitter};
use civic::{Database, ReportSession};

use super::builders::delhi_position;

pub const ADDRESS: &str = "Janpath, New Delhi";

pub struct TestHarness {
    temp_dir: TempDir,
    pub db_path: PathBuf,
    pub db: Database,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("civic.db");
        let db = Database::open(&db_path).expect("Failed to open database");
        Self {
            temp_dir,
            db_path,
            db,
        }
    }

    pub fn store_submitter(&self) -> StoreSubmitter {
        StoreSubmitter::new(self.db.clone(), "DL-CIV").with_reporter("You")
    }

    pub fn location_service(&self) -> LocationService {
        self.location_service_with(Arc::new(FixedGeolocator::new(delhi_position())))
    }

    pub fn location_service_with(&self, geolocator: Arc<dyn Geolocator>) -> LocationService {
        LocationService::new(geolocator, Some(Arc::new(StaticGeocoder::new(ADDRESS))))
    }

    /// A session that stores reports in the harness database.
    pub fn session(&self) -> ReportSession {
        ReportSession::new(self.location_service(), Arc::new(self.store_submitter()))
    }

    pub fn session_with(&self, submitter: Arc<dyn Submitter>) -> ReportSession {
        ReportSession::new(self.location_service(), submitter)
    }

    /// A session with an instant simulated submitter.
    pub fn simulated_session(&self) -> ReportSession {
        self.session_with(Arc::new(SimulatedSubmitter::new(Duration::ZERO, "DL-CIV")))
    }

    /// Reopens the database file, as a restarted process would.
    pub fn reopen(&self) -> Database {
        Database::open(&self.db_path).expect("Failed to reopen database")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
