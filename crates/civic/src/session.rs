//! A report wizard session wired to its asynchronous collaborators.
//!
//! The wizard lives behind a mutex that is only held for synchronous state
//! changes, never across an `.await`. Location lookups run as spawned tasks
//! and write their result whenever they finish, so the last lookup to
//! complete wins.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info_span, Instrument};

use crate::catalog::{Category, Severity, SubCategory};
use crate::location::LocationService;
use crate::notice::{Notice, NoticeBroadcaster};
use crate::submission::{ReferenceNumber, SubmissionError, Submitter};
use crate::transcribe::{Transcriber, TranscriptionError};
use crate::wizard::{ReviewSummary, Step, Wizard, WizardError, WizardState};

/// Notice shown when the device position cannot be obtained.
pub const LOCATION_FAILED: &str = "Could not fetch location";
pub const TRANSCRIBED: &str = "Voice transcribed successfully";

#[derive(Error, Debug, Clone)]
pub enum SessionError {
    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

pub struct ReportSession {
    id: String,
    wizard: Arc<Mutex<Wizard>>,
    location: LocationService,
    submitter: Arc<dyn Submitter>,
    transcriber: Option<Arc<dyn Transcriber>>,
    notices: NoticeBroadcaster,
}

fn lock(wizard: &Mutex<Wizard>) -> MutexGuard<'_, Wizard> {
    // Every wizard operation is all-or-nothing, so a poisoned state is still
    // consistent.
    wizard.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ReportSession {
    pub fn new(location: LocationService, submitter: Arc<dyn Submitter>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            wizard: Arc::new(Mutex::new(Wizard::new())),
            location,
            submitter,
            transcriber: None,
            notices: NoticeBroadcaster::default(),
        }
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn with_notices(mut self, notices: NoticeBroadcaster) -> Self {
        self.notices = notices;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// A copy of the current wizard state.
    pub fn snapshot(&self) -> WizardState {
        lock(&self.wizard).state().clone()
    }

    pub fn step(&self) -> Step {
        lock(&self.wizard).step()
    }

    /// Starts the session: issues the initial location lookup.
    pub fn start(&self) -> JoinHandle<()> {
        log::info!("Report session {} started", self.id);
        self.request_location()
    }

    /// Spawns a location lookup. On success the location is stored whatever
    /// the current step; on failure a notice is emitted and the user may
    /// request again.
    pub fn request_location(&self) -> JoinHandle<()> {
        let wizard = Arc::clone(&self.wizard);
        let location = self.location.clone();
        let notices = self.notices.clone();
        let span = info_span!("location_lookup", session = %self.id);

        tokio::spawn(
            async move {
                match location.acquire().await {
                    Ok(resolved) => {
                        log::debug!(
                            "Location resolved to {:.4}, {:.4}",
                            resolved.latitude,
                            resolved.longitude
                        );
                        lock(&wizard).set_location(resolved);
                    }
                    Err(e) => {
                        log::warn!("Location lookup failed: {}", e);
                        notices.error(LOCATION_FAILED);
                    }
                }
            }
            .instrument(span),
        )
    }

    /// Runs a wizard operation, turning a refusal into an error notice.
    fn apply<T>(
        &self,
        op: impl FnOnce(&mut Wizard) -> Result<T, WizardError>,
    ) -> Result<T, WizardError> {
        let result = op(&mut *lock(&self.wizard));
        if let Err(e) = &result {
            log::debug!("Session {} refused operation: {}", self.id, e);
            self.notices.error(e.to_string());
        }
        result
    }

    pub fn select_category(&self, category: Category) -> Result<(), WizardError> {
        self.apply(|w| w.select_category(category))
    }

    pub fn select_sub_category(&self, sub_category: SubCategory) -> Result<(), WizardError> {
        self.apply(|w| w.select_sub_category(sub_category))
    }

    pub fn select_sub_category_id(&self, id: &str) -> Result<(), WizardError> {
        self.apply(|w| w.select_sub_category_id(id))
    }

    pub fn set_description(&self, description: impl Into<String>) -> Result<(), WizardError> {
        let description = description.into();
        self.apply(|w| w.set_description(description))
    }

    pub fn set_severity(&self, severity: Severity) -> Result<(), WizardError> {
        self.apply(|w| w.set_severity(severity))
    }

    pub fn toggle_anonymous(&self) -> Result<bool, WizardError> {
        self.apply(|w| w.toggle_anonymous())
    }

    pub fn add_image(&self, image: impl Into<String>) -> Result<(), WizardError> {
        let image = image.into();
        self.apply(|w| w.add_image(image))
    }

    pub fn remove_image(&self, index: usize) -> Result<Option<String>, WizardError> {
        self.apply(|w| w.remove_image(index))
    }

    pub fn next_step(&self) -> Result<Step, WizardError> {
        self.apply(|w| w.next_step())
    }

    pub fn prev_step(&self) -> Result<Step, WizardError> {
        self.apply(|w| w.prev_step())
    }

    pub fn reset(&self) -> Result<(), WizardError> {
        self.apply(|w| w.reset())
    }

    pub fn review(&self) -> Result<ReviewSummary, WizardError> {
        lock(&self.wizard).review()
    }

    /// Submits the report from the review step.
    ///
    /// A second call while one is pending is refused. A failed submission
    /// keeps the wizard on the review step with every field intact.
    pub async fn submit(&self) -> Result<ReferenceNumber, SessionError> {
        let payload = self.apply(|w| w.begin_submission())?;
        let span = info_span!(
            "submit_report",
            session = %self.id,
            category = %payload.category,
            sub_category = %payload.sub_category
        );

        match self.submitter.submit(&payload).instrument(span).await {
            Ok(reference) => {
                self.apply(|w| w.complete_submission(reference.clone()))?;
                log::info!("Session {} submitted report {}", self.id, reference);
                self.notices
                    .success(format!("Report submitted. Reference: {}", reference));
                Ok(reference)
            }
            Err(e) => {
                lock(&self.wizard).abort_submission();
                log::warn!("Session {} submission failed: {}", self.id, e);
                self.notices
                    .error(format!("Submission failed. Please try again. ({})", e));
                Err(e.into())
            }
        }
    }

    /// Records speech and appends the transcript to the description.
    pub async fn dictate(&self) -> Result<(), SessionError> {
        let Some(transcriber) = self.transcriber.as_ref() else {
            self.notices.error(TranscriptionError::Unsupported.to_string());
            return Err(TranscriptionError::Unsupported.into());
        };

        let span = info_span!("transcribe", session = %self.id);
        let text = match transcriber.transcribe().instrument(span).await {
            Ok(text) => text,
            Err(e) => {
                self.notices.error(e.to_string());
                return Err(e.into());
            }
        };

        self.apply(|w| {
            w.append_description(&text)?;
            w.mark_analysis_ready();
            Ok(())
        })?;
        self.notices.success(TRANSCRIBED);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{FixedGeolocator, GeolocationError, Position, StaticGeocoder};
    use crate::submission::SimulatedSubmitter;
    use std::time::Duration;

    fn location_service() -> LocationService {
        LocationService::new(
            Arc::new(FixedGeolocator::new(Position {
                latitude: 28.6139,
                longitude: 77.209,
                accuracy: 10.0,
            })),
            Some(Arc::new(StaticGeocoder::new("Rajpath, New Delhi"))),
        )
    }

    fn session() -> ReportSession {
        ReportSession::new(
            location_service(),
            Arc::new(SimulatedSubmitter::new(Duration::ZERO, "DL-CIV")),
        )
    }

    #[tokio::test]
    async fn test_start_resolves_location() {
        let session = session();
        session.start().await.unwrap();
        let location = session.snapshot().location.unwrap();
        assert_eq!(location.address.as_deref(), Some("Rajpath, New Delhi"));
        assert_eq!(session.step(), Step::Category);
    }

    #[tokio::test]
    async fn test_failed_lookup_emits_notice() {
        let session = ReportSession::new(
            LocationService::new(
                Arc::new(FixedGeolocator::failing(GeolocationError::Timeout)),
                None,
            ),
            Arc::new(SimulatedSubmitter::new(Duration::ZERO, "DL-CIV")),
        );
        let mut notices = session.subscribe();
        session.start().await.unwrap();

        assert!(session.snapshot().location.is_none());
        assert_eq!(notices.recv().await.unwrap().message, LOCATION_FAILED);
    }

    #[tokio::test]
    async fn test_refusal_emits_notice() {
        let session = session();
        let mut notices = session.subscribe();
        assert_eq!(session.next_step(), Err(WizardError::CategoryRequired));
        assert_eq!(
            notices.recv().await.unwrap().message,
            "Please select a category"
        );
    }

    #[tokio::test]
    async fn test_dictate_without_transcriber() {
        let session = session();
        let mut notices = session.subscribe();
        let err = session.dictate().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Transcription(TranscriptionError::Unsupported)
        ));
        assert_eq!(
            notices.recv().await.unwrap().message,
            "Voice input not supported"
        );
    }

    #[tokio::test]
    async fn test_dictate_appends_and_shows_analysis() {
        let session = session().with_transcriber(Arc::new(
            crate::transcribe::SimulatedTranscriber::new(Duration::ZERO, "near the market."),
        ));
        session.set_description("Garbage everywhere").unwrap();
        let mut notices = session.subscribe();

        session.dictate().await.unwrap();

        let state = session.snapshot();
        assert_eq!(state.description, "Garbage everywhere near the market.");
        assert!(state.show_analysis);
        assert_eq!(notices.recv().await.unwrap().message, TRANSCRIBED);
    }
}
