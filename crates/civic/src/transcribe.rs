//! Voice-to-text collaborator.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionError {
    #[error("Voice input not supported")]
    Unsupported,

    #[error("Transcription failed: {0}")]
    Failed(String),
}

/// Records speech and returns it as text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self) -> Result<String, TranscriptionError>;
}

/// Recording time used when none is configured.
pub const DEFAULT_RECORDING_DELAY: Duration = Duration::from_secs(2);

/// Text produced by [`SimulatedTranscriber::default`].
pub const SAMPLE_TRANSCRIPT: &str =
    "There is a large pile of garbage blocking the road near the main market.";

/// Waits as if recording, then returns a canned transcript.
pub struct SimulatedTranscriber {
    delay: Duration,
    transcript: String,
}

impl SimulatedTranscriber {
    pub fn new(delay: Duration, transcript: impl Into<String>) -> Self {
        Self {
            delay,
            transcript: transcript.into(),
        }
    }
}

impl Default for SimulatedTranscriber {
    fn default() -> Self {
        Self::new(DEFAULT_RECORDING_DELAY, SAMPLE_TRANSCRIPT)
    }
}

#[async_trait]
impl Transcriber for SimulatedTranscriber {
    async fn transcribe(&self) -> Result<String, TranscriptionError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.transcript.clone())
    }
}
