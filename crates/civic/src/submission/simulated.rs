//! Submission stand-in that only waits and fabricates a reference number.

use std::time::Duration;

use async_trait::async_trait;

use super::{ReferenceNumber, ReportPayload, SubmissionError, Submitter};

/// Latency used when none is configured.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

pub struct SimulatedSubmitter {
    delay: Duration,
    prefix: String,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration, prefix: impl Into<String>) -> Self {
        Self {
            delay,
            prefix: prefix.into(),
        }
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY, super::DEFAULT_PREFIX)
    }
}

#[async_trait]
impl Submitter for SimulatedSubmitter {
    async fn submit(&self, payload: &ReportPayload) -> Result<ReferenceNumber, SubmissionError> {
        log::debug!(
            "Simulating submission of {}/{} report",
            payload.category,
            payload.sub_category
        );
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(ReferenceNumber::generate(&self.prefix))
    }
}
