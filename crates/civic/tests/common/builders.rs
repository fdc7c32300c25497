//! Builders and scripted collaborators for wizard and session tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use civic::catalog::{Category, Severity, SubCategory, WasteIssue};
use civic::location::{Location, Position};
use civic::submission::{ReferenceNumber, ReportPayload, SubmissionError, Submitter};
use civic::wizard::{Step, Wizard};

pub fn delhi_position() -> Position {
    Position {
        latitude: 28.6139,
        longitude: 77.2090,
        accuracy: 10.0,
    }
}

pub fn delhi() -> Location {
    Location::from_position(delhi_position()).with_address("Janpath, New Delhi")
}

/// Fills in a wizard up to a chosen step.
pub struct WizardBuilder {
    category: Category,
    sub_category: SubCategory,
    location: Option<Location>,
    description: String,
    severity: Option<Severity>,
    is_anonymous: bool,
}

impl WizardBuilder {
    pub fn new() -> Self {
        Self {
            category: Category::Waste,
            sub_category: SubCategory::from(WasteIssue::GarbagePile),
            location: Some(delhi()),
            description: "Garbage pile blocking road".to_string(),
            severity: None,
            is_anonymous: false,
        }
    }

    pub fn category(mut self, category: Category, sub_category: SubCategory) -> Self {
        self.category = category;
        self.sub_category = sub_category;
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn without_location(mut self) -> Self {
        self.location = None;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.is_anonymous = true;
        self
    }

    /// Advances through the data entry steps until `target` is current.
    pub fn build_at(self, target: Step) -> Wizard {
        let mut wizard = Wizard::new();
        if let Some(location) = self.location {
            wizard.set_location(location);
        }
        while wizard.step() != target {
            match wizard.step() {
                Step::Category => wizard.select_category(self.category).unwrap(),
                Step::SubCategory => wizard.select_sub_category(self.sub_category).unwrap(),
                Step::Details => {
                    wizard.set_description(self.description.clone()).unwrap();
                    if let Some(severity) = self.severity {
                        wizard.set_severity(severity).unwrap();
                    }
                    wizard.set_anonymous(self.is_anonymous).unwrap();
                }
                _ => {}
            }
            wizard.next_step().unwrap();
        }
        wizard
    }
}

impl Default for WizardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A submitter that holds every submission until released.
pub struct GatedSubmitter {
    gate: Notify,
    calls: AtomicUsize,
}

impl GatedSubmitter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Submitter for GatedSubmitter {
    async fn submit(&self, _payload: &ReportPayload) -> Result<ReferenceNumber, SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(ReferenceNumber::generate("DL-CIV"))
    }
}

/// A submitter whose network is always down.
pub struct FailingSubmitter;

#[async_trait]
impl Submitter for FailingSubmitter {
    async fn submit(&self, _payload: &ReportPayload) -> Result<ReferenceNumber, SubmissionError> {
        Err(SubmissionError::Network("connection refused".to_string()))
    }
}
