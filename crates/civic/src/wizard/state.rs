//! Data collected by one wizard session.

use crate::catalog::{Category, Severity, SubCategory};
use crate::location::Location;
use crate::submission::ReferenceNumber;

use super::Step;

/// Snapshot of a wizard session. `WizardState::default()` is the initial
/// state of a fresh session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardState {
    pub current_step: Step,
    pub category: Option<Category>,
    pub sub_category: Option<SubCategory>,
    pub description: String,
    pub severity: Severity,
    pub is_anonymous: bool,
    pub images: Vec<String>,
    pub location: Option<Location>,
    /// Set only once the report reaches `Step::Success`.
    pub reference_number: Option<ReferenceNumber>,
    pub submitting: bool,
    /// A voice transcription completed and its analysis can be shown.
    pub show_analysis: bool,
}

impl WizardState {
    /// Label of the forward action on the current step.
    pub fn primary_action_label(&self) -> &'static str {
        match self.current_step {
            _ if self.submitting => "Submitting...",
            Step::Review => "Confirm & Submit",
            Step::Success => "Report Another Issue",
            _ => "Next Step",
        }
    }
}
