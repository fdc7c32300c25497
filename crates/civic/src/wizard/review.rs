//! The review step's read-only view of a report.

use serde::Serialize;

use super::{WizardError, WizardState};

/// Display strings shown on the review step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    /// Category display name, e.g. "Waste & Garbage".
    pub category: &'static str,
    /// Issue type label, e.g. "Garbage Pile".
    pub sub_category: &'static str,
    /// Severity id, e.g. "medium".
    pub severity: &'static str,
    pub description: String,
    pub is_anonymous: bool,
    pub address: Option<String>,
    pub image_count: usize,
}

impl ReviewSummary {
    pub(crate) fn from_state(state: &WizardState) -> Result<Self, WizardError> {
        let category = state.category.ok_or(WizardError::CategoryRequired)?;
        let sub_category = state.sub_category.ok_or(WizardError::SubCategoryRequired)?;
        Ok(Self {
            category: category.name(),
            sub_category: sub_category.label(),
            severity: state.severity.id(),
            description: state.description.clone(),
            is_anonymous: state.is_anonymous,
            address: state.location.as_ref().map(|l| l.display_address()),
            image_count: state.images.len(),
        })
    }
}
