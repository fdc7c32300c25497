//! Wizard error types.
//!
//! Every error leaves the wizard unchanged. The `Display` text is the notice
//! shown to the user.

use thiserror::Error;

use crate::catalog::{CatalogError, Category, SubCategory};

use super::Step;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Please select a category")]
    CategoryRequired,

    #[error("Please select a specific issue")]
    SubCategoryRequired,

    #[error("Location is required")]
    LocationRequired,

    #[error("Please describe the issue")]
    DescriptionRequired,

    #[error("Review the report and submit it")]
    SubmitRequired,

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("The report has already been submitted")]
    AlreadySubmitted,

    #[error("Reports can only be submitted from the review step (at step {0})")]
    NotAtReview(Step),

    #[error("A submission is already in progress")]
    SubmissionPending,

    #[error("No submission is in progress")]
    NoSubmissionPending,

    #[error("'{sub_category}' is not an issue type of the selected category")]
    SubCategoryMismatch {
        selected: Option<Category>,
        sub_category: SubCategory,
    },

    #[error("Only a submitted report can be reset")]
    NotSubmitted,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl WizardError {
    /// Whether this is a step's required-field guard.
    pub fn is_guard_failure(&self) -> bool {
        matches!(
            self,
            WizardError::CategoryRequired
                | WizardError::SubCategoryRequired
                | WizardError::LocationRequired
                | WizardError::DescriptionRequired
        )
    }
}
