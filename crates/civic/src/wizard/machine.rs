//! The wizard state machine.

use crate::catalog::{Category, Severity, SubCategory};
use crate::location::Location;
use crate::submission::{ReferenceNumber, ReportPayload};

use super::{ReviewSummary, Step, WizardError, WizardState};

/// A single report wizard session.
///
/// Every operation either applies fully or returns an error and leaves the
/// state untouched.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    state: WizardState,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.current_step
    }

    // ─── Field edits ────────────────────────────────────────────────────────

    fn ensure_editable(&self) -> Result<(), WizardError> {
        if self.state.current_step.is_terminal() {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.state.submitting {
            return Err(WizardError::SubmissionPending);
        }
        Ok(())
    }

    /// Selects a category. Always clears the issue type, even when the same
    /// category is selected again.
    pub fn select_category(&mut self, category: Category) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.state.category = Some(category);
        self.state.sub_category = None;
        Ok(())
    }

    pub fn select_sub_category(&mut self, sub_category: SubCategory) -> Result<(), WizardError> {
        self.ensure_editable()?;
        if self.state.category != Some(sub_category.category()) {
            return Err(WizardError::SubCategoryMismatch {
                selected: self.state.category,
                sub_category,
            });
        }
        self.state.sub_category = Some(sub_category);
        Ok(())
    }

    /// Selects an issue type by id, resolved against the selected category.
    pub fn select_sub_category_id(&mut self, id: &str) -> Result<(), WizardError> {
        let category = self.state.category.ok_or(WizardError::CategoryRequired)?;
        let sub_category = SubCategory::parse(category, id)?;
        self.select_sub_category(sub_category)
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.state.description = description.into();
        Ok(())
    }

    /// Appends text to the description, separated by a single space when the
    /// description is not empty.
    pub fn append_description(&mut self, text: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        if !self.state.description.is_empty() {
            self.state.description.push(' ');
        }
        self.state.description.push_str(text);
        Ok(())
    }

    pub fn set_severity(&mut self, severity: Severity) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.state.severity = severity;
        Ok(())
    }

    pub fn set_anonymous(&mut self, is_anonymous: bool) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.state.is_anonymous = is_anonymous;
        Ok(())
    }

    /// Flips anonymity and returns the new value.
    pub fn toggle_anonymous(&mut self) -> Result<bool, WizardError> {
        self.ensure_editable()?;
        self.state.is_anonymous = !self.state.is_anonymous;
        Ok(self.state.is_anonymous)
    }

    pub fn add_image(&mut self, image: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.state.images.push(image.into());
        Ok(())
    }

    /// Removes the image at `index`. Returns `Ok(None)` when there is none.
    pub fn remove_image(&mut self, index: usize) -> Result<Option<String>, WizardError> {
        self.ensure_editable()?;
        if index >= self.state.images.len() {
            return Ok(None);
        }
        Ok(Some(self.state.images.remove(index)))
    }

    /// Stores a location. Unconditional: the latest result wins at any step.
    pub fn set_location(&mut self, location: Location) {
        self.state.location = Some(location);
    }

    pub fn mark_analysis_ready(&mut self) {
        self.state.show_analysis = true;
    }

    // ─── Navigation ─────────────────────────────────────────────────────────

    /// Checks the current step's required field.
    fn check_guard(&self) -> Result<(), WizardError> {
        let state = &self.state;
        match state.current_step {
            Step::Category if state.category.is_none() => Err(WizardError::CategoryRequired),
            Step::SubCategory if state.sub_category.is_none() => {
                Err(WizardError::SubCategoryRequired)
            }
            Step::Location if state.location.is_none() => Err(WizardError::LocationRequired),
            Step::Details if state.description.is_empty() => {
                Err(WizardError::DescriptionRequired)
            }
            Step::Review => Err(WizardError::SubmitRequired),
            Step::Success => Err(WizardError::AlreadySubmitted),
            _ => Ok(()),
        }
    }

    /// Advances one step if the current step's required field is set.
    pub fn next_step(&mut self) -> Result<Step, WizardError> {
        self.check_guard()?;
        let next = self
            .state
            .current_step
            .next()
            .ok_or(WizardError::AlreadySubmitted)?;
        log::debug!("Wizard advancing {} -> {}", self.state.current_step, next);
        self.state.current_step = next;
        Ok(next)
    }

    pub fn can_go_back(&self) -> bool {
        let step = self.state.current_step;
        step.is_data_entry() && step.prev().is_some() && !self.state.submitting
    }

    /// Goes back one step.
    pub fn prev_step(&mut self) -> Result<Step, WizardError> {
        let step = self.state.current_step;
        if step.is_terminal() {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.state.submitting {
            return Err(WizardError::SubmissionPending);
        }
        let prev = step.prev().ok_or(WizardError::AtFirstStep)?;
        self.state.current_step = prev;
        Ok(prev)
    }

    // ─── Submission ─────────────────────────────────────────────────────────

    /// Marks a submission pending and returns the payload to send.
    pub fn begin_submission(&mut self) -> Result<ReportPayload, WizardError> {
        let state = &self.state;
        if state.current_step != Step::Review {
            return Err(WizardError::NotAtReview(state.current_step));
        }
        if state.submitting {
            return Err(WizardError::SubmissionPending);
        }
        let category = state.category.ok_or(WizardError::CategoryRequired)?;
        let sub_category = state.sub_category.ok_or(WizardError::SubCategoryRequired)?;

        let payload = ReportPayload {
            category,
            sub_category,
            description: state.description.clone(),
            severity: state.severity,
            is_anonymous: state.is_anonymous,
            images: state.images.clone(),
            location: state.location.clone(),
        };
        self.state.submitting = true;
        Ok(payload)
    }

    /// Records the reference number of the pending submission and moves to
    /// the success step.
    pub fn complete_submission(&mut self, reference: ReferenceNumber) -> Result<(), WizardError> {
        if !self.state.submitting {
            return Err(WizardError::NoSubmissionPending);
        }
        self.state.submitting = false;
        self.state.reference_number = Some(reference);
        self.state.current_step = Step::Success;
        Ok(())
    }

    /// Clears the pending flag after a failed submission. Data and step are kept.
    pub fn abort_submission(&mut self) {
        self.state.submitting = false;
    }

    /// Starts over after a successful submission.
    pub fn reset(&mut self) -> Result<(), WizardError> {
        if !self.state.current_step.is_terminal() {
            return Err(WizardError::NotSubmitted);
        }
        self.state = WizardState::default();
        Ok(())
    }

    pub fn review(&self) -> Result<ReviewSummary, WizardError> {
        ReviewSummary::from_state(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AirIssue, WasteIssue, WaterIssue};

    fn delhi() -> Location {
        Location {
            latitude: 28.6139,
            longitude: 77.209,
            accuracy: 15.0,
            address: Some("Janpath, New Delhi".to_string()),
        }
    }

    /// A wizard at the review step with a complete waste report.
    fn at_review() -> Wizard {
        let mut wizard = Wizard::new();
        wizard.select_category(Category::Waste).unwrap();
        wizard.next_step().unwrap();
        wizard
            .select_sub_category(WasteIssue::GarbagePile.into())
            .unwrap();
        wizard.next_step().unwrap();
        wizard.set_location(delhi());
        wizard.next_step().unwrap();
        wizard.set_description("Garbage pile blocking road").unwrap();
        wizard.next_step().unwrap();
        assert_eq!(wizard.step(), Step::Review);
        wizard
    }

    #[test]
    fn test_category_change_resets_sub_category() {
        let mut wizard = Wizard::new();
        wizard.select_category(Category::Water).unwrap();
        wizard.select_sub_category(WaterIssue::NoSupply.into()).unwrap();

        wizard.select_category(Category::Water).unwrap();
        assert_eq!(wizard.state().sub_category, None);

        wizard.select_sub_category(WaterIssue::NoSupply.into()).unwrap();
        wizard.select_category(Category::Air).unwrap();
        assert_eq!(wizard.state().sub_category, None);
    }

    #[test]
    fn test_guards_block_each_step() {
        let mut wizard = Wizard::new();
        assert_eq!(wizard.next_step(), Err(WizardError::CategoryRequired));
        wizard.select_category(Category::Air).unwrap();
        wizard.next_step().unwrap();

        assert_eq!(wizard.next_step(), Err(WizardError::SubCategoryRequired));
        wizard
            .select_sub_category(AirIssue::ConstructionDust.into())
            .unwrap();
        wizard.next_step().unwrap();

        assert_eq!(wizard.next_step(), Err(WizardError::LocationRequired));
        wizard.set_location(delhi());
        wizard.next_step().unwrap();

        assert_eq!(wizard.next_step(), Err(WizardError::DescriptionRequired));
        assert_eq!(wizard.step(), Step::Details);
    }

    #[test]
    fn test_guard_failure_leaves_state_untouched() {
        let mut wizard = Wizard::new();
        let before = wizard.state().clone();
        let err = wizard.next_step().unwrap_err();
        assert!(err.is_guard_failure());
        assert_eq!(err.to_string(), "Please select a category");
        assert_eq!(wizard.state(), &before);
    }

    #[test]
    fn test_whitespace_description_passes_guard() {
        let mut wizard = at_review();
        wizard.prev_step().unwrap();
        wizard.set_description(" ").unwrap();
        assert_eq!(wizard.next_step(), Ok(Step::Review));
    }

    #[test]
    fn test_mismatched_sub_category_rejected() {
        let mut wizard = Wizard::new();
        let err = wizard
            .select_sub_category(WasteIssue::Burning.into())
            .unwrap_err();
        assert!(matches!(
            err,
            WizardError::SubCategoryMismatch { selected: None, .. }
        ));

        wizard.select_category(Category::Water).unwrap();
        assert!(wizard.select_sub_category(WasteIssue::Burning.into()).is_err());
        assert_eq!(wizard.state().sub_category, None);
    }

    #[test]
    fn test_select_sub_category_by_id() {
        let mut wizard = Wizard::new();
        assert_eq!(
            wizard.select_sub_category_id("other"),
            Err(WizardError::CategoryRequired)
        );
        wizard.select_category(Category::Other).unwrap();
        wizard.select_sub_category_id("other").unwrap();
        assert_eq!(wizard.state().sub_category.unwrap().label(), "Something Else");
        assert!(matches!(
            wizard.select_sub_category_id("pothole"),
            Err(WizardError::Catalog(_))
        ));
    }

    #[test]
    fn test_prev_step() {
        let mut wizard = Wizard::new();
        assert_eq!(wizard.prev_step(), Err(WizardError::AtFirstStep));
        assert!(!wizard.can_go_back());

        let mut wizard = at_review();
        assert!(wizard.can_go_back());
        assert_eq!(wizard.prev_step(), Ok(Step::Details));
        assert_eq!(wizard.prev_step(), Ok(Step::Location));
        assert_eq!(wizard.state().description, "Garbage pile blocking road");
    }

    #[test]
    fn test_review_cannot_advance_without_submit() {
        let mut wizard = at_review();
        assert_eq!(wizard.next_step(), Err(WizardError::SubmitRequired));
        assert_eq!(wizard.step(), Step::Review);
    }

    #[test]
    fn test_review_summary() {
        let wizard = at_review();
        let review = wizard.review().unwrap();
        assert_eq!(review.category, "Waste & Garbage");
        assert_eq!(review.sub_category, "Garbage Pile");
        assert_eq!(review.severity, "medium");
        assert_eq!(review.description, "Garbage pile blocking road");
        assert_eq!(review.address.as_deref(), Some("Janpath, New Delhi"));
    }

    #[test]
    fn test_submission_lifecycle() {
        let mut wizard = at_review();
        let payload = wizard.begin_submission().unwrap();
        assert_eq!(payload.category, Category::Waste);
        assert_eq!(payload.severity, Severity::Medium);
        assert!(wizard.state().submitting);

        assert_eq!(
            wizard.begin_submission(),
            Err(WizardError::SubmissionPending)
        );
        assert_eq!(wizard.prev_step(), Err(WizardError::SubmissionPending));
        assert!(!wizard.can_go_back());
        assert_eq!(
            wizard.set_description("changed"),
            Err(WizardError::SubmissionPending)
        );

        let reference = ReferenceNumber::parse("DL-CIV-4821").unwrap();
        wizard.complete_submission(reference.clone()).unwrap();
        assert_eq!(wizard.step(), Step::Success);
        assert_eq!(wizard.state().reference_number, Some(reference));
        assert!(!wizard.state().submitting);
    }

    #[test]
    fn test_aborted_submission_keeps_data() {
        let mut wizard = at_review();
        let before = wizard.state().clone();
        wizard.begin_submission().unwrap();
        wizard.abort_submission();
        assert_eq!(wizard.state(), &before);
        assert!(wizard.begin_submission().is_ok());
    }

    #[test]
    fn test_submit_outside_review_refused() {
        let mut wizard = Wizard::new();
        assert_eq!(
            wizard.begin_submission(),
            Err(WizardError::NotAtReview(Step::Category))
        );
        let reference = ReferenceNumber::parse("DL-CIV-1").unwrap();
        assert_eq!(
            wizard.complete_submission(reference),
            Err(WizardError::NoSubmissionPending)
        );
    }

    #[test]
    fn test_success_is_terminal_until_reset() {
        let mut wizard = at_review();
        wizard.begin_submission().unwrap();
        wizard
            .complete_submission(ReferenceNumber::parse("DL-CIV-77").unwrap())
            .unwrap();

        assert_eq!(wizard.next_step(), Err(WizardError::AlreadySubmitted));
        assert_eq!(wizard.prev_step(), Err(WizardError::AlreadySubmitted));
        assert_eq!(
            wizard.select_category(Category::Power),
            Err(WizardError::AlreadySubmitted)
        );

        wizard.reset().unwrap();
        assert_eq!(wizard.state(), &WizardState::default());
    }

    #[test]
    fn test_reset_outside_success_refused() {
        let mut wizard = at_review();
        assert_eq!(wizard.reset(), Err(WizardError::NotSubmitted));
        assert_eq!(wizard.step(), Step::Review);
    }

    #[test]
    fn test_append_description() {
        let mut wizard = Wizard::new();
        wizard.append_description("First.").unwrap();
        assert_eq!(wizard.state().description, "First.");
        wizard.append_description("Second.").unwrap();
        assert_eq!(wizard.state().description, "First. Second.");
    }

    #[test]
    fn test_images_and_anonymity() {
        let mut wizard = Wizard::new();
        wizard.add_image("a.jpg").unwrap();
        wizard.add_image("b.jpg").unwrap();
        assert_eq!(wizard.remove_image(0).unwrap().as_deref(), Some("a.jpg"));
        assert_eq!(wizard.remove_image(5).unwrap(), None);
        assert_eq!(wizard.state().images, vec!["b.jpg"]);

        assert!(wizard.toggle_anonymous().unwrap());
        assert!(!wizard.toggle_anonymous().unwrap());
    }

    #[test]
    fn test_location_overwrites_at_any_step() {
        let mut wizard = Wizard::new();
        wizard.set_location(delhi());
        let mumbai = Location {
            latitude: 19.076,
            longitude: 72.8777,
            accuracy: 30.0,
            address: None,
        };
        wizard.set_location(mumbai.clone());
        assert_eq!(wizard.state().location, Some(mumbai));
    }
}
