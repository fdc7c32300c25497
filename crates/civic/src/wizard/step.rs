//! Wizard steps and the progress indicator.

use std::fmt;

use serde::Serialize;

/// A wizard step. Steps 1-5 collect data; `Success` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Category = 1,
    SubCategory = 2,
    Location = 3,
    Details = 4,
    Review = 5,
    Success = 6,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Category,
        Step::SubCategory,
        Step::Location,
        Step::Details,
        Step::Review,
        Step::Success,
    ];

    /// Steps shown in the progress indicator.
    pub const INDICATED: [Step; 5] = [
        Step::Category,
        Step::SubCategory,
        Step::Location,
        Step::Details,
        Step::Review,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Step> {
        Step::ALL.into_iter().find(|s| s.number() == n)
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::Category => "Category",
            Step::SubCategory => "Type",
            Step::Location => "Location",
            Step::Details => "Details",
            Step::Review => "Review",
            Step::Success => "Submitted",
        }
    }

    pub fn next(self) -> Option<Step> {
        Step::from_number(self.number() + 1)
    }

    pub fn prev(self) -> Option<Step> {
        self.number().checked_sub(1).and_then(Step::from_number)
    }

    pub fn is_data_entry(self) -> bool {
        self != Step::Success
    }

    pub fn is_terminal(self) -> bool {
        self == Step::Success
    }

    /// Completion of the indicator, `None` on the terminal step.
    pub fn progress_percent(self) -> Option<u8> {
        let last = Step::INDICATED.len() as u16 - 1;
        self.is_data_entry()
            .then(|| ((self.number() as u16 - 1) * 100 / last) as u8)
    }

    /// The indicator as seen from this step, `None` on the terminal step.
    pub fn indicator(self) -> Option<Vec<IndicatorItem>> {
        if self.is_terminal() {
            return None;
        }
        Some(
            Step::INDICATED
                .into_iter()
                .map(|step| IndicatorItem {
                    step,
                    label: step.label(),
                    state: match step.cmp(&self) {
                        std::cmp::Ordering::Less => IndicatorState::Done,
                        std::cmp::Ordering::Equal => IndicatorState::Current,
                        std::cmp::Ordering::Greater => IndicatorState::Upcoming,
                    },
                })
                .collect(),
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorState {
    Done,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorItem {
    pub step: Step,
    pub label: &'static str,
    pub state: IndicatorState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering() {
        for (i, step) in Step::ALL.into_iter().enumerate() {
            assert_eq!(step.number() as usize, i + 1);
            assert_eq!(Step::from_number(step.number()), Some(step));
        }
        assert_eq!(Step::from_number(0), None);
        assert_eq!(Step::from_number(7), None);
    }

    #[test]
    fn test_next_and_prev() {
        assert_eq!(Step::Category.next(), Some(Step::SubCategory));
        assert_eq!(Step::Review.next(), Some(Step::Success));
        assert_eq!(Step::Success.next(), None);
        assert_eq!(Step::Category.prev(), None);
        assert_eq!(Step::Details.prev(), Some(Step::Location));
    }

    #[test]
    fn test_progress_percent() {
        let progress: Vec<Option<u8>> = Step::ALL.into_iter().map(Step::progress_percent).collect();
        assert_eq!(
            progress,
            vec![Some(0), Some(25), Some(50), Some(75), Some(100), None]
        );
    }

    #[test]
    fn test_indicator_labels_and_states() {
        let items = Step::Location.indicator().unwrap();
        let labels: Vec<&str> = items.iter().map(|i| i.label).collect();
        assert_eq!(labels, vec!["Category", "Type", "Location", "Details", "Review"]);
        assert_eq!(items[1].state, IndicatorState::Done);
        assert_eq!(items[2].state, IndicatorState::Current);
        assert_eq!(items[4].state, IndicatorState::Upcoming);
    }

    #[test]
    fn test_success_has_no_indicator() {
        assert!(Step::Success.indicator().is_none());
        assert!(Step::Success.is_terminal());
    }
}
