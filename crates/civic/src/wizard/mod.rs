//! The report wizard: a strictly ordered five-step flow that validates each
//! step before advancing and assembles the submission payload.
//!
//! [`Wizard`] is the synchronous state machine. [`crate::session::ReportSession`]
//! drives it with the asynchronous collaborators.

pub mod error;
pub mod machine;
pub mod review;
pub mod state;
pub mod step;

pub use error::WizardError;
pub use machine::Wizard;
pub use review::ReviewSummary;
pub use state::WizardState;
pub use step::{IndicatorItem, IndicatorState, Step};
