//! Submission error types.

use thiserror::Error;

use crate::catalog::CatalogError;

/// Failure of the submission collaborator. The wizard keeps its data and
/// offers a retry.
#[derive(Error, Debug, Clone)]
pub enum SubmissionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Report could not be stored: {0}")]
    Store(String),
}

impl From<crate::db::DatabaseError> for SubmissionError {
    fn from(err: crate::db::DatabaseError) -> Self {
        SubmissionError::Store(err.to_string())
    }
}

/// A report payload that does not describe a valid report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Description must not be empty")]
    MissingDescription,
}

/// A string that is not a reference number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid reference number '{0}'")]
pub struct ReferenceError(pub String);
