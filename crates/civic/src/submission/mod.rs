//! Report submission: the payload, the collaborator contract, and its
//! implementations.

pub mod error;
pub mod reference;
pub mod simulated;
pub mod store;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Severity, SubCategory};
use crate::location::Location;

pub use error::{PayloadError, ReferenceError, SubmissionError};
pub use reference::{ReferenceNumber, DEFAULT_PREFIX};
pub use simulated::SimulatedSubmitter;
pub use store::StoreSubmitter;

/// The data sent when a report is filed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub category: Category,
    pub sub_category: SubCategory,
    pub description: String,
    pub severity: Severity,
    pub is_anonymous: bool,
    pub images: Vec<String>,
    pub location: Option<Location>,
}

/// An unvalidated report as received over the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    pub category: String,
    pub sub_category: String,
    pub description: String,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl ReportDraft {
    /// Resolves catalog ids and checks the description.
    pub fn validate(self) -> Result<ReportPayload, PayloadError> {
        let category: Category = self.category.parse()?;
        let sub_category = SubCategory::parse(category, &self.sub_category)?;
        let severity = match self.severity.as_deref() {
            Some(s) => s.parse()?,
            None => Severity::default(),
        };

        if self.description.trim().is_empty() {
            return Err(PayloadError::MissingDescription);
        }

        Ok(ReportPayload {
            category,
            sub_category,
            description: self.description,
            severity,
            is_anonymous: self.is_anonymous,
            images: self.images,
            location: self.location,
        })
    }
}

/// Files a report and returns its tracking reference.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, payload: &ReportPayload) -> Result<ReferenceNumber, SubmissionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, WasteIssue};

    fn draft() -> ReportDraft {
        serde_json::from_str(
            r#"{
                "category": "waste",
                "subCategory": "garbage_pile",
                "description": "Garbage pile blocking road",
                "location": {"latitude": 28.6139, "longitude": 77.209, "accuracy": 10.0}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_resolves_catalog_and_defaults() {
        let payload = draft().validate().unwrap();
        assert_eq!(payload.category, Category::Waste);
        assert_eq!(payload.sub_category, SubCategory::Waste(WasteIssue::GarbagePile));
        assert_eq!(payload.severity, Severity::Medium);
        assert!(!payload.is_anonymous);
        assert!(payload.images.is_empty());
        assert_eq!(payload.location.unwrap().address, None);
    }

    #[test]
    fn test_validate_rejects_mismatched_sub_category() {
        let mut d = draft();
        d.category = "power".to_string();
        assert!(matches!(
            d.validate(),
            Err(PayloadError::Catalog(CatalogError::UnknownSubCategory { .. }))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_description_and_bad_severity() {
        let mut d = draft();
        d.description = "   ".to_string();
        assert_eq!(d.validate().unwrap_err(), PayloadError::MissingDescription);

        let mut d = draft();
        d.severity = Some("extreme".to_string());
        assert!(matches!(
            d.validate(),
            Err(PayloadError::Catalog(CatalogError::UnknownSeverity(_)))
        ));
    }

    #[test]
    fn test_payload_serializes_camel_case() {
        let payload = draft().validate().unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["category"], "waste");
        assert_eq!(json["subCategory"], "garbage_pile");
        assert_eq!(json["severity"], "medium");
        assert_eq!(json["isAnonymous"], false);
    }
}
