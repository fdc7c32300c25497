//! Health records: vitals, symptoms, diagnoses and test results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, require, RecordError};

string_enum! {
    HealthRecordKind ("type") {
        Vital => "vital",
        Symptom => "symptom",
        Diagnosis => "diagnosis",
        Test => "test",
        General => "general",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: f64,
    pub diastolic: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<BloodPressure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glucose: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxygen: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: HealthRecordKind,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vitals: Option<Vitals>,
    pub symptoms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub attachments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHealthRecord {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: HealthRecordKind,
    /// Defaults to the creation time.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub vitals: Option<Vitals>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub doctor_id: Option<String>,
}

impl NewHealthRecord {
    pub fn validate(&self) -> Result<(), RecordError> {
        require("userId", &self.user_id)
    }

    pub fn into_record(self, now: DateTime<Utc>) -> HealthRecord {
        HealthRecord {
            id: new_id(),
            user_id: self.user_id,
            kind: self.kind,
            date: self.date.unwrap_or(now),
            vitals: self.vitals,
            symptoms: self.symptoms,
            diagnosis: self.diagnosis,
            notes: self.notes,
            attachments: self.attachments,
            doctor_id: self.doctor_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecordPatch {
    #[serde(rename = "type")]
    pub kind: Option<HealthRecordKind>,
    pub date: Option<DateTime<Utc>>,
    pub vitals: Option<Vitals>,
    pub symptoms: Option<Vec<String>>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    pub attachments: Option<Vec<String>>,
    pub doctor_id: Option<String>,
}

impl HealthRecordPatch {
    pub fn apply(self, record: &mut HealthRecord, now: DateTime<Utc>) {
        if let Some(kind) = self.kind {
            record.kind = kind;
        }
        if let Some(date) = self.date {
            record.date = date;
        }
        if self.vitals.is_some() {
            record.vitals = self.vitals;
        }
        if let Some(symptoms) = self.symptoms {
            record.symptoms = symptoms;
        }
        if self.diagnosis.is_some() {
            record.diagnosis = self.diagnosis;
        }
        if self.notes.is_some() {
            record.notes = self.notes;
        }
        if let Some(attachments) = self.attachments {
            record.attachments = attachments;
        }
        if self.doctor_id.is_some() {
            record.doctor_id = self.doctor_id;
        }
        record.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_defaults_to_now() {
        let input: NewHealthRecord = serde_json::from_str(
            r#"{
                "userId": "u1",
                "type": "vital",
                "vitals": {"bloodPressure": {"systolic": 120, "diastolic": 80}, "heartRate": 72}
            }"#,
        )
        .unwrap();
        input.validate().unwrap();
        let now = Utc::now();
        let record = input.into_record(now);
        assert_eq!(record.date, now);
        assert_eq!(record.kind, HealthRecordKind::Vital);
        let vitals = record.vitals.unwrap();
        assert_eq!(vitals.blood_pressure.unwrap().systolic, 120.0);
        assert_eq!(vitals.heart_rate, Some(72.0));
        assert_eq!(vitals.oxygen, None);
    }

    #[test]
    fn test_missing_user_rejected() {
        let input: NewHealthRecord =
            serde_json::from_str(r#"{"userId": "", "type": "symptom"}"#).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_patch_replaces_symptoms() {
        let input: NewHealthRecord = serde_json::from_str(
            r#"{"userId": "u1", "type": "symptom", "symptoms": ["cough"]}"#,
        )
        .unwrap();
        let mut record = input.into_record(Utc::now());
        HealthRecordPatch {
            symptoms: Some(vec!["cough".into(), "fever".into()]),
            diagnosis: Some("Viral fever".into()),
            ..Default::default()
        }
        .apply(&mut record, Utc::now());
        assert_eq!(record.symptoms, vec!["cough", "fever"]);
        assert_eq!(record.diagnosis.as_deref(), Some("Viral fever"));
        assert_eq!(record.kind, HealthRecordKind::Symptom);
    }
}
