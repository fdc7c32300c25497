//! Medicines on a user's schedule and their dose log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, require, RecordError};

string_enum! {
    DoseStatus ("status") {
        Taken => "taken",
        Missed => "missed",
        Skipped => "skipped",
    }
}

/// One entry of the dose log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseLog {
    pub date: DateTime<Utc>,
    pub time: String,
    pub status: DoseStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub timing: Vec<String>,
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub purpose: String,
    pub side_effects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub reminder_enabled: bool,
    pub taken: Vec<DoseLog>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Medicine {
    /// Started at or before `now` and not yet ended.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && self.end_date.map_or(true, |end| end >= now)
    }
}

fn default_reminder() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedicine {
    pub user_id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    #[serde(default)]
    pub timing: Vec<String>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub purpose: String,
    #[serde(default)]
    pub side_effects: Vec<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default = "default_reminder")]
    pub reminder_enabled: bool,
}

impl NewMedicine {
    pub fn validate(&self) -> Result<(), RecordError> {
        require("userId", &self.user_id)?;
        require("name", &self.name)?;
        require("dosage", &self.dosage)?;
        require("frequency", &self.frequency)?;
        require("purpose", &self.purpose)?;
        validate_period(self.start_date, self.end_date)
    }

    pub fn into_medicine(self, now: DateTime<Utc>) -> Medicine {
        Medicine {
            id: new_id(),
            user_id: self.user_id,
            name: self.name,
            dosage: self.dosage,
            frequency: self.frequency,
            timing: self.timing,
            start_date: self.start_date,
            end_date: self.end_date,
            purpose: self.purpose,
            side_effects: self.side_effects,
            instructions: self.instructions,
            reminder_enabled: self.reminder_enabled,
            taken: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicinePatch {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub timing: Option<Vec<String>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub purpose: Option<String>,
    pub side_effects: Option<Vec<String>>,
    pub instructions: Option<String>,
    pub reminder_enabled: Option<bool>,
}

impl MedicinePatch {
    pub fn apply(self, medicine: &mut Medicine, now: DateTime<Utc>) -> Result<(), RecordError> {
        let start = self.start_date.unwrap_or(medicine.start_date);
        let end = self.end_date.or(medicine.end_date);
        validate_period(start, end)?;

        if let Some(name) = self.name {
            require("name", &name)?;
            medicine.name = name;
        }
        if let Some(dosage) = self.dosage {
            require("dosage", &dosage)?;
            medicine.dosage = dosage;
        }
        if let Some(frequency) = self.frequency {
            medicine.frequency = frequency;
        }
        if let Some(timing) = self.timing {
            medicine.timing = timing;
        }
        if let Some(purpose) = self.purpose {
            medicine.purpose = purpose;
        }
        if let Some(side_effects) = self.side_effects {
            medicine.side_effects = side_effects;
        }
        if self.instructions.is_some() {
            medicine.instructions = self.instructions;
        }
        if let Some(reminder_enabled) = self.reminder_enabled {
            medicine.reminder_enabled = reminder_enabled;
        }
        medicine.start_date = start;
        medicine.end_date = end;
        medicine.updated_at = now;
        Ok(())
    }
}

fn validate_period(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Result<(), RecordError> {
    match end {
        Some(end) if end < start => Err(RecordError::Invalid {
            field: "endDate",
            reason: "ends before it starts".to_string(),
        }),
        _ => Ok(()),
    }
}
