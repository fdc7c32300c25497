//! Doctors (authorities) that appointments are booked with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, require, RecordError};

/// Rating given to doctors created without one.
pub const DEFAULT_RATING: f64 = 4.5;
pub const MAX_RATING: f64 = 5.0;

/// Bookable times on one weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub day: String,
    #[serde(default)]
    pub times: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub qualification: String,
    pub experience: u32,
    pub phone: String,
    pub email: String,
    pub hospital: String,
    pub address: String,
    pub consultation_fee: f64,
    pub rating: f64,
    pub available_slots: Vec<Slot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDoctor {
    pub name: String,
    pub specialty: String,
    pub qualification: String,
    pub experience: u32,
    pub phone: String,
    pub email: String,
    pub hospital: String,
    pub address: String,
    pub consultation_fee: f64,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub available_slots: Vec<Slot>,
}

impl NewDoctor {
    pub fn validate(&self) -> Result<(), RecordError> {
        require("name", &self.name)?;
        require("specialty", &self.specialty)?;
        require("qualification", &self.qualification)?;
        require("phone", &self.phone)?;
        require("email", &self.email)?;
        require("hospital", &self.hospital)?;
        require("address", &self.address)?;
        validate_fee(self.consultation_fee)?;
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        Ok(())
    }

    pub fn into_doctor(self, now: DateTime<Utc>) -> Doctor {
        Doctor {
            id: new_id(),
            name: self.name,
            specialty: self.specialty,
            qualification: self.qualification,
            experience: self.experience,
            phone: self.phone,
            email: self.email,
            hospital: self.hospital,
            address: self.address,
            consultation_fee: self.consultation_fee,
            rating: self.rating.unwrap_or(DEFAULT_RATING),
            available_slots: self.available_slots,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorPatch {
    pub specialty: Option<String>,
    pub hospital: Option<String>,
    pub phone: Option<String>,
    pub consultation_fee: Option<f64>,
    pub rating: Option<f64>,
    pub available_slots: Option<Vec<Slot>>,
}

impl DoctorPatch {
    pub fn apply(self, doctor: &mut Doctor, now: DateTime<Utc>) -> Result<(), RecordError> {
        if let Some(fee) = self.consultation_fee {
            validate_fee(fee)?;
            doctor.consultation_fee = fee;
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
            doctor.rating = rating;
        }
        if let Some(specialty) = self.specialty {
            require("specialty", &specialty)?;
            doctor.specialty = specialty;
        }
        if let Some(hospital) = self.hospital {
            doctor.hospital = hospital;
        }
        if let Some(phone) = self.phone {
            doctor.phone = phone;
        }
        if let Some(slots) = self.available_slots {
            doctor.available_slots = slots;
        }
        doctor.updated_at = now;
        Ok(())
    }
}

fn validate_rating(rating: f64) -> Result<(), RecordError> {
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err(RecordError::Invalid {
            field: "rating",
            reason: format!("{} is outside 0..={}", rating, MAX_RATING),
        });
    }
    Ok(())
}

fn validate_fee(fee: f64) -> Result<(), RecordError> {
    if !fee.is_finite() || fee < 0.0 {
        return Err(RecordError::Invalid {
            field: "consultationFee",
            reason: "must be a non-negative amount".to_string(),
        });
    }
    Ok(())
}
