//! Appointments between a user and a doctor.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, require, Doctor, RecordError};

string_enum! {
    AppointmentType ("type") {
        Consultation => "consultation",
        Checkup => "checkup",
        Followup => "followup",
        Emergency => "emergency",
    }
}

string_enum! {
    AppointmentStatus ("status") {
        Scheduled => "scheduled",
        Confirmed => "confirmed",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl Default for AppointmentType {
    fn default() -> Self {
        AppointmentType::Consultation
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Scheduled
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub doctor_id: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    pub status: AppointmentStatus,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An appointment with its doctor resolved. `doctor` is `None` when the
/// referenced doctor no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentWithDoctor {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub doctor: Option<Doctor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub user_id: String,
    pub doctor_id: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default, rename = "type")]
    pub kind: AppointmentType,
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewAppointment {
    pub fn validate(&self) -> Result<(), RecordError> {
        require("userId", &self.user_id)?;
        require("doctorId", &self.doctor_id)?;
        require("time", &self.time)?;
        require("reason", &self.reason)
    }

    pub fn into_appointment(self, now: DateTime<Utc>) -> Appointment {
        Appointment {
            id: new_id(),
            user_id: self.user_id,
            doctor_id: self.doctor_id,
            date: self.date,
            time: self.time,
            kind: self.kind,
            status: AppointmentStatus::Scheduled,
            reason: self.reason,
            notes: self.notes,
            prescription: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<AppointmentType>,
    pub status: Option<AppointmentStatus>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub prescription: Option<String>,
}

impl AppointmentPatch {
    pub fn apply(
        self,
        appointment: &mut Appointment,
        now: DateTime<Utc>,
    ) -> Result<(), RecordError> {
        if let Some(time) = self.time {
            require("time", &time)?;
            appointment.time = time;
        }
        if let Some(reason) = self.reason {
            require("reason", &reason)?;
            appointment.reason = reason;
        }
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(kind) = self.kind {
            appointment.kind = kind;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        if self.notes.is_some() {
            appointment.notes = self.notes;
        }
        if self.prescription.is_some() {
            appointment.prescription = self.prescription;
        }
        appointment.updated_at = now;
        Ok(())
    }
}
