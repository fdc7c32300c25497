//! User profiles.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, require, RecordError};

string_enum! {
    Gender ("gender") {
        Male => "male",
        Female => "female",
        Other => "other",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<EmergencyContact>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), RecordError> {
        require("name", &self.name)?;
        require("phone", &self.phone)?;
        validate_email(&self.email)
    }

    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: new_id(),
            name: self.name,
            email: self.email.trim().to_lowercase(),
            phone: self.phone,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            blood_group: self.blood_group,
            address: self.address,
            emergency_contact: self.emergency_contact,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub blood_group: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
}

impl UserPatch {
    pub fn apply(self, user: &mut User, now: DateTime<Utc>) -> Result<(), RecordError> {
        if let Some(name) = self.name {
            require("name", &name)?;
            user.name = name;
        }
        if let Some(email) = self.email {
            validate_email(&email)?;
            user.email = email.trim().to_lowercase();
        }
        if let Some(phone) = self.phone {
            require("phone", &phone)?;
            user.phone = phone;
        }
        if let Some(date_of_birth) = self.date_of_birth {
            user.date_of_birth = date_of_birth;
        }
        if let Some(gender) = self.gender {
            user.gender = gender;
        }
        if self.blood_group.is_some() {
            user.blood_group = self.blood_group;
        }
        if self.address.is_some() {
            user.address = self.address;
        }
        if self.emergency_contact.is_some() {
            user.emergency_contact = self.emergency_contact;
        }
        user.updated_at = now;
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<(), RecordError> {
    require("email", email)?;
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(RecordError::Invalid {
            field: "email",
            reason: format!("'{}' is not an email address", email),
        }),
    }
}
