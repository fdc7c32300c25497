//! Record kinds held by the store.
//!
//! Every kind comes as a stored record, a `New*` input for creation and a
//! `*Patch` of optional fields for partial updates.

/// Declares a fieldless enum stored as a lowercase string id.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal) {
            $($variant:ident => $id:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $id)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn id(&self) -> &'static str {
                match self {
                    $($name::$variant => $id),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.id())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::records::RecordError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($id => Ok($name::$variant),)+
                    other => Err($crate::records::RecordError::UnknownVariant {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

pub mod appointment;
pub mod doctor;
pub mod health;
pub mod medicine;
pub mod report;
pub mod user;

use thiserror::Error;

pub use appointment::{
    Appointment, AppointmentPatch, AppointmentStatus, AppointmentType, AppointmentWithDoctor,
    NewAppointment,
};
pub use doctor::{Doctor, DoctorPatch, NewDoctor, Slot};
pub use health::{BloodPressure, HealthRecord, HealthRecordKind, HealthRecordPatch, NewHealthRecord, Vitals};
pub use medicine::{DoseLog, DoseStatus, Medicine, MedicinePatch, NewMedicine};
pub use report::{ReportStatus, StoredReport};
pub use user::{EmergencyContact, Gender, NewUser, User, UserPatch};

/// Invalid record input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Unknown {field} '{value}'")]
    UnknownVariant { field: &'static str, value: String },

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Fails when a required text field is blank.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), RecordError> {
    if value.trim().is_empty() {
        return Err(RecordError::Invalid {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

/// New record identifier.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
