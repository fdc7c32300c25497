use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CivicError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] crate::wizard::WizardError),

    #[error("Submission error: {0}")]
    Submission(#[from] crate::submission::SubmissionError),

    #[error("Invalid report: {0}")]
    Payload(#[from] crate::submission::PayloadError),

    #[error("Location error: {0}")]
    Geolocation(#[from] crate::location::GeolocationError),

    #[error("Geocoder error: {0}")]
    Geocode(#[from] crate::location::GeocodeError),

    #[error("Transcription error: {0}")]
    Transcription(#[from] crate::transcribe::TranscriptionError),

    #[error("Invalid record: {0}")]
    Record(#[from] crate::records::RecordError),

    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

pub type Result<T> = std::result::Result<T, CivicError>;
