use serde::{Deserialize, Serialize};
use thiserror::Error;

use ncert_models::{MAX_STUDY_DAYS, MIN_STUDY_DAYS};

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StudyError {
    #[error("Invalid day count: {days} (expected {min}-{max})")]
    InvalidDayCount { days: i64, min: u32, max: u32 },

    #[error("No topics to schedule")]
    EmptyContent,

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Document processing error: {message}")]
    DocumentProcessing { message: String },

    #[error("Content extraction error: {message}")]
    Extraction { message: String },

    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl StudyError {
    pub fn invalid_day_count(days: i64) -> Self {
        Self::InvalidDayCount {
            days,
            min: MIN_STUDY_DAYS,
            max: MAX_STUDY_DAYS,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn document_processing(message: impl Into<String>) -> Self {
        Self::DocumentProcessing {
            message: message.into(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDayCount { .. } => "INVALID_DAY_COUNT",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::DocumentProcessing { .. } => "DOCUMENT_PROCESSING_ERROR",
            Self::Extraction { .. } => "EXTRACTION_ERROR",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Export { .. } => "EXPORT_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Process exit status for the command line.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidDayCount { .. } => 2,
            Self::Validation { .. } => 2,
            Self::EmptyContent => 3,
            Self::DocumentProcessing { .. } => 4,
            Self::Extraction { .. } => 4,
            Self::ExternalService { .. } => 5,
            Self::Configuration { .. } => 78,
            Self::Export { .. } => 74,
            Self::Internal { .. } => 1,
        }
    }
}

pub type StudyResult<T> = Result<T, StudyError>;

impl From<reqwest::Error> for StudyError {
    fn from(error: reqwest::Error) -> Self {
        Self::external_service("HTTP Client", error.to_string())
    }
}

impl From<serde_json::Error> for StudyError {
    fn from(error: serde_json::Error) -> Self {
        Self::validation("JSON", error.to_string())
    }
}

impl From<csv::Error> for StudyError {
    fn from(error: csv::Error) -> Self {
        Self::export(error.to_string())
    }
}

impl From<std::io::Error> for StudyError {
    fn from(error: std::io::Error) -> Self {
        Self::export(error.to_string())
    }
}
