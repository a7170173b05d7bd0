use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use case_cell::models::{CaseError, CaseId, Severity};
use doctor_cell::models::Department;
use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomReport {
    pub symptoms: String,
    pub age: Option<u32>,
}

/// Where a patient describing these symptoms should be routed. Advisory only;
/// the submitter still picks the case type and severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageSuggestion {
    pub department: Department,
    pub severity: Severity,
    pub matched_keywords: Vec<String>,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    pub case_id: CaseId,
    pub heart_rate: u16,
    pub systolic_bp: u16,
    pub diastolic_bp: u16,
    pub respiratory_rate: u8,
    pub oxygen_saturation: u8,
    pub temperature_c: f32,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("No symptoms described")]
    EmptySymptoms,

    #[error("Case {0} is not being monitored")]
    NotMonitored(CaseId),

    #[error("Vitals unavailable: {0}")]
    VitalsUnavailable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Case(#[from] CaseError),
}

impl From<TriageError> for AppError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::EmptySymptoms => AppError::ValidationError(err.to_string()),
            TriageError::NotMonitored(_) => AppError::Conflict(err.to_string()),
            TriageError::VitalsUnavailable(msg) => AppError::Internal(msg),
            TriageError::Unauthorized(msg) => AppError::Forbidden(msg),
            TriageError::Case(e) => e.into(),
        }
    }
}
