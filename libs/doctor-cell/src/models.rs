use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::ServiceError;
use shared_models::error::AppError;

pub type DoctorId = u64;

/// Medical specialty shared by doctors and cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    #[serde(alias = "emergency_medicine")]
    Emergency,
    #[serde(alias = "cardiac")]
    Cardiology,
    #[serde(alias = "generalMedicine", alias = "general")]
    GeneralMedicine,
    Orthopedics,
    Pediatrics,
    Neurology,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Emergency => "emergency",
            Department::Cardiology => "cardiology",
            Department::GeneralMedicine => "general_medicine",
            Department::Orthopedics => "orthopedics",
            Department::Pediatrics => "pediatrics",
            Department::Neurology => "neurology",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoctorStatus {
    PendingApproval,
    Approved,
    Rejected,
}

impl fmt::Display for DoctorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoctorStatus::PendingApproval => write!(f, "pending_approval"),
            DoctorStatus::Approved => write!(f, "approved"),
            DoctorStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub department: Department,
    pub status: DoctorStatus,
    pub available: bool,
    #[serde(default)]
    pub contact_info: String,
    // Read from the service, never echoed back by the gateway.
    #[serde(default, skip_serializing)]
    pub registration_code: String,
    pub registration_date: DateTime<Utc>,
    pub years_of_experience: Option<u32>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

impl Doctor {
    pub fn is_approved(&self) -> bool {
        self.status == DoctorStatus::Approved
    }

    /// `available` only counts for approved doctors.
    pub fn is_available(&self) -> bool {
        self.is_approved() && self.available
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDoctorRequest {
    pub name: String,
    pub department: Department,
    pub contact_info: String,
    pub registration_code: String,
    pub years_of_experience: Option<u32>,
    pub certifications: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorLoginRequest {
    pub doctor_id: DoctorId,
    pub registration_code: String,
}

/// Answer of the service's login call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoginOutcome {
    Success { doctor: Doctor },
    NotApproved,
    DoctorNotFound,
    InvalidCredentials,
}

impl LoginOutcome {
    pub fn into_result(self) -> Result<Doctor, DoctorError> {
        match self {
            LoginOutcome::Success { doctor } => Ok(doctor),
            LoginOutcome::NotApproved => Err(DoctorError::NotApproved),
            LoginOutcome::DoctorNotFound => Err(DoctorError::DoctorNotFound),
            LoginOutcome::InvalidCredentials => Err(DoctorError::InvalidCredentials),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub available: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorFilters {
    pub department: Option<Department>,
    pub status: Option<DoctorStatus>,
    pub available_only: Option<bool>,
}

impl DoctorFilters {
    pub fn matches(&self, doctor: &Doctor) -> bool {
        self.department.map_or(true, |d| doctor.department == d)
            && self.status.map_or(true, |s| doctor.status == s)
            && (!self.available_only.unwrap_or(false) || doctor.is_available())
    }
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Doctor {0} not found")]
    NotFound(DoctorId),

    #[error("No doctor registered with that id")]
    DoctorNotFound,

    #[error("Invalid doctor credentials")]
    InvalidCredentials,

    #[error("Doctor has not been approved")]
    NotApproved,

    #[error("Invalid registration code: {0}")]
    InvalidRegistrationCode(String),

    #[error("Invalid doctor status transition from {from} to {to}")]
    InvalidStatusTransition { from: DoctorStatus, to: DoctorStatus },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::Unauthorized(msg) => AppError::Forbidden(msg),
            DoctorError::NotFound(_) | DoctorError::DoctorNotFound => AppError::NotFound(err.to_string()),
            DoctorError::InvalidCredentials | DoctorError::InvalidRegistrationCode(_) => {
                AppError::Auth(err.to_string())
            }
            DoctorError::NotApproved => AppError::Forbidden(err.to_string()),
            DoctorError::InvalidStatusTransition { .. } => AppError::Conflict(err.to_string()),
            DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
            DoctorError::Service(e) => e.into(),
        }
    }
}
