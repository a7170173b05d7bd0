// libs/case-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use doctor_cell::models::{Department, DoctorError, DoctorId};
use shared_database::ServiceError;
use shared_models::error::AppError;

pub type CaseId = u64;

// ==============================================================================
// CORE CASE MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Open,
    Assigned,
    #[serde(alias = "inProgress")]
    InProgress,
    Resolved,
    Closed,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 5] = [
        CaseStatus::Open,
        CaseStatus::Assigned,
        CaseStatus::InProgress,
        CaseStatus::Resolved,
        CaseStatus::Closed,
    ];

    /// Open, assigned and in-progress cases still need attention.
    pub fn is_active(&self) -> bool {
        matches!(self, CaseStatus::Open | CaseStatus::Assigned | CaseStatus::InProgress)
    }

    pub fn is_terminal(&self) -> bool {
        *self == CaseStatus::Closed
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseStatus::Open => write!(f, "open"),
            CaseStatus::Assigned => write!(f, "assigned"),
            CaseStatus::InProgress => write!(f, "in_progress"),
            CaseStatus::Resolved => write!(f, "resolved"),
            CaseStatus::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyCase {
    pub id: CaseId,
    pub patient_name: String,
    pub patient_details: String,
    pub condition: String,
    pub case_type: Department,
    pub severity: Severity,
    pub status: CaseStatus,
    pub assigned_doctor_id: Option<DoctorId>,
    pub submission_date: DateTime<Utc>,
}

impl EmergencyCase {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_critical(&self) -> bool {
        self.is_active() && self.severity == Severity::Critical
    }

    /// A doctor attached while the status still says `open`: the state left
    /// behind when assignment and status update are issued separately.
    pub fn has_pending_status_update(&self) -> bool {
        self.status == CaseStatus::Open && self.assigned_doctor_id.is_some()
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitCaseRequest {
    pub patient_name: String,
    pub patient_details: String,
    pub condition: String,
    pub case_type: Department,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCaseStatusRequest {
    pub status: CaseStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignDoctorRequest {
    pub doctor_id: DoctorId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseFilters {
    pub status: Option<CaseStatus>,
    pub case_type: Option<Department>,
    pub severity: Option<Severity>,
    pub assigned_doctor_id: Option<DoctorId>,
    pub active_only: Option<bool>,
}

impl CaseFilters {
    pub fn matches(&self, case: &EmergencyCase) -> bool {
        self.status.map_or(true, |s| case.status == s)
            && self.case_type.map_or(true, |d| case.case_type == d)
            && self.severity.map_or(true, |s| case.severity == s)
            && self
                .assigned_doctor_id
                .map_or(true, |id| case.assigned_doctor_id == Some(id))
            && (!self.active_only.unwrap_or(false) || case.is_active())
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum CaseError {
    #[error("Case {0} not found")]
    NotFound(CaseId),

    #[error("Case {0} is closed and cannot be modified")]
    CaseClosed(CaseId),

    #[error("Invalid assignment: {0}")]
    InvalidAssignment(String),

    #[error("Unauthorized access to case: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Doctor(#[from] DoctorError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<CaseError> for AppError {
    fn from(err: CaseError) -> Self {
        match err {
            CaseError::NotFound(_) => AppError::NotFound(err.to_string()),
            CaseError::CaseClosed(_) => AppError::Conflict(err.to_string()),
            CaseError::InvalidAssignment(_) => AppError::BadRequest(err.to_string()),
            CaseError::Unauthorized(msg) => AppError::Forbidden(msg),
            CaseError::ValidationError(msg) => AppError::ValidationError(msg),
            CaseError::Doctor(e) => e.into(),
            CaseError::Service(e) => e.into(),
        }
    }
}
