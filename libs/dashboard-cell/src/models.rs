use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use case_cell::models::{CaseError, EmergencyCase};
use doctor_cell::models::{Department, Doctor, DoctorError};
use shared_models::error::AppError;

/// Doctor and case collections as read at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub doctors: Vec<Doctor>,
    pub cases: Vec<EmergencyCase>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(doctors: Vec<Doctor>, cases: Vec<EmergencyCase>) -> Self {
        Self {
            doctors,
            cases,
            fetched_at: Utc::now(),
        }
    }
}

/// Dashboard counters derived from a [`Snapshot`]. Never stored remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_doctors: usize,
    pub total_cases: usize,
    pub total_open: usize,
    pub total_assigned: usize,
    pub total_in_progress: usize,
    pub total_active: usize,
    pub total_critical: usize,
    pub approved_doctor_count: usize,
    pub available_doctor_count: usize,
    pub pending_approval_count: usize,
    /// Open cases that already carry a doctor.
    pub awaiting_status_update: usize,
    pub active_by_department: BTreeMap<Department, usize>,
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to load doctors: {0}")]
    Doctors(#[from] DoctorError),

    #[error("Failed to load cases: {0}")]
    Cases(#[from] CaseError),
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Doctors(e) => e.into(),
            DashboardError::Cases(e) => e.into(),
        }
    }
}
