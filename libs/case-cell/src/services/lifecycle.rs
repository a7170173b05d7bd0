// libs/case-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use shared_models::auth::Session;

use crate::models::{CaseError, CaseStatus, EmergencyCase};

/// Case status rules. `closed` is terminal; every other status may be set to
/// any status, backwards included.
#[derive(Debug, Clone, Copy)]
pub struct CaseLifecycleService;

impl CaseLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        case: &EmergencyCase,
        new_status: CaseStatus,
    ) -> Result<(), CaseError> {
        debug!("Validating case {} transition from {} to {}", case.id, case.status, new_status);

        if !self.get_valid_transitions(case.status).contains(&new_status) {
            warn!("Rejected transition on case {}: {} -> {}", case.id, case.status, new_status);
            return Err(CaseError::CaseClosed(case.id));
        }

        Ok(())
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(&self, current_status: CaseStatus) -> Vec<CaseStatus> {
        match current_status {
            // Terminal state - no transitions allowed
            CaseStatus::Closed => vec![],
            _ => CaseStatus::ALL.to_vec(),
        }
    }

    /// Any mutation (status, assignment) is refused once the case is closed.
    pub fn ensure_mutable(&self, case: &EmergencyCase) -> Result<(), CaseError> {
        if case.status.is_terminal() {
            warn!("Mutation attempted on closed case {}", case.id);
            return Err(CaseError::CaseClosed(case.id));
        }
        Ok(())
    }

    /// Admins may set any status; a doctor only on cases assigned to them.
    pub fn authorize_status_update(
        &self,
        session: &Session,
        case: &EmergencyCase,
    ) -> Result<(), CaseError> {
        if session.is_admin() {
            return Ok(());
        }

        match (session.doctor_id(), case.assigned_doctor_id) {
            (Some(doctor_id), Some(assigned)) if doctor_id == assigned => Ok(()),
            _ => Err(CaseError::Unauthorized(format!(
                "Session may not update the status of case {}",
                case.id
            ))),
        }
    }

    /// Status a freshly assigned case should move to, if any.
    pub fn status_after_assignment(&self, current_status: CaseStatus) -> Option<CaseStatus> {
        match current_status {
            CaseStatus::Open => Some(CaseStatus::Assigned),
            _ => None,
        }
    }
}

impl Default for CaseLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
