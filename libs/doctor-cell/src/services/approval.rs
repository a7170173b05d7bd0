// libs/doctor-cell/src/services/approval.rs
use tracing::{debug, info, warn};

use shared_models::auth::Session;

use crate::models::{Doctor, DoctorError, DoctorStatus};

/// Approval state machine for doctor registrations:
/// `pending_approval -> approved | rejected`, both terminal.
#[derive(Debug, Clone, Copy)]
pub struct DoctorApprovalService;

impl DoctorApprovalService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that an approval transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: DoctorStatus,
        new_status: DoctorStatus,
    ) -> Result<(), DoctorError> {
        debug!("Validating doctor status transition from {} to {}", current_status, new_status);

        if !self.get_valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid doctor status transition attempted: {} -> {}", current_status, new_status);
            return Err(DoctorError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }

        info!("Doctor status transition validated: {} -> {}", current_status, new_status);
        Ok(())
    }

    pub fn get_valid_transitions(&self, current_status: DoctorStatus) -> Vec<DoctorStatus> {
        match current_status {
            DoctorStatus::PendingApproval => vec![DoctorStatus::Approved, DoctorStatus::Rejected],
            // Terminal states - no re-submission pathway
            DoctorStatus::Approved => vec![],
            DoctorStatus::Rejected => vec![],
        }
    }

    /// Only admins decide on registrations.
    pub fn authorize_decision(&self, session: &Session) -> Result<(), DoctorError> {
        if !session.is_admin() {
            return Err(DoctorError::Unauthorized(
                "Only admins may approve or reject doctors".to_string(),
            ));
        }
        Ok(())
    }

    /// A doctor (or an admin acting for them) may toggle availability, and
    /// only once approved.
    pub fn validate_availability_change(
        &self,
        session: &Session,
        doctor: &Doctor,
    ) -> Result<(), DoctorError> {
        if !session.acts_for_doctor(doctor.id) {
            return Err(DoctorError::Unauthorized(format!(
                "Session may not change availability of doctor {}",
                doctor.id
            )));
        }

        if !doctor.is_approved() {
            warn!("Availability change rejected for doctor {} in status {}", doctor.id, doctor.status);
            return Err(DoctorError::NotApproved);
        }

        Ok(())
    }
}

impl Default for DoctorApprovalService {
    fn default() -> Self {
        Self::new()
    }
}
